//! Terminal rendering of a [`ScreenView`].
//!
//! Column widths and the footer line are computed here; the layout itself
//! lives in a MiniJinja template with two filters: `columns` pads and joins
//! the cells of one line, `tone` colors low-stock rows.

use console::Style;
use minijinja::Environment;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::view::{Body, Message, RowView, ScreenView};

const SCREEN_TEMPLATE: &str = r#"{{ title }}
{% if query %}
Search: {{ query }}
{% endif %}
    {{ header | columns(widths) }}
{{ rule }}
{% if body == "loading" %}
    Loading...
{% elif body == "not_found" %}
    No matching records found
{% else %}
{% for row in rows %}
{{ "[x]" if row.selected else "[ ]" }} {{ row.cells | columns(widths) | tone(row.tone) }}
{% endfor %}
{{ filler }}{% endif %}
{{ rule }}
{{ footer }}
{% if selected %}
{{ selected }} selected
{% endif %}
{% for message in messages %}
{{ message.level }}: {{ message.text }}
{% endfor %}
"#;

/// Gap between columns.
const GAP: &str = "  ";

/// Width of the checkbox gutter (`"[ ] "`).
const GUTTER: usize = 4;

#[derive(Serialize)]
struct Frame<'v> {
    title: &'v str,
    query: &'v str,
    header: Vec<String>,
    widths: Vec<usize>,
    rule: String,
    body: Body,
    rows: &'v [RowView],
    /// One newline per blank row keeping the page height.
    filler: String,
    footer: String,
    selected: usize,
    messages: &'v [Message],
}

/// Renders screens as plain text tables.
pub struct ScreenRenderer {
    env: Environment<'static>,
}

impl ScreenRenderer {
    /// `styled` turns on ANSI colors regardless of whether stdout is a
    /// terminal.
    pub fn new(styled: bool) -> Self {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.add_filter("columns", |cells: Vec<String>, widths: Vec<usize>| -> String {
            join_columns(&cells, &widths)
        });
        env.add_filter("tone", move |text: String, tone: String| -> String {
            if tone == "low_stock" {
                Style::new()
                    .red()
                    .force_styling(styled)
                    .apply_to(text)
                    .to_string()
            } else {
                text
            }
        });
        if let Err(err) = env.add_template("screen", SCREEN_TEMPLATE) {
            log::error!("screen template does not compile: {err}");
        }
        ScreenRenderer { env }
    }

    /// Renders with colors when stdout is a color terminal.
    pub fn for_stdout() -> Self {
        Self::new(console::colors_enabled())
    }

    pub fn render(&self, view: &ScreenView) -> crate::Result<String> {
        let header: Vec<String> = view.headers.iter().map(|h| h.marked_label()).collect();
        let widths = column_widths(&header, &view.rows);
        let total = GUTTER + widths.iter().sum::<usize>() + GAP.len() * widths.len().saturating_sub(1);

        let frame = Frame {
            title: &view.title,
            query: &view.query,
            header,
            widths,
            rule: "-".repeat(total),
            body: view.body,
            rows: &view.rows,
            filler: "\n".repeat(view.filler_rows),
            footer: footer_line(view),
            selected: view.selected,
            messages: &view.messages,
        };
        let template = self.env.get_template("screen")?;
        Ok(template.render(&frame)?)
    }

    /// The view as pretty-printed JSON.
    pub fn render_json(&self, view: &ScreenView) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(view)?)
    }
}

impl Default for ScreenRenderer {
    fn default() -> Self {
        Self::for_stdout()
    }
}

fn column_widths(header: &[String], rows: &[RowView]) -> Vec<usize> {
    let mut widths: Vec<usize> = header.iter().map(|label| label.width()).collect();
    for row in rows {
        for (i, cell) in row.cells.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.width());
            }
        }
    }
    widths
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}

fn join_columns(cells: &[String], widths: &[usize]) -> String {
    let line = cells
        .iter()
        .enumerate()
        .map(|(i, cell)| pad(cell, widths.get(i).copied().unwrap_or(0)))
        .collect::<Vec<_>>()
        .join(GAP);
    line.trim_end().to_string()
}

fn footer_line(view: &ScreenView) -> String {
    let footer = &view.footer;
    let mut line = format!(
        "Rows per page: {}  {}-{} of {}",
        footer.page_size, footer.first_row, footer.last_row, footer.total_filtered
    );
    if footer.page_count > 1 {
        line.push_str(&format!("  (page {}/{})", footer.page_index + 1, footer.page_count));
    }
    line
}
