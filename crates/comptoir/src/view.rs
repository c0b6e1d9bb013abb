//! Serializable snapshot of a list screen.
//!
//! A [`ScreenView`] is what a renderer sees: header labels, the rows of the
//! current page already formatted as text, filler count, pagination footer
//! and status messages. It is built by
//! [`ListScreen::view`](crate::controller::ListScreen::view) and consumed by
//! [`ScreenRenderer`](crate::render::ScreenRenderer) or serialized as JSON.

use std::fmt;

use comptoir_listing::{Dir, SortSpec};
use serde::{Deserialize, Serialize};

use crate::present::RowTone;

/// How a status message is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for MessageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MessageLevel::Info => "info",
            MessageLevel::Success => "success",
            MessageLevel::Warning => "warning",
            MessageLevel::Error => "error",
        };
        f.write_str(label)
    }
}

/// A status message shown below the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub level: MessageLevel,
    pub text: String,
}

impl Message {
    pub fn new(level: MessageLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(MessageLevel::Info, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(MessageLevel::Success, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(MessageLevel::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(MessageLevel::Error, text)
    }
}

/// A table column: the field it sorts by and its header label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub key: String,
    pub label: String,
}

impl Column {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Column {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// Turns records into display cells.
pub trait RowPresenter<R> {
    /// The columns, in display order.
    fn columns(&self) -> Vec<Column>;

    /// One formatted cell per column.
    fn cells(&self, record: &R) -> Vec<String>;

    fn tone(&self, _record: &R) -> RowTone {
        RowTone::Normal
    }
}

/// What the table body shows instead of, or as, rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Body {
    /// A fetch is in flight.
    Loading,
    /// A non-blank query matched nothing.
    NotFound,
    /// Rows of the current page (possibly none).
    Rows,
}

/// A header cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderView {
    pub key: String,
    pub label: String,
    /// Direction when this is the active sort column.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sorted: Option<Dir>,
}

impl HeaderView {
    /// The label with a direction marker when the column is sorted.
    pub fn marked_label(&self) -> String {
        match self.sorted {
            Some(Dir::Asc) => format!("{} ▲", self.label),
            Some(Dir::Desc) => format!("{} ▼", self.label),
            None => self.label.clone(),
        }
    }
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowView {
    pub id: String,
    pub cells: Vec<String>,
    pub selected: bool,
    pub tone: RowTone,
}

/// Pagination footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageFooter {
    pub page_index: usize,
    pub page_size: usize,
    pub page_sizes: Vec<usize>,
    /// Records surviving the query.
    pub total_filtered: usize,
    /// Records in the fetched collection.
    pub total_fetched: usize,
    /// 1-based position of the first row shown, 0 when the result is empty.
    pub first_row: usize,
    /// 1-based position of the last row shown.
    pub last_row: usize,
    pub page_count: usize,
}

impl PageFooter {
    pub fn new(
        page_index: usize,
        page_size: usize,
        page_sizes: &[usize],
        total_filtered: usize,
        total_fetched: usize,
    ) -> Self {
        let range = comptoir_listing::page_range(page_index, page_size, total_filtered);
        let (first_row, last_row) = if range.is_empty() {
            (0, 0)
        } else {
            (range.start + 1, range.end)
        };
        PageFooter {
            page_index,
            page_size,
            page_sizes: page_sizes.to_vec(),
            total_filtered,
            total_fetched,
            first_row,
            last_row,
            page_count: total_filtered.div_ceil(page_size.max(1)),
        }
    }
}

/// Everything a renderer needs to draw one screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenView {
    pub title: String,
    pub headers: Vec<HeaderView>,
    pub body: Body,
    pub rows: Vec<RowView>,
    pub filler_rows: usize,
    pub sort: SortSpec,
    pub query: String,
    pub selected: usize,
    pub footer: PageFooter,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub messages: Vec<Message>,
}

impl ScreenView {
    /// Builds header cells, marking the column `sort` applies to.
    pub fn headers_for(columns: Vec<Column>, sort: &SortSpec) -> Vec<HeaderView> {
        columns
            .into_iter()
            .map(|column| HeaderView {
                sorted: (column.key == sort.key).then_some(sort.dir),
                key: column.key,
                label: column.label,
            })
            .collect()
    }

    pub fn is_loading(&self) -> bool {
        self.body == Body::Loading
    }

    pub fn is_not_found(&self) -> bool {
        self.body == Body::NotFound
    }
}
