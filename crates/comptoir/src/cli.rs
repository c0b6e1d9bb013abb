//! Command-line front end.
//!
//! Each invocation mounts one screen over a JSON file, applies the requested
//! interactions in order (sort clicks, query, page size, page, selection)
//! and prints the result.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use comptoir_listing::Listable;
use futures::executor::block_on;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ListingConfig;
use crate::confirm::{AssumeYes, Confirm, ConfirmPrompt};
use crate::controller::{DeleteOutcome, ListScreen};
use crate::entities::{self, Article, Entity, EntityPresenter, Order, Product};
use crate::error::ScreenError;
use crate::record::{JsonPresenter, JsonRecord};
use crate::render::ScreenRenderer;
use crate::source::Scope;
use crate::store::MemorySource;
use crate::view::RowPresenter;

#[derive(Debug, Parser)]
#[command(name = "comptoir", version, about = "Browse and manage orders, products and articles")]
pub struct Cli {
    /// YAML file with listing defaults
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show one page of a collection
    List(ListArgs),
    /// Print the detail payload of one record
    Show {
        #[command(flatten)]
        target: Target,
        id: String,
    },
    /// Delete one record after confirmation
    Delete {
        #[command(flatten)]
        target: Target,
        id: String,
        /// Do not ask for confirmation
        #[arg(long, short)]
        yes: bool,
    },
    /// Change fields of one record
    Update {
        #[command(flatten)]
        target: Target,
        id: String,
        /// Field assignment, e.g. `price=450` or `name="Chorba"`
        #[arg(long = "set", value_name = "KEY=VALUE", required = true)]
        assignments: Vec<String>,
        /// Do not ask for confirmation
        #[arg(long, short)]
        yes: bool,
    },
}

impl Command {
    pub fn target(&self) -> &Target {
        match self {
            Command::List(args) => &args.target,
            Command::Show { target, .. }
            | Command::Delete { target, .. }
            | Command::Update { target, .. } => target,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    Orders,
    Products,
    Articles,
    /// Any JSON array of objects with `_id` or `id`
    Records,
}

/// Which collection to open.
#[derive(Debug, Args)]
pub struct Target {
    #[arg(value_enum)]
    pub kind: Kind,

    /// JSON file holding the collection
    #[arg(long, value_name = "PATH")]
    pub data: PathBuf,

    /// Client the orders belong to
    #[arg(long)]
    pub client: Option<String>,

    /// Fields the query searches (records only)
    #[arg(long, value_delimiter = ',')]
    pub search: Vec<String>,

    /// Fields shown as columns (records only)
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub target: Target,

    /// Click a column header; repeat to click again
    #[arg(long = "sort", value_name = "FIELD")]
    pub sort: Vec<String>,

    /// Search text
    #[arg(long, short)]
    pub query: Option<String>,

    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    #[arg(long)]
    pub page_size: Option<usize>,

    /// Tick a row by id
    #[arg(long = "select", value_name = "ID")]
    pub select: Vec<String>,

    /// Tick the header checkbox
    #[arg(long)]
    pub select_all: bool,

    /// Print the screen as JSON
    #[arg(long)]
    pub json: bool,
}

/// Runs one command.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ListingConfig::load_or_default(cli.config.as_deref())
        .context("loading listing configuration")?;
    let kind = cli.command.target().kind;
    match kind {
        Kind::Orders => run_entity::<Order>(&config, cli.command),
        Kind::Products => run_entity::<Product>(&config, cli.command),
        Kind::Articles => run_entity::<Article>(&config, cli.command),
        Kind::Records => run_records(&config, cli.command),
    }
}

fn open<R: DeserializeOwned>(target: &Target) -> anyhow::Result<MemorySource<R>> {
    MemorySource::open(&target.data)
        .with_context(|| format!("opening {}", target.data.display()))
}

fn run_entity<E: Entity>(config: &ListingConfig, command: Command) -> anyhow::Result<()> {
    let target = command.target();
    let mut source = open::<E>(target)?;
    if let Some(field) = E::SCOPE_FIELD {
        source = source.scoped_by(field);
    }
    let screen = entities::screen::<E>(config, target.client.as_deref().map(Scope::from))?;
    let presenter = EntityPresenter::<E>::new(config);
    execute(screen, &source, &presenter, |record: &E| serde_json::to_value(record.detail()), command)
}

fn run_records(config: &ListingConfig, command: Command) -> anyhow::Result<()> {
    let target = command.target();
    let source = open::<JsonRecord>(target)?;
    let presenter = if target.columns.is_empty() {
        JsonPresenter::infer(&source.snapshot())
    } else {
        JsonPresenter::new(target.columns.iter().cloned())
    };
    let search: Vec<String> = if target.search.is_empty() {
        presenter.paths().map(str::to_string).collect()
    } else {
        target.search.clone()
    };
    let sort_key = presenter.paths().next().unwrap_or("_id").to_string();
    let title = target
        .data
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Records".to_string());

    let screen = ListScreen::new(JsonRecord::matcher(search), config.initial_state(&sort_key)?)
        .titled(title)
        .select_all_scope(config.select_all);
    execute(screen, &source, &presenter, |record: &JsonRecord| serde_json::to_value(record), command)
}

fn execute<R, P, D>(
    mut screen: ListScreen<R>,
    source: &MemorySource<R>,
    presenter: &P,
    detail: D,
    command: Command,
) -> anyhow::Result<()>
where
    R: Listable<Id = String> + Clone + Serialize + DeserializeOwned + Send + Sync,
    P: RowPresenter<R>,
    D: Fn(&R) -> serde_json::Result<serde_json::Value>,
{
    block_on(screen.load(source))?;

    match command {
        Command::List(args) => list(&mut screen, presenter, &args),
        Command::Show { id, .. } => {
            let record = screen
                .collection()
                .iter()
                .find(|record| record.id() == &id)
                .ok_or(ScreenError::UnknownRecord(id))?;
            println!("{}", serde_json::to_string_pretty(&detail(record)?)?);
            Ok(())
        }
        Command::Delete { id, yes, .. } => {
            let confirm = confirmer(yes);
            match block_on(screen.delete_with(&id, confirm.as_ref(), source))? {
                DeleteOutcome::Cancelled => println!("Cancelled."),
                DeleteOutcome::Deleted(_) | DeleteOutcome::Gone => println!("Deleted '{id}'."),
            }
            Ok(())
        }
        Command::Update {
            id,
            assignments,
            yes,
            ..
        } => {
            let patch = parse_assignments(&assignments)?;
            let question = format!("Save changes to '{id}'?");
            if !confirmer(yes).confirm(&question)?.is_proceed() {
                println!("Cancelled.");
                return Ok(());
            }
            block_on(screen.update(&id, &patch, source))?;
            if let Some(record) = screen.collection().iter().find(|record| record.id() == &id) {
                println!("{}", serde_json::to_string_pretty(&detail(record)?)?);
            }
            Ok(())
        }
    }
}

fn confirmer(assume_yes: bool) -> Box<dyn Confirm> {
    if assume_yes {
        Box::new(AssumeYes)
    } else {
        Box::new(ConfirmPrompt::new())
    }
}

fn list<R, P>(screen: &mut ListScreen<R>, presenter: &P, args: &ListArgs) -> anyhow::Result<()>
where
    R: Listable<Id = String>,
    P: RowPresenter<R>,
{
    apply_list_args(screen, args)?;
    let view = screen.view(presenter);
    let renderer = ScreenRenderer::for_stdout();
    let output = if args.json {
        renderer.render_json(&view)?
    } else {
        renderer.render(&view)?
    };
    println!("{output}");
    Ok(())
}

/// Replays the list options against a loaded screen.
///
/// Sorting, searching and resizing reset the page, so the page is applied
/// last.
pub fn apply_list_args<R>(screen: &mut ListScreen<R>, args: &ListArgs) -> crate::Result<()>
where
    R: Listable<Id = String>,
{
    for key in &args.sort {
        screen.request_sort(key);
    }
    if let Some(query) = &args.query {
        screen.set_query(query.as_str());
    }
    if let Some(size) = args.page_size {
        screen.set_page_size(size)?;
    }
    screen.set_page_index(args.page.saturating_sub(1));
    if args.select_all {
        screen.toggle_all(true);
    }
    for id in &args.select {
        screen.toggle(id)?;
    }
    Ok(())
}

/// Turns `key=value` pairs into a JSON object patch. Values that parse as
/// JSON keep their type; anything else is a string.
pub fn parse_assignments(assignments: &[String]) -> anyhow::Result<serde_json::Value> {
    let mut patch = serde_json::Map::new();
    for assignment in assignments {
        let Some((key, raw)) = assignment.split_once('=') else {
            bail!("expected KEY=VALUE, got '{assignment}'");
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("empty field name in '{assignment}'");
        }
        let value = serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::from(raw));
        patch.insert(key.to_string(), value);
    }
    Ok(serde_json::Value::Object(patch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn assignments_keep_json_types() {
        let patch = parse_assignments(&[
            "price=450".into(),
            "name=Chorba frik".into(),
            "available=true".into(),
            "note=\"42\"".into(),
        ])
        .unwrap();
        assert_eq!(
            patch,
            json!({ "price": 450, "name": "Chorba frik", "available": true, "note": "42" })
        );
    }

    #[test]
    fn malformed_assignments_fail() {
        assert!(parse_assignments(&["price".into()]).is_err());
        assert!(parse_assignments(&["=3".into()]).is_err());
    }

    #[test]
    fn list_arguments_parse() {
        let cli = Cli::try_parse_from([
            "comptoir", "list", "orders", "--data", "orders.json", "--client", "c1", "--sort",
            "totalprice", "--sort", "totalprice", "-q", "cmd", "--page", "2", "--select-all",
        ])
        .unwrap();
        let Command::List(args) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(args.target.kind, Kind::Orders);
        assert_eq!(args.target.client.as_deref(), Some("c1"));
        assert_eq!(args.sort, vec!["totalprice", "totalprice"]);
        assert_eq!(args.query.as_deref(), Some("cmd"));
        assert_eq!(args.page, 2);
        assert!(args.select_all);
    }

    #[test]
    fn update_requires_an_assignment() {
        assert!(Cli::try_parse_from(["comptoir", "update", "articles", "--data", "a.json", "a1"]).is_err());
    }
}
