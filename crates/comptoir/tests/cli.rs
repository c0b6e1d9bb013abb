//! End-to-end runs of the command-line front end over files on disk.

use std::fs;
use std::path::Path;

use clap::Parser;
use comptoir::cli::{self, apply_list_args, Cli, Command};
use comptoir::entities::{self, EntityPresenter, Order};
use comptoir::{ListingConfig, MemorySource, Scope, ScreenRenderer};
use futures::executor::block_on;
use serde_json::{json, Value};
use tempfile::TempDir;

fn write_orders(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("orders.json");
    let orders = json!([
        { "_id": "o1", "no": "CMD-003", "created_at": "2024-03-03T08:00:00Z", "state": "pending",
          "totalprice": 900, "client": { "_id": "c1", "name": "Haddad", "prenom": "Amel" } },
        { "_id": "o2", "no": "CMD-001", "created_at": "2024-03-01T08:00:00Z", "state": "delivered",
          "totalprice": 300, "client": { "_id": "c1", "name": "Haddad", "prenom": "Amel" } },
        { "_id": "o3", "no": "CMD-002", "state": "pending",
          "totalprice": 0, "client": { "_id": "c2", "name": "Benali", "prenom": "Karim" } }
    ]);
    fs::write(&path, serde_json::to_string(&orders).unwrap()).unwrap();
    path
}

fn stored(path: &Path) -> Vec<Value> {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn list_arguments_drive_the_screen() {
    let dir = TempDir::new().unwrap();
    let data = write_orders(dir.path());
    let data = data.to_str().unwrap();
    let cli = parse(&[
        "comptoir", "list", "orders", "--data", data, "--client", "c1", "--sort", "date", "--sort",
        "date", "--select", "o2",
    ]);
    let Command::List(args) = cli.command else {
        panic!("expected list");
    };

    let config = ListingConfig::default();
    let source = MemorySource::<Order>::open(&args.target.data)
        .unwrap()
        .scoped_by("client");
    let mut screen = entities::screen::<Order>(&config, Some(Scope::new("c1"))).unwrap();
    block_on(screen.load(&source)).unwrap();
    apply_list_args(&mut screen, &args).unwrap();

    let view = screen.view(&EntityPresenter::<Order>::new(&config));
    let numbers: Vec<&str> = view.rows.iter().map(|row| row.cells[0].as_str()).collect();
    assert_eq!(numbers, vec!["CMD-003", "CMD-001"]);
    assert!(view.rows[1].selected);

    let out = ScreenRenderer::new(false).render(&view).unwrap();
    assert!(out.contains("Date ▼"));
    assert!(out.contains("[x] CMD-001"));
    assert!(out.contains("900 DZD"));
    assert!(out.contains("1 selected"));
}

#[test]
fn selecting_an_unlisted_id_fails() {
    let dir = TempDir::new().unwrap();
    let data = write_orders(dir.path());
    let cli = parse(&[
        "comptoir", "list", "orders", "--data", data.to_str().unwrap(), "--client", "c1",
        "--select", "o3",
    ]);
    assert!(cli::run(cli).is_err());
}

#[test]
fn orders_need_a_client() {
    let dir = TempDir::new().unwrap();
    let data = write_orders(dir.path());
    let cli = parse(&["comptoir", "list", "orders", "--data", data.to_str().unwrap()]);
    let err = cli::run(cli).unwrap_err();
    assert!(err.to_string().contains("requires a client"));
}

#[test]
fn delete_with_yes_rewrites_the_file() {
    let dir = TempDir::new().unwrap();
    let data = write_orders(dir.path());
    let cli = parse(&[
        "comptoir", "delete", "orders", "--data", data.to_str().unwrap(), "--client", "c1", "o2",
        "--yes",
    ]);
    cli::run(cli).unwrap();

    let ids: Vec<String> = stored(&data)
        .iter()
        .map(|order| order["_id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["o1", "o3"]);
}

#[test]
fn update_patches_one_record() {
    let dir = TempDir::new().unwrap();
    let data = write_orders(dir.path());
    let cli = parse(&[
        "comptoir", "update", "records", "--data", data.to_str().unwrap(), "o3", "--set",
        "state=delivered", "--set", "totalprice=450", "--yes",
    ]);
    cli::run(cli).unwrap();

    let orders = stored(&data);
    assert_eq!(orders[2]["state"], json!("delivered"));
    assert_eq!(orders[2]["totalprice"], json!(450));
    assert_eq!(orders[0]["state"], json!("pending"));
}

#[test]
fn config_file_sets_page_sizes() {
    let dir = TempDir::new().unwrap();
    let data = write_orders(dir.path());
    let config = dir.path().join("comptoir.yaml");
    fs::write(&config, "page_sizes: [2, 4]\ndefault_page_size: 2\n").unwrap();

    let ok = parse(&[
        "comptoir", "list", "records", "--data", data.to_str().unwrap(), "--config",
        config.to_str().unwrap(), "--page-size", "4",
    ]);
    cli::run(ok).unwrap();

    let rejected = parse(&[
        "comptoir", "list", "records", "--data", data.to_str().unwrap(), "--config",
        config.to_str().unwrap(), "--page-size", "5",
    ]);
    assert!(cli::run(rejected).is_err());
}

#[test]
fn broken_config_is_reported() {
    let dir = TempDir::new().unwrap();
    let data = write_orders(dir.path());
    let config = dir.path().join("comptoir.yaml");
    fs::write(&config, "page_sizes: [2, 4]\ndefault_page_size: 3\n").unwrap();

    let cli = parse(&[
        "comptoir", "list", "products", "--data", data.to_str().unwrap(), "--config",
        config.to_str().unwrap(),
    ]);
    let err = cli::run(cli).unwrap_err();
    assert!(err.to_string().contains("configuration"));
}

#[test]
fn missing_data_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.json");
    let cli = parse(&["comptoir", "show", "articles", "--data", missing.to_str().unwrap(), "a1"]);
    let err = cli::run(cli).unwrap_err();
    assert!(err.to_string().contains("opening"));
}
