//! # Comptoir - list screens for a restaurant back office
//!
//! Order, product and article lists all behave the same way: fetch a
//! collection, let the user sort it by a column, search it, page through it,
//! tick rows and delete or edit one record at a time. This crate implements
//! that behavior once, on top of the pure listing engine in
//! [`comptoir_listing`].
//!
//! ## Pieces
//!
//! - [`controller::ListScreen`]: the screen state machine. It owns the
//!   fetched collection, the listing state and the selection, and guards
//!   against stale fetches.
//! - [`source::DataSource`]: the remote side (fetch, delete, update).
//!   [`store::MemorySource`] is an in-memory implementation, optionally
//!   backed by a JSON file.
//! - [`entities`]: typed orders, products and articles with their columns,
//!   search fields and cell formatting. [`record::JsonRecord`] covers any
//!   other JSON collection.
//! - [`view::ScreenView`] / [`render::ScreenRenderer`]: the serializable
//!   snapshot of a screen and its terminal rendering.
//! - [`confirm`]: yes/no prompts for destructive actions.
//! - [`config::ListingConfig`]: page sizes, select-all scope and the
//!   low-stock threshold, read from YAML.
//!
//! ## Example
//!
//! ```rust
//! use comptoir::config::ListingConfig;
//! use comptoir::entities::{self, EntityPresenter, Product};
//! use comptoir::store::MemorySource;
//!
//! let products: Vec<Product> = serde_json::from_str(r#"[
//!     {"_id": "p1", "designation": "Sucre", "quantite": 4},
//!     {"_id": "p2", "designation": "Farine", "quantite": 40}
//! ]"#).unwrap();
//! let source = MemorySource::new(products);
//! let config = ListingConfig::default();
//!
//! let mut screen = entities::screen::<Product>(&config, None).unwrap();
//! futures::executor::block_on(screen.load(&source)).unwrap();
//! screen.set_query("far");
//!
//! let view = screen.view(&EntityPresenter::<Product>::new(&config));
//! assert_eq!(view.rows.len(), 1);
//! assert_eq!(view.rows[0].cells[1], "Farine");
//! ```

pub mod cli;
pub mod config;
pub mod confirm;
pub mod controller;
pub mod entities;
pub mod error;
pub mod present;
pub mod record;
pub mod render;
pub mod source;
pub mod store;
pub mod view;

pub use config::{ConfigError, ListingConfig};
pub use confirm::{AssumeYes, Confirm, ConfirmPrompt, Decision};
pub use controller::{DeleteOutcome, FetchStatus, ListScreen, Phase};
pub use error::{MutationKind, Result, ScreenError, SourceError};
pub use render::ScreenRenderer;
pub use source::{DataSource, Scope};
pub use store::MemorySource;
pub use view::{Message, MessageLevel, RowPresenter, ScreenView};
