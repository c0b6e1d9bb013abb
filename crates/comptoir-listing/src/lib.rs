//! Listing engine for record screens.
//!
//! Every list screen of the application (orders, articles, products) does the
//! same thing with its collection: sort by one column, filter by a free-text
//! query, show one page, and let the user select rows. This crate is that
//! shared part. It is schema-agnostic: records expose an identifier and named
//! field values through [`Listable`], and searchable text through a
//! [`QueryMatcher`].
//!
//! - [`SortSpec`] builds the comparator for a column and a [`Dir`]
//! - [`QueryMatcher`] tests a record against a [`SearchQuery`]
//! - [`render`] runs sort → filter → page window and returns a [`ListingView`]
//! - [`SelectionTracker`] holds selected identifiers
//! - [`ListingState`] holds page index, page size, sort and query, resetting
//!   the page whenever the visible set may change
//!
//! # Quick Start
//!
//! ```rust
//! use comptoir_listing::{render, Listable, ListingState, QueryMatcher, Value, Number};
//!
//! struct Product {
//!     id: String,
//!     designation: String,
//!     quantite: i64,
//! }
//!
//! impl Listable for Product {
//!     type Id = String;
//!
//!     fn id(&self) -> &String {
//!         &self.id
//!     }
//!
//!     fn field(&self, name: &str) -> Value<'_> {
//!         match name {
//!             "designation" => Value::String(&self.designation),
//!             "quantite" => Value::Number(Number::I64(self.quantite)),
//!             _ => Value::None,
//!         }
//!     }
//! }
//!
//! let products = vec![
//!     Product { id: "p1".into(), designation: "Farine".into(), quantite: 40 },
//!     Product { id: "p2".into(), designation: "Sucre".into(), quantite: 12 },
//!     Product { id: "p3".into(), designation: "Sel fin".into(), quantite: 12 },
//! ];
//!
//! let matcher = QueryMatcher::new().field(|p: &Product| p.designation.as_str());
//!
//! let mut state = ListingState::with_sort_key("quantite");
//! state.request_sort("quantite"); // already active and ascending: now descending
//! state.set_query("s");
//!
//! let view = render(&products, &state, &matcher);
//! let names: Vec<&str> = view.rows().iter().map(|p| p.designation.as_str()).collect();
//! assert_eq!(names, vec!["Sucre", "Sel fin"]);
//! assert_eq!(view.filler_rows(), 0);
//! ```

mod engine;
mod error;
mod matcher;
mod ordering;
mod selection;
mod state;
mod traits;
mod value;

pub use engine::{
    filler_rows, page_range, render, render_with, sort_and_filter, sort_and_filter_with,
    ListingView,
};
pub use error::{ListingError, Result};
pub use matcher::{QueryMatcher, SearchQuery};
pub use ordering::{compare_by, compare_values, Dir, SortSpec};
pub use selection::{SelectAllScope, SelectionTracker};
pub use state::{ListingState, PageSizes, DEFAULT_PAGE_SIZES};
pub use traits::Listable;
pub use value::{Number, Timestamp, Value};
