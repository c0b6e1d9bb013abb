//! Typed records for the application's list screens.
//!
//! Each entity knows its table columns, which fields the search box looks
//! at, how its cells are formatted and what payload its detail/edit screen
//! receives. [`screen`] builds a [`ListScreen`] configured for one entity.

mod article;
mod order;
mod product;

use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use comptoir_listing::{Listable, QueryMatcher, Timestamp, Value};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use article::{Article, ArticleDetail};
pub use order::{ClientRef, Delivery, Order, OrderDetail, RestaurantRef};
pub use product::{Product, ProductDetail};

use crate::config::ListingConfig;
use crate::controller::ListScreen;
use crate::present::RowTone;
use crate::source::Scope;
use crate::view::{Column, RowPresenter};

/// A record kind with its own list screen.
pub trait Entity:
    Listable<Id = String> + Clone + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Singular noun used in prompts and messages.
    const NOUN: &'static str;

    /// Screen title.
    const TITLE: &'static str;

    /// Column the screen is sorted by when it opens.
    const DEFAULT_SORT: &'static str;

    /// Field holding the scope identity. Screens of entities with a scope
    /// field refuse to fetch without a scope.
    const SCOPE_FIELD: Option<&'static str> = None;

    /// Payload handed to the detail or edit screen.
    type Detail: Serialize;

    fn columns() -> Vec<Column>;

    fn matcher() -> QueryMatcher<Self>;

    fn cells(&self) -> Vec<String>;

    fn tone(&self, _config: &ListingConfig) -> RowTone {
        RowTone::Normal
    }

    fn detail(&self) -> Self::Detail;
}

/// [`RowPresenter`] for any [`Entity`].
#[derive(Debug)]
pub struct EntityPresenter<'c, E> {
    config: &'c ListingConfig,
    _entity: PhantomData<fn() -> E>,
}

impl<'c, E: Entity> EntityPresenter<'c, E> {
    pub fn new(config: &'c ListingConfig) -> Self {
        EntityPresenter {
            config,
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> RowPresenter<E> for EntityPresenter<'_, E> {
    fn columns(&self) -> Vec<Column> {
        E::columns()
    }

    fn cells(&self, record: &E) -> Vec<String> {
        record.cells()
    }

    fn tone(&self, record: &E) -> RowTone {
        record.tone(self.config)
    }
}

/// A list screen for `E` with the configured defaults.
pub fn screen<E: Entity>(
    config: &ListingConfig,
    scope: Option<Scope>,
) -> crate::Result<ListScreen<E>> {
    let state = config.initial_state(E::DEFAULT_SORT)?;
    let mut screen = ListScreen::new(E::matcher(), state)
        .titled(E::TITLE)
        .noun(E::NOUN)
        .select_all_scope(config.select_all)
        .with_scope(scope);
    if let Some(field) = E::SCOPE_FIELD {
        screen = screen.requiring_scope(field);
    }
    Ok(screen)
}

fn columns(pairs: &[(&str, &str)]) -> Vec<Column> {
    pairs
        .iter()
        .map(|(key, label)| Column::new(*key, *label))
        .collect()
}

fn timestamp(date: Option<&DateTime<Utc>>) -> Value<'static> {
    date.map(|d| Timestamp::from_millis(d.timestamp_millis()))
        .into()
}
