//! Collaborator interface for record collections.
//!
//! Screens never talk to a backend directly. They hold a [`DataSource`] and
//! await its futures; every method returns a pinned, boxed future so the
//! trait stays object safe.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use comptoir_listing::Listable;
use serde::{Deserialize, Serialize};

use crate::error::SourceError;

/// Future returned by [`DataSource`] methods.
pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SourceError>> + Send + 'a>>;

/// The identity a screen's collection is scoped to, such as the signed-in
/// client.
///
/// Supplied when the screen is built and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scope(String);

impl Scope {
    pub fn new(id: impl Into<String>) -> Self {
        Scope(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Scope {
    fn from(id: &str) -> Self {
        Scope::new(id)
    }
}

/// Remote access to one kind of record.
pub trait DataSource<R: Listable>: Send + Sync {
    /// Fetches the whole collection, restricted to `scope` when given.
    fn fetch<'a>(&'a self, scope: Option<&'a Scope>) -> SourceFuture<'a, Vec<R>>;

    /// Deletes one record.
    fn delete<'a>(&'a self, id: &'a R::Id) -> SourceFuture<'a, ()>;

    /// Applies `patch` (a JSON object of field values) to one record and
    /// returns the stored result.
    fn update<'a>(&'a self, id: &'a R::Id, patch: &'a serde_json::Value) -> SourceFuture<'a, R>;
}
