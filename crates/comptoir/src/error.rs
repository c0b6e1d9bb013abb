//! Error types for list screens and their collaborators.

use comptoir_listing::ListingError;
use thiserror::Error;

use crate::config::ConfigError;

/// Failure reported by a [`DataSource`](crate::source::DataSource).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The record does not exist on the remote side.
    #[error("record '{0}' not found")]
    NotFound(String),

    /// Any other remote failure.
    #[error("server error: {0}")]
    Server(String),
}

/// The kind of single-record mutation a screen issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Delete,
    Update,
}

impl MutationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MutationKind::Delete => "delete",
            MutationKind::Update => "update",
        }
    }
}

impl std::fmt::Display for MutationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors surfaced by a list screen.
///
/// Fetch and mutation failures leave the screen in a usable state; the error
/// is returned so the caller can show it.
#[derive(Debug, Error)]
pub enum ScreenError {
    /// The collection could not be fetched. The screen is left empty.
    #[error("failed to fetch records: {0}")]
    FetchFailure(#[source] SourceError),

    /// A delete or update was rejected. Nothing was changed locally.
    #[error("failed to {action} record '{id}': {source}")]
    MutationFailure {
        action: MutationKind,
        id: String,
        #[source]
        source: SourceError,
    },

    /// The screen needs a scope (such as the current client) and has none.
    #[error("this screen requires a {0} and none was given")]
    PreconditionMissing(&'static str),

    /// The identifier is not part of the fetched collection.
    #[error("no record with id '{0}' in the current collection")]
    UnknownRecord(String),

    #[error(transparent)]
    InvalidPageSize(#[from] ListingError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("render error")]
    Render(#[from] minijinja::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type for screen operations.
pub type Result<T> = std::result::Result<T, ScreenError>;
