//! Error types for the listing crate.

use thiserror::Error;

/// Errors raised when listing state is configured or changed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListingError {
    /// The requested page size is not one of the allowed sizes.
    #[error("page size {size} is not one of the allowed sizes {allowed:?}")]
    InvalidPageSize { size: usize, allowed: Vec<usize> },

    /// A page size set must contain at least one size.
    #[error("at least one page size must be allowed")]
    NoPageSizes,

    /// Page sizes must be positive.
    #[error("page size must be greater than zero")]
    ZeroPageSize,
}

/// Result type for listing operations.
pub type Result<T> = std::result::Result<T, ListingError>;
