//! Listing defaults shared by every screen.
//!
//! A configuration file is optional. When present it is YAML and may set any
//! subset of the fields:
//!
//! ```yaml
//! page_sizes: [5, 10, 25]
//! default_page_size: 5
//! select_all: fetched   # or: page
//! low_stock_threshold: 20
//! ```

use std::path::{Path, PathBuf};

use comptoir_listing::{ListingError, ListingState, PageSizes, SelectAllScope};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Quantity below which a product row is highlighted.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 20;

/// Errors raised while loading or validating a [`ListingConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("default page size {size} is not one of {allowed:?}")]
    DefaultPageSize { size: usize, allowed: Vec<usize> },

    #[error(transparent)]
    Listing(#[from] ListingError),
}

/// Defaults applied when a screen is mounted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListingConfig {
    pub page_sizes: PageSizes,
    pub default_page_size: usize,
    pub select_all: SelectAllScope,
    pub low_stock_threshold: i64,
}

impl Default for ListingConfig {
    fn default() -> Self {
        let page_sizes = PageSizes::default();
        ListingConfig {
            default_page_size: page_sizes.smallest(),
            page_sizes,
            select_all: SelectAllScope::default(),
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }
}

impl ListingConfig {
    /// Parses and validates a YAML document.
    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        let config: ListingConfig = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&source)?;
        log::debug!("loaded listing config from {}", path.display());
        Ok(config)
    }

    /// Reads `path` if given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Checks that the default page size is one of the allowed sizes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.page_sizes.contains(self.default_page_size) {
            return Err(ConfigError::DefaultPageSize {
                size: self.default_page_size,
                allowed: self.page_sizes.as_slice().to_vec(),
            });
        }
        Ok(())
    }

    /// The state a screen sorted by `sort_key` starts with.
    pub fn initial_state(&self, sort_key: &str) -> Result<ListingState, ConfigError> {
        Ok(ListingState::new(
            sort_key,
            self.default_page_size,
            self.page_sizes.clone(),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ListingConfig::default();
        assert_eq!(config.page_sizes.as_slice(), &[5, 10, 25]);
        assert_eq!(config.default_page_size, 5);
        assert_eq!(config.select_all, SelectAllScope::Fetched);
        assert_eq!(config.low_stock_threshold, 20);
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = ListingConfig::from_yaml("select_all: page\n").unwrap();
        assert_eq!(config.select_all, SelectAllScope::Page);
        assert_eq!(config.default_page_size, 5);
    }

    #[test]
    fn default_size_must_be_allowed() {
        let err = ListingConfig::from_yaml("page_sizes: [10, 50]\n").unwrap_err();
        assert!(matches!(err, ConfigError::DefaultPageSize { size: 5, .. }));

        let config =
            ListingConfig::from_yaml("page_sizes: [10, 50]\ndefault_page_size: 50\n").unwrap();
        assert_eq!(config.default_page_size, 50);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert!(ListingConfig::from_yaml("page_sizes: [0, 5]\n").is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(ListingConfig::from_yaml("rows_per_page: 5\n").is_err());
    }

    #[test]
    fn initial_state_uses_default_size() {
        let config =
            ListingConfig::from_yaml("page_sizes: [10, 20]\ndefault_page_size: 20\n").unwrap();
        let state = config.initial_state("no").unwrap();
        assert_eq!(state.page_size(), 20);
        assert_eq!(state.sort().key, "no");
        assert_eq!(state.page_index(), 0);
    }
}
