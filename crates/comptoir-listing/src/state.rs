//! Listing state: page window, sort column and query.
//!
//! Every change that can shrink or reorder the visible set (sort key,
//! sort direction, query, page size) resets the page index to 0.
//! Only [`ListingState::set_page_index`] moves between pages.

use serde::{Deserialize, Serialize};

use crate::error::{ListingError, Result};
use crate::matcher::SearchQuery;
use crate::ordering::{Dir, SortSpec};

/// Page sizes offered by default.
pub const DEFAULT_PAGE_SIZES: [usize; 3] = [5, 10, 25];

/// The set of page sizes a screen lets the user choose from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct PageSizes(Vec<usize>);

impl PageSizes {
    /// Creates a page size set, rejecting empty sets and zero sizes.
    pub fn new(sizes: impl IntoIterator<Item = usize>) -> Result<Self> {
        let mut sizes: Vec<usize> = sizes.into_iter().collect();
        if sizes.is_empty() {
            return Err(ListingError::NoPageSizes);
        }
        if sizes.contains(&0) {
            return Err(ListingError::ZeroPageSize);
        }
        sizes.sort_unstable();
        sizes.dedup();
        Ok(PageSizes(sizes))
    }

    /// Returns `true` if `size` is allowed.
    pub fn contains(&self, size: usize) -> bool {
        self.0.contains(&size)
    }

    /// The smallest allowed size.
    pub fn smallest(&self) -> usize {
        self.0[0]
    }

    /// The allowed sizes, ascending.
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Checks `size` against the set.
    pub fn check(&self, size: usize) -> Result<usize> {
        if self.contains(size) {
            Ok(size)
        } else {
            Err(ListingError::InvalidPageSize {
                size,
                allowed: self.0.clone(),
            })
        }
    }
}

impl Default for PageSizes {
    fn default() -> Self {
        PageSizes(DEFAULT_PAGE_SIZES.to_vec())
    }
}

impl TryFrom<Vec<usize>> for PageSizes {
    type Error = ListingError;

    fn try_from(sizes: Vec<usize>) -> Result<Self> {
        PageSizes::new(sizes)
    }
}

impl From<PageSizes> for Vec<usize> {
    fn from(sizes: PageSizes) -> Self {
        sizes.0
    }
}

/// The user-controlled state of a listing screen.
///
/// Selection is tracked separately by
/// [`SelectionTracker`](crate::SelectionTracker).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingState {
    page_index: usize,
    page_size: usize,
    sort: SortSpec,
    query: SearchQuery,
    #[serde(skip)]
    page_sizes: PageSizes,
}

impl ListingState {
    /// Creates the state a screen starts with: first page, ascending sort
    /// on `sort_key`, empty query.
    pub fn new(sort_key: impl Into<String>, page_size: usize, page_sizes: PageSizes) -> Result<Self> {
        let page_size = page_sizes.check(page_size)?;
        Ok(ListingState {
            page_index: 0,
            page_size,
            sort: SortSpec::asc(sort_key),
            query: SearchQuery::default(),
            page_sizes,
        })
    }

    /// Creates a state with the default page sizes and the smallest of them.
    pub fn with_sort_key(sort_key: impl Into<String>) -> Self {
        let page_sizes = PageSizes::default();
        ListingState {
            page_index: 0,
            page_size: page_sizes.smallest(),
            sort: SortSpec::asc(sort_key),
            query: SearchQuery::default(),
            page_sizes,
        }
    }

    /// The zero-based page currently shown.
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// The number of rows per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// The active sort column and direction.
    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    /// The active free-text query.
    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    /// The page sizes the user may choose from.
    pub fn page_sizes(&self) -> &PageSizes {
        &self.page_sizes
    }

    /// Moves to another page. Does not touch anything else.
    pub fn set_page_index(&mut self, page_index: usize) {
        self.page_index = page_index;
    }

    /// Sorts by `key`, keeping the current direction.
    pub fn set_sort_key(&mut self, key: impl Into<String>) {
        self.sort.key = key.into();
        self.page_index = 0;
    }

    /// Sets the sort direction.
    pub fn set_sort_dir(&mut self, dir: Dir) {
        self.sort.dir = dir;
        self.page_index = 0;
    }

    /// Applies a column-header click (see [`SortSpec::request`]).
    pub fn request_sort(&mut self, key: &str) {
        self.sort.request(key);
        self.page_index = 0;
    }

    /// Replaces the free-text query.
    pub fn set_query(&mut self, query: impl Into<SearchQuery>) {
        self.query = query.into();
        self.page_index = 0;
    }

    /// Changes the page size. Sizes outside the allowed set are rejected
    /// and leave the state untouched.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        self.page_size = self.page_sizes.check(page_size)?;
        self.page_index = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_on_page_two() -> ListingState {
        let mut state = ListingState::with_sort_key("no");
        state.set_page_index(2);
        state
    }

    #[test]
    fn defaults() {
        let state = ListingState::with_sort_key("no");
        assert_eq!(state.page_index(), 0);
        assert_eq!(state.page_size(), 5);
        assert_eq!(state.sort(), &SortSpec::asc("no"));
        assert!(state.query().is_blank());
    }

    #[test]
    fn page_index_is_independent() {
        let state = state_on_page_two();
        assert_eq!(state.page_index(), 2);
        assert_eq!(state.sort(), &SortSpec::asc("no"));
    }

    #[test]
    fn sort_key_change_resets_page() {
        let mut state = state_on_page_two();
        state.set_sort_key("total");
        assert_eq!(state.page_index(), 0);
    }

    #[test]
    fn sort_direction_change_resets_page() {
        let mut state = state_on_page_two();
        state.set_sort_dir(Dir::Desc);
        assert_eq!(state.page_index(), 0);

        let mut state = state_on_page_two();
        state.request_sort("no");
        assert_eq!(state.page_index(), 0);
        assert_eq!(state.sort().dir, Dir::Desc);
    }

    #[test]
    fn query_change_resets_page() {
        let mut state = state_on_page_two();
        state.set_query("farine");
        assert_eq!(state.page_index(), 0);
        assert_eq!(state.query().as_str(), "farine");
    }

    #[test]
    fn page_size_change_resets_page() {
        let mut state = state_on_page_two();
        state.set_page_size(25).unwrap();
        assert_eq!(state.page_index(), 0);
        assert_eq!(state.page_size(), 25);
    }

    #[test]
    fn disallowed_page_size_is_rejected_without_change() {
        let mut state = state_on_page_two();
        let err = state.set_page_size(7).unwrap_err();
        assert_eq!(
            err,
            ListingError::InvalidPageSize {
                size: 7,
                allowed: vec![5, 10, 25]
            }
        );
        assert_eq!(state.page_index(), 2);
        assert_eq!(state.page_size(), 5);
    }

    #[test]
    fn page_sizes_validation() {
        assert_eq!(PageSizes::new([]), Err(ListingError::NoPageSizes));
        assert_eq!(PageSizes::new([5, 0]), Err(ListingError::ZeroPageSize));
        let sizes = PageSizes::new([25, 5, 10, 5]).unwrap();
        assert_eq!(sizes.as_slice(), &[5, 10, 25]);
        assert_eq!(sizes.smallest(), 5);
    }

    #[test]
    fn new_checks_initial_page_size() {
        assert!(ListingState::new("no", 10, PageSizes::default()).is_ok());
        assert!(ListingState::new("no", 3, PageSizes::default()).is_err());
    }
}
