//! Free-text query matching.
//!
//! A [`SearchQuery`] is the normalized form of what the user typed in a
//! screen's search box. A [`QueryMatcher`] holds the per-entity list of text
//! extractors and decides whether a record matches a query.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A free-text query as typed by the user.
///
/// The raw text is kept for display; matching uses the lower-cased needle.
/// Blank input (empty or whitespace only) has no needle and matches
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct SearchQuery {
    raw: String,
    needle: Option<String>,
}

impl SearchQuery {
    /// Creates a query from raw input.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let needle = if raw.trim().is_empty() {
            None
        } else {
            Some(raw.to_lowercase())
        };
        SearchQuery { raw, needle }
    }

    /// The text as the user typed it.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns `true` if the query is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.needle.is_none()
    }

    /// The lower-cased text matched against record fields, if any.
    pub fn needle(&self) -> Option<&str> {
        self.needle.as_deref()
    }
}

impl From<String> for SearchQuery {
    fn from(raw: String) -> Self {
        SearchQuery::new(raw)
    }
}

impl From<&str> for SearchQuery {
    fn from(raw: &str) -> Self {
        SearchQuery::new(raw)
    }
}

impl From<SearchQuery> for String {
    fn from(query: SearchQuery) -> Self {
        query.raw
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

type Extractor<T> = Box<dyn for<'a> Fn(&'a T) -> Cow<'a, str> + Send + Sync>;

fn extractor<T, F>(extract: F) -> Extractor<T>
where
    F: for<'a> Fn(&'a T) -> Cow<'a, str> + Send + Sync + 'static,
{
    Box::new(extract)
}

/// Decides whether a record matches a free-text query.
///
/// A record matches when the query is a case-insensitive substring of any
/// of its searchable fields. There is no tokenizing, fuzzy matching or
/// Unicode normalization.
///
/// # Example
///
/// ```
/// use comptoir_listing::{QueryMatcher, SearchQuery};
///
/// struct Order { no: String, first: String, last: String }
///
/// let matcher = QueryMatcher::new()
///     .field(|o: &Order| o.no.as_str())
///     .derived(|o: &Order| format!("{} {}", o.first, o.last));
///
/// let order = Order { no: "CMD-12".into(), first: "Amel".into(), last: "Haddad".into() };
/// assert!(matcher.matches(&SearchQuery::new("cmd"), &order));
/// assert!(matcher.matches(&SearchQuery::new("amel h"), &order));
/// assert!(!matcher.matches(&SearchQuery::new("zz"), &order));
/// ```
pub struct QueryMatcher<T> {
    extractors: Vec<Extractor<T>>,
}

impl<T> QueryMatcher<T> {
    /// Creates a matcher with no searchable fields.
    ///
    /// Without fields only blank queries match.
    pub fn new() -> Self {
        QueryMatcher {
            extractors: Vec::new(),
        }
    }

    /// Adds a searchable field borrowed from the record.
    pub fn field<F>(mut self, extract: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> &'a str + Send + Sync + 'static,
    {
        self.extractors
            .push(extractor(move |item| Cow::Borrowed(extract(item))));
        self
    }

    /// Adds a searchable text computed from the record, such as a
    /// concatenated first and last name.
    pub fn derived<F>(mut self, extract: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.extractors
            .push(extractor(move |item| Cow::Owned(extract(item))));
        self
    }

    /// Returns the number of searchable fields.
    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    /// Returns `true` if no searchable field was registered.
    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }

    /// Tests a single record against the query.
    pub fn matches(&self, query: &SearchQuery, item: &T) -> bool {
        let Some(needle) = query.needle() else {
            return true;
        };
        self.extractors
            .iter()
            .any(|extract| extract(item).to_lowercase().contains(needle))
    }
}

impl<T> Default for QueryMatcher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for QueryMatcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryMatcher")
            .field("fields", &self.extractors.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Product {
        designation: String,
        reference: String,
    }

    fn product(designation: &str, reference: &str) -> Product {
        Product {
            designation: designation.to_string(),
            reference: reference.to_string(),
        }
    }

    fn matcher() -> QueryMatcher<Product> {
        QueryMatcher::new()
            .field(|p: &Product| p.designation.as_str())
            .field(|p: &Product| p.reference.as_str())
    }

    #[test]
    fn blank_queries_match_everything() {
        let m = matcher();
        let p = product("Farine", "F-01");
        assert!(m.matches(&SearchQuery::new(""), &p));
        assert!(m.matches(&SearchQuery::new("   \t"), &p));
        assert!(SearchQuery::new("  ").is_blank());
    }

    #[test]
    fn substring_is_case_insensitive() {
        let m = matcher();
        let p = product("Huile d'Olive", "H-07");
        assert!(m.matches(&SearchQuery::new("OLIVE"), &p));
        assert!(m.matches(&SearchQuery::new("le d'o"), &p));
    }

    #[test]
    fn any_field_may_match() {
        let m = matcher();
        let p = product("Sucre", "S-99");
        assert!(m.matches(&SearchQuery::new("s-9"), &p));
        assert!(!m.matches(&SearchQuery::new("sel"), &p));
    }

    #[test]
    fn no_diacritic_folding() {
        let m = matcher();
        let p = product("Café", "C-1");
        assert!(m.matches(&SearchQuery::new("CAFÉ"), &p));
        assert!(!m.matches(&SearchQuery::new("cafe"), &p));
    }

    #[test]
    fn whitespace_inside_query_is_significant() {
        let m = matcher();
        let p = product("Sucre", "S-99");
        assert!(!m.matches(&SearchQuery::new(" sucre"), &p));
    }

    #[test]
    fn matcher_without_fields_only_matches_blank() {
        let m: QueryMatcher<Product> = QueryMatcher::new();
        let p = product("Sucre", "S-99");
        assert!(m.is_empty());
        assert!(m.matches(&SearchQuery::default(), &p));
        assert!(!m.matches(&SearchQuery::new("s"), &p));
    }

    #[test]
    fn query_keeps_raw_text() {
        let q = SearchQuery::new("Amel ");
        assert_eq!(q.as_str(), "Amel ");
        assert_eq!(q.needle(), Some("amel "));
        assert_eq!(q.to_string(), "Amel ");
    }
}
