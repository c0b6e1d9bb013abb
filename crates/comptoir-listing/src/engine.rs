//! The listing engine: stable sort, then filter, then page window.
//!
//! ```text
//! collection ──decorate(index)──▶ sort (ties by index) ──▶ filter(query)
//!            ──▶ filtered result ──slice(page)──▶ page window + filler rows
//! ```
//!
//! Filtering runs after sorting and never changes the relative order of the
//! records that survive it.

use std::ops::Range;

use crate::matcher::{QueryMatcher, SearchQuery};
use crate::ordering::{compare_by, SortSpec};
use crate::state::ListingState;
use crate::traits::Listable;
use crate::value::Value;

/// Sorts `items` by `sort` and keeps those matching `query`.
///
/// Each record is paired with its position in `items`; records the
/// comparator reports as equal keep their original relative order no matter
/// which sort algorithm runs underneath.
pub fn sort_and_filter_with<'a, T, F>(
    items: &'a [T],
    sort: &SortSpec,
    query: &SearchQuery,
    matcher: &QueryMatcher<T>,
    accessor: F,
) -> Vec<&'a T>
where
    for<'b> F: Fn(&'b T, &str) -> Value<'b>,
{
    let mut decorated: Vec<(usize, &'a T)> = items.iter().enumerate().collect();
    decorated.sort_unstable_by(|(index_a, a), (index_b, b)| {
        compare_by(*a, *b, sort, &accessor).then_with(|| index_a.cmp(index_b))
    });

    decorated
        .into_iter()
        .map(|(_, item)| item)
        .filter(|item| matcher.matches(query, item))
        .collect()
}

/// [`sort_and_filter_with`] using the record's own field accessor.
pub fn sort_and_filter<'a, T: Listable>(
    items: &'a [T],
    sort: &SortSpec,
    query: &SearchQuery,
    matcher: &QueryMatcher<T>,
) -> Vec<&'a T> {
    sort_and_filter_with(items, sort, query, matcher, T::accessor)
}

/// The index range of the page window within a filtered result.
///
/// Pages past the end yield an empty range.
pub fn page_range(page_index: usize, page_size: usize, filtered_count: usize) -> Range<usize> {
    let start = page_index.saturating_mul(page_size).min(filtered_count);
    let end = start.saturating_add(page_size).min(filtered_count);
    start..end
}

/// Number of blank rows that keep a page at constant height.
///
/// Zero on the first page, even when it is only partially filled. On later
/// pages it pads up to a full page, counted against the filtered result.
pub fn filler_rows(page_index: usize, page_size: usize, filtered_count: usize) -> usize {
    if page_index == 0 {
        return 0;
    }
    page_index
        .saturating_add(1)
        .saturating_mul(page_size)
        .saturating_sub(filtered_count)
}

/// Derived view of a collection under a listing state.
#[derive(Debug, Clone)]
pub struct ListingView<'a, T> {
    filtered: Vec<&'a T>,
    window: Range<usize>,
    filler_rows: usize,
    is_empty_result: bool,
}

impl<'a, T> ListingView<'a, T> {
    /// The records on the current page, in display order.
    pub fn rows(&self) -> &[&'a T] {
        &self.filtered[self.window.clone()]
    }

    /// The whole filtered result, in display order.
    pub fn filtered(&self) -> &[&'a T] {
        &self.filtered
    }

    /// Number of records surviving the query.
    pub fn total_filtered(&self) -> usize {
        self.filtered.len()
    }

    /// Blank rows to append after [`rows`](Self::rows).
    pub fn filler_rows(&self) -> usize {
        self.filler_rows
    }

    /// `true` when a non-blank query matched nothing.
    ///
    /// An empty result under a blank query means "no data yet" rather than
    /// "not found", and reports `false`.
    pub fn is_empty_result(&self) -> bool {
        self.is_empty_result
    }

    /// Position of the first row of the page within the filtered result.
    pub fn first_row_offset(&self) -> usize {
        self.window.start
    }
}

/// Renders `items` under `state` using an explicit field accessor.
pub fn render_with<'a, T, F>(
    items: &'a [T],
    state: &ListingState,
    matcher: &QueryMatcher<T>,
    accessor: F,
) -> ListingView<'a, T>
where
    for<'b> F: Fn(&'b T, &str) -> Value<'b>,
{
    let filtered = sort_and_filter_with(items, state.sort(), state.query(), matcher, accessor);
    let count = filtered.len();
    ListingView {
        window: page_range(state.page_index(), state.page_size(), count),
        filler_rows: filler_rows(state.page_index(), state.page_size(), count),
        is_empty_result: count == 0 && !state.query().is_blank(),
        filtered,
    }
}

/// Renders `items` under `state`.
///
/// # Example
///
/// ```
/// use comptoir_listing::{render, Listable, ListingState, QueryMatcher, Value, Number};
///
/// struct Order { id: u32, no: &'static str, total: i64 }
///
/// impl Listable for Order {
///     type Id = u32;
///     fn id(&self) -> &u32 { &self.id }
///     fn field(&self, name: &str) -> Value<'_> {
///         match name {
///             "no" => Value::String(self.no),
///             "total" => Value::Number(Number::I64(self.total)),
///             _ => Value::None,
///         }
///     }
/// }
///
/// let orders = vec![
///     Order { id: 1, no: "A", total: 10 },
///     Order { id: 2, no: "B", total: 10 },
///     Order { id: 3, no: "C", total: 5 },
/// ];
/// let matcher = QueryMatcher::new().field(|o: &Order| o.no);
/// let state = ListingState::with_sort_key("total");
///
/// let view = render(&orders, &state, &matcher);
/// let ids: Vec<u32> = view.rows().iter().map(|o| o.id).collect();
/// assert_eq!(ids, vec![3, 1, 2]);
/// ```
pub fn render<'a, T: Listable>(
    items: &'a [T],
    state: &ListingState,
    matcher: &QueryMatcher<T>,
) -> ListingView<'a, T> {
    render_with(items, state, matcher, T::accessor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordering::Dir;
    use crate::value::Number;

    #[derive(Debug, Clone, PartialEq)]
    struct Order {
        id: u32,
        no: String,
        total: i64,
    }

    impl Listable for Order {
        type Id = u32;

        fn id(&self) -> &u32 {
            &self.id
        }

        fn field(&self, name: &str) -> Value<'_> {
            match name {
                "no" => Value::String(&self.no),
                "total" => Value::Number(Number::I64(self.total)),
                _ => Value::None,
            }
        }
    }

    fn order(id: u32, no: &str, total: i64) -> Order {
        Order {
            id,
            no: no.to_string(),
            total,
        }
    }

    fn sample() -> Vec<Order> {
        vec![order(1, "A", 10), order(2, "B", 10), order(3, "C", 5)]
    }

    fn matcher() -> QueryMatcher<Order> {
        QueryMatcher::new().field(|o: &Order| o.no.as_str())
    }

    fn ids(rows: &[&Order]) -> Vec<u32> {
        rows.iter().map(|o| o.id).collect()
    }

    #[test]
    fn ties_keep_original_order() {
        let orders = sample();
        let state = ListingState::with_sort_key("total");
        let view = render(&orders, &state, &matcher());
        assert_eq!(ids(view.rows()), vec![3, 1, 2]);
    }

    #[test]
    fn descending_keeps_ties_in_original_order() {
        let orders = sample();
        let mut state = ListingState::with_sort_key("total");
        state.set_sort_dir(Dir::Desc);
        let view = render(&orders, &state, &matcher());
        assert_eq!(ids(view.rows()), vec![1, 2, 3]);
    }

    #[test]
    fn query_narrows_result() {
        let orders = sample();
        let mut state = ListingState::with_sort_key("total");
        state.set_query("b");
        let view = render(&orders, &state, &matcher());
        assert_eq!(ids(view.rows()), vec![2]);
        assert!(!view.is_empty_result());
    }

    #[test]
    fn unmatched_query_is_empty_result() {
        let orders = sample();
        let mut state = ListingState::with_sort_key("total");
        state.set_query("Z");
        let view = render(&orders, &state, &matcher());
        assert!(view.rows().is_empty());
        assert_eq!(view.total_filtered(), 0);
        assert!(view.is_empty_result());
    }

    #[test]
    fn empty_collection_without_query_is_not_empty_result() {
        let orders: Vec<Order> = Vec::new();
        let state = ListingState::with_sort_key("total");
        let view = render(&orders, &state, &matcher());
        assert!(view.rows().is_empty());
        assert!(!view.is_empty_result());
    }

    #[test]
    fn sorting_on_absent_field_keeps_original_order() {
        let orders = vec![order(7, "Z", 1), order(8, "A", 3), order(9, "M", 2)];
        let state = ListingState::with_sort_key("name");
        let view = render(&orders, &state, &matcher());
        assert_eq!(ids(view.rows()), vec![7, 8, 9]);
    }

    #[test]
    fn second_page_of_seven_has_two_rows_and_three_fillers() {
        let orders: Vec<Order> = (1..=7).map(|i| order(i, "X", i as i64)).collect();
        let mut state = ListingState::with_sort_key("total");
        state.set_page_index(1);
        let view = render(&orders, &state, &matcher());
        assert_eq!(ids(view.rows()), vec![6, 7]);
        assert_eq!(view.filler_rows(), 3);
        assert_eq!(view.first_row_offset(), 5);
    }

    #[test]
    fn page_past_the_end_is_empty_with_full_filler() {
        let orders = sample();
        let mut state = ListingState::with_sort_key("total");
        state.set_page_index(3);
        let view = render(&orders, &state, &matcher());
        assert!(view.rows().is_empty());
        assert_eq!(view.filler_rows(), 17);
    }

    #[test]
    fn first_page_never_has_filler() {
        assert_eq!(filler_rows(0, 5, 2), 0);
        assert_eq!(filler_rows(0, 25, 0), 0);
    }

    #[test]
    fn filler_counts_against_filtered_result() {
        assert_eq!(filler_rows(1, 5, 7), 3);
        assert_eq!(filler_rows(1, 5, 10), 0);
        assert_eq!(filler_rows(1, 5, 12), 0);
    }

    #[test]
    fn page_range_clamps() {
        assert_eq!(page_range(0, 5, 3), 0..3);
        assert_eq!(page_range(1, 5, 7), 5..7);
        assert_eq!(page_range(4, 5, 7), 7..7);
        assert_eq!(page_range(usize::MAX, 5, 7), 7..7);
    }

    #[test]
    fn custom_accessor() {
        let orders = vec![order(1, "AB", 0), order(2, "ABC", 0), order(3, "A", 0)];
        let filtered = sort_and_filter_with(
            &orders,
            &SortSpec::desc("len"),
            &SearchQuery::default(),
            &matcher(),
            |o, _field| Value::Number(Number::U64(o.no.len() as u64)),
        );
        assert_eq!(ids(&filtered), vec![2, 1, 3]);
    }
}
