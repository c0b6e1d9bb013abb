//! JSON shapes of the listing types that end up in config files and
//! serialized screen views.

use comptoir_listing::{Dir, ListingState, PageSizes, SearchQuery, SelectAllScope, SortSpec};
use serde_json::json;

#[test]
fn page_sizes_read_as_a_sorted_list() {
    let sizes: PageSizes = serde_json::from_value(json!([25, 5, 10, 5])).unwrap();
    assert_eq!(sizes.as_slice(), &[5, 10, 25]);
    assert_eq!(serde_json::to_value(&sizes).unwrap(), json!([5, 10, 25]));
}

#[test]
fn invalid_page_sizes_are_rejected_while_reading() {
    let empty = serde_json::from_value::<PageSizes>(json!([])).unwrap_err();
    assert!(empty.to_string().contains("at least one page size"));

    let zero = serde_json::from_value::<PageSizes>(json!([0, 5])).unwrap_err();
    assert!(zero.to_string().contains("greater than zero"));
}

#[test]
fn search_query_is_the_raw_text() {
    let query: SearchQuery = serde_json::from_value(json!("  Farine")).unwrap();
    assert_eq!(query.as_str(), "  Farine");
    assert!(!query.is_blank());
    assert_eq!(serde_json::to_value(&query).unwrap(), json!("  Farine"));

    let blank: SearchQuery = serde_json::from_value(json!("   ")).unwrap();
    assert!(blank.is_blank());
}

#[test]
fn sort_spec_and_scope_use_lowercase_names() {
    let sort: SortSpec = serde_json::from_value(json!({ "key": "no", "dir": "desc" })).unwrap();
    assert_eq!(sort.dir, Dir::Desc);
    assert_eq!(serde_json::to_value(SortSpec::asc("no")).unwrap()["dir"], json!("asc"));

    let scope: SelectAllScope = serde_json::from_value(json!("page")).unwrap();
    assert_eq!(scope, SelectAllScope::Page);
    assert!(serde_json::from_value::<SelectAllScope>(json!("everything")).is_err());
}

#[test]
fn listing_state_leaves_allowed_sizes_out() {
    let mut state = ListingState::with_sort_key("designation");
    state.request_sort("designation");
    state.set_query("sucre");

    let value = serde_json::to_value(&state).unwrap();
    assert_eq!(value["sort"], json!({ "key": "designation", "dir": "desc" }));
    assert_eq!(value["query"], json!("sucre"));
    assert_eq!(value["page_index"], json!(0));
    assert_eq!(value["page_size"], json!(5));
    assert!(value.get("page_sizes").is_none());
}
