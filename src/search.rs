//! Landing-page search.
//!
//! The landing page ships a small vanilla-JS filter ([`SEARCH_JS`]) that runs
//! over the JSON data feed in the browser. [`filter`] is the same filter in
//! Rust; the `search` CLI command uses it so a dataset can be checked from
//! the terminal before publishing, and the tests pin down the shared
//! semantics:
//!
//! - the query is trimmed and lowercased; empty matches everything;
//! - a record matches when `"<name> <address> <org>"`, lowercased, contains
//!   the query;
//! - a non-empty region must equal the record's region exactly;
//! - at most [`SEARCH_RESULT_CAP`] results, in feed order.

use crate::types::Record;

/// Maximum number of rows the landing page shows.
pub const SEARCH_RESULT_CAP: usize = 200;

/// Site path of the JSON data feed.
pub const DATA_FEED_PATH: &str = "/data/parking.json";

/// Browser-side search script, embedded verbatim in the landing page.
pub const SEARCH_JS: &str = include_str!("../static/search.js");

/// Whether `record` passes the landing-page filter.
///
/// `query` must already be trimmed and lowercased.
fn matches(record: &Record, query: &str, region: &str) -> bool {
    if !region.is_empty() && record.region != region {
        return false;
    }
    if query.is_empty() {
        return true;
    }
    let hay = format!("{} {} {}", record.name, record.address, record.org).to_lowercase();
    hay.contains(query)
}

/// Filter records the way the landing page does.
pub fn filter<'a>(records: &'a [Record], query: &str, region: &str) -> Vec<&'a Record> {
    let query = query.trim().to_lowercase();
    records
        .iter()
        .filter(|r| matches(r, &query, region))
        .take(SEARCH_RESULT_CAP)
        .collect()
}

/// Number of records passing the filter, ignoring the result cap.
pub fn count_matches(records: &[Record], query: &str, region: &str) -> usize {
    let query = query.trim().to_lowercase();
    records.iter().filter(|r| matches(r, &query, region)).count()
}
