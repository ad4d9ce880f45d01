//! Shared types used across all pipeline stages.
//!
//! A [`Record`] is built once by the loader and then only read: the site
//! builder, the search filter and the data feed all see the same values.

use serde::{Deserialize, Serialize};

/// One parking facility.
///
/// Field order is the order of keys in the JSON data feed, which the
/// landing-page search script consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Stable fingerprint of `(region, name, address, lat, lon)`
    pub id: String,
    pub name: String,
    pub address: String,
    pub region: String,
    /// Facility type (노외, 노상, 부설 …); `type` in the feed
    #[serde(rename = "type")]
    pub kind: String,
    /// Raw latitude text, never parsed
    pub lat: String,
    /// Raw longitude text, never parsed
    pub lon: String,
    pub org: String,
    pub phone: String,
}

impl Record {
    /// Query used for external map searches: the address, or the name when
    /// there is no address.
    pub fn map_query(&self) -> &str {
        if self.address.is_empty() {
            &self.name
        } else {
            &self.address
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, address: &str) -> Record {
        Record {
            id: "0123456789".to_string(),
            name: name.to_string(),
            address: address.to_string(),
            region: "서울".to_string(),
            kind: "노외".to_string(),
            lat: String::new(),
            lon: String::new(),
            org: String::new(),
            phone: String::new(),
        }
    }

    #[test]
    fn map_query_prefers_address() {
        let r = record("A공영", "서울시 중구 1");
        assert_eq!(r.map_query(), "서울시 중구 1");
    }

    #[test]
    fn map_query_falls_back_to_name() {
        let r = record("A공영", "");
        assert_eq!(r.map_query(), "A공영");
    }

    #[test]
    fn kind_serializes_as_type() {
        let json = serde_json::to_string(&record("A", "B")).unwrap();
        assert!(json.contains(r#""type":"노외""#));
        assert!(!json.contains("kind"));
    }

    #[test]
    fn feed_keeps_declared_key_order() {
        let json = serde_json::to_string(&record("A", "B")).unwrap();
        let keys = [
            "\"id\"",
            "\"name\"",
            "\"address\"",
            "\"region\"",
            "\"type\"",
            "\"lat\"",
            "\"lon\"",
            "\"org\"",
            "\"phone\"",
        ];
        let positions: Vec<usize> = keys.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{json}");
    }
}
