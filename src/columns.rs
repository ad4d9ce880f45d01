//! Header normalization: noisy source headers → semantic fields.
//!
//! Public parking datasets are published by hundreds of local governments,
//! each with its own idea of what the columns are called. `주차장명`,
//! `시설명`, `prk_nm` and `name` all mean the same thing. This module resolves
//! a header row into a [`ColumnMap`] once, so the loader can pull fields by
//! index without caring what the source called them.
//!
//! ## Rule Table
//!
//! Matching is driven by [`RULES`], an ordered table of
//! `(field, matcher, priority)` entries. For every header, the rules are
//! tried in order and the header is claimed by the first rule that matches
//! and whose field can still accept it:
//!
//! - an unresolved field always accepts;
//! - a resolved field accepts only a [`Priority::Specific`] rule when it was
//!   resolved by a [`Priority::Generic`] one.
//!
//! The second case is the road-name address tie-break: a `도로명주소` column
//! wins over an earlier `지번주소` or `소재지` column, but never the other way
//! round.
//!
//! Headers nothing matches are ignored. Missing fields are not an error; the
//! loader fills them with defaults.

use std::collections::BTreeMap;
use std::fmt;

/// Semantic fields of a parking record that can come from a source column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Address,
    Region,
    Type,
    Lat,
    Lon,
    Org,
    Phone,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Name,
        Field::Address,
        Field::Region,
        Field::Type,
        Field::Lat,
        Field::Lon,
        Field::Org,
        Field::Phone,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Address => "address",
            Field::Region => "region",
            Field::Type => "type",
            Field::Lat => "lat",
            Field::Lon => "lon",
            Field::Org => "org",
            Field::Phone => "phone",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    Generic,
    Specific,
}

/// Header test for one rule.
#[derive(Debug)]
pub struct Matcher {
    /// Substrings searched for in the raw header (case-sensitive).
    pub keywords: &'static [&'static str],
    /// Exact, case-insensitive header names.
    pub aliases: &'static [&'static str],
    /// Extra substring that must also be present for the rule to match.
    pub qualifier: Option<&'static str>,
}

impl Matcher {
    pub fn matches(&self, header: &str) -> bool {
        let lower = header.to_lowercase();
        let base = self.keywords.iter().any(|k| header.contains(k))
            || self.aliases.iter().any(|a| lower == *a);
        base && self.qualifier.is_none_or(|q| header.contains(q))
    }
}

#[derive(Debug)]
pub struct Rule {
    pub field: Field,
    pub matcher: Matcher,
    pub priority: Priority,
}

const ADDRESS_KEYWORDS: &[&str] = &["도로명주소", "지번주소", "주소", "소재지"];
const ADDRESS_ALIASES: &[&str] = &["address", "addr", "location"];

pub const RULES: &[Rule] = &[
    Rule {
        field: Field::Name,
        matcher: Matcher {
            keywords: &["주차장명", "시설명"],
            aliases: &["name", "parking_name", "prk_nm"],
            qualifier: None,
        },
        priority: Priority::Generic,
    },
    Rule {
        field: Field::Address,
        matcher: Matcher {
            keywords: ADDRESS_KEYWORDS,
            aliases: ADDRESS_ALIASES,
            qualifier: Some("도로명"),
        },
        priority: Priority::Specific,
    },
    Rule {
        field: Field::Address,
        matcher: Matcher {
            keywords: ADDRESS_KEYWORDS,
            aliases: ADDRESS_ALIASES,
            qualifier: None,
        },
        priority: Priority::Generic,
    },
    Rule {
        field: Field::Region,
        matcher: Matcher {
            keywords: &["시도명", "시군구명", "시도", "광역", "지역"],
            aliases: &["region", "sido", "sigungu"],
            qualifier: None,
        },
        priority: Priority::Generic,
    },
    Rule {
        field: Field::Type,
        matcher: Matcher {
            keywords: &["주차장유형", "유형", "구분"],
            aliases: &["type", "parking_type"],
            qualifier: None,
        },
        priority: Priority::Generic,
    },
    Rule {
        field: Field::Lat,
        matcher: Matcher {
            keywords: &["위도"],
            aliases: &["lat", "latitude"],
            qualifier: None,
        },
        priority: Priority::Generic,
    },
    Rule {
        field: Field::Lon,
        matcher: Matcher {
            keywords: &["경도"],
            aliases: &["lon", "lng", "longitude"],
            qualifier: None,
        },
        priority: Priority::Generic,
    },
    Rule {
        field: Field::Org,
        matcher: Matcher {
            keywords: &["관리기관", "제공기관", "기관", "운영기관"],
            aliases: &["org", "organization"],
            qualifier: None,
        },
        priority: Priority::Generic,
    },
    Rule {
        field: Field::Phone,
        matcher: Matcher {
            keywords: &["전화", "연락처", "tel"],
            aliases: &["phone", "tel"],
            qualifier: None,
        },
        priority: Priority::Generic,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Assignment {
    index: usize,
    priority: Priority,
}

/// Resolved field → source column index mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    columns: BTreeMap<Field, Assignment>,
}

impl ColumnMap {
    /// Build a column map from a header row using [`RULES`].
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Self {
        let mut map = ColumnMap::default();
        for (index, raw) in headers.iter().enumerate() {
            let header = raw.as_ref().trim();
            if header.is_empty() {
                continue;
            }
            let claimed = RULES
                .iter()
                .find(|rule| map.accepts(rule) && rule.matcher.matches(header));
            if let Some(rule) = claimed {
                map.columns.insert(
                    rule.field,
                    Assignment {
                        index,
                        priority: rule.priority,
                    },
                );
            }
        }
        map
    }

    fn accepts(&self, rule: &Rule) -> bool {
        match self.columns.get(&rule.field) {
            None => true,
            Some(existing) => rule.priority > existing.priority,
        }
    }

    /// Source column index for a field, if any header resolved to it.
    pub fn index(&self, field: Field) -> Option<usize> {
        self.columns.get(&field).map(|a| a.index)
    }

    /// Trimmed value of `field` in `row`, or `""` when the field is unmapped
    /// or the row is too short.
    pub fn get<'r>(&self, row: &'r csv::StringRecord, field: Field) -> &'r str {
        self.index(field)
            .and_then(|i| row.get(i))
            .map(str::trim)
            .unwrap_or("")
    }

    /// Resolved fields in declaration order.
    pub fn resolved(&self) -> impl Iterator<Item = (Field, usize)> + '_ {
        self.columns.iter().map(|(f, a)| (*f, a.index))
    }

    /// Fields with no source column.
    pub fn missing(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| !self.columns.contains_key(f))
            .collect()
    }
}
