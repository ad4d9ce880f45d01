//! Record loading: delimited table → [`Record`]s.
//!
//! Stage 1 of the build. Reads the source table, resolves its header row
//! with [`ColumnMap`], and turns every data row into a [`Record`].
//!
//! ## Encodings
//!
//! Exports from Korean public-data portals come in UTF-8 (with or without a
//! BOM) or in CP949. The raw bytes are decoded strictly with each encoding in
//! [`ENCODINGS`] order; the first clean decode wins. Nothing is ever decoded
//! lossily; a table none of them can read is a fatal [`LoadError::Decode`].
//!
//! ## Row Tolerance
//!
//! Rows are never rejected. Short rows read missing trailing fields as `""`,
//! long rows have their extra cells ignored, and absent values fall back to
//! defaults:
//!
//! | Field | Default |
//! |-------|---------|
//! | `name` | [`UNKNOWN_NAME`] |
//! | `region` | first word of `address`, else [`UNKNOWN_REGION`] |
//! | `type` | [`UNKNOWN_TYPE`] |
//!
//! ## Identifiers
//!
//! Each record's `id` is the first [`ID_LEN`] hex characters of
//! SHA-256(`region|name|address|lat|lon`), computed after defaults are
//! applied. Identical rows always get identical ids, across runs and
//! machines, so `/p/<id>/` URLs stay stable as the dataset is refreshed.

use crate::columns::{ColumnMap, Field};
use crate::types::Record;
use encoding_rs::{EUC_KR, Encoding, UTF_8};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not valid UTF-8, CP949 or EUC-KR text")]
    Decode { path: PathBuf },
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

pub const UNKNOWN_NAME: &str = "(이름 미상)";
pub const UNKNOWN_REGION: &str = "기타";
pub const UNKNOWN_TYPE: &str = "정보없음";

/// Hex characters kept from the SHA-256 digest.
pub const ID_LEN: usize = 10;

/// Label and decoder for one candidate encoding.
#[derive(Debug, Clone, Copy)]
pub struct SourceEncoding {
    pub label: &'static str,
    encoding: &'static Encoding,
    strip_bom: bool,
}

/// Candidate encodings, in the order they are tried.
///
/// `encoding_rs` implements EUC-KR as the WHATWG superset, which is CP949,
/// so the two Korean entries share a decoder.
pub const ENCODINGS: &[SourceEncoding] = &[
    SourceEncoding {
        label: "utf-8-sig",
        encoding: UTF_8,
        strip_bom: true,
    },
    SourceEncoding {
        label: "utf-8",
        encoding: UTF_8,
        strip_bom: false,
    },
    SourceEncoding {
        label: "cp949",
        encoding: EUC_KR,
        strip_bom: false,
    },
    SourceEncoding {
        label: "euc-kr",
        encoding: EUC_KR,
        strip_bom: false,
    },
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

impl SourceEncoding {
    fn decode(&self, bytes: &[u8]) -> Option<String> {
        let bytes = if self.strip_bom {
            bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
        } else {
            bytes
        };
        self.encoding
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(|text| text.into_owned())
    }
}

/// Decode raw table bytes with the first encoding that reads them cleanly.
///
/// Returns the text and the label of the encoding that worked.
pub fn decode_table(bytes: &[u8], path: &Path) -> Result<(String, &'static str), LoadError> {
    for candidate in ENCODINGS {
        if let Some(text) = candidate.decode(bytes) {
            if candidate.encoding != UTF_8 {
                tracing::warn!(path = %path.display(), encoding = candidate.label, "table is not UTF-8");
            }
            return Ok((text, candidate.label));
        }
    }
    // Last strict attempt with the default encoding, to surface the failure.
    String::from_utf8(bytes.to_vec())
        .map(|text| (text, "utf-8"))
        .map_err(|_| LoadError::Decode {
            path: path.to_path_buf(),
        })
}

/// Result of loading a table: records plus what was learned along the way.
#[derive(Debug)]
pub struct Table {
    pub path: PathBuf,
    pub encoding: &'static str,
    pub columns: ColumnMap,
    pub records: Vec<Record>,
}

/// Load every record from the table at `path`.
///
/// A file with no header row yields an empty table.
pub fn load_table(path: &Path) -> Result<Table, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let (text, encoding) = decode_table(&bytes, path)?;
    let (columns, records) = parse_records(&text).map_err(|source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(
        path = %path.display(),
        encoding,
        records = records.len(),
        "loaded table"
    );
    Ok(Table {
        path: path.to_path_buf(),
        encoding,
        columns,
        records,
    })
}

/// Load records from `path`, discarding table metadata.
pub fn load_records(path: &Path) -> Result<Vec<Record>, LoadError> {
    load_table(path).map(|t| t.records)
}

/// Parse decoded table text into a column map and records, in row order.
pub fn parse_records(text: &str) -> Result<(ColumnMap, Vec<Record>), csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut rows = reader.records();

    let headers = match rows.next() {
        Some(row) => row?,
        None => return Ok((ColumnMap::default(), Vec::new())),
    };
    let columns = ColumnMap::from_headers(&headers.iter().collect::<Vec<_>>());
    tracing::debug!(
        resolved = ?columns.resolved().collect::<Vec<_>>(),
        missing = ?columns.missing(),
        "resolved header row"
    );

    let mut records = Vec::new();
    for row in rows {
        records.push(build_record(&columns, &row?));
    }
    Ok((columns, records))
}

fn build_record(columns: &ColumnMap, row: &csv::StringRecord) -> Record {
    let get = |field| columns.get(row, field);

    let name = non_empty_or(get(Field::Name), UNKNOWN_NAME);
    let address = get(Field::Address).to_string();
    let region = match get(Field::Region) {
        "" => address
            .split_whitespace()
            .next()
            .unwrap_or(UNKNOWN_REGION)
            .to_string(),
        region => region.to_string(),
    };
    let kind = non_empty_or(get(Field::Type), UNKNOWN_TYPE);
    let lat = get(Field::Lat).to_string();
    let lon = get(Field::Lon).to_string();

    Record {
        id: record_id(&region, &name, &address, &lat, &lon),
        name,
        address,
        region,
        kind,
        lat,
        lon,
        org: get(Field::Org).to_string(),
        phone: get(Field::Phone).to_string(),
    }
}

fn non_empty_or(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

/// Stable record id: truncated SHA-256 of the identifying fields.
pub fn record_id(region: &str, name: &str, address: &str, lat: &str, lon: &str) -> String {
    let raw = format!("{region}|{name}|{address}|{lat}|{lon}");
    let digest = Sha256::digest(raw.as_bytes());
    let mut hex = format!("{:x}", digest);
    hex.truncate(ID_LEN);
    hex
}
