//! CLI output formatting for the build, check and search commands.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Source
//!     data/source.csv (utf-8-sig, 2 records)
//! Pages
//!     Home → index.html
//!     About → about/index.html
//!     Regions → regions/index.html (2 regions)
//!     Details → p/<id>/index.html (2 pages)
//! Sitemap
//!     skipped (no base_url)
//! Built 2 items from data/source.csv
//! ```
//!
//! ## Check
//!
//! ```text
//! Source
//!     data/source.csv (cp949, 2 records)
//! Columns
//!     name     → column 1
//!     phone    (not found)
//! Regions
//!     001 부산 (1)
//!     002 서울 (1)
//! ```
//!
//! ## Search
//!
//! ```text
//! 001 A공영 [서울] 서울시 중구 1
//!     /p/3f2a9c01de/
//! 1 match
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::columns::Field;
use crate::generate::{detail_path, group_by_region};
use crate::load::Table;
use crate::pipeline::BuildReport;
use crate::types::Record;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Pluralize a count for summary lines: `1 match`, `2 matches`.
fn count(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {plural}")
    }
}

// ============================================================================
// Build
// ============================================================================

/// Format the result of a full build. The last line is the summary.
pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let source = report.source.display();
    let mut lines = vec![
        "Source".to_string(),
        format!(
            "    {} ({}, {})",
            source,
            report.encoding,
            count(report.record_count, "record", "records")
        ),
        "Pages".to_string(),
        "    Home \u{2192} index.html".to_string(),
        "    About \u{2192} about/index.html".to_string(),
        format!(
            "    Regions \u{2192} regions/index.html ({})",
            count(report.region_count, "region", "regions")
        ),
        format!(
            "    Details \u{2192} p/<id>/index.html ({})",
            count(report.detail_pages, "page", "pages")
        ),
    ];

    if report.asset_files > 0 {
        lines.push(format!(
            "    Assets \u{2192} assets/ ({})",
            count(report.asset_files, "file", "files")
        ));
    }

    lines.push("Sitemap".to_string());
    match report.sitemap_urls {
        Some(n) => lines.push(format!(
            "    {} \u{2192} sitemap.xml, robots.txt",
            count(n, "URL", "URLs")
        )),
        None => lines.push("    skipped (no base_url)".to_string()),
    }

    if !report.slug_collisions.is_empty() {
        lines.push("Slug collisions".to_string());
        for (region, slug) in &report.slug_collisions {
            lines.push(format!("    {region} \u{2192} regions/{slug}/"));
        }
    }

    lines.push(format!(
        "Built {} items from {}",
        report.record_count, source
    ));
    lines
}

pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format what a dry run learned about the source table: encoding, which
/// column each field was read from, and the region breakdown.
pub fn format_check_output(table: &Table) -> Vec<String> {
    let mut lines = vec![
        "Source".to_string(),
        format!(
            "    {} ({}, {})",
            table.path.display(),
            table.encoding,
            count(table.records.len(), "record", "records")
        ),
        "Columns".to_string(),
    ];

    let width = Field::ALL.iter().map(|f| f.as_str().len()).max().unwrap_or(0);
    for field in Field::ALL {
        match table.columns.index(field) {
            Some(idx) => lines.push(format!(
                "    {:<width$} \u{2192} column {}",
                field.as_str(),
                idx + 1
            )),
            None => lines.push(format!("    {:<width$} (not found)", field.as_str())),
        }
    }

    let groups = group_by_region(&table.records);
    if !groups.is_empty() {
        lines.push("Regions".to_string());
        for (i, (region, members)) in groups.iter().enumerate() {
            lines.push(format!(
                "    {} {} ({})",
                format_index(i + 1),
                region,
                members.len()
            ));
        }
    }

    lines
}

pub fn print_check_output(table: &Table) {
    for line in format_check_output(table) {
        println!("{}", line);
    }
}

// ============================================================================
// Search
// ============================================================================

/// Format search results the way the landing page lists them, with each
/// record's detail page path.
///
/// `total` is the match count before the result cap.
pub fn format_search_output(results: &[&Record], total: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, record) in results.iter().enumerate() {
        let mut header = format!("{} {} [{}]", format_index(i + 1), record.name, record.region);
        if !record.address.is_empty() {
            header.push(' ');
            header.push_str(&record.address);
        }
        lines.push(header);
        lines.push(format!("    {}", detail_path(&record.id)));
    }

    let summary = count(total, "match", "matches");
    if total > results.len() {
        lines.push(format!("{summary} (showing the first {})", results.len()));
    } else {
        lines.push(summary);
    }
    lines
}

pub fn print_search_output(results: &[&Record], total: usize) {
    for line in format_search_output(results, total) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::parse_records;
    use crate::search::SEARCH_RESULT_CAP;
    use crate::test_helpers::record;
    use std::path::PathBuf;

    fn report() -> BuildReport {
        BuildReport {
            source: PathBuf::from("data/source.csv"),
            encoding: "utf-8-sig",
            output: PathBuf::from("site"),
            record_count: 2,
            region_count: 2,
            detail_pages: 2,
            asset_files: 0,
            sitemap_urls: None,
            slug_collisions: Vec::new(),
        }
    }

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
    }

    #[test]
    fn count_pluralizes() {
        assert_eq!(count(1, "page", "pages"), "1 page");
        assert_eq!(count(0, "page", "pages"), "0 pages");
    }

    // =========================================================================
    // Build
    // =========================================================================

    #[test]
    fn build_output_ends_with_summary() {
        let lines = format_build_output(&report());
        assert_eq!(
            lines.last().unwrap(),
            "Built 2 items from data/source.csv"
        );
    }

    #[test]
    fn build_output_lists_page_kinds() {
        let lines = format_build_output(&report());
        assert_eq!(lines[0], "Source");
        assert_eq!(lines[1], "    data/source.csv (utf-8-sig, 2 records)");
        assert!(lines.contains(&"    Regions \u{2192} regions/index.html (2 regions)".to_string()));
        assert!(lines.contains(&"    Details \u{2192} p/<id>/index.html (2 pages)".to_string()));
        assert!(lines.contains(&"    skipped (no base_url)".to_string()));
        assert!(!lines.iter().any(|l| l.contains("Assets")));
    }

    #[test]
    fn build_output_shows_sitemap_and_assets() {
        let report = BuildReport {
            sitemap_urls: Some(7),
            asset_files: 1,
            ..report()
        };
        let lines = format_build_output(&report);
        assert!(lines.contains(&"    7 URLs \u{2192} sitemap.xml, robots.txt".to_string()));
        assert!(lines.contains(&"    Assets \u{2192} assets/ (1 file)".to_string()));
    }

    #[test]
    fn build_output_lists_slug_collisions() {
        let report = BuildReport {
            slug_collisions: vec![("jung-gu".to_string(), "jung-gu-2".to_string())],
            ..report()
        };
        let lines = format_build_output(&report);
        assert!(lines.contains(&"Slug collisions".to_string()));
        assert!(lines.contains(&"    jung-gu \u{2192} regions/jung-gu-2/".to_string()));
    }

    // =========================================================================
    // Check
    // =========================================================================

    fn table(csv: &str) -> Table {
        let (columns, records) = parse_records(csv).unwrap();
        Table {
            path: PathBuf::from("data/source.csv"),
            encoding: "cp949",
            columns,
            records,
        }
    }

    #[test]
    fn check_output_reports_columns() {
        let lines = format_check_output(&table("주차장명,주소\nA,서울 중구\n"));
        assert_eq!(lines[1], "    data/source.csv (cp949, 1 record)");
        assert!(lines.contains(&"    name    \u{2192} column 1".to_string()));
        assert!(lines.contains(&"    address \u{2192} column 2".to_string()));
        assert!(lines.contains(&"    phone   (not found)".to_string()));
    }

    #[test]
    fn check_output_lists_regions_sorted() {
        let lines = format_check_output(&table("name,region\nA,서울\nB,부산\nC,서울\n"));
        let start = lines.iter().position(|l| l == "Regions").unwrap();
        assert_eq!(lines[start + 1], "    001 부산 (1)");
        assert_eq!(lines[start + 2], "    002 서울 (2)");
    }

    #[test]
    fn check_output_omits_regions_for_empty_table() {
        let lines = format_check_output(&table("name\n"));
        assert!(!lines.contains(&"Regions".to_string()));
    }

    // =========================================================================
    // Search
    // =========================================================================

    #[test]
    fn search_output_lists_matches_with_paths() {
        let mut a = record("A공영", "서울");
        a.address = "서울시 중구 1".to_string();
        let lines = format_search_output(&[&a], 1);
        assert_eq!(lines[0], "001 A공영 [서울] 서울시 중구 1");
        assert_eq!(lines[1], format!("    /p/{}/", a.id));
        assert_eq!(lines[2], "1 match");
    }

    #[test]
    fn search_output_without_results() {
        assert_eq!(format_search_output(&[], 0), vec!["0 matches"]);
    }

    #[test]
    fn search_output_notes_cap_only_when_results_dropped() {
        let records: Vec<Record> = (0..SEARCH_RESULT_CAP)
            .map(|i| record(&format!("Lot {i}"), "서울"))
            .collect();
        let refs: Vec<&Record> = records.iter().collect();

        let exact = format_search_output(&refs, SEARCH_RESULT_CAP);
        assert_eq!(exact.last().unwrap(), &format!("{SEARCH_RESULT_CAP} matches"));

        let capped = format_search_output(&refs, 250);
        assert_eq!(
            capped.last().unwrap(),
            &format!("250 matches (showing the first {SEARCH_RESULT_CAP})")
        );
    }
}
