//! Shared test utilities for the parking-site test suite.
//!
//! Provides a record builder for page-level tests and [`SiteFixture`], a
//! throwaway project layout (data table, template directory, output path)
//! for tests that run whole builds.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let fixture = SiteFixture::new("주차장명,주소\nA공영,서울 중구 1\n");
//! let report = pipeline::build_on(&fixture.paths(), fixture.date()).unwrap();
//! assert_eq!(report.record_count, 1);
//! ```

use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::load::record_id;
use crate::pipeline::BuildPaths;
use crate::types::Record;

// =========================================================================
// Records
// =========================================================================

/// A record with only `name` and `region` set and a real content id.
pub fn record(name: &str, region: &str) -> Record {
    Record {
        id: record_id(region, name, "", "", ""),
        name: name.to_string(),
        address: String::new(),
        region: region.to_string(),
        kind: "노외".to_string(),
        lat: String::new(),
        lon: String::new(),
        org: String::new(),
        phone: String::new(),
    }
}

// =========================================================================
// Site fixture
// =========================================================================

/// Template carrying every placeholder the renderer knows.
pub const TEMPLATE: &str = "<!doctype html>
<html lang=\"ko\"><head><title>{{TITLE}}</title>
<meta name=\"description\" content=\"{{DESC}}\">{{ADSENSE_HEAD}}</head>
<body><header>{{SITE_NAME}} {{SITE_TAGLINE}}</header>{{ADSENSE_TOP}}
<main>{{CONTENT}}</main>{{ADSENSE_BOTTOM}}<footer>{{FOOTER_SOURCE}}</footer></body></html>
";

/// Settings used unless a test writes its own.
pub const CONFIG: &str = "site_name = \"주차 찾기\"
site_tagline = \"공영주차장 검색\"
footer_source = \"출처: 테스트\"
";

/// A temp directory laid out like a project checkout:
///
/// ```text
/// <tmp>/
/// ├── data/source.csv
/// ├── site_template/{template.html, config.toml, assets/}
/// └── site/                 (build output, created by the build)
/// ```
pub struct SiteFixture {
    tmp: TempDir,
}

impl SiteFixture {
    /// Lay out a project whose source table contains `csv`.
    pub fn new(csv: &str) -> Self {
        let tmp = TempDir::new().unwrap();
        let fixture = Self { tmp };
        fs::create_dir_all(fixture.data_dir()).unwrap();
        fs::create_dir_all(fixture.template_dir().join("assets")).unwrap();
        fs::write(fixture.data_dir().join("source.csv"), csv).unwrap();
        fs::write(fixture.template_dir().join("template.html"), TEMPLATE).unwrap();
        fixture.write_config(CONFIG);
        fixture
    }

    pub fn data_dir(&self) -> PathBuf {
        self.tmp.path().join("data")
    }

    pub fn template_dir(&self) -> PathBuf {
        self.tmp.path().join("site_template")
    }

    pub fn output(&self) -> PathBuf {
        self.tmp.path().join("site")
    }

    pub fn paths(&self) -> BuildPaths {
        BuildPaths {
            input: self.data_dir().join("source.csv"),
            template_dir: self.template_dir(),
            output: self.output(),
        }
    }

    /// Fixed sitemap date so output is reproducible.
    pub fn date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    /// Replace `config.toml`.
    pub fn write_config(&self, toml: &str) {
        fs::write(self.template_dir().join("config.toml"), toml).unwrap();
    }

    pub fn write_asset(&self, rel: &str, contents: &str) {
        let path = self.template_dir().join("assets").join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    /// Read a file from the committed output.
    pub fn read_output(&self, rel: &str) -> String {
        fs::read_to_string(self.output().join(rel))
            .unwrap_or_else(|e| panic!("cannot read output file '{rel}': {e}"))
    }
}
