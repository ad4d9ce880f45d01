//! The full build: inputs → staged site → committed output directory.
//!
//! ```text
//! 1. Load      config, template, table   (nothing on disk is touched yet)
//! 2. Stage     assets, data feed, pages   (into .<output>.staging/)
//! 3. Finalize  sitemap, .nojekyll         (still staged)
//! 4. Commit    staging → output           (previous build replaced)
//! ```
//!
//! Any error before step 4 drops the [`SiteWriter`], which removes the
//! staging directory and leaves the previous build in place.

use crate::config::{self, ConfigError, SiteConfig};
use crate::generate::{self, GenerateError};
use crate::load::{self, LoadError, Table};
use crate::render::{RenderError, Renderer};
use crate::sitemap;
use crate::writer::{SiteWriter, WriteError};
use chrono::{NaiveDate, Utc};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Template error: {0}")]
    Template(#[from] RenderError),
    #[error("Load error: {0}")]
    Load(#[from] LoadError),
    #[error("Generate error: {0}")]
    Generate(#[from] GenerateError),
    #[error("Write error: {0}")]
    Write(#[from] WriteError),
}

/// Preferred source table inside the data directory.
pub const SOURCE_CSV: &str = "source.csv";
/// Bundled sample used when no real data has been dropped in.
pub const SAMPLE_CSV: &str = "parking_sample.csv";
/// Marker that turns off Jekyll processing on GitHub Pages.
pub const NOJEKYLL: &str = ".nojekyll";

/// Where a build reads from and writes to.
#[derive(Debug, Clone)]
pub struct BuildPaths {
    /// Source table.
    pub input: PathBuf,
    /// Directory holding `template.html`, the settings file and `assets/`.
    pub template_dir: PathBuf,
    /// Site output directory.
    pub output: PathBuf,
}

/// Pick the source table: an explicit path wins, then `source.csv`, then the
/// bundled sample.
pub fn resolve_input(data_dir: &Path, explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    let real = data_dir.join(SOURCE_CSV);
    if real.exists() {
        real
    } else {
        data_dir.join(SAMPLE_CSV)
    }
}

/// Everything a build needs, loaded and validated.
#[derive(Debug)]
pub struct Inputs {
    pub config: SiteConfig,
    pub renderer: Renderer,
    pub table: Table,
}

/// Load settings, template and table without touching the output.
pub fn load_inputs(paths: &BuildPaths) -> Result<Inputs, BuildError> {
    let config = config::load_config(&paths.template_dir)?;
    let renderer = Renderer::load(&paths.template_dir, config.clone())?;
    let table = load::load_table(&paths.input)?;
    Ok(Inputs {
        config,
        renderer,
        table,
    })
}

/// Outcome of a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub source: PathBuf,
    pub encoding: &'static str,
    pub output: PathBuf,
    pub record_count: usize,
    pub region_count: usize,
    pub detail_pages: usize,
    pub asset_files: usize,
    /// Sitemap entries, `None` when no base URL is configured.
    pub sitemap_urls: Option<usize>,
    /// `(region, slug)` pairs that needed a suffix.
    pub slug_collisions: Vec<(String, String)>,
}

/// Run the full build, stamping the sitemap with today's UTC date.
pub fn build(paths: &BuildPaths) -> Result<BuildReport, BuildError> {
    build_on(paths, Utc::now().date_naive())
}

/// Run the full build with an explicit sitemap date.
pub fn build_on(paths: &BuildPaths, lastmod: NaiveDate) -> Result<BuildReport, BuildError> {
    let inputs = load_inputs(paths)?;
    tracing::info!(
        source = %paths.input.display(),
        records = inputs.table.records.len(),
        "inputs loaded"
    );

    let mut writer = SiteWriter::begin(&paths.output)?;
    let asset_files = writer.copy_tree(&paths.template_dir.join("assets"), "assets")?;

    let source_name = paths
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| paths.input.display().to_string());
    let summary = generate::generate(
        &mut writer,
        &inputs.renderer,
        &inputs.table.records,
        &source_name,
    )?;

    let sitemap_urls = sitemap::write_sitemap(&mut writer, inputs.config.base_url(), lastmod)?;
    writer.write(NOJEKYLL, "")?;

    let output = writer.commit()?;

    Ok(BuildReport {
        source: paths.input.clone(),
        encoding: inputs.table.encoding,
        output,
        record_count: inputs.table.records.len(),
        region_count: summary.regions,
        detail_pages: summary.detail_pages,
        asset_files,
        sitemap_urls,
        slug_collisions: summary.slug_collisions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{SiteFixture, TEMPLATE};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn resolve_input_prefers_explicit_path() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(SOURCE_CSV), "").unwrap();
        let explicit = tmp.path().join("other.csv");
        assert_eq!(resolve_input(tmp.path(), Some(&explicit)), explicit);
    }

    #[test]
    fn resolve_input_prefers_source_over_sample() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(SOURCE_CSV), "").unwrap();
        assert_eq!(resolve_input(tmp.path(), None), tmp.path().join(SOURCE_CSV));
    }

    #[test]
    fn resolve_input_falls_back_to_sample() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(resolve_input(tmp.path(), None), tmp.path().join(SAMPLE_CSV));
    }

    #[test]
    fn build_writes_marker_and_assets() {
        let fixture = SiteFixture::new("name,address\nA,서울 중구\n");
        fixture.write_asset("style.css", "body{}");
        let report = build_on(&fixture.paths(), fixture.date()).unwrap();

        let out = fixture.output();
        assert!(out.join(NOJEKYLL).exists());
        assert!(out.join("assets/style.css").exists());
        assert_eq!(report.asset_files, 1);
        assert_eq!(report.record_count, 1);
        assert_eq!(report.encoding, "utf-8-sig");
    }

    #[test]
    fn missing_template_fails_before_touching_output() {
        let fixture = SiteFixture::new("name\nA\n");
        fs::create_dir_all(fixture.output()).unwrap();
        fs::write(fixture.output().join("index.html"), "previous").unwrap();
        fs::remove_file(fixture.template_dir().join("template.html")).unwrap();

        let err = build_on(&fixture.paths(), fixture.date()).unwrap_err();
        assert!(matches!(err, BuildError::Template(_)));
        assert_eq!(
            fs::read_to_string(fixture.output().join("index.html")).unwrap(),
            "previous"
        );
    }

    #[test]
    fn undecodable_table_keeps_previous_build() {
        let fixture = SiteFixture::new("name\nA\n");
        build_on(&fixture.paths(), fixture.date()).unwrap();
        fs::write(&fixture.paths().input, [0xFFu8, 0xFE, 0xFF]).unwrap();

        let err = build_on(&fixture.paths(), fixture.date()).unwrap_err();
        assert!(matches!(err, BuildError::Load(LoadError::Decode { .. })));
        assert!(fixture.output().join("index.html").exists());
    }

    #[test]
    fn base_url_enables_sitemap() {
        let fixture = SiteFixture::new("name,region\nA,서울\n");
        fixture.write_config("base_url = \"https://example.com\"\n");
        let report = build_on(&fixture.paths(), fixture.date()).unwrap();
        // Home, about, region index, one region page, one detail page.
        assert_eq!(report.sitemap_urls, Some(5));
        assert!(fixture.read_output("sitemap.xml").contains("<lastmod>2026-10-17</lastmod>"));
        assert!(fixture.output().join("robots.txt").exists());
    }

    #[test]
    fn missing_config_is_fatal() {
        let fixture = SiteFixture::new("name\nA\n");
        fs::remove_file(fixture.template_dir().join("config.toml")).unwrap();
        let err = build_on(&fixture.paths(), fixture.date()).unwrap_err();
        assert!(matches!(err, BuildError::Config(ConfigError::NotFound(_))));
    }

    #[test]
    fn rebuild_removes_stale_pages() {
        let fixture = SiteFixture::new("name,region\nA,서울\n");
        build_on(&fixture.paths(), fixture.date()).unwrap();
        assert!(fixture.output().join("regions/서울/index.html").exists());

        fs::write(&fixture.paths().input, "name,region\nB,부산\n").unwrap();
        build_on(&fixture.paths(), fixture.date()).unwrap();
        assert!(!fixture.output().join("regions/서울/index.html").exists());
        assert!(fixture.output().join("regions/부산/index.html").exists());
    }

    #[test]
    fn header_only_table_builds_empty_site() {
        let fixture = SiteFixture::new("주차장명,주소\n");
        let report = build_on(&fixture.paths(), fixture.date()).unwrap();
        assert_eq!(report.record_count, 0);
        assert_eq!(report.region_count, 0);
        assert_eq!(fixture.read_output("data/parking.json"), "[]");
        assert!(fixture.read_output("index.html").contains("주차 찾기"));
        assert!(TEMPLATE.contains("{{SITE_NAME}}"));
    }
}
