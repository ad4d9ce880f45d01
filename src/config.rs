//! Site configuration module.
//!
//! Handles loading and validating the settings file that sits next to the
//! page template. The file is required: a build without it is a
//! misconfigured build, not a build with defaults.
//!
//! ## Config File Location
//!
//! ```text
//! site_template/
//! ├── config.toml              # Settings (or config.json)
//! ├── template.html            # Page template with {{PLACEHOLDERS}}
//! └── assets/                  # Copied verbatim to <output>/assets/
//! ```
//!
//! `config.toml` is preferred; `config.json` is accepted for templates
//! carried over from older setups. The format is chosen by file extension.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - empty strings are the defaults
//!
//! site_name = "전국 공영주차장 찾기"
//! site_tagline = "지역별 공영주차장 위치와 정보"
//! footer_source = "출처: 공공데이터포털"
//! base_url = "https://parking.example.com"   # Enables sitemap.xml/robots.txt
//!
//! adsense_client = "ca-pub-0000000000000000"   # Empty disables all ad slots
//! adsense_slot_top = "1111111111"
//! adsense_slot_bottom = "2222222222"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("No config.toml or config.json in {0}")]
    NotFound(PathBuf),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Candidate settings file names, in lookup order.
pub const CONFIG_FILENAMES: &[&str] = &["config.toml", "config.json"];

/// Site settings consumed by the page renderer and the sitemap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site name shown in the header, landing page heading and page titles.
    pub site_name: String,
    /// One-line description, used as the landing page description.
    pub site_tagline: String,
    /// Data attribution line for the footer.
    pub footer_source: String,
    /// Public base URL. Empty disables sitemap.xml and robots.txt.
    pub base_url: String,
    /// AdSense publisher id. Empty disables all ad placeholders.
    pub adsense_client: String,
    /// Ad slot id for the block above page content.
    pub adsense_slot_top: String,
    /// Ad slot id for the block below page content.
    pub adsense_slot_bottom: String,
}

impl SiteConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.base_url.trim();
        if !base.is_empty() && !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "base_url must start with http:// or https:// (got {base:?})"
            )));
        }
        Ok(())
    }

    /// Base URL without trailing slashes, or `None` when unset.
    pub fn base_url(&self) -> Option<&str> {
        let base = self.base_url.trim().trim_end_matches('/');
        (!base.is_empty()).then_some(base)
    }
}

/// Parse settings from `content`, choosing the format from `path`'s extension.
pub fn parse_config(path: &Path, content: &str) -> Result<SiteConfig, ConfigError> {
    let is_json = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let config: SiteConfig = if is_json {
        serde_json::from_str(content)?
    } else {
        toml::from_str(content)?
    };
    config.validate()?;
    Ok(config)
}

/// Find the settings file in `dir`.
pub fn find_config(dir: &Path) -> Result<PathBuf, ConfigError> {
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
        .ok_or_else(|| ConfigError::NotFound(dir.to_path_buf()))
}

/// Load and validate the settings file from a template directory.
pub fn load_config(dir: &Path) -> Result<SiteConfig, ConfigError> {
    let path = find_config(dir)?;
    let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    parse_config(&path, &content)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# parking-site configuration
# ==========================
# Place this file next to template.html. All settings are optional;
# unset values render as empty strings. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
# Replaces {{SITE_NAME}}; also the landing page heading and title suffix.
site_name = "전국 공영주차장 찾기"

# Replaces {{SITE_TAGLINE}}; also the landing page description.
site_tagline = "지역별 공영주차장 위치와 정보를 한눈에"

# Replaces {{FOOTER_SOURCE}}. Check the dataset licence for the required wording.
footer_source = "출처: 공공데이터포털 전국주차장정보표준데이터"

# ---------------------------------------------------------------------------
# Publishing
# ---------------------------------------------------------------------------
# Public URL of the deployed site. Leave empty to skip sitemap.xml and
# robots.txt generation.
base_url = ""

# ---------------------------------------------------------------------------
# Advertising
# ---------------------------------------------------------------------------
# AdSense publisher id. Leave empty to render no ad markup at all.
adsense_client = ""

# Slot ids for the blocks above ({{ADSENSE_TOP}}) and below
# ({{ADSENSE_BOTTOM}}) page content. Empty slots render nothing.
adsense_slot_top = ""
adsense_slot_bottom = ""
"##
}
