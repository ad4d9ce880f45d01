//! Page rendering: template + settings + page content → HTML page.
//!
//! The template is an opaque HTML file with `{{NAME}}` placeholders. This
//! module never parses it; it only replaces the fixed placeholder set below,
//! in this order:
//!
//! | Placeholder | Value |
//! |-------------|-------|
//! | `{{TITLE}}` | page title |
//! | `{{DESC}}` | page description |
//! | `{{SITE_NAME}}` | `site_name` |
//! | `{{SITE_TAGLINE}}` | `site_tagline` |
//! | `{{FOOTER_SOURCE}}` | `footer_source` |
//! | `{{ADSENSE_HEAD}}` | loader script, when ads are on |
//! | `{{ADSENSE_TOP}}` | top ad block, when its slot is set |
//! | `{{ADSENSE_BOTTOM}}` | bottom ad block, when its slot is set |
//! | `{{CONTENT}}` | page body fragment |
//!
//! Placeholders missing from the template are skipped silently. `{{CONTENT}}`
//! goes last so record text that happens to contain `{{TITLE}}` is left
//! alone.

use crate::config::SiteConfig;
use maud::{Markup, PreEscaped, html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error reading template {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub const TEMPLATE_FILENAME: &str = "template.html";

const ADSENSE_SCRIPT: &str = "https://pagead2.googlesyndication.com/pagead/js/adsbygoogle.js";

/// Ad markup for the three ad placeholders. Empty strings when disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdBlocks {
    pub head: String,
    pub top: String,
    pub bottom: String,
}

impl AdBlocks {
    pub fn from_config(config: &SiteConfig) -> Self {
        let client = config.adsense_client.trim();
        if client.is_empty() {
            return Self::default();
        }
        let head = html! {
            script async src={ (ADSENSE_SCRIPT) "?client=" (client) } crossorigin="anonymous" {}
        };
        Self {
            head: head.into_string(),
            top: ad_block(client, &config.adsense_slot_top),
            bottom: ad_block(client, &config.adsense_slot_bottom),
        }
    }
}

fn ad_block(client: &str, slot: &str) -> String {
    let slot = slot.trim();
    if slot.is_empty() {
        return String::new();
    }
    let markup: Markup = html! {
        div.card {
            ins.adsbygoogle style="display:block"
                data-ad-client=(client) data-ad-slot=(slot)
                data-ad-format="auto" data-full-width-responsive="true" {}
            script { (PreEscaped("(adsbygoogle = window.adsbygoogle || []).push({});")) }
        }
    };
    markup.into_string()
}

fn escape(text: &str) -> String {
    let markup: Markup = html! { (text) };
    markup.into_string()
}

/// Per-page values substituted into the template.
#[derive(Debug, Clone, Copy)]
pub struct PageMeta<'a> {
    pub title: &'a str,
    pub description: &'a str,
}

/// A loaded page template bound to the site settings.
///
/// Ad markup depends only on the settings, so it is built once here rather
/// than per page.
#[derive(Debug, Clone)]
pub struct Renderer {
    template: String,
    config: SiteConfig,
    ads: AdBlocks,
}

impl Renderer {
    pub fn new(template: String, config: SiteConfig) -> Self {
        let ads = AdBlocks::from_config(&config);
        Self {
            template,
            config,
            ads,
        }
    }

    /// Load `template.html` from `dir`.
    pub fn load(dir: &Path, config: SiteConfig) -> Result<Self, RenderError> {
        let path = dir.join(TEMPLATE_FILENAME);
        let template = fs::read_to_string(&path).map_err(|source| RenderError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(Self::new(template, config))
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Fill the template for one page.
    ///
    /// Title and description often carry record text, so they are
    /// HTML-escaped; `content` is inserted as-is.
    pub fn render(&self, meta: PageMeta<'_>, content: &str) -> String {
        let title = escape(meta.title);
        let description = escape(meta.description);
        let substitutions: [(&str, &str); 9] = [
            ("{{TITLE}}", title.as_str()),
            ("{{DESC}}", description.as_str()),
            ("{{SITE_NAME}}", self.config.site_name.as_str()),
            ("{{SITE_TAGLINE}}", self.config.site_tagline.as_str()),
            ("{{FOOTER_SOURCE}}", self.config.footer_source.as_str()),
            ("{{ADSENSE_HEAD}}", self.ads.head.as_str()),
            ("{{ADSENSE_TOP}}", self.ads.top.as_str()),
            ("{{ADSENSE_BOTTOM}}", self.ads.bottom.as_str()),
            ("{{CONTENT}}", content),
        ];
        substitutions
            .iter()
            .fold(self.template.clone(), |page, (placeholder, value)| {
                page.replace(*placeholder, value)
            })
    }
}
