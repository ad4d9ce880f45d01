//! `sitemap.xml` and `robots.txt`.
//!
//! Generated last, from what is actually on disk: every directory of the
//! staged site that holds an [`PAGE_MARKER`] file is a page, so the sitemap
//! can never list a page that was not written or miss one that was. Both
//! files are skipped entirely when no `base_url` is configured.

use crate::writer::{PAGE_MARKER, SiteWriter, WriteError};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::path::Path;
use walkdir::WalkDir;

/// Absolute URL of every page directory under `root`, sorted and unique.
///
/// `base_url` must not end with `/`. The root page maps to `<base>/`, every
/// other page to `<base>/<dir>/`.
pub fn page_urls(root: &Path, base_url: &str) -> Result<Vec<String>, WriteError> {
    let mut urls = BTreeSet::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_file() || entry.file_name() != PAGE_MARKER {
            continue;
        }
        let Some(dir) = entry.path().parent() else {
            continue;
        };
        let Ok(rel) = dir.strip_prefix(root) else {
            continue;
        };
        let segments: Vec<String> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        let url = if segments.is_empty() {
            format!("{base_url}/")
        } else {
            format!("{base_url}/{}/", segments.join("/"))
        };
        urls.insert(url);
    }
    Ok(urls.into_iter().collect())
}

pub fn render_sitemap(urls: &[String], lastmod: NaiveDate) -> String {
    let lastmod = lastmod.format("%Y-%m-%d").to_string();
    let mut xml = vec![
        "<?xml version='1.0' encoding='UTF-8'?>".to_string(),
        "<urlset xmlns='http://www.sitemaps.org/schemas/sitemap/0.9'>".to_string(),
    ];
    for url in urls {
        xml.push("  <url>".to_string());
        xml.push(format!("    <loc>{}</loc>", xml_escape(url)));
        xml.push(format!("    <lastmod>{lastmod}</lastmod>"));
        xml.push("  </url>".to_string());
    }
    xml.push("</urlset>".to_string());
    xml.join("\n")
}

pub fn render_robots(base_url: &str) -> String {
    format!("User-agent: *\nAllow: /\nSitemap: {base_url}/sitemap.xml\n")
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\'', "&apos;")
        .replace('"', "&quot;")
}

/// Write `sitemap.xml` and `robots.txt` for the staged site.
///
/// Returns the number of sitemap entries, or `None` when `base_url` is unset
/// and nothing was written.
pub fn write_sitemap(
    writer: &mut SiteWriter,
    base_url: Option<&str>,
    lastmod: NaiveDate,
) -> Result<Option<usize>, WriteError> {
    let Some(base_url) = base_url else {
        tracing::info!("no base_url configured, skipping sitemap");
        return Ok(None);
    };
    let urls = page_urls(writer.root(), base_url)?;
    writer.write("sitemap.xml", render_sitemap(&urls, lastmod))?;
    writer.write("robots.txt", render_robots(base_url))?;
    tracing::info!(urls = urls.len(), "wrote sitemap");
    Ok(Some(urls.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn staged_site(tmp: &TempDir) -> SiteWriter {
        let mut writer = SiteWriter::begin(&tmp.path().join("site")).unwrap();
        for dir in ["/", "/about/", "/regions/", "/regions/서울/", "/p/abc/"] {
            writer.write_page(dir, "page").unwrap();
        }
        writer.write("data/parking.json", "[]").unwrap();
        writer.write("assets/style.css", "").unwrap();
        writer
    }

    #[test]
    fn urls_cover_every_page_once() {
        let tmp = TempDir::new().unwrap();
        let writer = staged_site(&tmp);
        let urls = page_urls(writer.root(), "https://example.com").unwrap();
        assert_eq!(
            urls,
            vec![
                "https://example.com/",
                "https://example.com/about/",
                "https://example.com/p/abc/",
                "https://example.com/regions/",
                "https://example.com/regions/서울/",
            ]
        );
    }

    #[test]
    fn non_page_files_are_ignored() {
        let tmp = TempDir::new().unwrap();
        let writer = staged_site(&tmp);
        let urls = page_urls(writer.root(), "https://example.com").unwrap();
        assert!(!urls.iter().any(|u| u.contains("data") || u.contains("assets")));
    }

    #[test]
    fn sitemap_has_one_entry_per_url() {
        let urls = vec![
            "https://example.com/".to_string(),
            "https://example.com/about/".to_string(),
        ];
        let xml = render_sitemap(&urls, date());
        assert!(xml.starts_with("<?xml"));
        assert_eq!(xml.matches("<loc>").count(), 2);
        assert_eq!(xml.matches("<lastmod>2026-10-17</lastmod>").count(), 2);
        assert!(xml.ends_with("</urlset>"));
    }

    #[test]
    fn sitemap_escapes_urls() {
        let xml = render_sitemap(&["https://example.com/a&b/".to_string()], date());
        assert!(xml.contains("<loc>https://example.com/a&amp;b/</loc>"));
    }

    #[test]
    fn robots_points_at_sitemap() {
        assert_eq!(
            render_robots("https://example.com"),
            "User-agent: *\nAllow: /\nSitemap: https://example.com/sitemap.xml\n"
        );
    }

    #[test]
    fn write_sitemap_skipped_without_base_url() {
        let tmp = TempDir::new().unwrap();
        let mut writer = staged_site(&tmp);
        assert_eq!(write_sitemap(&mut writer, None, date()).unwrap(), None);
        assert!(!writer.root().join("sitemap.xml").exists());
        assert!(!writer.root().join("robots.txt").exists());
    }

    #[test]
    fn write_sitemap_writes_both_files() {
        let tmp = TempDir::new().unwrap();
        let mut writer = staged_site(&tmp);
        let count = write_sitemap(&mut writer, Some("https://example.com"), date()).unwrap();
        assert_eq!(count, Some(5));
        let xml = fs::read_to_string(writer.root().join("sitemap.xml")).unwrap();
        assert_eq!(xml.matches("<loc>https://example.com/</loc>").count(), 1);
        let robots = fs::read_to_string(writer.root().join("robots.txt")).unwrap();
        assert!(robots.contains("Sitemap: https://example.com/sitemap.xml"));
    }
}
