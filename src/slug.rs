//! URL path segments from free-text labels.
//!
//! Region pages live at `/regions/<slug>/`. Slugs keep Hangul syllables so
//! `서울` stays readable in the address bar instead of turning into
//! percent-encoded noise or an empty string.
//!
//! ## Collisions
//!
//! Two distinct labels can normalize to the same slug (`"Jung-gu"` and
//! `"jung gu"`). [`RegionSlugs`] assigns slugs once per build, in sorted label
//! order, and gives later labels a numeric suffix (`-2`, `-3`, …) so no region
//! page overwrites another. Every link to a region page goes through the same
//! table.

use std::collections::{BTreeMap, HashSet};

/// Returned when nothing of the label survives normalization.
pub const FALLBACK_SLUG: &str = "item";

fn is_allowed(c: char) -> bool {
    c.is_ascii_digit() || c.is_ascii_lowercase() || c == '-' || ('가'..='힣').contains(&c)
}

/// Convert a label into a lowercase, hyphenated path segment.
///
/// - `"Seoul Jung-gu"` → `"seoul-jung-gu"`
/// - `"  서울 중구 "` → `"서울-중구"`
/// - `"a -- b"` → `"a-b"`
/// - `"!!!"` → `"item"`
pub fn slugify(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut pending_space = false;
    for c in label.trim().to_lowercase().chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            out.push('-');
            pending_space = false;
        }
        if is_allowed(c) {
            out.push(c);
        }
    }

    let mut collapsed = String::with_capacity(out.len());
    for c in out.chars() {
        if c == '-' && collapsed.ends_with('-') {
            continue;
        }
        collapsed.push(c);
    }

    let trimmed = collapsed.trim_matches('-');
    if trimmed.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Per-build region label → slug table.
#[derive(Debug, Default)]
pub struct RegionSlugs {
    slugs: BTreeMap<String, String>,
    collisions: Vec<(String, String)>,
}

impl RegionSlugs {
    /// Assign slugs to `labels`. Labels are processed in sorted order so the
    /// result does not depend on input order.
    pub fn assign<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let sorted: std::collections::BTreeSet<&str> = labels.into_iter().collect();
        let mut taken = HashSet::new();
        let mut table = RegionSlugs::default();

        for label in sorted {
            let base = slugify(label);
            let mut slug = base.clone();
            let mut n = 2;
            while taken.contains(&slug) {
                slug = format!("{base}-{n}");
                n += 1;
            }
            if slug != base {
                tracing::warn!(region = label, slug = %slug, "region slug collision, suffix added");
                table.collisions.push((label.to_string(), slug.clone()));
            }
            taken.insert(slug.clone());
            table.slugs.insert(label.to_string(), slug);
        }
        table
    }

    /// Slug for a region label. Labels not seen by [`assign`](Self::assign)
    /// fall back to plain [`slugify`].
    pub fn get(&self, label: &str) -> String {
        self.slugs
            .get(label)
            .cloned()
            .unwrap_or_else(|| slugify(label))
    }

    /// `(label, suffixed slug)` for every label that needed disambiguation.
    pub fn collisions(&self) -> &[(String, String)] {
        &self.collisions
    }
}
