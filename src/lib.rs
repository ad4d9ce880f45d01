//! # Parking Site
//!
//! A static site generator for public parking-facility open data. Drop the
//! latest export from a public-data portal into `data/`, run `build`, and
//! publish `site/` to any static host.
//!
//! # Architecture: Load, Stage, Commit
//!
//! ```text
//! 1. Load      data/*.csv + site_template/  →  Records, Renderer   (read-only)
//! 2. Generate  Records                      →  .site.staging/      (pages, feed, sitemap)
//! 3. Commit    .site.staging/               →  site/               (swap)
//! ```
//!
//! Every input is read and validated before anything on disk changes, and
//! the output directory is only replaced once a complete site has been
//! staged. A failed build leaves the previous site untouched.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`columns`] | Header row → field index mapping, with keyword and alias rules |
//! | [`load`] | Encoding detection, CSV parsing, field defaults, content ids |
//! | [`types`] | The [`types::Record`] shared by every stage and the JSON feed |
//! | [`slug`] | Region label → URL path segment, with collision suffixes |
//! | [`config`] | `config.toml` / `config.json` loading and validation |
//! | [`render`] | `{{PLACEHOLDER}}` substitution into the site template, ad blocks |
//! | [`generate`] | Page content (Maud) for every page kind, plus the data feed |
//! | [`search`] | Landing-page filter: the embedded script and its Rust twin |
//! | [`sitemap`] | `sitemap.xml` / `robots.txt` from the staged pages |
//! | [`writer`] | Staging directory, file writes, atomic commit |
//! | [`pipeline`] | The full build and its [`pipeline::BuildReport`] |
//! | [`output`] | CLI output formatting for build, check and search |
//!
//! # Design Decisions
//!
//! ## Content-Derived IDs
//!
//! Detail pages live at `/p/<id>/`, where the id is a truncated SHA-256 of
//! the record's region, name, address and coordinates. Refreshing the dataset
//! keeps URLs stable for unchanged facilities; row order does not matter.
//!
//! ## Maud For Fragments, Template For The Shell
//!
//! The page shell (head, header, footer, styles) is a plain HTML file the
//! site owner edits freely. Everything inside `{{CONTENT}}` is built with
//! [Maud](https://maud.lambda.xyz/), so all text from the source table is
//! escaped at the point it enters the page.
//!
//! ## Client-Side Search
//!
//! The landing page ships no table rows. A small script fetches
//! `/data/parking.json` and filters it in the browser, which keeps the page
//! light no matter how large the dataset grows.

pub mod columns;
pub mod config;
pub mod generate;
pub mod load;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod search;
pub mod sitemap;
pub mod slug;
pub mod types;
pub mod writer;

#[cfg(test)]
pub(crate) mod test_helpers;
