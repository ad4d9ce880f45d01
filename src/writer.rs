//! Output directory management.
//!
//! Pages are never written straight into the output directory. A
//! [`SiteWriter`] stages the whole site in a sibling directory
//! (`.<output>.staging`), and [`SiteWriter::commit`] swaps it into place only
//! after every file was written. Until then the previous build stays
//! untouched, so a failed run never leaves a half-written or emptied site
//! behind.
//!
//! ```text
//! public/
//! ├── site/                 # previous good build, served until commit
//! ├── .site.staging/        # this build, reset when the writer starts
//! └── .site.old/            # previous build, only while commit swaps
//! ```
//!
//! The swap is two renames: the old site moves aside to `.<output>.old`, then
//! staging moves into place. If the second rename fails the old site is moved
//! back. The old tree is deleted only after the new one is in place.
//!
//! Dropping a writer without committing removes the staging directory.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Output path has no directory name: {0}")]
    InvalidOutput(PathBuf),
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> WriteError + '_ {
    move |source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// File every generated page directory contains.
pub const PAGE_MARKER: &str = "index.html";

/// Build context for one run: all writes land in a staging directory.
#[derive(Debug)]
pub struct SiteWriter {
    output_dir: PathBuf,
    staging_dir: PathBuf,
    backup_dir: PathBuf,
    files_written: usize,
    committed: bool,
}

impl SiteWriter {
    /// Reset the staging directory next to `output_dir` and start a build.
    pub fn begin(output_dir: &Path) -> Result<Self, WriteError> {
        let name = output_dir
            .file_name()
            .ok_or_else(|| WriteError::InvalidOutput(output_dir.to_path_buf()))?;
        let name = name.to_string_lossy();
        let staging_dir = output_dir.with_file_name(format!(".{name}.staging"));
        let backup_dir = output_dir.with_file_name(format!(".{name}.old"));

        if staging_dir.exists() {
            fs::remove_dir_all(&staging_dir).map_err(io_err(&staging_dir))?;
        }
        fs::create_dir_all(&staging_dir).map_err(io_err(&staging_dir))?;
        tracing::debug!(staging = %staging_dir.display(), "staging directory ready");

        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            staging_dir,
            backup_dir,
            files_written: 0,
            committed: false,
        })
    }

    /// Directory the current build writes into.
    pub fn root(&self) -> &Path {
        &self.staging_dir
    }

    pub fn files_written(&self) -> usize {
        self.files_written
    }

    /// Write `contents` to `rel_path` under the staging root, creating parents.
    pub fn write(&mut self, rel_path: &str, contents: impl AsRef<[u8]>) -> Result<(), WriteError> {
        let path = self.staging_dir.join(rel_path.trim_start_matches('/'));
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err(parent))?;
        }
        fs::write(&path, contents).map_err(io_err(&path))?;
        self.files_written += 1;
        tracing::debug!(path = rel_path, "wrote file");
        Ok(())
    }

    /// Write a page to `<dir>/index.html`. `dir` is a site path such as
    /// `/regions/서울/`; `/` is the site root.
    pub fn write_page(&mut self, dir: &str, html: &str) -> Result<(), WriteError> {
        let dir = dir.trim_matches('/');
        let rel = if dir.is_empty() {
            PAGE_MARKER.to_string()
        } else {
            format!("{dir}/{PAGE_MARKER}")
        };
        self.write(&rel, html)
    }

    /// Copy every file under `src` into `rel_dir` of the staging root.
    ///
    /// A missing `src` is not an error; templates without assets are fine.
    /// Returns the number of files copied.
    pub fn copy_tree(&mut self, src: &Path, rel_dir: &str) -> Result<usize, WriteError> {
        if !src.is_dir() {
            return Ok(0);
        }
        let dst_root = self.staging_dir.join(rel_dir);
        let mut copied = 0;
        for entry in WalkDir::new(src).min_depth(1) {
            let entry = entry?;
            let Ok(rel) = entry.path().strip_prefix(src) else {
                continue;
            };
            let dst = dst_root.join(rel);
            if entry.file_type().is_dir() {
                fs::create_dir_all(&dst).map_err(io_err(&dst))?;
            } else if entry.file_type().is_file() {
                if let Some(parent) = dst.parent() {
                    fs::create_dir_all(parent).map_err(io_err(parent))?;
                }
                fs::copy(entry.path(), &dst).map_err(io_err(&dst))?;
                copied += 1;
            }
        }
        self.files_written += copied;
        Ok(copied)
    }

    /// Replace the output directory with the staged build.
    ///
    /// On error the previous output is still in place, unchanged.
    pub fn commit(mut self) -> Result<PathBuf, WriteError> {
        // Left behind by a run that died mid-swap.
        if self.backup_dir.exists() {
            if self.output_dir.exists() {
                fs::remove_dir_all(&self.backup_dir).map_err(io_err(&self.backup_dir))?;
            } else {
                fs::rename(&self.backup_dir, &self.output_dir).map_err(io_err(&self.backup_dir))?;
            }
        }

        let had_previous = self.output_dir.exists();
        if had_previous {
            fs::rename(&self.output_dir, &self.backup_dir).map_err(io_err(&self.output_dir))?;
        }

        if let Err(source) = fs::rename(&self.staging_dir, &self.output_dir) {
            if had_previous {
                if let Err(e) = fs::rename(&self.backup_dir, &self.output_dir) {
                    tracing::error!(
                        backup = %self.backup_dir.display(),
                        error = %e,
                        "could not restore previous output"
                    );
                }
            }
            return Err(WriteError::Io {
                path: self.output_dir.clone(),
                source,
            });
        }
        self.committed = true;

        if had_previous {
            if let Err(e) = fs::remove_dir_all(&self.backup_dir) {
                tracing::warn!(backup = %self.backup_dir.display(), error = %e, "could not remove previous output");
            }
        }
        tracing::info!(output = %self.output_dir.display(), files = self.files_written, "site committed");
        Ok(self.output_dir.clone())
    }
}

impl Drop for SiteWriter {
    fn drop(&mut self) {
        if !self.committed && self.staging_dir.exists() {
            if let Err(e) = fs::remove_dir_all(&self.staging_dir) {
                tracing::warn!(staging = %self.staging_dir.display(), error = %e, "could not remove staging directory");
            }
        }
    }
}
