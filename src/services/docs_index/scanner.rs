//! Document Scanner
//!
//! Walks the corpus with ripgrep's walker and yields every Markdown file.
//! Each call to `scan()` performs a fresh traversal; the yield order depends
//! on the platform, so consumers sort explicitly.
//!
//! The indexer's own output files are never yielded, even when they are
//! written inside the root.

use std::fs;
use std::path::{Path, PathBuf};

use ignore::{Walk, WalkBuilder};

use crate::models::settings::IndexSettings;
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::logical_path;

/// Walk behaviour, derived from `IndexSettings`
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub respect_gitignore: bool,
    pub follow_links: bool,
    pub ignore_dirs: Vec<String>,
    /// Files never yielded (the configured outputs)
    pub exclude: Vec<PathBuf>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::from(&IndexSettings::default())
    }
}

impl From<&IndexSettings> for ScanOptions {
    fn from(settings: &IndexSettings) -> Self {
        Self {
            respect_gitignore: settings.respect_gitignore,
            follow_links: settings.follow_links,
            ignore_dirs: settings.ignore_dirs.clone(),
            exclude: settings
                .output
                .iter()
                .chain(settings.json_output.iter())
                .cloned()
                .collect(),
        }
    }
}

/// A Markdown file read from disk
#[derive(Debug, Clone)]
pub struct ScannedFile {
    /// Filesystem path as walked
    pub path: PathBuf,
    /// Root-relative, `/`-separated
    pub logical_path: String,
    pub content: String,
    /// The bytes were not valid UTF-8 and were decoded lossily
    pub invalid_utf8: bool,
}

/// Scanner over one corpus root
#[derive(Debug, Clone)]
pub struct DocumentScanner {
    root: PathBuf,
    options: ScanOptions,
}

impl DocumentScanner {
    /// Fails with `RootNotFound` unless `root` is a readable directory.
    pub fn new(root: impl AsRef<Path>, options: ScanOptions) -> AppResult<Self> {
        let root = root.as_ref();
        let is_dir = fs::metadata(root).map(|m| m.is_dir()).unwrap_or(false);
        if !is_dir || fs::read_dir(root).is_err() {
            return Err(AppError::root_not_found(root));
        }
        Ok(Self {
            root: root.to_path_buf(),
            options,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Start a new traversal.
    pub fn scan(&self) -> ScanIter<'_> {
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(true)
            .follow_links(self.options.follow_links)
            .git_ignore(self.options.respect_gitignore)
            .git_exclude(self.options.respect_gitignore)
            .ignore(self.options.respect_gitignore)
            .parents(self.options.respect_gitignore)
            .git_global(false)
            .require_git(false);

        let ignored = self.options.ignore_dirs.clone();
        builder.filter_entry(move |entry| {
            if entry.depth() == 0 {
                return true;
            }
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if !is_dir {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            !ignored.iter().any(|d| d.as_str() == name.as_ref())
        });

        // Outputs that do not exist yet cannot be walked into
        let excluded = self
            .options
            .exclude
            .iter()
            .filter_map(|p| fs::canonicalize(p).ok())
            .collect();

        ScanIter {
            walk: builder.build(),
            root: &self.root,
            excluded,
        }
    }
}

/// Lazy iterator over the Markdown files of one traversal
pub struct ScanIter<'a> {
    walk: Walk,
    root: &'a Path,
    /// Canonical paths of the excluded files
    excluded: Vec<PathBuf>,
}

impl ScanIter<'_> {
    fn is_excluded(&self, path: &Path) -> bool {
        if self.excluded.is_empty() {
            return false;
        }
        fs::canonicalize(path)
            .map(|canonical| self.excluded.contains(&canonical))
            .unwrap_or(false)
    }
}

impl Iterator for ScanIter<'_> {
    type Item = ScannedFile;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walk.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if !is_file || !is_markdown(entry.path()) {
                continue;
            }
            if self.is_excluded(entry.path()) {
                tracing::debug!("Skipping output file {}", entry.path().display());
                continue;
            }

            let Ok(rel) = entry.path().strip_prefix(self.root) else {
                continue;
            };
            let logical = logical_path(rel);
            if logical.is_empty() {
                continue;
            }

            match fs::read(entry.path()) {
                Ok(bytes) => {
                    let (content, invalid_utf8) = match String::from_utf8(bytes) {
                        Ok(content) => (content, false),
                        Err(e) => (String::from_utf8_lossy(e.as_bytes()).into_owned(), true),
                    };
                    return Some(ScannedFile {
                        path: entry.path().to_path_buf(),
                        logical_path: logical,
                        content,
                        invalid_utf8,
                    });
                }
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", entry.path().display(), e);
                }
            }
        }
    }
}

/// Markdown files only (`.md`, any case)
pub fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("md"))
        .unwrap_or(false)
}
