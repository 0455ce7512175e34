//! Settings Models
//!
//! Indexer configuration stored in `docs-index.toml` at the corpus root,
//! plus the partial update applied from command-line flags.

use std::path::PathBuf;

use docs_index_core::IndexOverride;
use serde::{Deserialize, Serialize};

/// Default freshness threshold in days
pub const DEFAULT_STALE_DAYS: u32 = 90;

/// Directories skipped during the walk (in addition to hidden ones)
pub const DEFAULT_IGNORED_DIRS: &[&str] = &[
    "node_modules",
    "target",
    "dist",
    "build",
    ".next",
    "__pycache__",
    "venv",
    ".venv",
    "vendor",
];

/// Indexer configuration stored in docs-index.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexSettings {
    /// Documents not updated for more than this many days are stale
    #[serde(default = "default_stale_days")]
    pub stale_days: u32,
    /// Treat broken links as fatal (exit code 2)
    #[serde(default)]
    pub strict_links: bool,
    /// Rendered Markdown index; stdout when unset
    #[serde(default)]
    pub output: Option<PathBuf>,
    /// Structured JSON index
    #[serde(default)]
    pub json_output: Option<PathBuf>,
    /// Honour .gitignore / .ignore files during the walk
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,
    /// Follow symbolic links during the walk
    #[serde(default)]
    pub follow_links: bool,
    #[serde(default = "default_ignored_dirs")]
    pub ignore_dirs: Vec<String>,
    /// Missing-docs checklist: category names, path prefixes or `tag:<name>`
    #[serde(default)]
    pub expected: Vec<String>,
    /// Manually curated entries, keyed by document path
    #[serde(default)]
    pub overrides: Vec<IndexOverride>,
    /// Report SKILL.md files missing Overview/Best Practices, code or a checklist
    #[serde(default)]
    pub check_structure: bool,
}

fn default_stale_days() -> u32 {
    DEFAULT_STALE_DAYS
}

fn default_true() -> bool {
    true
}

fn default_ignored_dirs() -> Vec<String> {
    DEFAULT_IGNORED_DIRS.iter().map(|d| d.to_string()).collect()
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            stale_days: DEFAULT_STALE_DAYS,
            strict_links: false,
            output: None,
            json_output: None,
            respect_gitignore: true,
            follow_links: false,
            ignore_dirs: default_ignored_dirs(),
            expected: Vec::new(),
            overrides: Vec::new(),
            check_structure: false,
        }
    }
}

/// Settings update from the command line (partial update)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsUpdate {
    pub stale_days: Option<u32>,
    pub strict_links: Option<bool>,
    pub output: Option<PathBuf>,
    pub json_output: Option<PathBuf>,
    pub check_structure: Option<bool>,
}

impl IndexSettings {
    /// Apply a partial update to the configuration
    pub fn apply_update(&mut self, update: SettingsUpdate) {
        if let Some(stale_days) = update.stale_days {
            self.stale_days = stale_days;
        }
        if let Some(strict) = update.strict_links {
            self.strict_links = strict;
        }
        if let Some(output) = update.output {
            self.output = Some(output);
        }
        if let Some(json_output) = update.json_output {
            self.json_output = Some(json_output);
        }
        if let Some(check) = update.check_structure {
            self.check_structure = check;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if let Some(idx) = self.overrides.iter().position(|o| o.path.trim().is_empty()) {
            return Err(format!("overrides[{}] has an empty path", idx));
        }
        if self.expected.iter().any(|e| e.trim().is_empty()) {
            return Err("expected contains an empty entry".to_string());
        }
        Ok(())
    }
}
