//! Index Command
//!
//! The `docs-index` command line: flags, config merging, running the
//! pipeline and writing its outputs.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::Parser;

use crate::models::settings::SettingsUpdate;
use crate::services::docs_index::config::load_settings;
use crate::services::docs_index::links::enforce_link_policy;
use crate::services::docs_index::pipeline::run_pipeline;
use crate::services::docs_index::render::{render_json, render_markdown};
use crate::services::docs_index::stats::{compute_stats, render_stats};
use crate::utils::error::AppResult;
use crate::utils::paths::ensure_parent_dir;

#[derive(Debug, Clone, Parser)]
#[command(name = "docs-index")]
#[command(version)]
#[command(about = "Build a navigable index of a Markdown documentation tree", long_about = None)]
pub struct IndexArgs {
    /// Root of the documentation tree
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Documents not updated for more than this many days are stale [default: 90]
    #[arg(long, value_name = "DAYS")]
    pub stale_days: Option<u32>,

    /// Fail with exit code 2 when any link is broken [default: false]
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub strict_links: Option<bool>,

    /// Write the Markdown index here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Also write the index as JSON
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,

    /// Configuration file [default: <root>/docs-index.toml]
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print corpus statistics to stdout after the index
    #[arg(long)]
    pub stats: bool,

    /// Report SKILL.md files missing required sections, code examples or a checklist
    #[arg(long)]
    pub check_structure: bool,

    /// Evaluate staleness as of this date instead of today
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub as_of: Option<NaiveDate>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl IndexArgs {
    /// Arguments for `root` with every other flag at its default
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            stale_days: None,
            strict_links: None,
            output: None,
            json: None,
            config: None,
            stats: false,
            check_structure: false,
            as_of: None,
            verbose: false,
        }
    }

    /// Flags given on the command line, applied over the config file
    pub fn settings_update(&self) -> SettingsUpdate {
        SettingsUpdate {
            stale_days: self.stale_days,
            strict_links: self.strict_links,
            output: self.output.clone(),
            json_output: self.json.clone(),
            check_structure: self.check_structure.then_some(true),
        }
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub documents: usize,
    pub categories: usize,
    /// Documents whose metadata produced warnings
    pub warnings: usize,
    pub broken_links: usize,
    pub stale: usize,
    pub missing: usize,
    pub structure_issues: usize,
    /// Markdown destination; `None` for stdout
    pub output: Option<PathBuf>,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Indexed {} documents in {} categories ({} with warnings, {} broken links, {} stale, {} missing, {} structure issues)",
            self.documents,
            self.categories,
            self.warnings,
            self.broken_links,
            self.stale,
            self.missing,
            self.structure_issues
        )?;
        if let Some(output) = &self.output {
            write!(f, " -> {}", output.display())?;
        }
        Ok(())
    }
}

/// Run one indexing pass. Nothing is written unless the build succeeds.
pub fn run(args: &IndexArgs, today: NaiveDate) -> AppResult<RunSummary> {
    let mut settings = load_settings(&args.root, args.config.as_deref())?;
    settings.apply_update(args.settings_update());
    let today = args.as_of.unwrap_or(today);

    let build = run_pipeline(&args.root, &settings, today)?;
    enforce_link_policy(&build.links, settings.strict_links)?;

    let markdown = render_markdown(&build.index, &build.links);
    let json = match &settings.json_output {
        Some(_) => Some(render_json(&build.index, &build.links)?),
        None => None,
    };

    match &settings.output {
        Some(path) => write_file(path, &markdown)?,
        None => write_stdout(&markdown)?,
    }
    if let (Some(path), Some(json)) = (&settings.json_output, &json) {
        write_file(path, json)?;
    }
    if args.stats {
        let report = render_stats(&compute_stats(&build.documents), today);
        if settings.output.is_none() {
            write_stdout("\n")?;
        }
        write_stdout(&report)?;
    }

    Ok(RunSummary {
        documents: build.index.document_count(),
        categories: build.index.categories.len(),
        warnings: build.warning_count(),
        broken_links: build.links.broken_count(),
        stale: build.index.stale.len(),
        missing: build.index.missing.len(),
        structure_issues: build.index.structure_issues.len(),
        output: settings.output.clone(),
    })
}

/// Run and map the outcome to a process exit code, reporting on stderr.
pub fn execute(args: &IndexArgs, today: NaiveDate) -> i32 {
    match run(args, today) {
        Ok(summary) => {
            eprintln!("{}", summary);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

fn write_file(path: &Path, content: &str) -> AppResult<()> {
    ensure_parent_dir(path)?;
    fs::write(path, content)?;
    tracing::debug!("Wrote {}", path.display());
    Ok(())
}

fn write_stdout(content: &str) -> AppResult<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(content.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
