//! Docs Index - Rust Library
//!
//! Builds a navigable index of a Markdown documentation tree.
//! It includes:
//! - The `docs-index` command handler
//! - The scan / extract / build / validate pipeline
//! - Settings models and utilities

pub mod commands;
pub mod models;
pub mod services;
pub mod utils;

// ── Commands ──
pub use commands::{execute, run, IndexArgs, RunSummary};

// ── Pipeline ──
pub use services::docs_index::{
    build_document, build_index, compute_stats, enforce_link_policy, extract_metadata,
    load_settings, render_json, render_markdown, render_stats, run_pipeline, validate_links,
    CorpusStats, DocumentScanner, IndexBuild, IndexOptions, ScanOptions,
};

// ── Models ──
pub use models::settings::{IndexSettings, SettingsUpdate};
pub use utils::error::{AppError, AppResult};

// ── Core types ──
pub use docs_index_core::{
    Audience, Category, DocStatus, DocsIndex, Document, IndexEntry, IndexOverride, LinkEdge,
    LinkReport, LinkStatus, ParsedMetadata,
};
