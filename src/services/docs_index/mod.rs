//! Documentation Index
//!
//! Builds a navigable index of a Markdown documentation tree.
//!
//! Architecture:
//! - config.rs:    Load docs-index.toml
//! - scanner.rs:   Gitignore-aware walk yielding Markdown files
//! - extractor.rs: Front-matter parser with body fallbacks
//! - overrides.rs: Merge manually curated fields over derived entries
//! - builder.rs:   Category/tag grouping, stale and missing reports
//! - links.rs:     Cross-reference validation
//! - render.rs:    Markdown and JSON output
//! - stats.rs:     Corpus statistics report
//! - pipeline.rs:  One build from root to `IndexBuild`

pub mod builder;
pub mod config;
pub mod extractor;
pub mod links;
pub mod overrides;
pub mod pipeline;
pub mod render;
pub mod scanner;
pub mod stats;

pub use builder::{build_index, IndexOptions};
pub use config::{load_settings, CONFIG_FILE_NAME};
pub use extractor::{build_document, extract_metadata};
pub use links::{enforce_link_policy, validate_links};
pub use overrides::apply_overrides;
pub use pipeline::{collect_documents, run_pipeline, IndexBuild};
pub use render::{render_json, render_markdown};
pub use scanner::{DocumentScanner, ScanOptions, ScannedFile};
pub use stats::{compute_stats, render_stats, CorpusStats};
