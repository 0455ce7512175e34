//! Docs Index Core
//!
//! Foundational data types for the docs-index workspace: documents and their
//! parsed metadata, the derived index, and link validation results. This crate
//! has no filesystem or CLI code; it only describes data.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`)
//! - `document` - `Document`, `Category`, `ParsedMetadata`, `SkillStructure` and the audience/status enums
//! - `index` - `DocsIndex`, `IndexEntry`, `IndexOverride` and the report rows
//! - `links` - `LinkEdge`, `LinkReport`
//!
//! ## Design Principles
//!
//! 1. **The filesystem is the source of truth** - every type here is a derived,
//!    rebuildable projection of the scanned tree
//! 2. **Deterministic ordering** - collections are stored pre-sorted so that
//!    serializing the same index twice yields identical bytes

pub mod document;
pub mod error;
pub mod index;
pub mod links;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::CoreError;

// ── Documents ──────────────────────────────────────────────────────────
pub use document::{
    is_skill_path, Audience, Category, DocStatus, Document, ExtractionWarning, MetadataFields,
    ParsedMetadata, SkillStructure, REQUIRED_SECTIONS,
};

// ── Index ──────────────────────────────────────────────────────────────
pub use index::{
    CategoryGroup, DocsIndex, IndexEntry, IndexOverride, MissingDoc, StaleDoc, StructureIssue,
    TagGroup, TagRef,
};

// ── Links ──────────────────────────────────────────────────────────────
pub use links::{LinkEdge, LinkOrigin, LinkReport, LinkStatus};
