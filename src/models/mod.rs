//! Data Models
//!
//! Configuration structures for the indexer. Document and index types live
//! in the `docs-index-core` crate.

pub mod settings;

pub use settings::*;
