//! Services
//!
//! Business logic services for the application.
//! Services handle the core functionality and are called by commands.

pub mod docs_index;

pub use docs_index::{run_pipeline, DocumentScanner, IndexBuild};
