//! Commands
//!
//! Command-line entry points. Each command parses its arguments, calls into
//! the services and maps the result to an exit code.

pub mod index;

pub use index::*;
