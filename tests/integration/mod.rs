//! Integration Tests Module
//!
//! End-to-end tests of the docs-index pipeline against temporary
//! documentation trees: index contents, rendering, link checking, the
//! command's exit codes, configuration and statistics.


// Index contents and determinism
mod index_test;

// Cross-reference validation
mod links_test;

// Command line runs, exit codes and outputs
mod command_test;

// docs-index.toml handling and overrides
mod config_test;

// Corpus statistics
mod stats_test;
