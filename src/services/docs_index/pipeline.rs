//! Index Pipeline
//!
//! Scanner -> Extractor -> Index Builder -> Link Validator, run once per
//! invocation. Nothing here writes output; callers render the `IndexBuild`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use docs_index_core::{DocsIndex, Document, ExtractionWarning, LinkReport};

use crate::models::settings::IndexSettings;
use crate::services::docs_index::builder::{build_index, IndexOptions};
use crate::services::docs_index::extractor::build_document;
use crate::services::docs_index::links::validate_links;
use crate::services::docs_index::scanner::{DocumentScanner, ScanOptions};
use crate::utils::error::{AppError, AppResult};

/// Everything one build produced
#[derive(Debug, Clone)]
pub struct IndexBuild {
    /// Sorted by path
    pub documents: Vec<Document>,
    pub index: DocsIndex,
    pub links: LinkReport,
}

impl IndexBuild {
    pub fn warning_count(&self) -> usize {
        self.documents.iter().filter(|d| d.has_warnings()).count()
    }
}

/// Scan and parse every document under the scanner's root.
///
/// Fails with `DuplicatePath` when two walked entries are the same file or
/// map to the same logical path (possible when following symlinks).
pub fn collect_documents(scanner: &DocumentScanner) -> AppResult<Vec<Document>> {
    let mut by_logical: BTreeMap<String, PathBuf> = BTreeMap::new();
    let mut by_canonical: BTreeMap<PathBuf, String> = BTreeMap::new();
    let mut documents = Vec::new();

    for file in scanner.scan() {
        if let Some(first) = by_logical.get(&file.logical_path) {
            return Err(AppError::DuplicatePath {
                path: file.logical_path,
                first: first.clone(),
                second: file.path,
            });
        }
        let canonical = std::fs::canonicalize(&file.path).unwrap_or_else(|_| file.path.clone());
        if let Some(first_logical) = by_canonical.get(&canonical) {
            return Err(AppError::DuplicatePath {
                path: first_logical.clone(),
                first: scanner.root().join(first_logical),
                second: file.path,
            });
        }

        let mut doc = build_document(&file.logical_path, &file.content);
        if file.invalid_utf8 {
            doc.warnings
                .push(ExtractionWarning::new("content is not valid UTF-8"));
        }
        for warning in &doc.warnings {
            tracing::warn!("{}: {}", doc.path, warning);
        }

        by_canonical.insert(canonical, file.logical_path.clone());
        by_logical.insert(file.logical_path, file.path);
        documents.push(doc);
    }

    documents.sort_by(|a, b| a.path.cmp(&b.path));
    tracing::debug!(
        "Collected {} documents under {}",
        documents.len(),
        scanner.root().display()
    );
    Ok(documents)
}

/// Run the whole pipeline for `root`.
pub fn run_pipeline(root: &Path, settings: &IndexSettings, today: NaiveDate) -> AppResult<IndexBuild> {
    let scanner = DocumentScanner::new(root, ScanOptions::from(settings))?;
    let documents = collect_documents(&scanner)?;
    let index = build_index(&documents, &IndexOptions::from_settings(settings, today))?;
    let links = validate_links(&documents);

    Ok(IndexBuild {
        documents,
        index,
        links,
    })
}
