//! Link Validator
//!
//! Resolves `related` entries and inline Markdown links against the set of
//! indexed document paths. Resolution is lexical: the filesystem is not
//! consulted again, so a link is valid exactly when it names a scanned document.

use std::collections::BTreeSet;

use docs_index_core::{Document, LinkEdge, LinkOrigin, LinkReport, LinkStatus};

use crate::services::docs_index::extractor::{is_external, strip_fragment};
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::{parent_dir, resolve_logical};

/// Files that stand in for a folder when a link points at the folder itself
const FOLDER_INDEX_FILES: &[&str] = &["SKILL.md", "README.md", "index.md"];

/// Check every cross-reference of `documents`.
///
/// Edges are ordered by source path, related entries before inline links,
/// each in authored order.
pub fn validate_links(documents: &[Document]) -> LinkReport {
    let known: BTreeSet<&str> = documents.iter().map(|d| d.path.as_str()).collect();

    let mut sources: Vec<&Document> = documents.iter().collect();
    sources.sort_by(|a, b| a.path.cmp(&b.path));

    let mut edges = Vec::new();
    for doc in sources {
        let declared = doc
            .related
            .iter()
            .map(|t| (t, LinkOrigin::Related))
            .chain(doc.links.iter().map(|t| (t, LinkOrigin::Inline)));

        for (target, origin) in declared {
            let Some(edge) = check_link(&known, &doc.path, target, origin) else {
                continue;
            };
            if edge.is_broken() {
                tracing::warn!("Broken link in {}: {}", edge.source, edge.target);
            }
            edges.push(edge);
        }
    }

    LinkReport { edges }
}

/// `None` for targets that are not document references (URLs, bare anchors).
fn check_link(
    known: &BTreeSet<&str>,
    source: &str,
    target: &str,
    origin: LinkOrigin,
) -> Option<LinkEdge> {
    let trimmed = target.trim();
    if trimmed.is_empty() || is_external(trimmed) {
        return None;
    }
    let path = strip_fragment(trimmed);
    if path.is_empty() {
        return None;
    }

    let resolved = resolve_target(known, source, path);
    let status = if resolved.is_some() {
        LinkStatus::Valid
    } else {
        LinkStatus::Broken
    };

    Some(LinkEdge {
        source: source.to_string(),
        target: target.to_string(),
        origin,
        resolved,
        status,
    })
}

/// Relative to the source's folder first, then relative to the root.
/// A target that climbs above the root never resolves.
fn resolve_target(known: &BTreeSet<&str>, source: &str, path: &str) -> Option<String> {
    let from_source = resolve_logical(parent_dir(source), path)?;
    if let Some(found) = lookup(known, &from_source) {
        return Some(found);
    }
    let from_root = resolve_logical("", path)?;
    lookup(known, &from_root)
}

fn lookup(known: &BTreeSet<&str>, candidate: &str) -> Option<String> {
    if known.contains(candidate) {
        return Some(candidate.to_string());
    }
    FOLDER_INDEX_FILES
        .iter()
        .map(|file| format!("{}/{}", candidate, file))
        .find(|path| known.contains(path.as_str()))
}

/// Turn broken links into a `BrokenLinks` error when links are strict.
pub fn enforce_link_policy(report: &LinkReport, strict: bool) -> AppResult<()> {
    let count = report.broken_count();
    if strict && count > 0 {
        return Err(AppError::BrokenLinks { count });
    }
    Ok(())
}
