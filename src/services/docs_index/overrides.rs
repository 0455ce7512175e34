//! Manual Overrides
//!
//! Overlays curated values from `[[overrides]]` onto the derived entries.
//! Each field set in an override replaces the derived value; unset fields keep
//! what was extracted from the document.

use std::collections::BTreeMap;

use docs_index_core::{IndexEntry, IndexOverride};

use crate::utils::paths::normalize_rel_path;

/// Apply `overrides` to `entries` in place.
///
/// Returns the override paths that matched no entry, sorted.
/// When several overrides name the same path they are applied in order.
pub fn apply_overrides(entries: &mut [IndexEntry], overrides: &[IndexOverride]) -> Vec<String> {
    let positions: BTreeMap<String, usize> = entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| (entry.path.clone(), idx))
        .collect();

    let mut unmatched = Vec::new();
    for ov in overrides {
        let path = normalize_rel_path(&ov.path);
        let Some(&idx) = positions.get(&path) else {
            tracing::warn!("Override for '{}' matches no document", ov.path);
            unmatched.push(path);
            continue;
        };
        if ov.is_empty() {
            continue;
        }
        merge_override(&mut entries[idx], ov);
    }

    unmatched.sort();
    unmatched.dedup();
    unmatched
}

fn merge_override(entry: &mut IndexEntry, ov: &IndexOverride) {
    if let Some(title) = &ov.title {
        entry.title = title.clone();
    }
    if let Some(description) = &ov.description {
        entry.description = description.clone();
    }
    if let Some(tags) = &ov.tags {
        let mut tags: Vec<String> = tags
            .iter()
            .map(|t| t.trim().trim_start_matches('#').to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        tags.sort();
        tags.dedup();
        entry.tags = tags;
    }
    if let Some(audience) = ov.audience {
        entry.audience = audience;
    }
    if let Some(status) = ov.status {
        entry.status = status;
    }
    if let Some(updated) = ov.updated {
        entry.updated = Some(updated);
    }
    entry.curated = true;
}
