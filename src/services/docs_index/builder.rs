//! Index Builder
//!
//! Turns the document set into a `DocsIndex`: one entry per document, grouped
//! by category and by tag, plus the stale-docs, missing-docs and (optionally)
//! skill-structure reports.
//!
//! The build is a pure function of its inputs. Every collection is put in a
//! fixed order here so that rendering twice gives identical bytes.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use docs_index_core::{
    Category, CategoryGroup, DocsIndex, Document, IndexEntry, IndexOverride, MissingDoc,
    StaleDoc, StructureIssue, TagGroup, TagRef,
};

use crate::models::settings::{IndexSettings, DEFAULT_STALE_DAYS};
use crate::services::docs_index::overrides::apply_overrides;
use crate::utils::error::{AppError, AppResult};

/// Inputs of a build besides the documents themselves
#[derive(Debug, Clone)]
pub struct IndexOptions {
    /// Date staleness is measured against
    pub today: NaiveDate,
    pub stale_days: u32,
    /// Missing-docs checklist
    pub expected: Vec<String>,
    pub overrides: Vec<IndexOverride>,
    /// Report skill documents missing required sections, examples or a checklist
    pub check_structure: bool,
}

impl IndexOptions {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            stale_days: DEFAULT_STALE_DAYS,
            expected: Vec::new(),
            overrides: Vec::new(),
            check_structure: false,
        }
    }

    pub fn from_settings(settings: &IndexSettings, today: NaiveDate) -> Self {
        Self {
            today,
            stale_days: settings.stale_days,
            expected: settings.expected.clone(),
            overrides: settings.overrides.clone(),
            check_structure: settings.check_structure,
        }
    }
}

/// Build the index for `documents`.
///
/// Fails only if two documents share a logical path.
pub fn build_index(documents: &[Document], options: &IndexOptions) -> AppResult<DocsIndex> {
    let mut seen = BTreeSet::new();
    for doc in documents {
        if !seen.insert(doc.path.as_str()) {
            return Err(AppError::DuplicateDocument {
                path: doc.path.clone(),
            });
        }
    }

    let mut entries: Vec<IndexEntry> = documents.iter().map(make_entry).collect();
    let unmatched_overrides = apply_overrides(&mut entries, &options.overrides);
    for entry in &mut entries {
        refresh_freshness(entry, options.today, options.stale_days);
    }
    entries.sort_by(|a, b| a.path.cmp(&b.path));

    let tags = group_by_tag(&entries);
    let stale = stale_report(&entries);
    let missing = missing_report(&entries, &options.expected);
    let structure_issues = if options.check_structure {
        structure_report(documents, &entries)
    } else {
        Vec::new()
    };
    let categories = group_by_category(entries);

    let index = DocsIndex {
        generated_on: options.today,
        stale_days: options.stale_days,
        categories,
        tags,
        stale,
        missing,
        unmatched_overrides,
        structure_issues,
    };

    tracing::debug!(
        "Built index: {} documents, {} categories, {} tags, {} stale",
        index.document_count(),
        index.categories.len(),
        index.tags.len(),
        index.stale.len()
    );

    Ok(index)
}

fn make_entry(doc: &Document) -> IndexEntry {
    IndexEntry {
        path: doc.path.clone(),
        title: doc.title.clone(),
        description: doc.description.clone(),
        category: doc.category().name,
        tags: doc.tags.clone(),
        audience: doc.audience,
        status: doc.status,
        updated: doc.updated,
        age_days: None,
        stale: true,
        has_warnings: doc.has_warnings(),
        curated: false,
        hash: doc.hash.clone(),
    }
}

/// Recompute age and stale flag after overrides may have changed `updated`.
fn refresh_freshness(entry: &mut IndexEntry, today: NaiveDate, stale_days: u32) {
    entry.age_days = entry.updated.map(|updated| (today - updated).num_days());
    entry.stale = match entry.age_days {
        Some(age) => age > i64::from(stale_days),
        None => true,
    };
}

/// Entries must already be sorted by path.
fn group_by_category(entries: Vec<IndexEntry>) -> Vec<CategoryGroup> {
    let mut groups: BTreeMap<Category, Vec<IndexEntry>> = BTreeMap::new();
    for entry in entries {
        groups
            .entry(Category::new(entry.category.clone()))
            .or_default()
            .push(entry);
    }
    groups
        .into_iter()
        .map(|(category, entries)| CategoryGroup {
            name: category.name,
            ordinal: category.ordinal,
            entries,
        })
        .collect()
}

fn group_by_tag(entries: &[IndexEntry]) -> Vec<TagGroup> {
    let mut groups: BTreeMap<&str, Vec<TagRef>> = BTreeMap::new();
    for entry in entries {
        for tag in &entry.tags {
            groups.entry(tag.as_str()).or_default().push(TagRef {
                path: entry.path.clone(),
                title: entry.title.clone(),
            });
        }
    }
    groups
        .into_iter()
        .map(|(tag, mut documents)| {
            documents.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.path.cmp(&b.path)));
            TagGroup {
                tag: tag.to_string(),
                documents,
            }
        })
        .collect()
}

/// Undated first, then oldest first; ties by path.
fn stale_report(entries: &[IndexEntry]) -> Vec<StaleDoc> {
    let mut stale: Vec<StaleDoc> = entries
        .iter()
        .filter(|e| e.stale)
        .map(|e| StaleDoc {
            path: e.path.clone(),
            title: e.title.clone(),
            updated: e.updated,
            age_days: e.age_days,
        })
        .collect();
    stale.sort_by_key(|s| {
        (
            s.age_days.is_some(),
            Reverse(s.age_days.unwrap_or(0)),
            s.path.clone(),
        )
    });
    stale
}

/// Checklist items no entry satisfies, in checklist order.
fn missing_report(entries: &[IndexEntry], expected: &[String]) -> Vec<MissingDoc> {
    let mut reported = BTreeSet::new();
    expected
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .filter(|item| !entries.iter().any(|e| satisfies(e, item)))
        .filter(|item| reported.insert(item.to_string()))
        .map(|item| MissingDoc {
            expected: item.to_string(),
        })
        .collect()
}

/// Skill documents with layout problems, by path. Titles come from the
/// (possibly curated) entries.
fn structure_report(documents: &[Document], entries: &[IndexEntry]) -> Vec<StructureIssue> {
    let titles: BTreeMap<&str, &str> = entries
        .iter()
        .map(|e| (e.path.as_str(), e.title.as_str()))
        .collect();
    let mut issues: Vec<StructureIssue> = documents
        .iter()
        .filter_map(|doc| {
            let problems = doc.structure.as_ref()?.problems();
            if problems.is_empty() {
                return None;
            }
            Some(StructureIssue {
                path: doc.path.clone(),
                title: titles
                    .get(doc.path.as_str())
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| doc.title.clone()),
                problems,
            })
        })
        .collect();
    issues.sort_by(|a, b| a.path.cmp(&b.path));
    issues
}

/// `tag:<name>`, a category name, an exact path, or a path prefix
fn satisfies(entry: &IndexEntry, item: &str) -> bool {
    if let Some(tag) = item.strip_prefix("tag:") {
        let tag = tag.trim().trim_start_matches('#').to_lowercase();
        return entry.tags.iter().any(|t| *t == tag);
    }
    let item = item.trim_start_matches("./").trim_end_matches('/');
    if item.is_empty() {
        return false;
    }
    entry.category == item
        || entry.path == item
        || entry
            .path
            .strip_prefix(item)
            .is_some_and(|rest| rest.starts_with('/'))
}
