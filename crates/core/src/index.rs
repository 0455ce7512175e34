//! Index Types
//!
//! The derived, rebuildable lookup structure built from a document set, plus
//! the manually curated overrides merged into it.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::document::{Audience, DocStatus};

/// One row of the generated index, summarizing a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub path: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
    pub audience: Audience,
    pub status: DocStatus,
    pub updated: Option<NaiveDate>,
    pub age_days: Option<i64>,
    /// Undated or older than the freshness threshold
    pub stale: bool,
    /// Metadata could not be read cleanly
    pub has_warnings: bool,
    /// At least one field came from a manual override
    pub curated: bool,
    /// SHA-256 of the source file, for change detection by consumers
    pub hash: String,
}

/// All entries of one category, sorted by path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub name: String,
    pub ordinal: Option<u32>,
    pub entries: Vec<IndexEntry>,
}

/// Reference from a tag listing to a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRef {
    pub path: String,
    pub title: String,
}

/// All documents carrying one tag, sorted by title then path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagGroup {
    pub tag: String,
    pub documents: Vec<TagRef>,
}

/// Row of the stale-docs report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaleDoc {
    pub path: String,
    pub title: String,
    pub updated: Option<NaiveDate>,
    pub age_days: Option<i64>,
}

/// A checklist item with no matching document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingDoc {
    pub expected: String,
}

/// A skill document missing parts of the expected layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureIssue {
    pub path: String,
    pub title: String,
    /// Human-readable problems, e.g. `missing section 'Overview'`
    pub problems: Vec<String>,
}

/// Manually curated values for one document. `None` keeps the derived value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexOverride {
    pub path: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub audience: Option<Audience>,
    #[serde(default)]
    pub status: Option<DocStatus>,
    /// Either a quoted `"2024-03-01"` or a native TOML date
    #[serde(default, deserialize_with = "deserialize_override_date")]
    pub updated: Option<NaiveDate>,
}

impl IndexOverride {
    /// Whether the override sets any field at all
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.tags.is_none()
            && self.audience.is_none()
            && self.status.is_none()
            && self.updated.is_none()
    }
}

fn deserialize_override_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum DateValue {
        Text(String),
        Native(toml::value::Datetime),
    }

    let date = match Option::<DateValue>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(DateValue::Text(text)) => NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
            .map_err(|_| {
                serde::de::Error::custom(format!("invalid date '{}', expected YYYY-MM-DD", text))
            })?,
        Some(DateValue::Native(datetime)) => {
            let date = datetime.date.ok_or_else(|| {
                serde::de::Error::custom(format!("'{}' has no date part", datetime))
            })?;
            NaiveDate::from_ymd_opt(i32::from(date.year), u32::from(date.month), u32::from(date.day))
                .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", datetime)))?
        }
    };
    Ok(Some(date))
}

/// The complete generated index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocsIndex {
    /// Date staleness was evaluated against
    pub generated_on: NaiveDate,
    pub stale_days: u32,
    /// Sorted by ordinal, unnumbered categories last, ties by name
    pub categories: Vec<CategoryGroup>,
    /// Sorted alphabetically
    pub tags: Vec<TagGroup>,
    /// Undated first, then oldest first
    pub stale: Vec<StaleDoc>,
    /// In checklist order
    pub missing: Vec<MissingDoc>,
    /// Override paths that matched no document
    pub unmatched_overrides: Vec<String>,
    /// Skill layout problems, sorted by path; empty unless structure checks are on
    pub structure_issues: Vec<StructureIssue>,
}

impl DocsIndex {
    pub fn document_count(&self) -> usize {
        self.categories.iter().map(|c| c.entries.len()).sum()
    }

    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.categories.iter().flat_map(|c| c.entries.iter())
    }

    pub fn entry(&self, path: &str) -> Option<&IndexEntry> {
        self.entries().find(|e| e.path == path)
    }

    pub fn category(&self, name: &str) -> Option<&CategoryGroup> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn tag(&self, tag: &str) -> Option<&TagGroup> {
        self.tags.iter().find(|t| t.tag == tag)
    }

    pub fn warning_count(&self) -> usize {
        self.entries().filter(|e| e.has_warnings).count()
    }
}
