//! Document Types
//!
//! A `Document` is one Markdown file of the corpus together with the metadata
//! extracted from it. `ParsedMetadata` is the extractor's output: it is always
//! usable, and carries warnings when the front-matter could not be read cleanly.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Name of the category holding documents that sit directly under the root
pub const ROOT_CATEGORY: &str = "(root)";

/// Intended readership of a document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    Developer,
    Ops,
    Security,
    Product,
    #[default]
    All,
}

impl Audience {
    pub fn as_str(&self) -> &'static str {
        match self {
            Audience::Developer => "developer",
            Audience::Ops => "ops",
            Audience::Security => "security",
            Audience::Product => "product",
            Audience::All => "all",
        }
    }
}

impl FromStr for Audience {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "developer" | "developers" | "dev" | "engineering" => Ok(Audience::Developer),
            "ops" | "operations" | "devops" | "sre" => Ok(Audience::Ops),
            "security" | "secops" => Ok(Audience::Security),
            "product" | "pm" => Ok(Audience::Product),
            "all" | "everyone" => Ok(Audience::All),
            other => Err(CoreError::parse(format!("unknown audience '{}'", other))),
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocStatus {
    Draft,
    #[default]
    Current,
    Deprecated,
}

impl DocStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocStatus::Draft => "draft",
            DocStatus::Current => "current",
            DocStatus::Deprecated => "deprecated",
        }
    }
}

impl FromStr for DocStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" | "wip" => Ok(DocStatus::Draft),
            "current" | "active" | "stable" | "published" => Ok(DocStatus::Current),
            "deprecated" | "archived" | "obsolete" => Ok(DocStatus::Deprecated),
            other => Err(CoreError::parse(format!("unknown status '{}'", other))),
        }
    }
}

impl fmt::Display for DocStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal problem found while reading a document's metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionWarning {
    /// 1-based line number inside the file, when known
    pub line: Option<usize>,
    pub message: String,
}

impl ExtractionWarning {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            line: None,
            message: message.into(),
        }
    }

    pub fn at_line(line: usize, message: impl Into<String>) -> Self {
        Self {
            line: Some(line),
            message: message.into(),
        }
    }
}

impl fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {}: {}", line, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Fields recognized in front-matter (or inferred from the body)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub audience: Option<Audience>,
    pub status: Option<DocStatus>,
    pub updated: Option<NaiveDate>,
    pub related: Vec<String>,
}

/// Sections every skill document is expected to have
pub const REQUIRED_SECTIONS: &[&str] = &["Overview", "Best Practices"];

/// Layout of a skill document (`SKILL.md`): required sections, code examples
/// and a checklist
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillStructure {
    pub has_overview: bool,
    pub has_best_practices: bool,
    pub has_code_examples: bool,
    pub has_checklist: bool,
}

impl SkillStructure {
    /// Everything the document lacks, in a fixed order
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let sections = [self.has_overview, self.has_best_practices];
        for (name, present) in REQUIRED_SECTIONS.iter().zip(sections) {
            if !present {
                problems.push(format!("missing section '{}'", name));
            }
        }
        if !self.has_code_examples {
            problems.push("no code examples".to_string());
        }
        if !self.has_checklist {
            problems.push("no checklist".to_string());
        }
        problems
    }

    pub fn is_complete(&self) -> bool {
        self.has_overview && self.has_best_practices && self.has_code_examples && self.has_checklist
    }
}

/// Result of metadata extraction. Both variants yield a usable document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedMetadata {
    Complete(MetadataFields),
    Partial(MetadataFields, Vec<ExtractionWarning>),
}

impl ParsedMetadata {
    /// `Complete` when there are no warnings, `Partial` otherwise.
    pub fn from_parts(fields: MetadataFields, warnings: Vec<ExtractionWarning>) -> Self {
        if warnings.is_empty() {
            ParsedMetadata::Complete(fields)
        } else {
            ParsedMetadata::Partial(fields, warnings)
        }
    }

    pub fn fields(&self) -> &MetadataFields {
        match self {
            ParsedMetadata::Complete(fields) | ParsedMetadata::Partial(fields, _) => fields,
        }
    }

    pub fn warnings(&self) -> &[ExtractionWarning] {
        match self {
            ParsedMetadata::Complete(_) => &[],
            ParsedMetadata::Partial(_, warnings) => warnings,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, ParsedMetadata::Complete(_))
    }

    pub fn into_parts(self) -> (MetadataFields, Vec<ExtractionWarning>) {
        match self {
            ParsedMetadata::Complete(fields) => (fields, Vec::new()),
            ParsedMetadata::Partial(fields, warnings) => (fields, warnings),
        }
    }
}

/// A scanned and parsed Markdown document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Logical path relative to the root, `/`-separated (unique)
    pub path: String,
    pub title: String,
    pub description: String,
    /// Lowercase, sorted, deduplicated
    pub tags: Vec<String>,
    pub audience: Audience,
    pub status: DocStatus,
    pub updated: Option<NaiveDate>,
    /// `related` front-matter entries, in authored order
    pub related: Vec<String>,
    /// Relative Markdown links found in the body, in order of appearance
    pub links: Vec<String>,
    pub line_count: usize,
    /// Number of fenced code blocks
    pub code_examples: usize,
    /// SHA-256 of the raw file content (hex)
    pub hash: String,
    /// Layout checks, for `SKILL.md` files only
    pub structure: Option<SkillStructure>,
    pub warnings: Vec<ExtractionWarning>,
}

impl Document {
    pub fn category(&self) -> Category {
        Category::for_path(&self.path)
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Whether the file is a skill document (`SKILL.md`)
    pub fn is_skill(&self) -> bool {
        is_skill_path(&self.path)
    }

    /// Whole days between `updated` and `today`; `None` when undated.
    pub fn age_days(&self, today: NaiveDate) -> Option<i64> {
        self.updated.map(|updated| (today - updated).num_days())
    }

    /// Undated documents are always stale.
    pub fn is_stale(&self, today: NaiveDate, stale_days: u32) -> bool {
        match self.age_days(today) {
            Some(age) => age > i64::from(stale_days),
            None => true,
        }
    }
}

/// A top-level folder of the corpus, e.g. `45-developer-experience`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    /// Leading number of the folder name, used for ordering
    pub ordinal: Option<u32>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let ordinal = parse_ordinal(&name);
        Self { name, ordinal }
    }

    /// Category of a logical document path: its first path component, or
    /// the root category for files directly under the root.
    pub fn for_path(path: &str) -> Self {
        match path.split_once('/') {
            Some((top, _)) => Self::new(top),
            None => Self::new(ROOT_CATEGORY),
        }
    }

    pub fn is_root(&self) -> bool {
        self.name == ROOT_CATEGORY
    }

    /// Human-readable name: `45-developer-experience` -> `Developer Experience`
    pub fn display_name(&self) -> String {
        if self.is_root() {
            return "Root".to_string();
        }
        let stem = match self.ordinal {
            Some(_) => self
                .name
                .split_once('-')
                .map(|(_, rest)| rest)
                .unwrap_or(self.name.as_str()),
            None => self.name.as_str(),
        };
        stem.split(|c: char| c == '-' || c == '_')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Ord for Category {
    /// Numbered categories first by ordinal, then unnumbered ones; ties by name.
    fn cmp(&self, other: &Self) -> Ordering {
        let key = |c: &Category| (c.ordinal.is_none(), c.ordinal.unwrap_or(0));
        key(self)
            .cmp(&key(other))
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl PartialOrd for Category {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// `a/b/SKILL.md` -> true
pub fn is_skill_path(path: &str) -> bool {
    path.rsplit('/').next() == Some("SKILL.md")
}

/// `45-developer-experience` -> 45, `07` -> 7, `misc` -> None
fn parse_ordinal(name: &str) -> Option<u32> {
    let digits: String = name.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let rest = &name[digits.len()..];
    if !rest.is_empty() && !rest.starts_with('-') && !rest.starts_with('_') {
        return None;
    }
    digits.parse().ok()
}
