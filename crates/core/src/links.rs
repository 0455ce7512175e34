//! Link Types
//!
//! Cross-references between documents and the result of resolving them.

use serde::{Deserialize, Serialize};

/// Where a link was declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkOrigin {
    /// `related` front-matter field
    Related,
    /// Markdown link in the document body
    Inline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStatus {
    Valid,
    Broken,
}

/// A cross-reference from one document to a target path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEdge {
    pub source: String,
    /// Target exactly as written by the author
    pub target: String,
    pub origin: LinkOrigin,
    /// Logical path of the document the target resolved to
    pub resolved: Option<String>,
    pub status: LinkStatus,
}

impl LinkEdge {
    pub fn is_broken(&self) -> bool {
        self.status == LinkStatus::Broken
    }
}

/// All edges of a build, sorted by source path then declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkReport {
    pub edges: Vec<LinkEdge>,
}

impl LinkReport {
    pub fn valid(&self) -> impl Iterator<Item = &LinkEdge> {
        self.edges.iter().filter(|e| !e.is_broken())
    }

    pub fn broken(&self) -> impl Iterator<Item = &LinkEdge> {
        self.edges.iter().filter(|e| e.is_broken())
    }

    pub fn broken_count(&self) -> usize {
        self.broken().count()
    }

    pub fn has_broken(&self) -> bool {
        self.edges.iter().any(LinkEdge::is_broken)
    }
}
