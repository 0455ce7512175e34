//! Corpus Statistics
//!
//! Totals over the scanned documents (documents, lines, fenced code examples)
//! with a per-category breakdown and skill layout counts, rendered as a short
//! Markdown report.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::NaiveDate;
use docs_index_core::{Category, Document, SkillStructure};
use serde::{Deserialize, Serialize};

/// Counts for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub name: String,
    pub display_name: String,
    pub documents: usize,
    pub skills: usize,
    pub lines: usize,
    pub code_examples: usize,
}

/// Counts for the whole corpus
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusStats {
    pub total_documents: usize,
    /// Documents named `SKILL.md`
    pub total_skills: usize,
    pub total_lines: usize,
    pub code_examples: usize,
    /// Skills with an Overview section
    pub with_overview: usize,
    /// Skills with a Best Practices section
    pub with_best_practices: usize,
    /// Skills with at least one fenced code block
    pub with_code_examples: usize,
    /// Skills with a `- [ ]` checklist
    pub with_checklist: usize,
    /// In category order
    pub categories: Vec<CategoryStats>,
}

pub fn compute_stats(documents: &[Document]) -> CorpusStats {
    let mut by_category: BTreeMap<Category, CategoryStats> = BTreeMap::new();
    let mut stats = CorpusStats::default();

    for doc in documents {
        let is_skill = doc.is_skill();
        stats.total_documents += 1;
        stats.total_lines += doc.line_count;
        stats.code_examples += doc.code_examples;
        if is_skill {
            stats.total_skills += 1;
        }
        if let Some(structure) = &doc.structure {
            stats.count_structure(structure);
        }

        let category = doc.category();
        let entry = by_category
            .entry(category.clone())
            .or_insert_with(|| CategoryStats {
                name: category.name.clone(),
                display_name: category.display_name(),
                documents: 0,
                skills: 0,
                lines: 0,
                code_examples: 0,
            });
        entry.documents += 1;
        entry.lines += doc.line_count;
        entry.code_examples += doc.code_examples;
        if is_skill {
            entry.skills += 1;
        }
    }

    stats.categories = by_category.into_values().collect();
    stats
}

impl CorpusStats {
    fn count_structure(&mut self, structure: &SkillStructure) {
        self.with_overview += usize::from(structure.has_overview);
        self.with_best_practices += usize::from(structure.has_best_practices);
        self.with_code_examples += usize::from(structure.has_code_examples);
        self.with_checklist += usize::from(structure.has_checklist);
    }
}

/// Markdown report of `stats`, dated `today`.
pub fn render_stats(stats: &CorpusStats, today: NaiveDate) -> String {
    let mut out = String::new();
    out.push_str("# Documentation Statistics\n\n");
    let _ = writeln!(out, "**Generated**: {}\n", today);

    out.push_str("## Overall Statistics\n\n");
    let _ = writeln!(out, "- **Total Documents**: {}", group_thousands(stats.total_documents));
    let _ = writeln!(out, "- **Total Skills**: {}", group_thousands(stats.total_skills));
    let _ = writeln!(out, "- **Total Lines**: {}", group_thousands(stats.total_lines));
    let _ = writeln!(out, "- **Code Examples**: {}", group_thousands(stats.code_examples));
    let _ = writeln!(out, "- **Categories**: {}\n", stats.categories.len());

    out.push_str("## Documents by Category\n\n");
    out.push_str("| Category | Docs | Skills | Lines | Code Examples |\n");
    out.push_str("|---|---|---|---|---|\n");
    for category in &stats.categories {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} |",
            category.display_name,
            category.documents,
            category.skills,
            group_thousands(category.lines),
            group_thousands(category.code_examples)
        );
    }

    out.push_str("\n## Skill Structure\n\n");
    let _ = writeln!(out, "- **With Overview**: {}/{}", stats.with_overview, stats.total_skills);
    let _ = writeln!(
        out,
        "- **With Best Practices**: {}/{}",
        stats.with_best_practices, stats.total_skills
    );
    let _ = writeln!(
        out,
        "- **With Code Examples**: {}/{}",
        stats.with_code_examples, stats.total_skills
    );
    let _ = writeln!(out, "- **With Checklist**: {}/{}", stats.with_checklist, stats.total_skills);
    out
}

/// `1234567` -> `1,234,567`
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
