//! Index Rendering
//!
//! Serializes a built `DocsIndex` to the `DOCS_INDEX.md` layout or to JSON.
//! Rendering reads only its arguments, so equal inputs give identical bytes.

use std::fmt::Write as _;

use docs_index_core::{
    Category, CategoryGroup, DocStatus, DocsIndex, IndexEntry, LinkEdge, LinkOrigin, LinkReport,
};
use serde::Serialize;

use crate::utils::error::AppResult;

/// Render the Markdown index.
pub fn render_markdown(index: &DocsIndex, links: &LinkReport) -> String {
    let mut out = String::new();

    out.push_str("# Documentation Index\n\n");
    let _ = writeln!(
        out,
        "_{} documents in {} categories. Generated {}; documents not updated for more than {} days are stale._",
        index.document_count(),
        index.categories.len(),
        index.generated_on,
        index.stale_days
    );
    out.push('\n');

    render_quick_navigation(&mut out, index);
    render_categories(&mut out, index);
    render_tags(&mut out, index);
    render_stale(&mut out, index);
    render_missing(&mut out, index);
    if !index.structure_issues.is_empty() {
        render_structure_issues(&mut out, index);
    }

    let broken: Vec<&LinkEdge> = links.broken().collect();
    if !broken.is_empty() {
        render_broken_links(&mut out, &broken);
    }

    // Exactly one trailing newline
    while out.ends_with("\n\n") {
        out.pop();
    }
    out
}

fn render_quick_navigation(out: &mut String, index: &DocsIndex) {
    out.push_str("## Quick Navigation\n\n");
    if index.categories.is_empty() {
        out.push_str("_No documents found._\n\n");
        return;
    }
    out.push_str("| Category | Docs | Stale |\n");
    out.push_str("|---|---|---|\n");
    for group in &index.categories {
        let stale = group.entries.iter().filter(|e| e.stale).count();
        let _ = writeln!(
            out,
            "| [{}](#{}) | {} | {} |",
            escape_cell(&category_title(group)),
            category_anchor(&group.name),
            group.entries.len(),
            stale
        );
    }
    out.push('\n');
}

fn render_categories(out: &mut String, index: &DocsIndex) {
    out.push_str("## By Category\n\n");
    for group in &index.categories {
        let _ = writeln!(out, "<a id=\"{}\"></a>", category_anchor(&group.name));
        let _ = writeln!(out, "### {}\n", category_title(group));
        out.push_str("| Doc | Audience | Updated |\n");
        out.push_str("|---|---|---|\n");
        for entry in &group.entries {
            let updated = entry
                .updated
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string());
            let _ = writeln!(
                out,
                "| {} | {} | {} |",
                doc_cell(entry),
                entry.audience,
                updated
            );
        }
        out.push('\n');
    }
}

fn render_tags(out: &mut String, index: &DocsIndex) {
    out.push_str("## By Tag\n\n");
    if index.tags.is_empty() {
        out.push_str("_No tags._\n\n");
        return;
    }
    for group in &index.tags {
        let docs: Vec<String> = group
            .documents
            .iter()
            .map(|d| link(&d.title, &d.path))
            .collect();
        let _ = writeln!(out, "- **{}**: {}", escape_inline(&group.tag), docs.join(", "));
    }
    out.push('\n');
}

fn render_stale(out: &mut String, index: &DocsIndex) {
    out.push_str("## Stale Docs\n\n");
    if index.stale.is_empty() {
        out.push_str("_No stale documents._\n\n");
        return;
    }
    out.push_str("| Doc | Updated | Age (days) |\n");
    out.push_str("|---|---|---|\n");
    for doc in &index.stale {
        let (updated, age) = match (doc.updated, doc.age_days) {
            (Some(updated), Some(age)) => (updated.to_string(), age.to_string()),
            _ => ("never".to_string(), "-".to_string()),
        };
        let _ = writeln!(
            out,
            "| {} | {} | {} |",
            escape_cell(&link(&doc.title, &doc.path)),
            updated,
            age
        );
    }
    out.push('\n');
}

fn render_missing(out: &mut String, index: &DocsIndex) {
    out.push_str("## Missing Docs\n\n");
    if index.missing.is_empty() {
        out.push_str("_Nothing missing._\n\n");
        return;
    }
    for missing in &index.missing {
        let _ = writeln!(out, "- [ ] {}", missing.expected);
    }
    out.push('\n');
}

fn render_structure_issues(out: &mut String, index: &DocsIndex) {
    out.push_str("## Structure Issues\n\n");
    out.push_str("| Doc | Problems |\n");
    out.push_str("|---|---|\n");
    for issue in &index.structure_issues {
        let _ = writeln!(
            out,
            "| {} | {} |",
            escape_cell(&link(&issue.title, &issue.path)),
            escape_cell(&issue.problems.join("; "))
        );
    }
    out.push('\n');
}

fn render_broken_links(out: &mut String, broken: &[&LinkEdge]) {
    out.push_str("## Broken Links\n\n");
    out.push_str("| Source | Target | Origin |\n");
    out.push_str("|---|---|---|\n");
    for edge in broken {
        let origin = match edge.origin {
            LinkOrigin::Related => "related",
            LinkOrigin::Inline => "inline",
        };
        let _ = writeln!(
            out,
            "| {} | {} | {} |",
            escape_cell(&edge.source),
            escape_cell(&code_span(&edge.target)),
            origin
        );
    }
    out.push('\n');
}

fn category_title(group: &CategoryGroup) -> String {
    Category::new(group.name.clone()).display_name()
}

/// `45-developer-experience` -> `category-45-developer-experience`
fn category_anchor(name: &str) -> String {
    let slug: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    let slug = slug.trim_matches('-');
    format!("category-{}", slug)
}

fn doc_cell(entry: &IndexEntry) -> String {
    let mut cell = link(&entry.title, &entry.path);
    match entry.status {
        DocStatus::Draft => cell.push_str(" _(draft)_"),
        DocStatus::Deprecated => cell.push_str(" _(deprecated)_"),
        DocStatus::Current => {}
    }
    if entry.has_warnings {
        cell.push_str(" _(metadata warnings)_");
    }
    if !entry.description.is_empty() {
        cell.push_str(": ");
        cell.push_str(&entry.description);
    }
    escape_cell(&cell)
}

fn link(title: &str, path: &str) -> String {
    let title = title.replace('[', "\\[").replace(']', "\\]");
    format!("[{}]({})", title, path.replace(' ', "%20"))
}

/// Inline code span that stays closed whatever backticks `value` holds
fn code_span(value: &str) -> String {
    let mut longest = 0;
    let mut run = 0;
    for c in value.chars() {
        run = if c == '`' { run + 1 } else { 0 };
        longest = longest.max(run);
    }
    let fence = "`".repeat(longest + 1);
    let pad = if value.starts_with('`') || value.ends_with('`') {
        " "
    } else {
        ""
    };
    format!("{fence}{pad}{value}{pad}{fence}")
}

/// Backslash-escape Markdown emphasis, code and link punctuation.
fn escape_inline(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '*' | '_' | '`' | '[' | ']') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Keep a value inside one table cell.
fn escape_cell(value: &str) -> String {
    value
        .replace('|', "\\|")
        .replace("\r\n", " ")
        .replace('\n', " ")
}

#[derive(Serialize)]
struct JsonIndex<'a> {
    #[serde(flatten)]
    index: &'a DocsIndex,
    links: &'a [LinkEdge],
}

/// Render the index and every link edge as pretty JSON.
pub fn render_json(index: &DocsIndex, links: &LinkReport) -> AppResult<String> {
    let view = JsonIndex {
        index,
        links: &links.edges,
    };
    let mut json = serde_json::to_string_pretty(&view)?;
    json.push('\n');
    Ok(json)
}
