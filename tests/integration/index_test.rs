//! Index Integration Tests
//!
//! Builds indexes from real trees on disk and checks grouping, freshness,
//! missing docs, warnings and byte-for-byte determinism.

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use docs_index::models::settings::IndexSettings;
use docs_index::services::docs_index::pipeline::run_pipeline;
use docs_index::services::docs_index::render::render_markdown;
use docs_index::{Audience, DocStatus};

use crate::common::{scenario_tree, taxonomy_tree, today, write};

// ============================================================================
// Two-document scenario
// ============================================================================

#[test]
fn test_scenario_index_contents() {
    let dir = scenario_tree();
    let build = run_pipeline(dir.path(), &IndexSettings::default(), today()).unwrap();
    let index = &build.index;

    assert_eq!(index.document_count(), 2);
    assert_eq!(index.categories.len(), 1);
    assert_eq!(index.categories[0].name, "docs");

    let a = index.entry("docs/a/SKILL.md").unwrap();
    assert_eq!(a.title, "A");
    assert_eq!(a.tags, vec!["x"]);

    let b = index.entry("docs/b/SKILL.md").unwrap();
    assert_eq!(b.description, "This covers B.");
    assert_eq!(b.title, "b");

    let x = index.tag("x").unwrap();
    let titles: Vec<&str> = x.documents.iter().map(|d| d.title.as_str()).collect();
    assert_eq!(titles, vec!["A"]);
    assert_eq!(index.tags.len(), 1);

    assert_eq!(build.links.edges.len(), 1);
    assert_eq!(build.links.broken_count(), 0);
}

#[test]
fn test_scenario_markdown() {
    let dir = scenario_tree();
    let build = run_pipeline(dir.path(), &IndexSettings::default(), today()).unwrap();
    let rendered = render_markdown(&build.index, &build.links);

    let expected = "\
# Documentation Index

_2 documents in 1 categories. Generated 2024-06-01; documents not updated for more than 90 days are stale._

## Quick Navigation

| Category | Docs | Stale |
|---|---|---|
| [Docs](#category-docs) | 2 | 2 |

## By Category

<a id=\"category-docs\"></a>
### Docs

| Doc | Audience | Updated |
|---|---|---|
| [A](docs/a/SKILL.md): See [B](docs/b/SKILL.md) for the other half. | all | - |
| [b](docs/b/SKILL.md): This covers B. | all | - |

## By Tag

- **x**: [A](docs/a/SKILL.md)

## Stale Docs

| Doc | Updated | Age (days) |
|---|---|---|
| [A](docs/a/SKILL.md) | never | - |
| [b](docs/b/SKILL.md) | never | - |

## Missing Docs

_Nothing missing._
";
    assert_eq!(rendered, expected);
}

// ============================================================================
// Taxonomy tree
// ============================================================================

#[test]
fn test_every_document_in_exactly_one_category() {
    let dir = taxonomy_tree();
    let build = run_pipeline(dir.path(), &IndexSettings::default(), today()).unwrap();

    assert_eq!(build.documents.len(), 6);
    assert_eq!(build.index.document_count(), 6);
    for doc in &build.documents {
        let homes = build
            .index
            .categories
            .iter()
            .filter(|c| c.entries.iter().any(|e| e.path == doc.path))
            .count();
        assert_eq!(homes, 1, "{} should be listed once", doc.path);
    }
}

#[test]
fn test_category_order() {
    let dir = taxonomy_tree();
    let build = run_pipeline(dir.path(), &IndexSettings::default(), today()).unwrap();
    let names: Vec<&str> = build
        .index
        .categories
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec![
            "01-foundations",
            "08-messaging-queue",
            "45-developer-experience",
            "(root)",
            "misc"
        ]
    );
}

#[test]
fn test_stale_table() {
    let dir = taxonomy_tree();
    let build = run_pipeline(dir.path(), &IndexSettings::default(), today()).unwrap();

    let stale: Vec<(&str, Option<i64>)> = build
        .index
        .stale
        .iter()
        .map(|s| (s.path.as_str(), s.age_days))
        .collect();
    assert_eq!(
        stale,
        vec![
            ("45-developer-experience/cli/README.md", None),
            ("README.md", None),
            ("misc/broken/SKILL.md", None),
            ("08-messaging-queue/mqtt/SKILL.md", Some(503)),
            ("45-developer-experience/cli/SKILL.md", Some(121)),
        ]
    );

    let fresh = build
        .index
        .entry("01-foundations/typescript-standards/SKILL.md")
        .unwrap();
    assert!(!fresh.stale);
    assert_eq!(fresh.age_days, Some(12));
}

#[test]
fn test_stale_days_setting() {
    let dir = taxonomy_tree();
    let settings = IndexSettings {
        stale_days: 200,
        ..IndexSettings::default()
    };
    let build = run_pipeline(dir.path(), &settings, today()).unwrap();
    let stale: Vec<&str> = build.index.stale.iter().map(|s| s.path.as_str()).collect();
    assert!(stale.contains(&"08-messaging-queue/mqtt/SKILL.md"));
    assert!(!stale.contains(&"45-developer-experience/cli/SKILL.md"));
}

#[test]
fn test_metadata_fields() {
    let dir = taxonomy_tree();
    let build = run_pipeline(dir.path(), &IndexSettings::default(), today()).unwrap();

    let mqtt = build.index.entry("08-messaging-queue/mqtt/SKILL.md").unwrap();
    assert_eq!(mqtt.audience, Audience::Ops);
    assert_eq!(mqtt.description, "Device messaging");

    let cli = build.index.entry("45-developer-experience/cli/SKILL.md").unwrap();
    assert_eq!(cli.status, DocStatus::Draft);
    assert_eq!(cli.description, "Conventions for command-line tools.");

    let readme = build.index.entry("README.md").unwrap();
    assert_eq!(readme.category, "(root)");
    assert_eq!(readme.title, "Skills");

    let standards = build.index.tag("standards").unwrap();
    let titles: Vec<&str> = standards.documents.iter().map(|d| d.title.as_str()).collect();
    assert_eq!(titles, vec!["CLI Design", "TypeScript Standards"]);
}

#[test]
fn test_malformed_front_matter_still_indexed() {
    let dir = taxonomy_tree();
    let build = run_pipeline(dir.path(), &IndexSettings::default(), today()).unwrap();

    let doc = build
        .documents
        .iter()
        .find(|d| d.path == "misc/broken/SKILL.md")
        .unwrap();
    assert!(doc.has_warnings());
    assert_eq!(doc.warnings[0].line, Some(1));

    let entry = build.index.entry("misc/broken/SKILL.md").unwrap();
    assert!(entry.has_warnings);
    assert_eq!(entry.title, "broken");
    assert_eq!(build.warning_count(), 1);

    let rendered = render_markdown(&build.index, &build.links);
    assert!(rendered.contains("[broken](misc/broken/SKILL.md) _(metadata warnings)_"));
}

#[test]
fn test_missing_docs_checklist() {
    let dir = taxonomy_tree();
    let settings = IndexSettings {
        expected: vec![
            "01-foundations/typescript-standards".to_string(),
            "01-foundations/python-standards".to_string(),
            "09-security".to_string(),
            "tag:iot".to_string(),
            "tag:kafka".to_string(),
        ],
        ..IndexSettings::default()
    };
    let build = run_pipeline(dir.path(), &settings, today()).unwrap();
    let missing: Vec<&str> = build
        .index
        .missing
        .iter()
        .map(|m| m.expected.as_str())
        .collect();
    assert_eq!(
        missing,
        vec!["01-foundations/python-standards", "09-security", "tag:kafka"]
    );

    let rendered = render_markdown(&build.index, &build.links);
    assert!(rendered.contains(
        "## Missing Docs\n\n- [ ] 01-foundations/python-standards\n- [ ] 09-security\n- [ ] tag:kafka\n"
    ));
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_rebuild_is_byte_identical() {
    let dir = taxonomy_tree();
    let settings = IndexSettings::default();

    let first = run_pipeline(dir.path(), &settings, today()).unwrap();
    let second = run_pipeline(dir.path(), &settings, today()).unwrap();

    assert_eq!(first.index, second.index);
    assert_eq!(
        render_markdown(&first.index, &first.links),
        render_markdown(&second.index, &second.links)
    );
}

#[test]
fn test_index_follows_filesystem_changes() {
    let dir = scenario_tree();
    let settings = IndexSettings::default();
    let before = run_pipeline(dir.path(), &settings, today()).unwrap();

    write(dir.path(), "docs/c/SKILL.md", "---\nname: C\n---\n");
    let after = run_pipeline(dir.path(), &settings, today()).unwrap();

    assert_eq!(before.index.document_count(), 2);
    assert_eq!(after.index.document_count(), 3);
    assert!(after.index.entry("docs/c/SKILL.md").is_some());
}

// ============================================================================
// Encoding
// ============================================================================

#[test]
fn test_non_utf8_document_is_indexed_with_warning() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "01-a/ok/SKILL.md", "# Ok\n");
    std::fs::write(dir.path().join("01-a/latin1.md"), b"# R\xe9sum\xe9\n").unwrap();

    let build = run_pipeline(dir.path(), &IndexSettings::default(), today()).unwrap();
    let paths: Vec<&str> = build.documents.iter().map(|d| d.path.as_str()).collect();
    assert_eq!(paths, vec!["01-a/latin1.md", "01-a/ok/SKILL.md"]);

    let entry = build.index.entry("01-a/latin1.md").unwrap();
    assert!(entry.has_warnings);
    assert_eq!(entry.title, "R\u{FFFD}sum\u{FFFD}");

    let rendered = render_markdown(&build.index, &build.links);
    assert!(rendered.contains("(01-a/latin1.md) _(metadata warnings)_"));
}

// ============================================================================
// Skill structure
// ============================================================================

#[test]
fn test_structure_issues_for_taxonomy() {
    let dir = taxonomy_tree();
    let settings = IndexSettings {
        check_structure: true,
        ..IndexSettings::default()
    };
    let build = run_pipeline(dir.path(), &settings, today()).unwrap();
    let flagged: Vec<&str> = build
        .index
        .structure_issues
        .iter()
        .map(|i| i.path.as_str())
        .collect();
    // README files are not skills
    assert_eq!(
        flagged,
        vec![
            "01-foundations/typescript-standards/SKILL.md",
            "08-messaging-queue/mqtt/SKILL.md",
            "45-developer-experience/cli/SKILL.md",
            "misc/broken/SKILL.md",
        ]
    );
    assert!(!build.index.structure_issues[0]
        .problems
        .contains(&"no code examples".to_string()));

    let default_build = run_pipeline(dir.path(), &IndexSettings::default(), today()).unwrap();
    assert!(default_build.index.structure_issues.is_empty());
}
