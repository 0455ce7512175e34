//! Link Validation Integration Tests

use pretty_assertions::assert_eq;

use docs_index::models::settings::IndexSettings;
use docs_index::services::docs_index::pipeline::run_pipeline;
use docs_index::services::docs_index::render::render_markdown;
use docs_index::LinkStatus;
use tempfile::TempDir;

use crate::common::{taxonomy_tree, today, write};

#[test]
fn test_related_readme_valid_and_nonexistent_broken() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "guide/SKILL.md",
        "---\nname: Guide\nrelated:\n  - ./README.md\n  - ./nonexistent.md\n---\n",
    );
    write(dir.path(), "guide/README.md", "# Readme\n");

    let build = run_pipeline(dir.path(), &IndexSettings::default(), today()).unwrap();
    let statuses: Vec<(&str, LinkStatus)> = build
        .links
        .edges
        .iter()
        .map(|e| (e.target.as_str(), e.status))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("./README.md", LinkStatus::Valid),
            ("./nonexistent.md", LinkStatus::Broken),
        ]
    );

    let rendered = render_markdown(&build.index, &build.links);
    assert!(rendered.contains("## Broken Links"));
    assert!(rendered.contains("| guide/SKILL.md | `./nonexistent.md` | related |"));
}

#[test]
fn test_taxonomy_links_all_valid() {
    let dir = taxonomy_tree();
    let build = run_pipeline(dir.path(), &IndexSettings::default(), today()).unwrap();

    assert_eq!(build.links.edges.len(), 2);
    assert!(!build.links.has_broken());
    assert_eq!(
        build.links.edges[0].resolved.as_deref(),
        Some("45-developer-experience/cli/SKILL.md")
    );

    let rendered = render_markdown(&build.index, &build.links);
    assert!(!rendered.contains("Broken Links"));
}

#[test]
fn test_inline_links_checked() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "01-a/x/SKILL.md",
        "# X\n\nSee [Y](../y/SKILL.md#setup), [Z](../z/SKILL.md) and [docs](https://example.com/a.md).\n\n```md\n[ignored](../nope.md)\n```\n",
    );
    write(dir.path(), "01-a/y/SKILL.md", "# Y\n");

    let build = run_pipeline(dir.path(), &IndexSettings::default(), today()).unwrap();
    let statuses: Vec<(&str, LinkStatus)> = build
        .links
        .edges
        .iter()
        .map(|e| (e.target.as_str(), e.status))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("../y/SKILL.md", LinkStatus::Valid),
            ("../z/SKILL.md", LinkStatus::Broken),
        ]
    );
}

#[test]
fn test_link_escaping_root_is_broken() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "a/SKILL.md",
        "---\nrelated: [../../outside.md]\n---\n",
    );
    let build = run_pipeline(dir.path(), &IndexSettings::default(), today()).unwrap();
    assert_eq!(build.links.broken_count(), 1);
    assert!(build.links.edges[0].resolved.is_none());
}
