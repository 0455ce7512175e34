//! Command Integration Tests
//!
//! Runs the `docs-index` command handler the way the binary does and checks
//! exit codes and the files it writes.

use std::fs;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use docs_index::commands::{execute, run, IndexArgs};
use docs_index::AppError;

use crate::common::{scenario_tree, taxonomy_tree, today, write};

fn args_with_output(root: &std::path::Path, output: &std::path::Path) -> IndexArgs {
    IndexArgs {
        output: Some(output.to_path_buf()),
        ..IndexArgs::for_root(root)
    }
}

#[test]
fn test_missing_root_exits_1_without_output() {
    let out_dir = TempDir::new().unwrap();
    let output = out_dir.path().join("DOCS_INDEX.md");
    let args = args_with_output(&out_dir.path().join("does/not/exist"), &output);

    let result = run(&args, today());
    let err = result.unwrap_err();
    assert!(matches!(err, AppError::RootNotFound { .. }));
    assert!(err.to_string().contains("does/not/exist"));

    assert_eq!(execute(&args, today()), 1);
    assert!(!output.exists());
}

#[test]
fn test_success_writes_output() {
    let dir = scenario_tree();
    let out_dir = TempDir::new().unwrap();
    let output = out_dir.path().join("nested/DOCS_INDEX.md");
    let args = args_with_output(dir.path(), &output);

    let summary = run(&args, today()).unwrap();
    assert_eq!(summary.documents, 2);
    assert_eq!(summary.broken_links, 0);
    assert_eq!(summary.output.as_deref(), Some(output.as_path()));

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("# Documentation Index\n"));
    assert!(written.contains("- **x**: [A](docs/a/SKILL.md)"));
}

#[test]
fn test_output_is_idempotent() {
    let dir = taxonomy_tree();
    let out_dir = TempDir::new().unwrap();
    let first = out_dir.path().join("first.md");
    let second = out_dir.path().join("second.md");

    assert_eq!(execute(&args_with_output(dir.path(), &first), today()), 0);
    assert_eq!(execute(&args_with_output(dir.path(), &second), today()), 0);

    assert_eq!(
        fs::read(&first).unwrap(),
        fs::read(&second).unwrap()
    );
}

#[test]
fn test_broken_links_warn_by_default() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a/SKILL.md", "---\nrelated: [./missing.md]\n---\n");
    let output = dir.path().join("out/DOCS_INDEX.md");

    let args = args_with_output(dir.path(), &output);
    assert_eq!(execute(&args, today()), 0);
    assert!(fs::read_to_string(&output).unwrap().contains("## Broken Links"));
}

#[test]
fn test_strict_links_exit_2_without_output() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a/SKILL.md", "---\nrelated: [./missing.md]\n---\n");
    let out_dir = TempDir::new().unwrap();
    let output = out_dir.path().join("DOCS_INDEX.md");

    let args = IndexArgs {
        strict_links: Some(true),
        ..args_with_output(dir.path(), &output)
    };
    let err = run(&args, today()).unwrap_err();
    assert!(matches!(err, AppError::BrokenLinks { count: 1 }));
    assert_eq!(execute(&args, today()), 2);
    assert!(!output.exists());
}

#[test]
fn test_strict_links_pass_when_clean() {
    let dir = scenario_tree();
    let out_dir = TempDir::new().unwrap();
    let args = IndexArgs {
        strict_links: Some(true),
        ..args_with_output(dir.path(), &out_dir.path().join("index.md"))
    };
    assert_eq!(execute(&args, today()), 0);
}

#[test]
fn test_json_output() {
    let dir = scenario_tree();
    let out_dir = TempDir::new().unwrap();
    let json_path = out_dir.path().join("index.json");
    let args = IndexArgs {
        json: Some(json_path.clone()),
        ..args_with_output(dir.path(), &out_dir.path().join("index.md"))
    };
    assert_eq!(execute(&args, today()), 0);

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(value["categories"][0]["name"], "docs");
    assert_eq!(value["tags"][0]["tag"], "x");
    assert_eq!(value["links"][0]["status"], "valid");
    assert_eq!(
        value["categories"][0]["entries"][0]["hash"]
            .as_str()
            .unwrap()
            .len(),
        64
    );
}

#[test]
fn test_as_of_overrides_today() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a/SKILL.md", "---\nupdated: 2024-01-01\n---\n");
    let out_dir = TempDir::new().unwrap();

    let fresh = IndexArgs {
        as_of: chrono::NaiveDate::from_ymd_opt(2024, 2, 1),
        ..args_with_output(dir.path(), &out_dir.path().join("fresh.md"))
    };
    assert_eq!(run(&fresh, today()).unwrap().stale, 0);

    let stale = args_with_output(dir.path(), &out_dir.path().join("stale.md"));
    assert_eq!(run(&stale, today()).unwrap().stale, 1);
}

#[test]
fn test_output_inside_root_is_not_indexed() {
    let dir = scenario_tree();
    write(
        dir.path(),
        "docs-index.toml",
        "output = \"DOCS_INDEX.md\"\njson_output = \"out/index.md\"\n",
    );
    let args = IndexArgs::for_root(dir.path());
    let output = dir.path().join("DOCS_INDEX.md");

    let first_summary = run(&args, today()).unwrap();
    let first = fs::read_to_string(&output).unwrap();
    let second_summary = run(&args, today()).unwrap();
    let second = fs::read_to_string(&output).unwrap();

    assert_eq!(first_summary.documents, 2);
    assert_eq!(second_summary.documents, 2);
    assert_eq!(first, second);
    assert!(!second.contains("DOCS_INDEX.md"));
}

#[test]
fn test_output_flag_inside_root_is_not_indexed() {
    let dir = scenario_tree();
    let args = args_with_output(dir.path(), &dir.path().join("docs/DOCS_INDEX.md"));

    assert_eq!(execute(&args, today()), 0);
    let first = fs::read(dir.path().join("docs/DOCS_INDEX.md")).unwrap();
    assert_eq!(execute(&args, today()), 0);
    let second = fs::read(dir.path().join("docs/DOCS_INDEX.md")).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_check_structure_flag() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "01-a/full/SKILL.md",
        "---\nname: Full\n---\n# Full\n\n## Overview\n\nText.\n\n## Best Practices\n\n- [ ] Review\n\n```bash\nmake\n```\n",
    );
    write(dir.path(), "01-a/bare/SKILL.md", "---\nname: Bare\n---\n# Bare\n\n## Overview\n\nText.\n");
    write(dir.path(), "01-a/notes.md", "# Notes\n");
    let out_dir = TempDir::new().unwrap();
    let output = out_dir.path().join("index.md");

    let plain = run(&args_with_output(dir.path(), &output), today()).unwrap();
    assert_eq!(plain.structure_issues, 0);
    assert!(!fs::read_to_string(&output).unwrap().contains("Structure Issues"));

    let args = IndexArgs {
        check_structure: true,
        ..args_with_output(dir.path(), &output)
    };
    let checked = run(&args, today()).unwrap();
    assert_eq!(checked.structure_issues, 1);
    assert_eq!(execute(&args, today()), 0);

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.contains(
        "| [Bare](01-a/bare/SKILL.md) | missing section 'Best Practices'; no code examples; no checklist |"
    ));
}
