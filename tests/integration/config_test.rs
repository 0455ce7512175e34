//! Configuration Integration Tests
//!
//! `docs-index.toml` discovery, flag precedence and curated overrides.

use std::fs;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use docs_index::commands::{execute, run, IndexArgs};
use docs_index::services::docs_index::config::load_settings;
use docs_index::{AppError, Audience};

use crate::common::{taxonomy_tree, today, write};

#[test]
fn test_config_file_drives_run() {
    let dir = taxonomy_tree();
    write(
        dir.path(),
        "docs-index.toml",
        r#"
stale_days = 365
output = "generated/DOCS_INDEX.md"
expected = ["09-security"]
"#,
    );

    let summary = run(&IndexArgs::for_root(dir.path()), today()).unwrap();
    // Only the undated docs and MQTT (503 days) remain stale
    assert_eq!(summary.stale, 4);
    assert_eq!(summary.missing, 1);

    let written = fs::read_to_string(dir.path().join("generated/DOCS_INDEX.md")).unwrap();
    assert!(written.contains("- [ ] 09-security"));
}

#[test]
fn test_flags_override_config() {
    let dir = taxonomy_tree();
    write(dir.path(), "docs-index.toml", "stale_days = 365\n");
    let out_dir = TempDir::new().unwrap();

    let args = IndexArgs {
        stale_days: Some(90),
        output: Some(out_dir.path().join("index.md")),
        ..IndexArgs::for_root(dir.path())
    };
    let summary = run(&args, today()).unwrap();
    assert_eq!(summary.stale, 5);
}

#[test]
fn test_strict_links_from_config() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a/SKILL.md", "---\nrelated: [./gone.md]\n---\n");
    write(dir.path(), "docs-index.toml", "strict_links = true\n");
    let out_dir = TempDir::new().unwrap();

    let args = IndexArgs {
        output: Some(out_dir.path().join("index.md")),
        ..IndexArgs::for_root(dir.path())
    };
    assert_eq!(execute(&args, today()), 2);
}

#[test]
fn test_overrides_take_precedence() {
    let dir = taxonomy_tree();
    write(
        dir.path(),
        "docs-index.toml",
        r#"
[[overrides]]
path = "08-messaging-queue/mqtt/SKILL.md"
title = "MQTT Messaging"
audience = "security"
updated = "2024-05-30"

[[overrides]]
path = "99-gone/SKILL.md"
title = "Gone"
"#,
    );

    let settings = load_settings(dir.path(), None).unwrap();
    let build = docs_index::run_pipeline(dir.path(), &settings, today()).unwrap();

    let mqtt = build.index.entry("08-messaging-queue/mqtt/SKILL.md").unwrap();
    assert_eq!(mqtt.title, "MQTT Messaging");
    assert_eq!(mqtt.audience, Audience::Security);
    assert_eq!(mqtt.description, "Device messaging");
    assert!(mqtt.curated);
    assert!(!mqtt.stale);
    assert_eq!(build.index.unmatched_overrides, vec!["99-gone/SKILL.md"]);
}

#[test]
fn test_missing_explicit_config_fails() {
    let dir = taxonomy_tree();
    let out_dir = TempDir::new().unwrap();
    let args = IndexArgs {
        config: Some(dir.path().join("nope.toml")),
        output: Some(out_dir.path().join("index.md")),
        ..IndexArgs::for_root(dir.path())
    };
    assert!(matches!(run(&args, today()), Err(AppError::Config(_))));
    assert_eq!(execute(&args, today()), 1);
    assert!(!out_dir.path().join("index.md").exists());
}

#[test]
fn test_invalid_config_fails() {
    let dir = taxonomy_tree();
    write(dir.path(), "docs-index.toml", "stale_days = \"soon\"\n");
    let result = load_settings(dir.path(), None);
    assert!(matches!(result, Err(AppError::Config(_))));
}

#[test]
fn test_override_accepts_native_toml_date() {
    let dir = taxonomy_tree();
    write(
        dir.path(),
        "docs-index.toml",
        r#"
[[overrides]]
path = "08-messaging-queue/mqtt/SKILL.md"
updated = 2024-05-30
"#,
    );

    let settings = load_settings(dir.path(), None).unwrap();
    assert_eq!(
        settings.overrides[0].updated,
        chrono::NaiveDate::from_ymd_opt(2024, 5, 30)
    );

    let out_dir = TempDir::new().unwrap();
    let args = IndexArgs {
        output: Some(out_dir.path().join("index.md")),
        ..IndexArgs::for_root(dir.path())
    };
    assert_eq!(execute(&args, today()), 0);
    let written = fs::read_to_string(out_dir.path().join("index.md")).unwrap();
    assert!(written.contains("| [MQTT](08-messaging-queue/mqtt/SKILL.md): Device messaging | ops | 2024-05-30 |"));
}
