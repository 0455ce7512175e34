//! Logical Path Utilities
//!
//! Documents are identified by logical paths: relative to the scan root,
//! `/`-separated, without `.` or `..` components. These helpers convert
//! filesystem paths and link targets into that form.

use std::path::Path;

use crate::utils::error::AppResult;

/// Convert a root-relative filesystem path into a logical path.
pub fn logical_path(rel: &Path) -> String {
    normalize_rel_path(&rel.to_string_lossy())
}

/// Normalize separators and strip leading `./` and `/`.
pub fn normalize_rel_path(path: &str) -> String {
    path.replace('\\', "/")
        .trim()
        .trim_start_matches("./")
        .trim_start_matches('/')
        .to_string()
}

/// Folder part of a logical path (`a/b/SKILL.md` -> `a/b`, `README.md` -> ``).
pub fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Lexically resolve `target` against the logical folder `base`.
///
/// Returns `None` when the result would climb above the root.
pub fn resolve_logical(base: &str, target: &str) -> Option<String> {
    let target = target.replace('\\', "/");
    let mut parts: Vec<&str> = if target.starts_with('/') {
        Vec::new()
    } else {
        base.split('/').filter(|p| !p.is_empty()).collect()
    };

    for component in target.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Create the parent directory of `path` if it does not exist yet
pub fn ensure_parent_dir(path: &Path) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
