//! Indexer Configuration
//!
//! Loads `docs-index.toml`. A missing default file means default settings; an
//! explicitly requested file must exist.

use std::path::{Path, PathBuf};

use crate::models::settings::IndexSettings;
use crate::utils::error::{AppError, AppResult};

/// Config file looked up at the corpus root
pub const CONFIG_FILE_NAME: &str = "docs-index.toml";

/// Load settings for `root`.
///
/// `explicit` (from `--config`) overrides the default `<root>/docs-index.toml`.
/// Output paths inside the file are resolved against the file's folder.
pub fn load_settings(root: &Path, explicit: Option<&Path>) -> AppResult<IndexSettings> {
    let path = match explicit {
        Some(path) => {
            if !path.is_file() {
                return Err(AppError::config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            path.to_path_buf()
        }
        None => {
            let default_path = root.join(CONFIG_FILE_NAME);
            if !default_path.is_file() {
                return Ok(IndexSettings::default());
            }
            default_path
        }
    };

    let settings = load_settings_file(&path)?;
    tracing::debug!("Loaded indexer settings from {}", path.display());
    Ok(settings)
}

/// Read and validate one settings file.
pub fn load_settings_file(path: &Path) -> AppResult<IndexSettings> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        AppError::config(format!(
            "Failed to read config {}: {}",
            path.display(),
            e
        ))
    })?;

    let mut settings: IndexSettings = toml::from_str(&content).map_err(|e| {
        AppError::config(format!(
            "Failed to parse config {}: {}",
            path.display(),
            e
        ))
    })?;

    settings
        .validate()
        .map_err(|e| AppError::config(format!("Invalid config {}: {}", path.display(), e)))?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    settings.output = settings.output.map(|p| resolve_against(base, p));
    settings.json_output = settings.json_output.map(|p| resolve_against(base, p));

    Ok(settings)
}

fn resolve_against(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}
