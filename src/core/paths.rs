// src/core/paths.rs

use crate::constants::SETTINGS_FILENAME;
use lazy_static::lazy_static;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

lazy_static! {
    static ref TOOLWRAP_CONFIG_DIR: Mutex<Option<PathBuf>> = Mutex::new(None);
}

#[derive(Error, Debug)]
pub enum PathError {
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    #[error("Failed to expand path '{template}': {reason}")]
    Expansion { template: String, reason: String },
    #[error("Path '{path}' could not be resolved: {source}")]
    Canonicalize {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Returns the path to the toolwrap configuration directory (`~/.config/toolwrap`).
/// The directory is not created; a missing one simply means default settings.
///
/// Memoized: the first call computes the path, later calls return the cached value.
pub fn get_toolwrap_config_dir() -> Result<PathBuf, PathError> {
    let mut cached = match TOOLWRAP_CONFIG_DIR.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };

    if let Some(path) = &*cached {
        return Ok(path.clone());
    }

    let config_path = dirs::config_dir()
        .ok_or(PathError::ConfigDirNotFound)?
        .join("toolwrap");
    *cached = Some(config_path.clone());
    Ok(config_path)
}

/// Returns the path of the default `settings.toml`.
pub fn get_default_settings_path() -> Result<PathBuf, PathError> {
    get_toolwrap_config_dir().map(|dir| dir.join(SETTINGS_FILENAME))
}

/// Expands `~` and environment variables (`$VAR`, `${VAR}`) in a user-supplied path.
pub fn expand_user_path(template: &str) -> Result<PathBuf, PathError> {
    let expanded = shellexpand::full(template).map_err(|e| PathError::Expansion {
        template: template.to_string(),
        reason: e.to_string(),
    })?;
    Ok(PathBuf::from(expanded.into_owned()))
}

/// Resolves `path` to an absolute path without the `\\?\` prefix on Windows.
/// The path must exist.
pub fn canonicalize(path: &Path) -> Result<PathBuf, PathError> {
    dunce::canonicalize(path).map_err(|e| PathError::Canonicalize {
        path: path.display().to_string(),
        source: e,
    })
}

/// Turns an id-bearing file name into its id: `split_libraries.toml` -> `split_libraries`.
pub fn file_stem_id(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
}
