// src/cli/handlers/commons.rs

// Shared helpers for the command handlers.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::{
    core::{paths, settings},
    models::Settings,
};

/// Expands a user-supplied path that must already exist and returns it canonicalized.
pub fn existing_path(raw: &str) -> Result<PathBuf> {
    let expanded = paths::expand_user_path(raw)?;
    let resolved = paths::canonicalize(&expanded)
        .with_context(|| format!("'{}' does not exist", expanded.display()))?;
    Ok(resolved)
}

/// Expands a user-supplied path that may not exist yet.
pub fn target_path(raw: &str) -> Result<PathBuf> {
    Ok(paths::expand_user_path(raw)?)
}

/// Loads the settings, honoring `--settings`.
pub fn load_settings(explicit: Option<&str>) -> Result<Settings> {
    settings::load_settings(explicit).context("Failed to load settings")
}
