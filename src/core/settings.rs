//! Loads the user settings (`settings.toml`).
//!
//! Resolution order: an explicit `--settings` path, then `$TOOLWRAP_SETTINGS`, then
//! `settings.toml` in the config directory. Only the last one may be absent, in which
//! case the built-in defaults apply.

use crate::{
    constants::SETTINGS_ENV_VAR,
    core::paths::{self, PathError},
    models::Settings,
};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error(transparent)]
    Path(#[from] PathError),
    #[error("Settings file '{0}' does not exist")]
    NotFound(PathBuf),
    #[error("Failed to read settings file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse settings file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Where the settings come from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SettingsSource {
    /// Given by flag or environment; must exist.
    Required(PathBuf),
    /// The default location; may be missing.
    Default(PathBuf),
}

/// Loads the effective settings. `explicit` is the value of `--settings`.
pub fn load_settings(explicit: Option<&str>) -> Result<Settings, SettingsError> {
    let env_value = env::var(SETTINGS_ENV_VAR).ok();
    let source = resolve_source(explicit, env_value.as_deref())?;
    log::debug!("Settings source: {:?}", source);

    match source {
        SettingsSource::Required(path) => {
            if !path.is_file() {
                return Err(SettingsError::NotFound(path));
            }
            read_settings_file(&path)
        }
        SettingsSource::Default(path) if path.is_file() => read_settings_file(&path),
        SettingsSource::Default(_) => Ok(Settings::default()),
    }
}

fn resolve_source(
    explicit: Option<&str>,
    env_value: Option<&str>,
) -> Result<SettingsSource, SettingsError> {
    let chosen = explicit.or(env_value).filter(|s| !s.trim().is_empty());
    match chosen {
        Some(template) => Ok(SettingsSource::Required(paths::expand_user_path(template)?)),
        None => Ok(SettingsSource::Default(paths::get_default_settings_path()?)),
    }
}

/// Reads and parses one settings file.
pub fn read_settings_file(path: &Path) -> Result<Settings, SettingsError> {
    let content = fs::read_to_string(path).map_err(|e| SettingsError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| SettingsError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}
