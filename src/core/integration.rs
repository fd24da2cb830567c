//! # Galaxy Integration
//!
//! Batch driver behind `toolwrap integrate`: generates a descriptor for every configured
//! script found in a scripts directory, files them under `<galaxy>/tools/<section_id>/`
//! and merges them into `<galaxy>/tool_conf.xml`.
//!
//! A failing script is reported and skipped; it never aborts the batch.

use crate::{
    constants::{INTEGRATION_LOG_FILENAME, REGISTRY_FILENAME, SCRIPT_METADATA_EXTENSION, TOOLS_DIRNAME},
    core::{
        paths,
        registry::{self, Registry, RegistryError},
        script_loader,
    },
    models::{IntegrationConfig, Settings},
    state::TrackedRegistry,
};
use anyhow::{Context, Result};
use std::{
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum IntegrationError {
    /// The Galaxy directory lacks `tools/` or `tool_conf.xml`.
    #[error("'{path}' is not a Galaxy installation: missing '{missing}'")]
    InvalidGalaxyRoot { path: PathBuf, missing: String },
    #[error("Failed to parse integration config '{path}': {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Inputs of one integration run.
#[derive(Debug, Clone)]
pub struct IntegrationOptions {
    pub scripts_dir: PathBuf,
    pub galaxy_dir: PathBuf,
    pub config_path: PathBuf,
    /// Merge into the existing registry instead of starting a fresh one.
    pub update: bool,
    /// Defaults to `<scripts_dir>/integration.log`.
    pub log_path: Option<PathBuf>,
}

/// What happened to each script.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IntegrationReport {
    pub generated: Vec<String>,
    /// Scripts found on disk but absent from the config.
    pub skipped: Vec<String>,
    /// Script id and failure reason.
    pub failed: Vec<(String, String)>,
    pub registry_written: bool,
    pub registry_path: PathBuf,
    pub log_path: PathBuf,
}

/// Reads and validates an integration config.
pub fn load_config(path: &Path) -> Result<IntegrationConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read integration config '{}'", path.display()))?;
    let config: IntegrationConfig =
        toml::from_str(&content).map_err(|e| IntegrationError::Config {
            path: path.to_path_buf(),
            source: e,
        })?;
    registry::validate_config(&config).map_err(IntegrationError::from)?;
    Ok(config)
}

/// Checks the Galaxy layout and returns the registry path.
pub fn check_galaxy_root(galaxy_dir: &Path) -> Result<PathBuf, IntegrationError> {
    let invalid = |missing: &str| IntegrationError::InvalidGalaxyRoot {
        path: galaxy_dir.to_path_buf(),
        missing: missing.to_string(),
    };
    if !galaxy_dir.join(TOOLS_DIRNAME).is_dir() {
        return Err(invalid(TOOLS_DIRNAME));
    }
    let registry_path = galaxy_dir.join(REGISTRY_FILENAME);
    if !registry_path.is_file() {
        return Err(invalid(REGISTRY_FILENAME));
    }
    Ok(registry_path)
}

/// Creates `<galaxy>/tools/<section_id>/` for every declared section.
fn create_section_dirs(galaxy_dir: &Path, config: &IntegrationConfig) -> Result<()> {
    for section in &config.sections {
        let dir = section_dir(galaxy_dir, section);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create section directory '{}'", dir.display()))?;
    }
    Ok(())
}

fn section_dir(galaxy_dir: &Path, section: &str) -> PathBuf {
    galaxy_dir
        .join(TOOLS_DIRNAME)
        .join(registry::section_id(section))
}

/// Metadata files under `scripts_dir`, sorted by path, excluding `exclude`.
fn discover_scripts(scripts_dir: &Path, exclude: &[PathBuf]) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = WalkDir::new(scripts_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension().and_then(|e| e.to_str()) == Some(SCRIPT_METADATA_EXTENSION)
        })
        .filter(|path| {
            let canonical = dunce::canonicalize(path).unwrap_or_else(|_| path.clone());
            !exclude.contains(&canonical)
        })
        .collect();
    found.sort();
    found
}

/// Runs a full integration.
pub fn integrate(options: &IntegrationOptions, settings: &Settings) -> Result<IntegrationReport> {
    let config = load_config(&options.config_path)?;
    let registry_path = check_galaxy_root(&options.galaxy_dir)?;
    create_section_dirs(&options.galaxy_dir, &config)?;

    let mut registry = if options.update {
        let text = fs::read_to_string(&registry_path)
            .with_context(|| format!("Failed to read registry '{}'", registry_path.display()))?;
        let parsed = Registry::parse(&text)
            .with_context(|| format!("Invalid registry '{}'", registry_path.display()))?;
        TrackedRegistry::loaded(parsed)
    } else {
        TrackedRegistry::fresh(Registry::default())
    };

    let log_path = options
        .log_path
        .clone()
        .unwrap_or_else(|| options.scripts_dir.join(INTEGRATION_LOG_FILENAME));

    let mut report = IntegrationReport {
        registry_path: registry_path.clone(),
        log_path: log_path.clone(),
        ..Default::default()
    };
    let mut log_text = String::new();

    let exclude: Vec<PathBuf> = [&options.config_path, &log_path]
        .into_iter()
        .filter_map(|p| paths::canonicalize(p).ok())
        .collect();

    for script_path in discover_scripts(&options.scripts_dir, &exclude) {
        let Some(id) = paths::file_stem_id(&script_path) else {
            continue;
        };
        let _ = write!(log_text, "Generating XML file for {} script... ", id);

        let Some(placement) = config.scripts.get(&id) else {
            log::info!("Skipping '{}': not in the integration config", id);
            log_text.push_str("skipped - not in configuration file\n");
            report.skipped.push(id);
            continue;
        };

        let output_dir = section_dir(&options.galaxy_dir, &placement.section);
        match script_loader::make_xml(&script_path, &output_dir, &placement.remove, settings) {
            Ok(_) => {
                log_text.push_str("Ok\n");
                report.generated.push(id);
            }
            Err(e) => {
                log::warn!("Failed to integrate '{}': {}", id, e);
                let _ = writeln!(log_text, "failed: {}", e);
                report.failed.push((id, e.to_string()));
            }
        }
    }

    for id in config.scripts.keys() {
        let seen = report.generated.contains(id) || report.failed.iter().any(|(f, _)| f == id);
        if !seen {
            log::warn!("Configured script '{}' was not found in '{}'", id, options.scripts_dir.display());
        }
    }

    log_text.push_str("Generating tool_conf... ");
    let plan = registry::plan_sections(&config, &report.generated).map_err(IntegrationError::from)?;
    let added = registry.merge(&plan);
    log::debug!("Merged {} new registry entries", added);
    log_text.push_str("Ok\n");

    log_text.push_str("Writing tool_conf... ");
    if registry.needs_saving() {
        script_loader::write_atomic(&registry_path, &registry.to_xml_string())
            .context("Failed to write the registry")?;
        report.registry_written = true;
        log_text.push_str("Ok\n");
    } else {
        log_text.push_str("unchanged\n");
    }

    fs::write(&log_path, log_text)
        .with_context(|| format!("Failed to write integration log '{}'", log_path.display()))?;

    Ok(report)
}
