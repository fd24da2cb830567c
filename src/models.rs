// src/models.rs

//! Serde models for everything `toolwrap` reads from disk: script metadata files,
//! the integration config and the user settings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// --- SCRIPT METADATA (`<script_id>.toml`) ---

/// The declared metadata of one command-line script.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct ScriptInfo {
    pub version: String,
    pub brief_description: String,
    pub script_description: String,
    /// Base invocation string. Falls back to the script id when absent.
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub required_options: Vec<RawOption>,
    #[serde(default)]
    pub optional_options: Vec<RawOption>,
    /// Carried by most metadata files but not used for descriptor generation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_description: Option<String>,
}

/// One option record exactly as declared by the script.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RawOption {
    /// Flag strings, e.g. `["-i", "--input_fp"]`.
    pub flags: Vec<String>,
    /// Source type tag. Absent means `string`, as with optparse.
    #[serde(rename = "type", default)]
    pub option_type: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub help: String,
    #[serde(default)]
    pub default: Option<RawDefault>,
    #[serde(default)]
    pub choices: Option<Vec<String>>,
    #[serde(default)]
    pub mchoices: Option<Vec<String>>,
}

impl RawOption {
    /// The type tag optparse would assign to this record.
    pub fn source_type(&self) -> &str {
        self.option_type.as_deref().unwrap_or("string")
    }

    /// `store_true` / `store_false` actions declare a boolean switch.
    pub fn is_boolean_action(&self) -> bool {
        matches!(self.action.as_deref(), Some("store_true" | "store_false"))
    }
}

/// A declared default value. Order matters for `untagged`: booleans and integers
/// must be tried before the more permissive variants.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum RawDefault {
    /// Rendered as `True`/`False`.
    Flag(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    /// Sequence defaults mean "no default" once normalized.
    Sequence(Vec<toml::Value>),
}

impl RawDefault {
    /// Renders the default the way the scripts' own help output shows it.
    /// Returns `None` for sequence defaults.
    pub fn render(&self) -> Option<String> {
        match self {
            Self::Flag(true) => Some("True".to_string()),
            Self::Flag(false) => Some("False".to_string()),
            Self::Integer(i) => Some(i.to_string()),
            Self::Float(f) => Some(render_float(*f)),
            Self::Text(s) => Some(s.clone()),
            Self::Sequence(_) => None,
        }
    }
}

/// Shortest round-trip form of `f`, switching to exponent notation for very small or
/// very large magnitudes. Exponents carry a sign and at least two digits (`1e-05`).
fn render_float(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let magnitude = f.abs();
    if f != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let scientific = format!("{:e}", f);
        return match scientific.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                format!("{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => scientific,
        };
    }
    if f.fract() == 0.0 {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}

// --- INTEGRATION CONFIG ---

/// Declares the registry sections and which scripts go where.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct IntegrationConfig {
    /// Section names, in the order they should appear in the registry.
    pub sections: Vec<String>,
    /// Keyed by script id.
    #[serde(default)]
    pub scripts: BTreeMap<String, ScriptPlacement>,
}

/// Where one script lands and which optional options it hides.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScriptPlacement {
    pub section: String,
    #[serde(default)]
    pub remove: Vec<String>,
}

// --- USER SETTINGS (`settings.toml`) ---

/// User-level settings. Every field has a default, so an empty file is valid.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub requirement: RequirementSettings,
    pub archive: ArchiveSettings,
}

/// The toolkit package every descriptor declares as a requirement.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct RequirementSettings {
    pub package: String,
}

impl Default for RequirementSettings {
    fn default() -> Self {
        Self {
            package: crate::constants::DEFAULT_REQUIREMENT_PACKAGE.to_string(),
        }
    }
}

/// Commands spliced into templates around directory options.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ArchiveSettings {
    pub compress_command: String,
    pub extract_command: String,
}

impl Default for ArchiveSettings {
    fn default() -> Self {
        Self {
            compress_command: crate::constants::DEFAULT_COMPRESS_COMMAND.to_string(),
            extract_command: crate::constants::DEFAULT_EXTRACT_COMMAND.to_string(),
        }
    }
}
