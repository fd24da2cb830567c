//! Source type tags and the Galaxy parameter kinds they map to.

use super::GeneratorError;
use serde::Serialize;
use std::fmt;

/// The normalized parameter category of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    /// Free-form string.
    Text,
    Integer,
    Float,
    /// A switch without a value.
    Boolean,
    /// One value out of `choices`.
    Select,
    /// Any number of values out of `choices`.
    MultipleSelect,
    /// An existing input file.
    Data,
    /// A list of input files, passed as one comma-separated argument.
    Repeat,
    /// An input directory, shipped to the tool as an archive.
    InputDir,
    /// A single output file.
    Output,
    /// An output directory, archived after the run.
    OutputDir,
}

impl OptionKind {
    /// The tag Galaxy expects in a param's `type` attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Select => "select",
            Self::MultipleSelect => "multiple_select",
            Self::Data => "data",
            Self::Repeat => "repeat",
            Self::InputDir => "input_dir",
            Self::Output => "output",
            Self::OutputDir => "output_dir",
        }
    }

    /// The file format of the dataset an output kind produces.
    pub fn output_format(self) -> Option<OutputFormat> {
        match self {
            Self::Output => Some(OutputFormat::Plain),
            Self::OutputDir => Some(OutputFormat::Archive),
            _ => None,
        }
    }

    /// Whether the kind carries a list of choices.
    pub fn has_choices(self) -> bool {
        matches!(self, Self::Select | Self::MultipleSelect)
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format of a generated output dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// A single plain-text file.
    Plain,
    /// A directory shipped as a gzipped tarball.
    Archive,
}

impl OutputFormat {
    /// Galaxy datatype extension.
    pub fn galaxy_format(self) -> &'static str {
        match self {
            Self::Plain => "txt",
            Self::Archive => "tgz",
        }
    }
}

/// Maps a source type tag to its kind. A boolean action wins over the tag.
pub fn map_kind(source_type: &str, is_boolean_action: bool) -> Result<OptionKind, GeneratorError> {
    if is_boolean_action {
        return Ok(OptionKind::Boolean);
    }
    let kind = match source_type {
        "string" => OptionKind::Text,
        "int" => OptionKind::Integer,
        "long" | "float" => OptionKind::Float,
        "choice" => OptionKind::Select,
        "multiple_choice" => OptionKind::MultipleSelect,
        "existing_filepath" => OptionKind::Data,
        "existing_filepaths" => OptionKind::Repeat,
        "existing_dirpath" | "existing_path" => OptionKind::InputDir,
        "new_filepath" => OptionKind::Output,
        "new_dirpath" | "new_path" => OptionKind::OutputDir,
        other => {
            return Err(GeneratorError::UnsupportedOptionType {
                type_name: other.to_string(),
            });
        }
    };
    Ok(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &[(&str, OptionKind)] = &[
        ("string", OptionKind::Text),
        ("int", OptionKind::Integer),
        ("long", OptionKind::Float),
        ("float", OptionKind::Float),
        ("choice", OptionKind::Select),
        ("multiple_choice", OptionKind::MultipleSelect),
        ("existing_filepath", OptionKind::Data),
        ("existing_filepaths", OptionKind::Repeat),
        ("existing_dirpath", OptionKind::InputDir),
        ("existing_path", OptionKind::InputDir),
        ("new_filepath", OptionKind::Output),
        ("new_dirpath", OptionKind::OutputDir),
        ("new_path", OptionKind::OutputDir),
    ];

    #[test]
    fn test_map_kind_table() {
        for (tag, expected) in TABLE {
            assert_eq!(map_kind(tag, false).unwrap(), *expected, "tag '{}'", tag);
        }
    }

    #[test]
    fn test_map_kind_is_deterministic() {
        for (tag, _) in TABLE {
            for boolean in [false, true] {
                assert_eq!(map_kind(tag, boolean).unwrap(), map_kind(tag, boolean).unwrap());
            }
        }
    }

    #[test]
    fn test_boolean_action_overrides_type() {
        assert_eq!(map_kind("string", true).unwrap(), OptionKind::Boolean);
        // Even an unknown tag is irrelevant for a boolean switch.
        assert_eq!(map_kind("whatever", true).unwrap(), OptionKind::Boolean);
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let err = map_kind("blast_db", false).unwrap_err();
        assert_eq!(
            err,
            GeneratorError::UnsupportedOptionType {
                type_name: "blast_db".to_string()
            }
        );
        assert!(err.to_string().contains("blast_db"));
    }

    #[test]
    fn test_output_formats() {
        assert_eq!(OptionKind::Output.output_format(), Some(OutputFormat::Plain));
        assert_eq!(OptionKind::OutputDir.output_format(), Some(OutputFormat::Archive));
        assert_eq!(OptionKind::Data.output_format(), None);
        assert_eq!(OutputFormat::Archive.galaxy_format(), "tgz");
        assert_eq!(OutputFormat::Plain.galaxy_format(), "txt");
    }
}
