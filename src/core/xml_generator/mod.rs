//! # Descriptor Generator
//!
//! Compiles a script's declared options into a Galaxy tool descriptor. The pipeline is
//! strictly one-way:
//!
//! 1. [`kinds::map_kind`] normalizes each source type tag.
//! 2. [`OptionModel::from_raw`] builds the immutable per-option model.
//! 3. [`ScriptModel`] aggregates the options and supports removing optional ones.
//! 4. [`command::build_command`] and [`params::build_params`] each fold over the options.
//! 5. [`descriptor::generate_descriptor`] assembles and serializes the document.
//!
//! Every stage is a pure function of its input, so generating twice yields identical text.

pub mod command;
pub mod descriptor;
pub mod kinds;
pub mod option;
pub mod params;
pub mod script;

pub use descriptor::{build_descriptor, generate_descriptor};
pub use kinds::{OptionKind, OutputFormat, map_kind};
pub use option::OptionModel;
pub use script::ScriptModel;

use thiserror::Error;

/// Errors raised while turning option metadata into a descriptor.
/// All of them point at a mistake in the metadata, none are transient.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    /// The option's source type has no Galaxy counterpart.
    #[error("Option type '{type_name}' is not supported by Galaxy")]
    UnsupportedOptionType {
        /// The offending source type tag.
        type_name: String,
    },
    /// A removal target is missing or names a required option.
    #[error("Option '{name}' does not exist or is a required option")]
    OptionNotRemovable {
        /// The name passed to the removal.
        name: String,
    },
    /// A second `input_dir` or `output_dir` option was found.
    #[error("Only one option of kind '{kind}' is allowed per script")]
    DuplicateDirectoryOption {
        /// Either `input_dir` or `output_dir`.
        kind: OptionKind,
    },
    /// None of the option's flags is a valid short or long flag.
    #[error("Option has no valid flag among {flags:?}")]
    InvalidOptionFlags {
        /// The flags as declared.
        flags: Vec<String>,
    },
    /// A select option was declared without its choice list.
    #[error("Option '{name}' of kind '{kind}' declares no choices")]
    MissingChoices {
        /// The option name.
        name: String,
        /// `select` or `multiple_select`.
        kind: OptionKind,
    },
    /// Two options of the same script share a name.
    #[error("Option name '{name}' is declared more than once")]
    DuplicateOptionName {
        /// The clashing name.
        name: String,
    },
}
