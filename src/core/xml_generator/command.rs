//! # Command Template
//!
//! Builds the Cheetah text of the descriptor's `<command>` block. Options are folded in
//! order (required first, then optional) into a [`TemplateParts`] accumulator; the final
//! text is `unarchive + list helper + base command + fragments + archive`.

use super::{GeneratorError, kinds::OptionKind, option::OptionModel, script::ScriptModel};
use crate::{
    constants::{
        INPUT_DIR_SUFFIX, LIST_FLATTEN_FN, LIST_FLATTEN_HELPER, OUTPUT_DIR_SUFFIX,
        REPEAT_GROUP_PREFIX,
    },
    models::ArchiveSettings,
};

/// Accumulated pieces of a template.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct TemplateParts {
    /// Inline fragments, appended to the base command in order.
    body: String,
    /// Leading extraction of the `input_dir` archive.
    unarchive: Option<String>,
    /// Trailing compression of the `output_dir` directory.
    archive: Option<String>,
}

/// Builds the full command template of `script`.
pub fn build_command(
    script: &ScriptModel,
    archive: &ArchiveSettings,
) -> Result<String, GeneratorError> {
    let parts = script
        .options()
        .try_fold(TemplateParts::default(), |parts, (opt, optional)| {
            parts.push(script, opt, optional, archive)
        })?;

    let uses_list_helper = script.options().any(|(opt, _)| opt.kind == OptionKind::Repeat);

    let mut text = parts.unarchive.unwrap_or_default();
    if uses_list_helper {
        text.push_str(LIST_FLATTEN_HELPER);
    }
    text.push_str(&script.command);
    text.push_str(&parts.body);
    text.push_str(&parts.archive.unwrap_or_default());
    Ok(text)
}

impl TemplateParts {
    fn push(
        mut self,
        script: &ScriptModel,
        opt: &OptionModel,
        optional: bool,
        archive: &ArchiveSettings,
    ) -> Result<Self, GeneratorError> {
        let fragment = match opt.kind {
            OptionKind::Text => guard_if(optional, format!("str(${})", opt.name), value_fragment(opt)),
            OptionKind::Integer | OptionKind::Float => {
                guard_if(optional, format!("${}", opt.name), value_fragment(opt))
            }
            OptionKind::Data | OptionKind::Select | OptionKind::MultipleSelect => guard_if(
                optional,
                format!("str(${}) != 'None'", opt.name),
                value_fragment(opt),
            ),
            // A switch is only passed when ticked, required or not.
            OptionKind::Boolean => guard(&format!("${}", opt.name), &format!(" {}", opt.flag())),
            OptionKind::Repeat => {
                let group = format!("{}{}", REPEAT_GROUP_PREFIX, opt.name);
                let fragment = format!(
                    " {}{}${}(${})",
                    opt.flag(),
                    opt.separator(),
                    LIST_FLATTEN_FN,
                    group
                );
                guard_if(optional, format!("${}", group), fragment)
            }
            // Outputs are always passed through.
            OptionKind::Output => value_fragment(opt),
            OptionKind::OutputDir => {
                if self.archive.is_some() {
                    return Err(GeneratorError::DuplicateDirectoryOption { kind: opt.kind });
                }
                let local_dir = format!("{}{}", script.id, OUTPUT_DIR_SUFFIX);
                self.archive = Some(format!(
                    ";\n{} -i {} -o ${}\n",
                    archive.compress_command, local_dir, opt.name
                ));
                format!(" {}{}{}", opt.flag(), opt.separator(), local_dir)
            }
            OptionKind::InputDir => {
                if self.unarchive.is_some() {
                    return Err(GeneratorError::DuplicateDirectoryOption { kind: opt.kind });
                }
                let local_dir = format!("{}{}", script.id, INPUT_DIR_SUFFIX);
                self.unarchive = Some(format!(
                    "{} -i ${} -o {};\n",
                    archive.extract_command, opt.name, local_dir
                ));
                format!(" {}{}{}", opt.flag(), opt.separator(), local_dir)
            }
        };
        self.body.push_str(&fragment);
        Ok(self)
    }
}

/// `" <flag><sep>$<name>"`
fn value_fragment(opt: &OptionModel) -> String {
    format!(" {}{}${}", opt.flag(), opt.separator(), opt.name)
}

fn guard(condition: &str, fragment: &str) -> String {
    format!("\n#if {}:\n{}\n#end if\n", condition, fragment)
}

fn guard_if(optional: bool, condition: String, fragment: String) -> String {
    if optional { guard(&condition, &fragment) } else { fragment }
}
