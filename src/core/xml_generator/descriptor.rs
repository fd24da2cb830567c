//! Assembles the complete tool descriptor document.

use super::{GeneratorError, command::build_command, params::build_params, script::ScriptModel};
use crate::{
    core::xml::{self, XmlElement},
    models::Settings,
};

/// Builds the descriptor tree of `script`.
///
/// Layout: `tool(id, name, version)` holding `description`, `requirements`, `command`,
/// `inputs`, `outputs` and `help`, in that order.
pub fn build_descriptor(
    script: &ScriptModel,
    settings: &Settings,
) -> Result<XmlElement, GeneratorError> {
    let command = build_command(script, &settings.archive)?;
    let params = build_params(script);

    let tool = XmlElement::new("tool")
        .with_attr("id", &script.id)
        .with_attr("name", &script.display_name)
        .with_attr("version", &script.version)
        .with_child(XmlElement::new("description").with_text(&script.brief_description))
        .with_child(
            XmlElement::new("requirements").with_child(
                XmlElement::new("requirement")
                    .with_attr("type", "package")
                    .with_text(&settings.requirement.package),
            ),
        )
        .with_child(XmlElement::new("command").with_text(command))
        .with_child(XmlElement::new("inputs").with_children(params.inputs))
        .with_child(XmlElement::new("outputs").with_children(params.outputs))
        .with_child(XmlElement::new("help").with_text(&script.help));
    Ok(tool)
}

/// Builds and serializes the descriptor of `script`.
pub fn generate_descriptor(
    script: &ScriptModel,
    settings: &Settings,
) -> Result<String, GeneratorError> {
    let tool = build_descriptor(script, settings)?;
    log::debug!(
        "Generated descriptor for '{}' ({} required, {} optional options)",
        script.id,
        script.required_options.len(),
        script.optional_options.len()
    );
    Ok(xml::to_pretty_string(&tool))
}
