//! Builds the `<inputs>` and `<outputs>` children of a descriptor.

use super::{kinds::OptionKind, option::OptionModel, script::ScriptModel};
use crate::{
    constants::{BOOLEAN_UNSET, NO_SELECTION_LABEL, NO_SELECTION_VALUE, REPEAT_GROUP_PREFIX, REPEAT_ITEM_PARAM},
    core::xml::XmlElement,
};

/// Input and output nodes, in option order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParamNodes {
    pub inputs: Vec<XmlElement>,
    pub outputs: Vec<XmlElement>,
}

/// Folds every option of `script` into its parameter or output node.
pub fn build_params(script: &ScriptModel) -> ParamNodes {
    script
        .options()
        .fold(ParamNodes::default(), |mut nodes, (opt, optional)| {
            match opt.kind {
                OptionKind::Output | OptionKind::OutputDir => nodes.outputs.push(output_node(opt)),
                _ => nodes.inputs.push(input_node(opt, optional)),
            }
            nodes
        })
}

fn python_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

fn base_param(opt: &OptionModel, type_name: &str) -> XmlElement {
    XmlElement::new("param")
        .with_attr("name", &opt.name)
        .with_attr("type", type_name)
        .with_attr("label", opt.display_label())
}

fn input_node(opt: &OptionModel, optional: bool) -> XmlElement {
    match opt.kind {
        OptionKind::Text | OptionKind::Float | OptionKind::Data | OptionKind::Integer => {
            let mut param =
                base_param(opt, opt.kind.as_str()).with_attr("optional", python_bool(optional));
            if let Some(default) = &opt.default {
                param.set_attr("default", default);
            }
            // Integers have no natural empty state.
            if opt.kind == OptionKind::Integer && !optional {
                param.set_attr("value", "0");
            }
            param
        }
        OptionKind::InputDir => base_param(opt, OptionKind::Data.as_str()),
        OptionKind::Select => select_node(opt, optional, false),
        OptionKind::MultipleSelect => select_node(opt, optional, true),
        OptionKind::Repeat => XmlElement::new("repeat")
            .with_attr("name", format!("{}{}", REPEAT_GROUP_PREFIX, opt.name))
            .with_attr("title", &opt.name)
            .with_attr("optional", python_bool(optional))
            .with_child(
                XmlElement::new("param")
                    .with_attr("name", REPEAT_ITEM_PARAM)
                    .with_attr("type", OptionKind::Data.as_str())
                    .with_attr("label", opt.display_label()),
            ),
        OptionKind::Boolean => base_param(opt, opt.kind.as_str())
            .with_attr("selected", opt.default.as_deref().unwrap_or(BOOLEAN_UNSET)),
        // Routed to the outputs by `build_params`.
        OptionKind::Output | OptionKind::OutputDir => output_node(opt),
    }
}

fn select_node(opt: &OptionModel, optional: bool, multiple: bool) -> XmlElement {
    let mut param =
        base_param(opt, OptionKind::Select.as_str()).with_attr("optional", python_bool(optional));
    if multiple {
        param.set_attr("multiple", "True");
    }
    if optional {
        param.push_child(
            XmlElement::new("option")
                .with_attr("value", NO_SELECTION_VALUE)
                .with_attr("selected", "True")
                .with_text(NO_SELECTION_LABEL),
        );
    }
    param.with_children(opt.choices.iter().flatten().map(|choice| {
        XmlElement::new("option")
            .with_attr("value", choice)
            .with_text(choice)
    }))
}

fn output_node(opt: &OptionModel) -> XmlElement {
    let mut data = XmlElement::new("data").with_attr("name", &opt.name);
    if let Some(format) = opt.output_format {
        data.set_attr("format", format.galaxy_format());
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RawDefault, RawOption, ScriptInfo};

    fn opt(flags: &[&str], option_type: &str) -> RawOption {
        RawOption {
            flags: flags.iter().map(|f| f.to_string()).collect(),
            option_type: Some(option_type.to_string()),
            help: "An example [default: %default]".to_string(),
            ..Default::default()
        }
    }

    fn nodes(required: Vec<RawOption>, optional: Vec<RawOption>) -> ParamNodes {
        let info = ScriptInfo {
            version: "1.0".to_string(),
            required_options: required,
            optional_options: optional,
            ..Default::default()
        };
        build_params(&ScriptModel::from_info("script", &info).unwrap())
    }

    #[test]
    fn test_required_integer_without_default() {
        let nodes = nodes(vec![opt(&["-n", "--integer"], "int")], vec![]);
        let param = &nodes.inputs[0];
        assert_eq!(param.attr("value"), Some("0"));
        assert_eq!(param.attr("optional"), Some("False"));
        assert_eq!(param.attr("default"), None);
        assert_eq!(param.attr("type"), Some("integer"));
        assert_eq!(param.attr("label"), Some("An example [default: None]"));
    }

    #[test]
    fn test_optional_text_with_default() {
        let mut text = opt(&["-t", "--text"], "string");
        text.default = Some(RawDefault::Text("abc".to_string()));
        let nodes = nodes(vec![], vec![text]);
        let param = &nodes.inputs[0];
        assert_eq!(param.attr("default"), Some("abc"));
        assert_eq!(param.attr("optional"), Some("True"));
        assert_eq!(param.attr("value"), None);
        assert_eq!(param.attr("label"), Some("An example [default: abc]"));
    }

    #[test]
    fn test_required_float_has_no_fallback_value() {
        let nodes = nodes(vec![opt(&["-f"], "float")], vec![]);
        assert_eq!(nodes.inputs[0].attr("value"), None);
    }

    #[test]
    fn test_optional_select_has_sentinel_first() {
        let mut select = opt(&["-c", "--choice_ex"], "choice");
        select.choices = Some(vec!["a".into(), "b".into(), "c".into()]);
        let nodes = nodes(vec![], vec![select]);
        let param = &nodes.inputs[0];
        assert_eq!(param.attr("optional"), Some("True"));
        let options: Vec<_> = param.elements().collect();
        assert_eq!(options.len(), 4);
        assert_eq!(options[0].attr("value"), Some("None"));
        assert_eq!(options[0].attr("selected"), Some("True"));
        assert_eq!(options[0].text(), "Selection is Optional");
        let values: Vec<_> = options[1..].iter().map(|o| o.text()).collect();
        assert_eq!(values, vec!["a", "b", "c"]);
        assert!(options[1..].iter().all(|o| o.attr("selected").is_none()));
    }

    #[test]
    fn test_required_multiple_select() {
        let mut multi = opt(&["-m", "--multi"], "multiple_choice");
        multi.mchoices = Some(vec!["x".into(), "y".into()]);
        let nodes = nodes(vec![multi], vec![]);
        let param = &nodes.inputs[0];
        assert_eq!(param.attr("type"), Some("select"));
        assert_eq!(param.attr("multiple"), Some("True"));
        assert_eq!(param.attr("optional"), Some("False"));
        assert_eq!(param.elements().count(), 2);
    }

    #[test]
    fn test_repeat_group() {
        let nodes = nodes(vec![], vec![opt(&["-r", "--repeat_ex"], "existing_filepaths")]);
        let group = &nodes.inputs[0];
        assert_eq!(group.name, "repeat");
        assert_eq!(group.attr("name"), Some("input_files_repeat_ex"));
        assert_eq!(group.attr("title"), Some("repeat_ex"));
        assert_eq!(group.attr("optional"), Some("True"));
        let item = group.elements().next().unwrap();
        assert_eq!(item.attr("name"), Some("additional_input"));
        assert_eq!(item.attr("type"), Some("data"));
    }

    #[test]
    fn test_input_dir_is_a_bare_data_param() {
        let nodes = nodes(vec![opt(&["-i", "--input_fp"], "existing_path")], vec![]);
        let param = &nodes.inputs[0];
        assert_eq!(param.attr("type"), Some("data"));
        assert_eq!(param.attr("optional"), None);
        assert_eq!(param.attr("default"), None);
    }

    #[test]
    fn test_outputs_go_to_outputs() {
        let nodes = nodes(
            vec![opt(&["-o", "--output_fp"], "new_path")],
            vec![opt(&["-l", "--log_fp"], "new_filepath")],
        );
        assert!(nodes.inputs.is_empty());
        assert_eq!(nodes.outputs.len(), 2);
        assert_eq!(nodes.outputs[0].attr("format"), Some("tgz"));
        assert_eq!(nodes.outputs[1].attr("format"), Some("txt"));
        assert_eq!(nodes.outputs[1].attr("name"), Some("log_fp"));
    }

    #[test]
    fn test_boolean_param() {
        let switch = RawOption {
            flags: vec!["-v".into(), "--verbose".into()],
            action: Some("store_true".into()),
            help: "Print information".into(),
            ..Default::default()
        };
        let nodes = nodes(vec![], vec![switch]);
        let param = &nodes.inputs[0];
        assert_eq!(param.attr("type"), Some("boolean"));
        assert_eq!(param.attr("selected"), Some("False"));
        assert_eq!(param.attr("optional"), None);
    }
}
