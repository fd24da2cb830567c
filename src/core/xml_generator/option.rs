use super::{
    GeneratorError,
    kinds::{OptionKind, OutputFormat, map_kind},
};
use crate::{
    constants::{BOOLEAN_UNSET, DEFAULT_PLACEHOLDER},
    models::RawOption,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref SHORT_FLAG_RE: Regex = Regex::new(r"^-[A-Za-z0-9]$").unwrap();
    static ref LONG_FLAG_RE: Regex = Regex::new(r"^--[A-Za-z0-9][A-Za-z0-9_-]*$").unwrap();
}

/// One normalized option. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionModel {
    /// Parameter name, also the Cheetah variable name in the command template.
    pub name: String,
    pub kind: OptionKind,
    /// `-x` form, if declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_flag: Option<String>,
    /// `--name` form, if declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_flag: Option<String>,
    /// Help text, still carrying the `%default` placeholder.
    pub label: String,
    /// Stringified default. Booleans always hold [`BOOLEAN_UNSET`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Allowed values. Present exactly for the select kinds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
    /// Dataset format. Present exactly for the output kinds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_format: Option<OutputFormat>,
}

impl OptionModel {
    /// Normalizes a raw option record.
    ///
    /// The name comes from the long flag when there is one, otherwise from the short flag,
    /// with the leading dashes stripped.
    pub fn from_raw(raw: &RawOption) -> Result<Self, GeneratorError> {
        let (short_flag, long_flag) = split_flags(&raw.flags)?;
        let name = long_flag
            .as_deref()
            .or(short_flag.as_deref())
            .map(|flag| flag.trim_start_matches('-').to_string())
            .ok_or_else(|| GeneratorError::InvalidOptionFlags {
                flags: raw.flags.clone(),
            })?;

        let kind = map_kind(raw.source_type(), raw.is_boolean_action())?;

        let default = if kind == OptionKind::Boolean {
            Some(BOOLEAN_UNSET.to_string())
        } else {
            raw.default.as_ref().and_then(|d| d.render())
        };

        let choices = match kind {
            OptionKind::Select => Some(raw.choices.clone()),
            OptionKind::MultipleSelect => Some(raw.mchoices.clone()),
            _ => None,
        };
        let choices = match choices {
            Some(Some(list)) => Some(list),
            Some(None) => return Err(GeneratorError::MissingChoices { name, kind }),
            None => None,
        };

        log::trace!("Normalized option '{}' as {}", name, kind);

        Ok(Self {
            name,
            kind,
            short_flag,
            long_flag,
            label: raw.help.clone(),
            default,
            choices,
            output_format: kind.output_format(),
        })
    }

    /// The flag written on the command line. Short flags win.
    pub fn flag(&self) -> &str {
        self.short_flag
            .as_deref()
            .or(self.long_flag.as_deref())
            .unwrap_or_default()
    }

    /// `" "` after a short flag, `"="` after a lone long flag.
    pub fn separator(&self) -> &'static str {
        if self.short_flag.is_some() { " " } else { "=" }
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// The label with `%default` replaced by the default, or `None` when there is none.
    pub fn display_label(&self) -> String {
        let default = self.default.as_deref().unwrap_or("None");
        self.label.replace(DEFAULT_PLACEHOLDER, default)
    }
}

/// Picks the first short and the first long flag. Any malformed flag rejects the record.
fn split_flags(flags: &[String]) -> Result<(Option<String>, Option<String>), GeneratorError> {
    let invalid = || GeneratorError::InvalidOptionFlags {
        flags: flags.to_vec(),
    };
    let mut short = None;
    let mut long = None;
    for flag in flags {
        if SHORT_FLAG_RE.is_match(flag) {
            short.get_or_insert_with(|| flag.clone());
        } else if LONG_FLAG_RE.is_match(flag) {
            long.get_or_insert_with(|| flag.clone());
        } else {
            return Err(invalid());
        }
    }
    if short.is_none() && long.is_none() {
        return Err(invalid());
    }
    Ok((short, long))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawDefault;

    fn raw(flags: &[&str], option_type: Option<&str>) -> RawOption {
        RawOption {
            flags: flags.iter().map(|f| f.to_string()).collect(),
            option_type: option_type.map(str::to_string),
            help: "An example, [default: %default]".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_name_comes_from_long_flag() {
        let opt = OptionModel::from_raw(&raw(&["-i", "--input_fp"], Some("existing_filepath"))).unwrap();
        assert_eq!(opt.name, "input_fp");
        assert_eq!(opt.kind, OptionKind::Data);
        assert_eq!(opt.flag(), "-i");
        assert_eq!(opt.separator(), " ");
    }

    #[test]
    fn test_lone_flags() {
        let long_only = OptionModel::from_raw(&raw(&["--foo-bar"], None)).unwrap();
        assert_eq!(long_only.name, "foo-bar");
        assert_eq!(long_only.flag(), "--foo-bar");
        assert_eq!(long_only.separator(), "=");
        assert_eq!(long_only.kind, OptionKind::Text);

        let short_only = OptionModel::from_raw(&raw(&["-x"], Some("int"))).unwrap();
        assert_eq!(short_only.name, "x");
        assert_eq!(short_only.separator(), " ");
    }

    #[test]
    fn test_invalid_flags_are_rejected() {
        for flags in [vec![], vec!["input"], vec!["-i", "-input"], vec!["---x"]] {
            let err = OptionModel::from_raw(&raw(&flags, None)).unwrap_err();
            assert!(
                matches!(err, GeneratorError::InvalidOptionFlags { .. }),
                "flags {:?}",
                flags
            );
        }
    }

    #[test]
    fn test_boolean_default_is_always_unset() {
        let mut r = raw(&["-v", "--verbose"], None);
        r.action = Some("store_true".to_string());
        r.default = Some(RawDefault::Flag(true));
        let opt = OptionModel::from_raw(&r).unwrap();
        assert_eq!(opt.kind, OptionKind::Boolean);
        assert_eq!(opt.default.as_deref(), Some("False"));
    }

    #[test]
    fn test_sequence_default_means_no_default() {
        let mut r = raw(&["-n", "--names"], None);
        r.default = Some(RawDefault::Sequence(vec![]));
        let opt = OptionModel::from_raw(&r).unwrap();
        assert!(!opt.has_default());
        assert_eq!(opt.display_label(), "An example, [default: None]");
    }

    #[test]
    fn test_display_label_substitutes_default() {
        let mut r = raw(&["-f", "--float"], Some("float"));
        r.default = Some(RawDefault::Float(1.5));
        let opt = OptionModel::from_raw(&r).unwrap();
        assert_eq!(opt.display_label(), "An example, [default: 1.5]");
        // The raw label is kept for re-rendering.
        assert!(opt.label.contains(DEFAULT_PLACEHOLDER));
    }

    #[test]
    fn test_choices_follow_kind() {
        let mut select = raw(&["-c", "--choice"], Some("choice"));
        select.choices = Some(vec!["a".into(), "b".into()]);
        select.mchoices = Some(vec!["ignored".into()]);
        let opt = OptionModel::from_raw(&select).unwrap();
        assert_eq!(opt.choices, Some(vec!["a".to_string(), "b".to_string()]));

        let mut multi = raw(&["-m", "--multi"], Some("multiple_choice"));
        multi.choices = Some(vec!["ignored".into()]);
        multi.mchoices = Some(vec!["x".into()]);
        let opt = OptionModel::from_raw(&multi).unwrap();
        assert_eq!(opt.choices, Some(vec!["x".to_string()]));

        let mut text = raw(&["-t"], None);
        text.choices = Some(vec!["a".into()]);
        assert_eq!(OptionModel::from_raw(&text).unwrap().choices, None);
    }

    #[test]
    fn test_select_without_choices_fails() {
        let err = OptionModel::from_raw(&raw(&["-c", "--choice"], Some("choice"))).unwrap_err();
        assert_eq!(
            err,
            GeneratorError::MissingChoices {
                name: "choice".to_string(),
                kind: OptionKind::Select
            }
        );
    }

    #[test]
    fn test_output_format_is_derived() {
        let out = OptionModel::from_raw(&raw(&["-o"], Some("new_filepath"))).unwrap();
        assert_eq!(out.output_format, Some(OutputFormat::Plain));
        let dir = OptionModel::from_raw(&raw(&["-o"], Some("new_path"))).unwrap();
        assert_eq!(dir.output_format, Some(OutputFormat::Archive));
    }

    #[test]
    fn test_unsupported_type_propagates() {
        let err = OptionModel::from_raw(&raw(&["-b"], Some("blast_db"))).unwrap_err();
        assert!(matches!(err, GeneratorError::UnsupportedOptionType { .. }));
    }
}
