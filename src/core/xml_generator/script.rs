use super::{GeneratorError, kinds::OptionKind, option::OptionModel};
use crate::models::ScriptInfo;
use serde::Serialize;
use std::collections::HashSet;

/// A script's identity plus its normalized options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptModel {
    /// Tool id, taken from the metadata file stem.
    pub id: String,
    /// The id with underscores turned into spaces.
    pub display_name: String,
    pub version: String,
    /// One-line summary shown next to the tool name.
    pub brief_description: String,
    /// Long description, emitted as the descriptor's `help` element.
    pub help: String,
    /// Base invocation the option fragments are appended to.
    pub command: String,
    /// Options the script always needs, in declaration order.
    pub required_options: Vec<OptionModel>,
    /// Options emitted behind a guard, in declaration order.
    pub optional_options: Vec<OptionModel>,
}

impl ScriptModel {
    /// Builds the model of script `id` from its metadata.
    pub fn from_info(id: &str, info: &ScriptInfo) -> Result<Self, GeneratorError> {
        let required_options = info
            .required_options
            .iter()
            .map(OptionModel::from_raw)
            .collect::<Result<Vec<_>, _>>()?;
        let optional_options = info
            .optional_options
            .iter()
            .map(OptionModel::from_raw)
            .collect::<Result<Vec<_>, _>>()?;

        let mut seen = HashSet::new();
        let mut directory_kinds = HashSet::new();
        for opt in required_options.iter().chain(&optional_options) {
            if !seen.insert(opt.name.as_str()) {
                return Err(GeneratorError::DuplicateOptionName {
                    name: opt.name.clone(),
                });
            }
            if matches!(opt.kind, OptionKind::InputDir | OptionKind::OutputDir)
                && !directory_kinds.insert(opt.kind)
            {
                return Err(GeneratorError::DuplicateDirectoryOption { kind: opt.kind });
            }
        }

        Ok(Self {
            id: id.to_string(),
            display_name: id.replace('_', " "),
            version: info.version.clone(),
            brief_description: info.brief_description.clone(),
            help: info.script_description.clone(),
            command: info.command.clone().unwrap_or_else(|| id.to_string()),
            required_options,
            optional_options,
        })
    }

    /// Removes the named optional options, in order.
    ///
    /// Each name is handled on its own: the first name that is missing or required stops
    /// the call, and the removals made before it stay in effect.
    pub fn remove<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), GeneratorError> {
        for name in names {
            let name = name.as_ref();
            let position = self
                .optional_options
                .iter()
                .position(|opt| opt.name == name)
                .ok_or_else(|| GeneratorError::OptionNotRemovable {
                    name: name.to_string(),
                })?;
            let removed = self.optional_options.remove(position);
            log::debug!("Removed optional option '{}' from '{}'", removed.name, self.id);
        }
        Ok(())
    }

    /// All options in generation order, each paired with whether it is optional.
    pub fn options(&self) -> impl Iterator<Item = (&OptionModel, bool)> {
        self.required_options
            .iter()
            .map(|opt| (opt, false))
            .chain(self.optional_options.iter().map(|opt| (opt, true)))
    }
}

/// Splits a comma-separated removal list, e.g. the value of `make-xml -r`.
pub fn parse_removal_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawOption;

    fn opt(flags: &[&str], option_type: &str) -> RawOption {
        RawOption {
            flags: flags.iter().map(|f| f.to_string()).collect(),
            option_type: Some(option_type.to_string()),
            help: "help".to_string(),
            ..Default::default()
        }
    }

    fn info() -> ScriptInfo {
        ScriptInfo {
            version: "1.4.0-dev".to_string(),
            brief_description: "brief".to_string(),
            script_description: "long".to_string(),
            required_options: vec![opt(&["-i", "--input_fp"], "existing_filepath")],
            optional_options: vec![
                opt(&["-a", "--alpha"], "string"),
                opt(&["-b", "--beta"], "int"),
                opt(&["-c", "--gamma"], "float"),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_from_info() {
        let script = ScriptModel::from_info("split_libraries_fastq", &info()).unwrap();
        assert_eq!(script.display_name, "split libraries fastq");
        assert_eq!(script.command, "split_libraries_fastq");
        assert_eq!(script.required_options.len(), 1);
        assert_eq!(script.optional_options.len(), 3);
        let order: Vec<_> = script.options().map(|(o, opt)| (o.name.as_str(), opt)).collect();
        assert_eq!(
            order,
            vec![("input_fp", false), ("alpha", true), ("beta", true), ("gamma", true)]
        );
    }

    #[test]
    fn test_explicit_command_is_kept() {
        let mut info = info();
        info.command = Some("script.py".to_string());
        let script = ScriptModel::from_info("script", &info).unwrap();
        assert_eq!(script.command, "script.py");
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let mut info = info();
        info.optional_options.push(opt(&["--input_fp"], "string"));
        let err = ScriptModel::from_info("s", &info).unwrap_err();
        assert_eq!(
            err,
            GeneratorError::DuplicateOptionName {
                name: "input_fp".to_string()
            }
        );
    }

    #[test]
    fn test_second_directory_option_is_rejected() {
        let mut info = info();
        info.required_options.push(opt(&["-o", "--output_dir"], "new_dirpath"));
        info.optional_options.push(opt(&["-p", "--extra_dir"], "new_path"));
        let err = ScriptModel::from_info("s", &info).unwrap_err();
        assert_eq!(
            err,
            GeneratorError::DuplicateDirectoryOption {
                kind: OptionKind::OutputDir
            }
        );

        let mut info = self::info();
        info.required_options.push(opt(&["-d", "--in_a"], "existing_dirpath"));
        info.required_options.push(opt(&["-e", "--in_b"], "existing_path"));
        assert!(matches!(
            ScriptModel::from_info("s", &info),
            Err(GeneratorError::DuplicateDirectoryOption {
                kind: OptionKind::InputDir
            })
        ));

        let mut info = self::info();
        info.required_options.push(opt(&["-d", "--in_dir"], "existing_dirpath"));
        info.required_options.push(opt(&["-o", "--out_dir"], "new_dirpath"));
        assert!(ScriptModel::from_info("s", &info).is_ok());
    }

    #[test]
    fn test_remove_optional_options() {
        let mut script = ScriptModel::from_info("s", &info()).unwrap();
        script.remove(&["alpha", "gamma"]).unwrap();
        let names: Vec<_> = script.optional_options.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["beta"]);
    }

    #[test]
    fn test_remove_missing_option_fails() {
        let mut script = ScriptModel::from_info("s", &info()).unwrap();
        let err = script.remove(&["delta"]).unwrap_err();
        assert_eq!(
            err,
            GeneratorError::OptionNotRemovable {
                name: "delta".to_string()
            }
        );
    }

    #[test]
    fn test_remove_required_option_fails() {
        let mut script = ScriptModel::from_info("s", &info()).unwrap();
        let err = script.remove(&["input_fp"]).unwrap_err();
        assert!(matches!(err, GeneratorError::OptionNotRemovable { name } if name == "input_fp"));
        assert_eq!(script.required_options.len(), 1);
    }

    #[test]
    fn test_remove_keeps_earlier_removals_on_failure() {
        let mut script = ScriptModel::from_info("s", &info()).unwrap();
        assert!(script.remove(&["alpha", "missing", "beta"]).is_err());
        let names: Vec<_> = script.optional_options.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["beta", "gamma"]);
    }

    #[test]
    fn test_parse_removal_list() {
        assert_eq!(parse_removal_list("a, b,,c "), vec!["a", "b", "c"]);
        assert!(parse_removal_list("").is_empty());
    }
}
