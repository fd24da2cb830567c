// src/constants.rs

/// The requirement package written into every descriptor unless overridden in settings.
pub const DEFAULT_REQUIREMENT_PACKAGE: &str = "qiime";

/// Command spliced in after the base command to archive an output directory.
pub const DEFAULT_COMPRESS_COMMAND: &str = "toolwrap compress";

/// Command spliced in before the base command to unpack an input directory archive.
pub const DEFAULT_EXTRACT_COMMAND: &str = "toolwrap extract";

/// Suffix of the local directory an `input_dir` option is unpacked into.
pub const INPUT_DIR_SUFFIX: &str = "_input";

/// Suffix of the local directory an `output_dir` option writes into.
pub const OUTPUT_DIR_SUFFIX: &str = "_output";

/// Placeholder that option help texts use for their default value.
pub const DEFAULT_PLACEHOLDER: &str = "%default";

/// Value of the "nothing selected" entry of an optional select.
pub const NO_SELECTION_VALUE: &str = "None";

/// Label of the "nothing selected" entry of an optional select.
pub const NO_SELECTION_LABEL: &str = "Selection is Optional";

/// Sentinel default of every boolean option.
pub const BOOLEAN_UNSET: &str = "False";

/// Prefix of the repeat group (and template variable) of a repeat option.
pub const REPEAT_GROUP_PREFIX: &str = "input_files_";

/// Name of the data param nested in each repeat group item.
pub const REPEAT_ITEM_PARAM: &str = "additional_input";

/// Cheetah helper that flattens a repeat group into a comma-joined path list.
pub const LIST_FLATTEN_HELPER: &str = "#def list_dict_to_string(list_dict):
\t#set $file_list = list_dict[0]['additional_input'].__getattr__('file_name')
\t#for d in list_dict[1:]:
\t\t#set $file_list = $file_list + ',' + d['additional_input'].__getattr__('file_name')
\t#end for
\t#return $file_list
#end def
";

/// Name of the helper defined by [`LIST_FLATTEN_HELPER`].
pub const LIST_FLATTEN_FN: &str = "list_dict_to_string";

/// Name of the Galaxy registry file inside the Galaxy root.
pub const REGISTRY_FILENAME: &str = "tool_conf.xml";

/// Directory inside the Galaxy root holding one sub-directory per section.
pub const TOOLS_DIRNAME: &str = "tools";

/// Default name of the integration report, written into the scripts directory.
pub const INTEGRATION_LOG_FILENAME: &str = "integration.log";

/// Extension of script metadata files.
pub const SCRIPT_METADATA_EXTENSION: &str = "toml";

/// Name of the settings file inside the user config directory.
pub const SETTINGS_FILENAME: &str = "settings.toml";

/// Environment variable pointing at an alternative settings file.
pub const SETTINGS_ENV_VAR: &str = "TOOLWRAP_SETTINGS";
