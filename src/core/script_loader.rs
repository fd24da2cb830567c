//! Reads script metadata files and writes their descriptors.

use crate::core::paths;
use crate::core::xml_generator::{self, GeneratorError, ScriptModel};
use crate::models::{ScriptInfo, Settings};

use std::io::Write;
use std::{fs, path::Path, path::PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Represents errors that can occur while turning a metadata file into a descriptor file.
#[derive(Error, Debug)]
pub enum LoadError {
    /// A filesystem I/O error occurred.
    #[error("Filesystem error on '{path}': {source}")]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The metadata file is not valid TOML or does not match the expected layout.
    #[error("Failed to parse script metadata '{path}': {source}")]
    Parse {
        /// The metadata file.
        path: PathBuf,
        /// The underlying parsing error from the `toml` crate.
        #[source]
        source: toml::de::Error,
    },
    /// The file name yields no script id.
    #[error("Cannot derive a script id from '{0}'")]
    MissingId(PathBuf),
    /// The metadata was read but describes an invalid option set.
    #[error(transparent)]
    Generator(#[from] GeneratorError),
}

type LoadResult<T> = Result<T, LoadError>;

/// Parses the metadata file at `path`.
pub fn read_script_info(path: &Path) -> LoadResult<ScriptInfo> {
    let content = fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| LoadError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Loads the model of the script described by `path`. The file stem is the script id.
pub fn load_script(path: &Path) -> LoadResult<ScriptModel> {
    let id = paths::file_stem_id(path).ok_or_else(|| LoadError::MissingId(path.to_path_buf()))?;
    let info = read_script_info(path)?;
    Ok(ScriptModel::from_info(&id, &info)?)
}

/// Generates the descriptor of the script at `script_path` into `output_dir/<id>.xml`,
/// after removing the optional options named in `remove`.
///
/// Nothing is written unless generation succeeds. Returns the descriptor path.
pub fn make_xml<S: AsRef<str>>(
    script_path: &Path,
    output_dir: &Path,
    remove: &[S],
    settings: &Settings,
) -> LoadResult<PathBuf> {
    let mut script = load_script(script_path)?;
    script.remove(remove)?;
    let text = xml_generator::generate_descriptor(&script, settings)?;

    let destination = output_dir.join(format!("{}.xml", script.id));
    write_atomic(&destination, &text)?;
    log::info!("Wrote descriptor '{}'", destination.display());
    Ok(destination)
}

/// Writes `contents` to `path` through a temporary file in the same directory, so readers
/// never observe a partial file.
pub fn write_atomic(path: &Path, contents: &str) -> LoadResult<()> {
    let io_err = |e: std::io::Error| LoadError::Io {
        path: path.to_path_buf(),
        source: e,
    };
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir).map_err(io_err)?;
    temp.write_all(contents.as_bytes()).map_err(io_err)?;
    temp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SCRIPT: &str = r#"
version = "1.4.0-dev"
brief_description = "Pick OTUs"
script_description = "Picks OTUs from sequences"
command = "pick_otus.py"

[[required_options]]
flags = ["-i", "--input_seqs_filepath"]
type = "existing_filepath"
help = "Path to the input fasta file"

[[required_options]]
flags = ["-o", "--output_dir"]
type = "new_dirpath"
help = "Path to store the result"

[[optional_options]]
flags = ["-s", "--similarity"]
type = "float"
default = 0.97
help = "Sequence similarity threshold [default: %default]"

[[optional_options]]
flags = ["-v", "--verbose"]
action = "store_true"
help = "Print information during execution"
"#;

    fn write_script(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_script_uses_file_stem_as_id() {
        let dir = tempdir().unwrap();
        let path = write_script(dir.path(), "pick_otus.toml", SCRIPT);
        let script = load_script(&path).unwrap();
        assert_eq!(script.id, "pick_otus");
        assert_eq!(script.display_name, "pick otus");
        assert_eq!(script.optional_options[0].default.as_deref(), Some("0.97"));
    }

    #[test]
    fn test_make_xml_writes_descriptor() {
        let dir = tempdir().unwrap();
        let path = write_script(dir.path(), "pick_otus.toml", SCRIPT);
        let out = dir.path().join("out");
        fs::create_dir(&out).unwrap();

        let written = make_xml(&path, &out, &["verbose"], &Settings::default()).unwrap();
        assert_eq!(written, out.join("pick_otus.xml"));
        let text = fs::read_to_string(&written).unwrap();
        assert!(text.contains("<tool id=\"pick_otus\" name=\"pick otus\" version=\"1.4.0-dev\">"));
        assert!(text.contains("-o pick_otus_output"));
        assert!(!text.contains("verbose"));
        // Only the descriptor is left behind.
        assert_eq!(fs::read_dir(&out).unwrap().count(), 1);
    }

    #[test]
    fn test_failed_generation_leaves_no_file() {
        let dir = tempdir().unwrap();
        let path = write_script(dir.path(), "pick_otus.toml", SCRIPT);
        let out = dir.path().join("out");
        fs::create_dir(&out).unwrap();

        let err = make_xml(&path, &out, &["output_dir"], &Settings::default()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Generator(GeneratorError::OptionNotRemovable { .. })
        ));
        assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
    }

    #[test]
    fn test_parse_errors_name_the_file() {
        let dir = tempdir().unwrap();
        let path = write_script(dir.path(), "broken.toml", "version = ");
        let err = load_script(&path).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_unsupported_type_surfaces() {
        let dir = tempdir().unwrap();
        let content = SCRIPT.replace("type = \"float\"", "type = \"blast_db\"");
        let path = write_script(dir.path(), "pick_otus.toml", &content);
        let err = load_script(&path).unwrap_err();
        assert!(err.to_string().contains("blast_db"));
    }
}
