//! # Archives
//!
//! Packs directory outputs into gzipped tarballs and unpacks directory inputs, so that
//! whole directories can travel through Galaxy as single datasets.

use flate2::{Compression, read::GzDecoder, write::GzEncoder};
use std::{
    fs::{self, File},
    io::{self, BufReader, Read},
    path::{Path, PathBuf},
};
use thiserror::Error;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Error, Debug)]
pub enum ArchiveError {
    /// The input exists but is not a (gzipped) tar archive.
    #[error("'{0}' is not a tar archive")]
    NotAnArchive(PathBuf),
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> ArchiveError + '_ {
    move |source| ArchiveError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// How an input ended up at its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// The archive held one member, which now sits at the output path.
    SingleMember,
    /// The archive's members were unpacked into the output directory.
    Directory { members: usize },
    /// The input was not an archive and was copied as is.
    Copied,
}

/// Writes `input` (file or directory) into a gzipped tarball at `archive`, stored under
/// its own base name.
pub fn compress_path(input: &Path, archive: &Path) -> Result<(), ArchiveError> {
    let base_name = input
        .file_name()
        .map(PathBuf::from)
        .ok_or_else(|| ArchiveError::Io {
            path: input.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "path has no base name"),
        })?;
    let metadata = fs::metadata(input).map_err(io_err(input))?;

    let file = File::create(archive).map_err(io_err(archive))?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);

    if metadata.is_dir() {
        builder
            .append_dir_all(&base_name, input)
            .map_err(io_err(input))?;
    } else {
        builder
            .append_path_with_name(input, &base_name)
            .map_err(io_err(input))?;
    }

    let encoder = builder.into_inner().map_err(io_err(archive))?;
    encoder.finish().map_err(io_err(archive))?;
    log::debug!("Compressed '{}' into '{}'", input.display(), archive.display());
    Ok(())
}

/// Opens `path` as a tar stream, gunzipping it first when it starts with the gzip magic.
fn open_tar(path: &Path) -> Result<tar::Archive<Box<dyn Read>>, ArchiveError> {
    let mut file = File::open(path).map_err(io_err(path))?;
    let mut magic = [0u8; 2];
    let read = file.read(&mut magic).map_err(io_err(path))?;
    // Reopen rather than seek so the reader starts at byte zero either way.
    let file = BufReader::new(File::open(path).map_err(io_err(path))?);
    let reader: Box<dyn Read> = if read == GZIP_MAGIC.len() && magic == GZIP_MAGIC {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };
    Ok(tar::Archive::new(reader))
}

/// Lists the member paths of the archive. Anything unreadable as tar, including an
/// archive with no members, is reported as [`ArchiveError::NotAnArchive`].
pub fn list_members(archive: &Path) -> Result<Vec<PathBuf>, ArchiveError> {
    let not_archive = || ArchiveError::NotAnArchive(archive.to_path_buf());
    let mut tar = open_tar(archive)?;
    let mut members = Vec::new();
    for entry in tar.entries().map_err(|_| not_archive())? {
        let entry = entry.map_err(|_| not_archive())?;
        let path = entry.path().map_err(|_| not_archive())?;
        members.push(path.into_owned());
    }
    if members.is_empty() {
        return Err(not_archive());
    }
    Ok(members)
}

/// Extracts `archive` to `output`.
///
/// A single-member archive is unpacked and its member renamed to `output`. Otherwise
/// `output` becomes a directory holding every member.
pub fn extract_archive(archive: &Path, output: &Path) -> Result<ExtractOutcome, ArchiveError> {
    let members = list_members(archive)?;

    if let [single] = members.as_slice() {
        let parent = output
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let staging = tempfile::tempdir_in(parent).map_err(io_err(parent))?;
        let mut tar = open_tar(archive)?;
        tar.unpack(staging.path()).map_err(io_err(archive))?;

        let unpacked = staging.path().join(single);
        fs::rename(&unpacked, output).map_err(io_err(output))?;
        log::debug!("Extracted single member of '{}' to '{}'", archive.display(), output.display());
        return Ok(ExtractOutcome::SingleMember);
    }

    fs::create_dir_all(output).map_err(io_err(output))?;
    let mut tar = open_tar(archive)?;
    tar.unpack(output).map_err(io_err(archive))?;
    log::debug!(
        "Extracted {} members of '{}' into '{}'",
        members.len(),
        archive.display(),
        output.display()
    );
    Ok(ExtractOutcome::Directory {
        members: members.len(),
    })
}

/// Like [`extract_archive`], but copies `input` to `output` when it is not an archive.
pub fn extract_or_copy(input: &Path, output: &Path) -> Result<ExtractOutcome, ArchiveError> {
    match extract_archive(input, output) {
        Err(ArchiveError::NotAnArchive(_)) => {
            log::info!("'{}' is not an archive, copying it", input.display());
            fs::copy(input, output).map_err(io_err(input))?;
            Ok(ExtractOutcome::Copied)
        }
        other => other,
    }
}
