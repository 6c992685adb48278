//! Filesystem collaborators for the batch engine
//!
//! The engine itself only moves bytes; everything touching the filesystem
//! lives here: reading whole files, atomically writing outputs, enumerating
//! batch inputs, and preparing the output folder for a run.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{BatchcryptError, ErrorCategory, ErrorKind, Result};

/// Filename suffix appended to encrypted artifacts.
pub const ARTIFACT_SUFFIX: &str = "enc";

/// Read the entire contents of a file.
pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| read_error(path, e))
}

/// Write `contents` to `path` atomically.
///
/// The bytes go to a tempfile in the target directory which is flushed,
/// fsynced, and then renamed into place, so the destination either holds the
/// complete contents or does not exist at all. On Unix the file is persisted
/// with mode 0o600.
pub fn write_bytes(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = path.parent().ok_or_else(|| {
        BatchcryptError::with_kind(
            ErrorCategory::User,
            ErrorKind::Io,
            format!("{} has no parent directory", path.display()),
        )
    })?;

    let mut temp_file = tempfile::NamedTempFile::new_in(dir).map_err(|e| {
        BatchcryptError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            "failed to create tempfile",
            e,
        )
    })?;

    temp_file.write_all(contents).map_err(|e| {
        BatchcryptError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            "failed to write to tempfile",
            e,
        )
    })?;
    // Flush and fsync() such that the rename later, if it succeeds, will
    // always point to a valid file.
    temp_file.flush().map_err(|e| {
        BatchcryptError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            "failed to flush tempfile",
            e,
        )
    })?;
    temp_file.as_file().sync_all().map_err(|e| {
        BatchcryptError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            "failed to sync file prior to rename",
            e,
        )
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = temp_file
            .as_file()
            .metadata()
            .map_err(|e| {
                BatchcryptError::with_kind_and_source(
                    ErrorCategory::Internal,
                    ErrorKind::Io,
                    "failed to get tempfile metadata",
                    e,
                )
            })?
            .permissions();
        perms.set_mode(0o600);
        temp_file.as_file().set_permissions(perms).map_err(|e| {
            BatchcryptError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                "failed to set tempfile permissions",
                e,
            )
        })?;
    }

    temp_file.persist(path).map_err(|e| {
        BatchcryptError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            format!("failed to rename to target file {}", path.display()),
            e,
        )
    })?;
    Ok(())
}

/// List the regular files directly inside `folder`, sorted by name.
///
/// Subdirectories and non-file entries are skipped. Sorting keeps the batch
/// processing order stable across runs and platforms.
pub fn list_files(folder: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(folder).map_err(|e| read_error(folder, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| read_error(folder, e))?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// List the encrypted artifacts (`*.enc`) directly inside `folder`, sorted by name.
pub fn list_artifacts(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut artifacts = list_files(folder)?;
    artifacts.retain(|p| p.extension().is_some_and(|ext| ext == ARTIFACT_SUFFIX));
    Ok(artifacts)
}

/// Create a fresh sibling output folder named `{base}_{suffix}`.
///
/// Any pre-existing folder of the derived name is removed first, so a re-run
/// never mixes old and new outputs. Failure here aborts the whole batch;
/// there is nowhere to write results.
pub fn make_output_folder(base: &Path, suffix: &str) -> Result<PathBuf> {
    let name = base
        .file_name()
        .ok_or_else(|| {
            BatchcryptError::with_kind(
                ErrorCategory::User,
                ErrorKind::Io,
                format!("{} has no folder name to derive an output folder from", base.display()),
            )
        })?
        .to_os_string();

    let mut folder_name = name;
    folder_name.push(format!("_{}", suffix));
    let output = base.parent().unwrap_or_else(|| Path::new(".")).join(folder_name);

    if output.exists() {
        fs::remove_dir_all(&output).map_err(|e| {
            BatchcryptError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                format!("failed to remove pre-existing output folder {}", output.display()),
                e,
            )
        })?;
    }
    fs::create_dir_all(&output).map_err(|e| {
        BatchcryptError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            format!("failed to create output folder {}", output.display()),
            e,
        )
    })?;

    Ok(output)
}

fn read_error(path: &Path, err: io::Error) -> BatchcryptError {
    let category = if err.kind() == io::ErrorKind::NotFound {
        ErrorCategory::User
    } else {
        ErrorCategory::Internal
    };
    BatchcryptError::with_kind_and_source(
        category,
        ErrorKind::Io,
        format!("failed to read from {}", path.display()),
        err,
    )
}
