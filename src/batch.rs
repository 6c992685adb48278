//! Batch orchestration across many files
//!
//! Drives key derivation, the block cipher, and the artifact codec over a
//! collection of files. The two modes are deliberately asymmetric:
//!
//! - An encryption batch generates one salt and derives the key once; every
//!   artifact it writes embeds that same salt.
//! - A decryption batch re-derives the key per artifact from the salt each
//!   artifact carries, so artifacts produced in different sessions can be
//!   mixed in a single run at the cost of one extra derivation per file.
//!
//! Per-file failures never abort a batch: each failure is counted, its
//! reason recorded, and processing continues with the next file. A batch
//! where every file fails still returns a normal report. Files are processed
//! strictly in the order supplied.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::artifact;
use crate::cipher;
use crate::error::Result;
use crate::fileops::{self, ARTIFACT_SUFFIX};
use crate::kdf::{self, SALT_LEN};

/// One file that could not be processed, with a human-readable reason.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of an encryption batch.
#[derive(Debug)]
pub struct EncryptReport {
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<FileFailure>,
    /// The salt shared by every artifact this batch produced.
    pub salt: [u8; SALT_LEN],
}

/// Result of a decryption batch.
#[derive(Debug)]
pub struct DecryptReport {
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<FileFailure>,
    /// Where the recovered plaintext files were written.
    pub output_dir: PathBuf,
}

impl DecryptReport {
    /// True when every file failed and none succeeded.
    ///
    /// Since a wrong passphrase and corrupted data are indistinguishable in
    /// this format, a caller seeing this should suggest re-checking the
    /// passphrase.
    pub fn total_failure(&self) -> bool {
        self.succeeded == 0 && self.failed > 0
    }
}

/// Encrypt a collection of files into `output_dir`.
///
/// One salt is generated and one key derived for the entire batch. Each
/// input file is read, encrypted under a fresh IV, assembled into an
/// artifact, and written as `{file_name}.enc` in `output_dir`. A failure on
/// one file is recorded and the batch moves on.
///
/// Returns an error only for conditions preventing the batch from running at
/// all; per-file trouble is reported through the counters.
pub fn run_encryption_batch(
    files: &[PathBuf],
    output_dir: &Path,
    passphrase: &[u8],
) -> Result<EncryptReport> {
    let salt = kdf::generate_salt();
    let key = kdf::derive_key(passphrase, &salt);

    let mut report = EncryptReport {
        succeeded: 0,
        failed: 0,
        failures: Vec::new(),
        salt,
    };

    for file in files {
        match encrypt_one(file, output_dir, &salt, &key) {
            Ok(()) => report.succeeded += 1,
            Err(reason) => {
                report.failed += 1;
                report.failures.push(FileFailure {
                    path: file.clone(),
                    reason,
                });
            }
        }
    }

    Ok(report)
}

fn encrypt_one(
    file: &Path,
    output_dir: &Path,
    salt: &[u8; SALT_LEN],
    key: &[u8; kdf::KEY_LEN],
) -> std::result::Result<(), String> {
    let file_name = file
        .file_name()
        .ok_or_else(|| "input path has no file name".to_string())?;

    let plaintext = fileops::read_bytes(file).map_err(|e| e.to_string())?;
    let iv_and_ciphertext = cipher::encrypt_bytes(&plaintext, key).map_err(|e| e.to_string())?;
    let artifact_bytes = artifact::assemble(salt, &iv_and_ciphertext);

    let mut artifact_name = OsString::from(file_name);
    artifact_name.push(format!(".{}", ARTIFACT_SUFFIX));
    fileops::write_bytes(&output_dir.join(artifact_name), &artifact_bytes)
        .map_err(|e| e.to_string())?;

    Ok(())
}

/// Decrypt a collection of artifacts into `output_dir`.
///
/// The key is derived per artifact from the salt that artifact embeds; no
/// batch-wide salt is assumed. Recovered plaintext is written under the
/// original filename, i.e. with the `.enc` suffix stripped. Failures at any
/// step (read, structure, derivation, decryption, write) are isolated per
/// file.
pub fn run_decryption_batch(
    artifacts: &[PathBuf],
    output_dir: &Path,
    passphrase: &[u8],
) -> Result<DecryptReport> {
    let mut report = DecryptReport {
        succeeded: 0,
        failed: 0,
        failures: Vec::new(),
        output_dir: output_dir.to_path_buf(),
    };

    for path in artifacts {
        match decrypt_one(path, output_dir, passphrase) {
            Ok(()) => report.succeeded += 1,
            Err(reason) => {
                report.failed += 1;
                report.failures.push(FileFailure {
                    path: path.clone(),
                    reason,
                });
            }
        }
    }

    Ok(report)
}

fn decrypt_one(
    path: &Path,
    output_dir: &Path,
    passphrase: &[u8],
) -> std::result::Result<(), String> {
    // The original name is the artifact name minus the `.enc` suffix.
    let original_name = path
        .file_stem()
        .ok_or_else(|| "artifact path has no file name".to_string())?
        .to_os_string();

    let artifact_bytes = fileops::read_bytes(path).map_err(|e| e.to_string())?;
    let (salt, iv_and_ciphertext) = artifact::split(&artifact_bytes).map_err(|e| e.to_string())?;

    // Derive from this artifact's own salt; it may come from another batch.
    let key = kdf::derive_key(passphrase, &salt);
    let plaintext = cipher::decrypt_bytes(iv_and_ciphertext, &key).map_err(|e| e.to_string())?;

    fileops::write_bytes(&output_dir.join(original_name), &plaintext)
        .map_err(|e| e.to_string())?;

    Ok(())
}

/// Structurally verify a single artifact on disk.
///
/// Returns the verdict together with a human-readable reason. An unreadable
/// file is reported as invalid with the I/O failure as the reason.
pub fn check_artifact_integrity(path: &Path) -> (bool, String) {
    let bytes = match fileops::read_bytes(path) {
        Ok(bytes) => bytes,
        Err(e) => return (false, e.to_string()),
    };

    match artifact::validate(&bytes) {
        Ok(()) => (true, "artifact structure is valid".to_string()),
        Err(e) => (false, e.to_string()),
    }
}
