//! On-disk layout of one encrypted file
//!
//! An artifact is the complete persisted form of a single encrypted file:
//!
//! - salt: 32 bytes (shared by all artifacts of one encryption batch)
//! - IV: 16 bytes (unique per file)
//! - ciphertext: at least one 16-byte block, always block-aligned
//!
//! The minimum valid artifact is therefore 48 bytes. There is no magic
//! header, version field, or integrity tag - validation here is purely
//! structural and cannot detect bit-flips that preserve length alignment.

use crate::cipher::IV_LEN;
use crate::error::{BatchcryptError, ErrorCategory, ErrorKind, Result};
use crate::kdf::SALT_LEN;
use crate::padding::BLOCK_LEN;

/// Smallest possible artifact: salt + IV + one ciphertext block
pub const MIN_ARTIFACT_LEN: usize = SALT_LEN + IV_LEN + BLOCK_LEN;

/// Prepend the batch salt to a per-file encryption result.
pub fn assemble(salt: &[u8; SALT_LEN], iv_and_ciphertext: &[u8]) -> Vec<u8> {
    let mut artifact = Vec::with_capacity(SALT_LEN + iv_and_ciphertext.len());
    artifact.extend_from_slice(salt);
    artifact.extend_from_slice(iv_and_ciphertext);
    artifact
}

/// Split an artifact into its embedded salt and the `iv ‖ ciphertext` tail.
///
/// Artifacts shorter than [`MIN_ARTIFACT_LEN`] cannot contain a complete
/// layout and are rejected as truncated.
pub fn split(artifact: &[u8]) -> Result<([u8; SALT_LEN], &[u8])> {
    if artifact.len() < MIN_ARTIFACT_LEN {
        return Err(BatchcryptError::with_kind(
            ErrorCategory::User,
            ErrorKind::TruncatedArtifact,
            format!(
                "artifact is {} bytes; the minimum valid size is {} (salt + IV + one block)",
                artifact.len(),
                MIN_ARTIFACT_LEN
            ),
        ));
    }

    let salt: [u8; SALT_LEN] = artifact[..SALT_LEN]
        .try_into()
        .map_err(|_| {
            BatchcryptError::with_kind(
                ErrorCategory::Internal,
                ErrorKind::InternalInvariant,
                "salt slice has unexpected length",
            )
        })?;

    Ok((salt, &artifact[SALT_LEN..]))
}

/// Check that an artifact has a structurally plausible layout.
///
/// Verifies the minimum length and that the ciphertext region is a whole
/// number of cipher blocks. A passing check says nothing about whether the
/// content decrypts; it only rules out truncation and gross corruption.
pub fn validate(artifact: &[u8]) -> Result<()> {
    if artifact.len() < MIN_ARTIFACT_LEN {
        return Err(BatchcryptError::with_kind(
            ErrorCategory::User,
            ErrorKind::TruncatedArtifact,
            format!(
                "artifact is {} bytes; the minimum valid size is {}",
                artifact.len(),
                MIN_ARTIFACT_LEN
            ),
        ));
    }

    let ciphertext_len = artifact.len() - SALT_LEN - IV_LEN;
    if ciphertext_len % BLOCK_LEN != 0 {
        return Err(BatchcryptError::with_kind(
            ErrorCategory::User,
            ErrorKind::BlockMisaligned,
            format!(
                "ciphertext region is {} bytes, not a multiple of the {}-byte block size",
                ciphertext_len, BLOCK_LEN
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_split_roundtrip() {
        let salt = [0xA5u8; SALT_LEN];
        let iv_and_ciphertext = vec![0x11u8; IV_LEN + BLOCK_LEN];

        let artifact = assemble(&salt, &iv_and_ciphertext);
        assert_eq!(artifact.len(), SALT_LEN + iv_and_ciphertext.len());

        let (recovered_salt, tail) = split(&artifact).unwrap();
        assert_eq!(recovered_salt, salt);
        assert_eq!(tail, &iv_and_ciphertext[..]);
    }

    #[test]
    fn test_split_rejects_short_input() {
        for len in [0usize, 1, 32, 47] {
            let err = split(&vec![0u8; len]).expect_err("expected truncation error");
            assert_eq!(err.kind, Some(ErrorKind::TruncatedArtifact), "len {}", len);
        }
    }

    #[test]
    fn test_validate_accepts_minimum_artifact() {
        assert!(validate(&[0u8; MIN_ARTIFACT_LEN]).is_ok());
    }

    #[test]
    fn test_validate_accepts_multiple_blocks() {
        for blocks in 1..=4 {
            let len = SALT_LEN + IV_LEN + blocks * BLOCK_LEN;
            assert!(validate(&vec![0u8; len]).is_ok(), "blocks {}", blocks);
        }
    }

    #[test]
    fn test_validate_rejects_short_artifact() {
        let err = validate(&[0u8; 47]).expect_err("expected truncation error");
        assert_eq!(err.kind, Some(ErrorKind::TruncatedArtifact));
    }

    #[test]
    fn test_validate_rejects_misaligned_ciphertext() {
        for extra in [1usize, 7, 15] {
            let len = MIN_ARTIFACT_LEN + extra;
            let err = validate(&vec![0u8; len]).expect_err("expected alignment error");
            assert_eq!(err.kind, Some(ErrorKind::BlockMisaligned), "extra {}", extra);
        }
    }

    #[test]
    fn test_validate_cannot_detect_bitflips() {
        // Same length, different content: structural validation passes both.
        let good = vec![0u8; MIN_ARTIFACT_LEN];
        let mut flipped = good.clone();
        flipped[SALT_LEN + IV_LEN] ^= 0xFF;
        assert!(validate(&good).is_ok());
        assert!(validate(&flipped).is_ok());
    }
}
