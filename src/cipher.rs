//! Per-file encryption/decryption using AES-256-CBC
//!
//! Each file is encrypted independently: a fresh random 16-byte IV seeds the
//! CBC chain, the plaintext is padded to whole blocks (see [`crate::padding`])
//! and the output is `iv(16) ‖ ciphertext`. Padding is applied by this crate
//! rather than by the cipher layer so that removal follows the exact rules of
//! the on-disk format.
//!
//! There is no authentication tag. Decryption of tampered ciphertext or with
//! a wrong key produces either an `InvalidPadding` error or silent garbage;
//! callers must not treat successful decryption as proof of integrity.

use aes::Aes256;
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;
use rand::rngs::OsRng;

use crate::error::{BatchcryptError, ErrorCategory, ErrorKind, Result};
use crate::kdf::KEY_LEN;
use crate::padding;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Length of the initialization vector in bytes
pub const IV_LEN: usize = 16;

/// Encrypt plaintext with a random IV, returning `iv ‖ ciphertext`.
///
/// The ciphertext is always a non-empty multiple of 16 bytes; a zero-length
/// plaintext still produces one full block of padding.
pub fn encrypt_bytes(plaintext: &[u8], key: &[u8; KEY_LEN]) -> Result<Vec<u8>> {
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);

    encrypt_bytes_deterministic(plaintext, key, &iv)
}

/// Encrypt plaintext with a provided IV.
///
/// This function is ONLY for testing purposes to generate deterministic
/// output. NEVER use this in production - always use `encrypt_bytes()` which
/// generates a random IV. Reusing an IV under the same key leaks plaintext
/// block equality.
pub fn encrypt_bytes_deterministic(
    plaintext: &[u8],
    key: &[u8; KEY_LEN],
    iv: &[u8; IV_LEN],
) -> Result<Vec<u8>> {
    let padded = padding::pad(plaintext);

    let encryptor = Aes256CbcEnc::new(key.into(), iv.into());
    let ciphertext = encryptor.encrypt_padded_vec_mut::<NoPadding>(&padded);

    let mut output = Vec::with_capacity(IV_LEN + ciphertext.len());
    output.extend_from_slice(iv);
    output.extend_from_slice(&ciphertext);

    Ok(output)
}

/// Decrypt `iv ‖ ciphertext` and strip the padding.
///
/// Fails with `TruncatedArtifact` if there are not enough bytes for the IV
/// or the ciphertext is empty, with `BlockMisaligned` if the ciphertext is
/// not a whole number of blocks, and with `InvalidPadding` when the pad
/// count is implausible (most commonly a wrong passphrase). No partial
/// plaintext is ever returned.
pub fn decrypt_bytes(iv_and_ciphertext: &[u8], key: &[u8; KEY_LEN]) -> Result<Vec<u8>> {
    if iv_and_ciphertext.len() < IV_LEN {
        return Err(BatchcryptError::with_kind(
            ErrorCategory::User,
            ErrorKind::TruncatedArtifact,
            "insufficient data: input shorter than the initialization vector",
        ));
    }

    let iv: [u8; IV_LEN] = iv_and_ciphertext[..IV_LEN]
        .try_into()
        .map_err(|_| internal_invariant("IV slice has unexpected length"))?;
    let ciphertext = &iv_and_ciphertext[IV_LEN..];

    if ciphertext.is_empty() {
        return Err(BatchcryptError::with_kind(
            ErrorCategory::User,
            ErrorKind::TruncatedArtifact,
            "no ciphertext to decrypt after the initialization vector",
        ));
    }

    if ciphertext.len() % padding::BLOCK_LEN != 0 {
        return Err(BatchcryptError::with_kind(
            ErrorCategory::User,
            ErrorKind::BlockMisaligned,
            format!(
                "ciphertext length {} is not a multiple of the {}-byte block size",
                ciphertext.len(),
                padding::BLOCK_LEN
            ),
        ));
    }

    let decryptor = Aes256CbcDec::new(key.into(), (&iv).into());
    let padded = decryptor
        .decrypt_padded_vec_mut::<NoPadding>(ciphertext)
        .map_err(|_| {
            BatchcryptError::with_kind(
                ErrorCategory::User,
                ErrorKind::CipherFailure,
                "block cipher failed to decrypt ciphertext",
            )
        })?;

    padding::unpad(&padded)
}

fn internal_invariant(msg: &str) -> BatchcryptError {
    BatchcryptError::with_kind(
        ErrorCategory::Internal,
        ErrorKind::InternalInvariant,
        msg.to_string(),
    )
}
