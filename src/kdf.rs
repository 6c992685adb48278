//! Key derivation from passphrase and salt
//!
//! PBKDF2-HMAC-SHA256 with a fixed iteration count, producing a 256-bit key
//! for the block cipher. Derivation is deterministic: the same (passphrase,
//! salt) pair always yields the same key, which is what allows decryption to
//! re-derive the key from the salt stored in each artifact.

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::Sha256;
use zeroize::Zeroizing;

/// Length of salt in bytes
pub const SALT_LEN: usize = 32;

/// Length of derived key in bytes (AES-256)
pub const KEY_LEN: usize = 32;

/// PBKDF2 iteration count. Fixed for format compatibility; artifacts do not
/// record the count, so changing it breaks decryption of existing data.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Generate a fresh random salt for one encryption batch.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Derive a 32-byte key from a passphrase and salt using PBKDF2-HMAC-SHA256.
///
/// The passphrase is treated as raw bytes; callers starting from a `String`
/// pass its UTF-8 bytes. The returned key is wiped from memory on drop.
pub fn derive_key(passphrase: &[u8], salt: &[u8; SALT_LEN]) -> Zeroizing<[u8; KEY_LEN]> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2_hmac::<Sha256>(passphrase, salt, PBKDF2_ITERATIONS, &mut *key);
    key
}
