//! batchcrypt - passphrase-based batch file encryption
//!
//! Files are encrypted independently with AES-256-CBC under a key derived
//! from a passphrase via PBKDF2-HMAC-SHA256 (100,000 iterations). Each
//! encryption batch shares one salt; each file gets its own random IV. The
//! on-disk artifact is `salt(32) ‖ iv(16) ‖ ciphertext`.
//!
//! Known limitation: the format carries no authentication tag. Tampered or
//! corrupted ciphertext decrypts to garbage and is only caught when the
//! trailing pad count happens to be implausible.

pub mod artifact;
pub mod batch;
pub mod cipher;
pub mod error;
pub mod fileops;
pub mod kdf;
pub mod padding;
pub mod passphrase;
