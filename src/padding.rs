//! PKCS7-style padding for the block cipher
//!
//! The cipher operates on whole 16-byte blocks, so plaintext is extended
//! before encryption: `n = 16 - (len % 16)` bytes are appended, each with
//! value `n`. An already-aligned plaintext still receives a full 16-byte pad
//! block, which keeps removal unambiguous.
//!
//! Removal reads only the trailing pad count and strips that many bytes. Pad
//! byte *contents* are deliberately not verified, matching the on-disk format
//! this crate interoperates with. A wrong passphrase therefore goes
//! undetected whenever the garbage final byte happens to be a plausible
//! count.

use crate::error::{ErrorCategory, ErrorKind, Result, BatchcryptError};

/// Cipher block length in bytes
pub const BLOCK_LEN: usize = 16;

/// Extend `data` to a multiple of the block length.
///
/// The result is never empty and never equal in length to the input: between
/// 1 and 16 pad bytes are always appended.
pub fn pad(data: &[u8]) -> Vec<u8> {
    let pad_len = BLOCK_LEN - (data.len() % BLOCK_LEN);
    let mut padded = Vec::with_capacity(data.len() + pad_len);
    padded.extend_from_slice(data);
    padded.extend(std::iter::repeat_n(pad_len as u8, pad_len));
    padded
}

/// Strip the trailing pad from `data`.
///
/// Empty input is returned unchanged. A pad count of zero or one exceeding
/// the data length is malformed and reported as `InvalidPadding` - this is
/// the error a caller sees for corrupted ciphertext or a wrong passphrase.
pub fn unpad(data: &[u8]) -> Result<Vec<u8>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }

    let pad_len = data[data.len() - 1] as usize;
    if pad_len == 0 {
        return Err(BatchcryptError::with_kind(
            ErrorCategory::User,
            ErrorKind::InvalidPadding,
            "invalid padding: pad count byte is zero",
        ));
    }
    if pad_len > data.len() {
        return Err(BatchcryptError::with_kind(
            ErrorCategory::User,
            ErrorKind::InvalidPadding,
            format!(
                "invalid padding: pad count {} exceeds data length {}",
                pad_len,
                data.len()
            ),
        ));
    }

    Ok(data[..data.len() - pad_len].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_various_lengths() {
        for len in [0usize, 1, 15, 16, 17, 31, 32, 100] {
            let data: Vec<u8> = (0..len).map(|i| i as u8).collect();
            let padded = pad(&data);
            assert_eq!(padded.len() % BLOCK_LEN, 0, "len {}", len);
            assert!(padded.len() >= BLOCK_LEN, "len {}", len);
            assert_eq!(unpad(&padded).unwrap(), data, "len {}", len);
        }
    }

    #[test]
    fn test_aligned_input_gets_full_block() {
        let data = [0x41u8; 32];
        let padded = pad(&data);
        assert_eq!(padded.len(), data.len() + BLOCK_LEN);
        assert!(padded[32..].iter().all(|&b| b == BLOCK_LEN as u8));
    }

    #[test]
    fn test_empty_input_pads_to_one_block() {
        let padded = pad(b"");
        assert_eq!(padded, vec![16u8; 16]);
    }

    #[test]
    fn test_pad_count_is_pad_value() {
        let padded = pad(b"hello world"); // 11 bytes -> 5 pad bytes of value 5
        assert_eq!(padded.len(), 16);
        assert_eq!(&padded[11..], &[5, 5, 5, 5, 5]);
    }

    #[test]
    fn test_unpad_empty_is_empty() {
        assert_eq!(unpad(b"").unwrap(), b"");
    }

    #[test]
    fn test_unpad_zero_count_rejected() {
        let mut data = vec![0x42u8; 16];
        data[15] = 0;
        let err = unpad(&data).expect_err("expected invalid padding");
        assert_eq!(err.kind, Some(ErrorKind::InvalidPadding));
    }

    #[test]
    fn test_unpad_oversized_count_rejected() {
        let mut data = vec![0x42u8; 16];
        data[15] = 17;
        let err = unpad(&data).expect_err("expected invalid padding");
        assert_eq!(err.kind, Some(ErrorKind::InvalidPadding));
    }

    #[test]
    fn test_unpad_does_not_verify_pad_bytes() {
        // Only the count is checked; mangled pad bytes still strip cleanly.
        let mut padded = pad(b"abc");
        let len = padded.len();
        padded[len - 2] = 0xEE;
        assert_eq!(unpad(&padded).unwrap(), b"abc");
    }
}
