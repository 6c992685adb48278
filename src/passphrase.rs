//! Passphrase reading and validation

use crate::error::{BatchcryptError, ErrorCategory, ErrorKind, Result};
use std::io::{self, IsTerminal, Read, Write};
use zeroize::Zeroizing;

/// Minimum accepted passphrase length in bytes.
pub const MIN_PASSPHRASE_LEN: usize = 8;

/// Trait for reading passphrases from various sources
pub trait PassphraseReader {
    /// Read a passphrase as arbitrary bytes (not necessarily UTF-8)
    ///
    /// Returns the passphrase wrapped in `Zeroizing` to ensure it is securely
    /// wiped from memory when dropped.
    fn read_passphrase(&mut self) -> Result<Zeroizing<Vec<u8>>>;
}

/// Reject passphrases below the minimum length.
///
/// Length is the only enforced criterion; a longer passphrase is not
/// inspected further.
pub fn validate_passphrase(passphrase: &[u8]) -> Result<()> {
    if passphrase.len() < MIN_PASSPHRASE_LEN {
        return Err(BatchcryptError::with_kind(
            ErrorCategory::User,
            ErrorKind::PassphraseTooShort,
            format!("passphrase must be at least {} characters", MIN_PASSPHRASE_LEN),
        ));
    }
    Ok(())
}

/// Read and validate a passphrase for a new encryption batch.
///
/// The passphrase must meet the minimum length. When a confirmation reader
/// is supplied (interactive use), the passphrase is read a second time and
/// the two must match exactly; non-interactive callers pass `None` and skip
/// confirmation.
pub fn read_new_passphrase(
    reader: &mut dyn PassphraseReader,
    confirmation: Option<&mut dyn PassphraseReader>,
) -> Result<Zeroizing<Vec<u8>>> {
    let passphrase = reader.read_passphrase()?;
    validate_passphrase(&passphrase)?;

    if let Some(confirm_reader) = confirmation {
        let confirmed = confirm_reader.read_passphrase()?;
        if *confirmed != *passphrase {
            return Err(BatchcryptError::with_kind(
                ErrorCategory::User,
                ErrorKind::PassphraseMismatch,
                "passphrases do not match",
            ));
        }
    }

    Ok(passphrase)
}

/// Returns a fixed passphrase (for testing)
pub struct ConstantPassphraseReader {
    passphrase: Zeroizing<Vec<u8>>,
}

impl ConstantPassphraseReader {
    pub fn new(passphrase: Vec<u8>) -> Self {
        Self {
            passphrase: Zeroizing::new(passphrase),
        }
    }
}

impl PassphraseReader for ConstantPassphraseReader {
    fn read_passphrase(&mut self) -> Result<Zeroizing<Vec<u8>>> {
        Ok(Zeroizing::new((*self.passphrase).clone()))
    }
}

/// Reads passphrase from any io::Read source
pub struct ReaderPassphraseReader {
    reader: Box<dyn Read>,
}

impl ReaderPassphraseReader {
    pub fn new(reader: Box<dyn Read>) -> Self {
        Self { reader }
    }
}

impl PassphraseReader for ReaderPassphraseReader {
    fn read_passphrase(&mut self) -> Result<Zeroizing<Vec<u8>>> {
        let mut data = Zeroizing::new(Vec::new());
        self.reader.read_to_end(&mut data).map_err(|e| {
            BatchcryptError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                format!("error reading passphrase: {}", e),
                e,
            )
        })?;
        Ok(data)
    }
}

/// Reads passphrase from terminal with no echo
pub struct TerminalPassphraseReader {
    prompt: String,
}

impl TerminalPassphraseReader {
    pub fn new() -> Self {
        Self::with_prompt("Passphrase (batchcrypt): ")
    }

    /// A reader with a custom prompt, e.g. for confirmation reads.
    pub fn with_prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

impl Default for TerminalPassphraseReader {
    fn default() -> Self {
        Self::new()
    }
}

impl PassphraseReader for TerminalPassphraseReader {
    /// Read passphrase from terminal.
    ///
    /// Note: Terminal input is limited to UTF-8 due to rpassword library constraints.
    /// For non-UTF-8 passphrases, use --passphrase-stdin instead.
    fn read_passphrase(&mut self) -> Result<Zeroizing<Vec<u8>>> {
        if !io::stdin().is_terminal() {
            return Err(BatchcryptError::with_kind(
                ErrorCategory::User,
                ErrorKind::PassphraseUnavailable,
                "cannot read passphrase from terminal - stdin is not a terminal",
            ));
        }

        io::stderr().write_all(self.prompt.as_bytes()).map_err(|e| {
            BatchcryptError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                format!("failed to write prompt: {}", e),
                e,
            )
        })?;
        io::stderr().flush().map_err(|e| {
            BatchcryptError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                format!("failed to flush prompt: {}", e),
                e,
            )
        })?;

        // Read password *without echo*
        // Note: rpassword returns String (UTF-8 only), not zeroized
        let passphrase = rpassword::read_password().map_err(|e| {
            BatchcryptError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::PassphraseUnavailable,
                format!("failure reading passphrase: {}", e),
                e,
            )
        })?;

        Ok(Zeroizing::new(passphrase.into_bytes()))
    }
}
