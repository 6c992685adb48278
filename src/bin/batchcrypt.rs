//! Batchcrypt CLI - passphrase-based batch file encryption
//!
//! Command-line interface for encrypting and decrypting whole folders of
//! files using AES-256-CBC with PBKDF2 key derivation.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use batchcrypt::batch::{self, DecryptReport, EncryptReport};
use batchcrypt::error::Result;
use batchcrypt::fileops;
use batchcrypt::passphrase::{
    self, PassphraseReader, ReaderPassphraseReader, TerminalPassphraseReader,
};

#[derive(Parser)]
#[command(name = "batchcrypt")]
#[command(version)]
#[command(about = "Passphrase-based batch file encryption.", long_about = None)]
struct Cli {
    /// Read passphrase from stdin instead of from terminal
    #[arg(long, global = true)]
    passphrase_stdin: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt every file in a folder
    #[command(alias = "e")]
    Encrypt {
        /// Folder whose files are to be encrypted
        #[arg(short, long, value_name = "DIR")]
        folder: PathBuf,
    },

    /// Decrypt every .enc artifact in a folder
    #[command(alias = "d")]
    Decrypt {
        /// Folder containing the .enc artifacts
        #[arg(short, long, value_name = "DIR")]
        folder: PathBuf,
    },

    /// Check the structural integrity of an encrypted artifact
    #[command(alias = "v")]
    Verify {
        /// Path to the artifact to check
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Encrypt { folder } => run_encrypt(&folder, cli.passphrase_stdin),
        Commands::Decrypt { folder } => run_decrypt(&folder, cli.passphrase_stdin),
        Commands::Verify { input } => run_verify(&input),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run_encrypt(folder: &PathBuf, passphrase_stdin: bool) -> Result<()> {
    let passphrase = if passphrase_stdin {
        let mut reader = stdin_reader();
        passphrase::read_new_passphrase(&mut *reader, None)?
    } else {
        let mut reader =
            TerminalPassphraseReader::with_prompt("New passphrase (min 8 chars): ");
        let mut confirm = TerminalPassphraseReader::with_prompt("Confirm passphrase: ");
        passphrase::read_new_passphrase(&mut reader, Some(&mut confirm))?
    };

    let files = fileops::list_files(folder)
        .map_err(|e| e.with_context(format!("failed to enumerate {}", folder.display())))?;
    let output_dir = fileops::make_output_folder(folder, "encrypted")?;

    let report = batch::run_encryption_batch(&files, &output_dir, &passphrase)?;
    print_encrypt_report(&report, &output_dir);
    Ok(())
}

fn run_decrypt(folder: &PathBuf, passphrase_stdin: bool) -> Result<()> {
    let mut reader: Box<dyn PassphraseReader> = if passphrase_stdin {
        stdin_reader()
    } else {
        Box::new(TerminalPassphraseReader::new())
    };
    let passphrase = reader.read_passphrase()?;

    let artifacts = fileops::list_artifacts(folder)
        .map_err(|e| e.with_context(format!("failed to enumerate {}", folder.display())))?;
    let output_dir = fileops::make_output_folder(folder, "decrypted")?;

    let report = batch::run_decryption_batch(&artifacts, &output_dir, &passphrase)?;
    print_decrypt_report(&report);
    Ok(())
}

fn run_verify(input: &PathBuf) -> Result<()> {
    let (valid, reason) = batch::check_artifact_integrity(input);
    println!("{}: {}", input.display(), reason);
    if !valid {
        process::exit(1);
    }
    Ok(())
}

fn stdin_reader() -> Box<dyn PassphraseReader> {
    Box::new(ReaderPassphraseReader::new(Box::new(std::io::stdin())))
}

fn print_encrypt_report(report: &EncryptReport, output_dir: &std::path::Path) {
    for failure in &report.failures {
        eprintln!("failed: {}: {}", failure.path.display(), failure.reason);
    }
    println!(
        "Encrypted {} file(s), {} error(s); artifacts written to {}",
        report.succeeded,
        report.failed,
        output_dir.display()
    );
    if report.succeeded > 0 {
        println!("Keep the passphrase safe - it is required for decryption.");
    }
}

fn print_decrypt_report(report: &DecryptReport) {
    for failure in &report.failures {
        eprintln!("failed: {}: {}", failure.path.display(), failure.reason);
    }
    println!(
        "Decrypted {} file(s), {} error(s); output written to {}",
        report.succeeded,
        report.failed,
        report.output_dir.display()
    );
    if report.total_failure() {
        println!("Every file failed to decrypt - the passphrase may be wrong.");
    }
}
