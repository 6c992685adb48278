//! End-to-end batch tests
//!
//! Exercises the full pipeline over real directories: enumerate, encrypt,
//! write artifacts, then decrypt them back and compare contents.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use batchcrypt::artifact;
use batchcrypt::batch;
use batchcrypt::fileops;
use batchcrypt::kdf::SALT_LEN;

const PASSPHRASE: &[u8] = b"testpass1";

fn write_inputs(dir: &Path, contents: &[(&str, &[u8])]) -> Vec<PathBuf> {
    for (name, data) in contents {
        fs::write(dir.join(name), data).unwrap();
    }
    fileops::list_files(dir).unwrap()
}

#[test]
fn test_folder_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let input_dir = temp_dir.path().join("docs");
    fs::create_dir(&input_dir).unwrap();

    let inputs: &[(&str, &[u8])] = &[
        ("empty.bin", b""),
        ("hello.txt", b"hello world"),
        ("aligned.bin", &[0xAB; 32]),
        ("binary.dat", &[0x00, 0xFF, 0x7F, 0x80, 0x01]),
    ];
    let files = write_inputs(&input_dir, inputs);

    let encrypted_dir = fileops::make_output_folder(&input_dir, "encrypted").unwrap();
    let report = batch::run_encryption_batch(&files, &encrypted_dir, PASSPHRASE).unwrap();
    assert_eq!(report.succeeded, inputs.len());
    assert_eq!(report.failed, 0);

    let artifacts = fileops::list_artifacts(&encrypted_dir).unwrap();
    assert_eq!(artifacts.len(), inputs.len());
    for path in &artifacts {
        let bytes = fs::read(path).unwrap();
        assert!(bytes.len() >= artifact::MIN_ARTIFACT_LEN);
        assert_eq!((bytes.len() - artifact::MIN_ARTIFACT_LEN) % 16, 0);
        let (valid, _) = batch::check_artifact_integrity(path);
        assert!(valid, "{} failed integrity check", path.display());
    }

    let decrypted_dir = fileops::make_output_folder(&input_dir, "decrypted").unwrap();
    let report = batch::run_decryption_batch(&artifacts, &decrypted_dir, PASSPHRASE).unwrap();
    assert_eq!(report.succeeded, inputs.len());
    assert_eq!(report.failed, 0);

    for (name, data) in inputs {
        let recovered = fs::read(decrypted_dir.join(name)).unwrap();
        assert_eq!(&recovered, data, "mismatch for {}", name);
    }
}

#[test]
fn test_identical_plaintexts_get_distinct_ciphertexts() {
    let temp_dir = TempDir::new().unwrap();
    let input_dir = temp_dir.path().join("docs");
    fs::create_dir(&input_dir).unwrap();

    let files = write_inputs(
        &input_dir,
        &[("one.txt", b"same content"), ("two.txt", b"same content")],
    );

    let encrypted_dir = fileops::make_output_folder(&input_dir, "encrypted").unwrap();
    batch::run_encryption_batch(&files, &encrypted_dir, PASSPHRASE).unwrap();

    let a = fs::read(encrypted_dir.join("one.txt.enc")).unwrap();
    let b = fs::read(encrypted_dir.join("two.txt.enc")).unwrap();

    // Same batch salt, but per-file IVs keep the ciphertexts distinct.
    assert_eq!(a[..SALT_LEN], b[..SALT_LEN]);
    assert_ne!(a[SALT_LEN..], b[SALT_LEN..]);
}

#[test]
fn test_batch_isolation_one_bad_file() {
    let temp_dir = TempDir::new().unwrap();
    let input_dir = temp_dir.path().join("docs");
    fs::create_dir(&input_dir).unwrap();

    let mut files = write_inputs(
        &input_dir,
        &[("a.txt", b"aaa"), ("b.txt", b"bbb"), ("c.txt", b"ccc")],
    );
    // A path that will fail on read, inserted mid-batch.
    files.insert(1, input_dir.join("ghost.txt"));

    let encrypted_dir = fileops::make_output_folder(&input_dir, "encrypted").unwrap();
    let report = batch::run_encryption_batch(&files, &encrypted_dir, PASSPHRASE).unwrap();

    assert_eq!(report.succeeded, 3);
    assert_eq!(report.failed, 1);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].path.ends_with("ghost.txt"));
}

#[test]
fn test_wrong_passphrase_never_recovers_plaintext() {
    let temp_dir = TempDir::new().unwrap();
    let input_dir = temp_dir.path().join("docs");
    fs::create_dir(&input_dir).unwrap();

    let original: &[u8] = b"the secret that must not leak";
    let files = write_inputs(&input_dir, &[("secret.txt", original)]);

    let encrypted_dir = fileops::make_output_folder(&input_dir, "encrypted").unwrap();
    batch::run_encryption_batch(&files, &encrypted_dir, b"Secret123").unwrap();

    let artifacts = fileops::list_artifacts(&encrypted_dir).unwrap();
    let decrypted_dir = fileops::make_output_folder(&input_dir, "decrypted").unwrap();
    let report = batch::run_decryption_batch(&artifacts, &decrypted_dir, b"Wrong1234").unwrap();

    // Either the pad check catches it, or garbage was written; in both
    // cases the report must not pretend the batch went cleanly, and the
    // original bytes must never come back.
    if report.succeeded > 0 {
        let recovered = fs::read(decrypted_dir.join("secret.txt")).unwrap();
        assert_ne!(recovered, original);
    } else {
        assert!(report.total_failure());
        assert!(report.failed >= 1);
    }
}

#[test]
fn test_mixed_session_artifacts_decrypt_together() {
    let temp_dir = TempDir::new().unwrap();

    // Two separate encryption batches, therefore two different salts.
    let dir_one = temp_dir.path().join("one");
    let dir_two = temp_dir.path().join("two");
    fs::create_dir(&dir_one).unwrap();
    fs::create_dir(&dir_two).unwrap();

    let files_one = write_inputs(&dir_one, &[("first.txt", b"from session one")]);
    let files_two = write_inputs(&dir_two, &[("second.txt", b"from session two")]);

    let pool = temp_dir.path().join("pool");
    fs::create_dir(&pool).unwrap();

    let r1 = batch::run_encryption_batch(&files_one, &pool, PASSPHRASE).unwrap();
    let r2 = batch::run_encryption_batch(&files_two, &pool, PASSPHRASE).unwrap();
    assert_ne!(r1.salt, r2.salt);

    let artifacts = fileops::list_artifacts(&pool).unwrap();
    assert_eq!(artifacts.len(), 2);

    let decrypted_dir = fileops::make_output_folder(&pool, "decrypted").unwrap();
    let report = batch::run_decryption_batch(&artifacts, &decrypted_dir, PASSPHRASE).unwrap();
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed, 0);

    assert_eq!(
        fs::read(decrypted_dir.join("first.txt")).unwrap(),
        b"from session one"
    );
    assert_eq!(
        fs::read(decrypted_dir.join("second.txt")).unwrap(),
        b"from session two"
    );
}

#[test]
fn test_corrupted_artifact_among_good_ones() {
    let temp_dir = TempDir::new().unwrap();
    let input_dir = temp_dir.path().join("docs");
    fs::create_dir(&input_dir).unwrap();

    let files = write_inputs(&input_dir, &[("a.txt", b"alpha"), ("b.txt", b"beta")]);

    let encrypted_dir = fileops::make_output_folder(&input_dir, "encrypted").unwrap();
    batch::run_encryption_batch(&files, &encrypted_dir, PASSPHRASE).unwrap();

    // Truncate one artifact below the minimum size.
    let victim = encrypted_dir.join("a.txt.enc");
    fs::write(&victim, vec![0u8; 20]).unwrap();

    let artifacts = fileops::list_artifacts(&encrypted_dir).unwrap();
    let decrypted_dir = fileops::make_output_folder(&input_dir, "decrypted").unwrap();
    let report = batch::run_decryption_batch(&artifacts, &decrypted_dir, PASSPHRASE).unwrap();

    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failed, 1);
    assert!(report.failures[0].path.ends_with("a.txt.enc"));
    assert_eq!(fs::read(decrypted_dir.join("b.txt")).unwrap(), b"beta");
    assert!(!decrypted_dir.join("a.txt").exists());
}
