use std::fs;
use std::path::PathBuf;

use relay_engine::{StagingError, StagingSettings, VideoStager, MAX_UPLOAD_BYTES};
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, bytes).expect("write source file");
    path
}

#[test]
fn stages_valid_mp4_under_original_name() {
    let source_dir = TempDir::new().unwrap();
    let staging_dir = TempDir::new().unwrap();
    let source = write_file(&source_dir, "clip.mp4", b"frames");

    let stager = VideoStager::new(StagingSettings::new(staging_dir.path().to_path_buf()));
    let staged = stager.stage(&source).expect("staging ok");

    assert_eq!(staged, staging_dir.path().join("clip.mp4"));
    assert_eq!(fs::read(&staged).unwrap(), b"frames");
    // The original stays in place; only a copy is staged.
    assert!(source.exists());
}

#[test]
fn creates_staging_dir_if_missing() {
    let source_dir = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    let staging_dir = root.path().join("videos");
    let source = write_file(&source_dir, "clip.mp4", b"frames");

    let stager = VideoStager::new(StagingSettings::new(staging_dir.clone()));
    let staged = stager.stage(&source).expect("staging ok");

    assert!(staging_dir.is_dir());
    assert!(staged.exists());
}

#[test]
fn accepts_uppercase_extension() {
    let source_dir = TempDir::new().unwrap();
    let staging_dir = TempDir::new().unwrap();
    let source = write_file(&source_dir, "CLIP.MP4", b"frames");

    let stager = VideoStager::new(StagingSettings::new(staging_dir.path().to_path_buf()));
    let staged = stager.stage(&source).expect("staging ok");

    assert_eq!(staged, staging_dir.path().join("CLIP.MP4"));
}

#[test]
fn rejects_non_mp4_extension() {
    let source_dir = TempDir::new().unwrap();
    let staging_dir = TempDir::new().unwrap();
    let source = write_file(&source_dir, "notes.txt", b"text");

    let stager = VideoStager::new(StagingSettings::new(staging_dir.path().to_path_buf()));
    let err = stager.stage(&source).unwrap_err();

    assert!(matches!(err, StagingError::NotMp4(_)), "got {err:?}");
    // Nothing reaches the staging directory.
    assert!(!staging_dir.path().join("notes.txt").exists());
}

#[test]
fn rejects_oversized_file() {
    let source_dir = TempDir::new().unwrap();
    let staging_dir = TempDir::new().unwrap();
    let source = write_file(&source_dir, "clip.mp4", b"12345678");

    let stager = VideoStager::new(StagingSettings {
        dir: staging_dir.path().to_path_buf(),
        max_bytes: 4,
    });
    let err = stager.stage(&source).unwrap_err();

    assert!(
        matches!(err, StagingError::TooLarge { actual: 8, max: 4 }),
        "got {err:?}"
    );
}

#[test]
fn default_limit_is_one_hundred_megabytes() {
    assert_eq!(MAX_UPLOAD_BYTES, 100 * 1024 * 1024);
    let settings = StagingSettings::new(PathBuf::from("videos"));
    assert_eq!(settings.max_bytes, MAX_UPLOAD_BYTES);
}

#[test]
fn replaces_same_named_staged_file() {
    let source_dir = TempDir::new().unwrap();
    let staging_dir = TempDir::new().unwrap();
    let stager = VideoStager::new(StagingSettings::new(staging_dir.path().to_path_buf()));

    let first = write_file(&source_dir, "clip.mp4", b"first");
    stager.stage(&first).expect("first staging ok");

    let second = write_file(&source_dir, "clip.mp4", b"second take");
    let staged = stager.stage(&second).expect("second staging ok");

    assert_eq!(fs::read(&staged).unwrap(), b"second take");
}

#[test]
fn rejects_missing_source_file() {
    let staging_dir = TempDir::new().unwrap();
    let stager = VideoStager::new(StagingSettings::new(staging_dir.path().to_path_buf()));

    let err = stager.stage(&PathBuf::from("no/such/clip.mp4")).unwrap_err();

    assert!(matches!(err, StagingError::Io(_)), "got {err:?}");
}
