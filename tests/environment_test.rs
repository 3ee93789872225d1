//! Tests for state directory preparation

use std::io;
use std::path::Path;

use tempfile::TempDir;

use toolsuite::environment::{ensure_state_directory, DirStatus, FileSystem, RealFileSystem};
use toolsuite::util::testing::{init_test_setup, Channel, RecordingDiagnostics};

/// Filesystem that fails every creation with a fixed error kind.
struct FailingFileSystem(io::ErrorKind);

impl FileSystem for FailingFileSystem {
    fn create_private_dir(&self, _path: &Path) -> io::Result<()> {
        Err(io::Error::new(self.0, "simulated failure"))
    }
}

#[test]
fn given_missing_dir_when_ensure_then_created_with_debug_note() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(".tool");
    init_test_setup();
    let sink = RecordingDiagnostics::new();

    let status = ensure_state_directory(&RealFileSystem, &path, &sink);

    assert_eq!(status, DirStatus::Created);
    assert!(path.is_dir());
    assert!(sink.contains(Channel::Debug, &path.display().to_string()));
    assert!(sink.messages(Channel::Warning).is_empty());
}

#[test]
fn given_existing_dir_when_ensure_twice_then_second_call_is_silent() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(".tool");
    init_test_setup();
    let first = RecordingDiagnostics::new();
    let second = RecordingDiagnostics::new();

    ensure_state_directory(&RealFileSystem, &path, &first);
    let status = ensure_state_directory(&RealFileSystem, &path, &second);

    assert_eq!(status, DirStatus::Existing);
    assert!(second.entries().is_empty(), "got {:?}", second.entries());
}

#[test]
fn given_missing_parent_when_ensure_then_warns_and_continues() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("no").join("such").join(".tool");
    init_test_setup();
    let sink = RecordingDiagnostics::new();

    let status = ensure_state_directory(&RealFileSystem, &path, &sink);

    assert_eq!(status, DirStatus::Failed);
    assert!(!path.exists());
    let warnings = sink.messages(Channel::Warning);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("Failed to create the directory"));
    assert!(warnings[0].contains(&path.display().to_string()));
}

#[test]
fn given_permission_denied_when_ensure_then_warning_includes_error() {
    init_test_setup();
    let sink = RecordingDiagnostics::new();

    let status = ensure_state_directory(
        &FailingFileSystem(io::ErrorKind::PermissionDenied),
        Path::new("/root/.tool"),
        &sink,
    );

    assert_eq!(status, DirStatus::Failed);
    assert!(sink.contains(Channel::Warning, "simulated failure"));
}

#[test]
fn given_creation_race_lost_when_ensure_then_treated_as_existing() {
    init_test_setup();
    let sink = RecordingDiagnostics::new();

    let status = ensure_state_directory(
        &FailingFileSystem(io::ErrorKind::AlreadyExists),
        Path::new("/tmp/.tool"),
        &sink,
    );

    assert_eq!(status, DirStatus::Existing);
    assert!(sink.entries().is_empty());
}

#[cfg(unix)]
#[test]
fn given_created_dir_when_inspected_then_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let path = temp.path().join(".tool");

    RealFileSystem.create_private_dir(&path).unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o077, 0, "group/other bits must be clear: {:o}", mode);
}
