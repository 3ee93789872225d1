//! First-run environment preparation
//!
//! The private state directory is optional: failing to create it degrades
//! caching features but never stops a run.

use std::io;
use std::path::Path;

use crate::display::Diagnostics;

/// Filesystem abstraction for testability.
pub trait FileSystem {
    /// Create exactly `path` (parent must exist), readable by the owner only.
    fn create_private_dir(&self, path: &Path) -> io::Result<()>;
}

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    #[cfg(unix)]
    fn create_private_dir(&self, path: &Path) -> io::Result<()> {
        use std::os::unix::fs::DirBuilderExt;
        std::fs::DirBuilder::new().mode(0o700).create(path)
    }

    #[cfg(not(unix))]
    fn create_private_dir(&self, path: &Path) -> io::Result<()> {
        std::fs::DirBuilder::new().create(path)
    }
}

/// What `ensure_state_directory` found or did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirStatus {
    Created,
    Existing,
    Failed,
}

/// Make sure the state directory exists.
///
/// Concurrent first runs race on creation; losing the race is the same as
/// finding the directory already there.
pub fn ensure_state_directory(
    fs: &dyn FileSystem,
    path: &Path,
    diagnostics: &dyn Diagnostics,
) -> DirStatus {
    match fs.create_private_dir(path) {
        Ok(()) => {
            diagnostics.debug(&format!("Created the '{}' directory", path.display()));
            DirStatus::Created
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => DirStatus::Existing,
        Err(e) => {
            diagnostics.warning(&format!(
                "Failed to create the directory '{}': {}",
                path.display(),
                e
            ));
            DirStatus::Failed
        }
    }
}
