//! # Data Directory Lock
//!
//! Uses `fs2` for cross-platform file locking (flock on Unix, LockFile on
//! Windows). Two terminal processes writing the same queue files would
//! corrupt each other's atomic-rename dance, so the first one takes an
//! exclusive lock on the data directory for its lifetime.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;

/// Errors from data-directory locking.
#[derive(Debug, Error)]
pub enum LockError {
    /// Lock file could not be created.
    #[error("Failed to create lock file: {0}")]
    CreateFailed(io::Error),

    /// Another terminal process holds the lock.
    #[error("Data directory already in use{}", .pid.map(|p| format!(" by process {p}")).unwrap_or_default())]
    AlreadyLocked { pid: Option<u32> },

    /// Failed to record our PID in the lock file.
    #[error("Failed to write PID to lock file: {0}")]
    WriteFailed(io::Error),
}

/// Exclusive lock on the terminal's data directory.
///
/// Acquired on startup, released on drop (RAII).
#[derive(Debug)]
pub struct DataDirLock {
    /// Kept open to maintain the lock.
    file: File,
    path: PathBuf,
    pid: u32,
}

impl DataDirLock {
    const LOCK_FILE: &'static str = "LOCK";

    /// Acquire an exclusive lock on `data_dir`, creating the directory if
    /// needed. Non-blocking: a held lock is an immediate error, with the
    /// holder's PID when it can be read.
    pub fn acquire(data_dir: &Path) -> Result<Self, LockError> {
        std::fs::create_dir_all(data_dir).map_err(LockError::CreateFailed)?;
        let lock_path = data_dir.join(Self::LOCK_FILE);

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(LockError::CreateFailed)?;

        match file.try_lock_exclusive() {
            Ok(()) => {
                let pid = std::process::id();
                let mut locked = file;
                locked.set_len(0).map_err(LockError::WriteFailed)?;
                writeln!(locked, "{pid}").map_err(LockError::WriteFailed)?;
                locked.sync_all().map_err(LockError::WriteFailed)?;

                tracing::debug!(path = %lock_path.display(), pid, "Acquired data directory lock");
                Ok(Self {
                    file: locked,
                    path: lock_path,
                    pid,
                })
            }
            Err(_) => {
                let holder = std::fs::read_to_string(&lock_path)
                    .ok()
                    .and_then(|s| s.trim().parse().ok());
                Err(LockError::AlreadyLocked { pid: holder })
            }
        }
    }

    /// PID recorded in the lock file (this process).
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Path of the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for DataDirLock {
    fn drop(&mut self) {
        // Unlock only. Unlinking the file would race a process that has
        // just opened and locked the old inode while a third creates and
        // locks a fresh one at the same path.
        let _ = fs2::FileExt::unlock(&self.file);
    }
}
