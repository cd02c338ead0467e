//! Single-instance PID lock
//!
//! An exclusive advisory lock on a well-known file keeps concurrent
//! invocations (a scheduler double-fire, say) from racing on the pairings
//! file or sending duplicate mail. The loser sees the lock held and exits
//! without error; the holder's guard removes the file on every exit path.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

/// RAII guard for the PID lock file
pub struct PidLock {
    file: File,
    path: PathBuf,
}

impl PidLock {
    /// Tries to take the lock
    ///
    /// Returns `Ok(None)` when another instance already holds it. The
    /// holder's PID is written into the file for operator convenience.
    pub fn acquire(path: &Path) -> Result<Option<Self>> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)
            .with_context(|| format!("Failed to open lock file: {}", path.display()))?;

        match file.try_lock_exclusive() {
            Ok(()) => {}
            Err(e) if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() => {
                return Ok(None);
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to lock file: {}", path.display()));
            }
        }

        let mut lock = Self {
            file,
            path: path.to_path_buf(),
        };

        lock.file
            .set_len(0)
            .context("Failed to truncate lock file")?;
        write!(lock.file, "{}", std::process::id()).context("Failed to write PID")?;
        lock.file.flush().context("Failed to flush lock file")?;

        Ok(Some(lock))
    }
}

impl Drop for PidLock {
    fn drop(&mut self) {
        // Best effort: remove the file first, then the lock releases when
        // the handle closes
        let _ = fs::remove_file(&self.path);
    }
}
