//! File-based locking to prevent concurrent writers of one output.
//!
//! Uses flock-style advisory locking on a `<output>.lock` file next to the
//! consolidated list, so two rangehammer processes never rewrite the same
//! output at the same time.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// A guard that holds an exclusive lock for one output path.
/// The lock is released when the guard is dropped.
#[derive(Debug)]
pub struct LockGuard {
    _file: File,
    path: PathBuf,
}

impl LockGuard {
    /// Attempt to acquire the lock guarding `target`.
    /// Returns an error if another process already holds it.
    ///
    /// Opens with create+read+write (no truncate) so that creating the file
    /// and locking it can't race.
    pub fn acquire<P: AsRef<Path>>(target: P) -> Result<Self> {
        let path = lock_path(target.as_ref());

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .with_context(|| format!("Failed to open lock file: {:?}", path))?;

        file.try_lock_exclusive().map_err(|_| {
            anyhow::anyhow!(
                "Another rangehammer process is already writing {:?}.\n\
                 If you believe this is an error, remove the lock file: {:?}",
                target.as_ref(),
                path
            )
        })?;

        Ok(Self { _file: file, path })
    }

    /// Path of the lock file itself.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// `consolidated.txt` -> `consolidated.txt.lock`
fn lock_path(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("rangehammer"));
    name.push(".lock");
    target.with_file_name(name)
}
