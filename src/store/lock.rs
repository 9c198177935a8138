use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::{Result, TreeError};

/// Exclusive hold on `.tasks/session.lock` for the lifetime of one shell.
///
/// Dropping the guard releases the lock as well; `release` only surfaces the error.
#[derive(Debug)]
pub struct SessionLock {
    file: File,
    path: PathBuf,
}

impl SessionLock {
    /// Take the lock without waiting. A shell already holding it yields `Locked`.
    pub fn acquire(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        if file.try_lock_exclusive().is_err() {
            return Err(TreeError::Locked(format!(
                "another shell holds {}",
                path.display()
            )));
        }
        tracing::debug!(path = %path.display(), "acquired session lock");
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn release(self) -> Result<()> {
        FileExt::unlock(&self.file)?;
        tracing::debug!(path = %self.path.display(), "released session lock");
        Ok(())
    }
}
