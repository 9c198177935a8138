use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Result, TreeError};
use crate::store::files::{FileStore, STORE_DIR};

pub struct Repo {
    pub store: FileStore,
    pub config: Config,
}

impl Repo {
    /// Open an existing task tree rooted at `base`.
    pub fn open(base: &Path) -> Result<Self> {
        let store = FileStore::open(base)?;
        let config = Config::load(store.root())?;
        Ok(Self { store, config })
    }

    pub fn session_lock_path(&self) -> PathBuf {
        self.store.root().join("session.lock")
    }
}

/// Walk up from `start` to the first directory containing a task store.
pub fn find_repo_root_from(start: &Path) -> Result<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        if dir.join(STORE_DIR).is_dir() {
            return Ok(dir);
        }
        if !dir.pop() {
            return Err(TreeError::NotInitialized);
        }
    }
}

/// Walk up from the current directory to find the task store.
pub fn find_repo_root() -> Result<PathBuf> {
    let cwd = std::env::current_dir().map_err(TreeError::Io)?;
    find_repo_root_from(&cwd)
}
