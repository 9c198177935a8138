use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Result, TreeError};
use crate::model::{ROOT_ID, Task};
use crate::store::alloc;

/// Directory name created by `init` under the chosen root.
pub const STORE_DIR: &str = ".tasks";

/// Root of the .tasks directory: one JSON document per task under `tasks/`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open an existing .tasks directory.
    pub fn open(base: &Path) -> Result<Self> {
        let root = base.join(STORE_DIR);
        let store = Self { root };
        if !store.task_path(ROOT_ID).exists() {
            return Err(TreeError::NotInitialized);
        }
        Ok(store)
    }

    /// Create the .tasks directory, its config and the root record.
    pub fn init(base: &Path) -> Result<Self> {
        let root = base.join(STORE_DIR);
        if root.exists() {
            return Err(TreeError::AlreadyInitialized);
        }

        fs::create_dir_all(root.join("tasks"))?;
        Config::default().save(&root)?;

        let store = Self { root };
        store.write(&Task::root())?;
        tracing::info!(root = %store.root.display(), "initialized task store");
        Ok(store)
    }

    fn tasks_dir(&self) -> PathBuf {
        self.root.join("tasks")
    }

    fn task_path(&self, id: u64) -> PathBuf {
        self.tasks_dir().join(format!("{}.json", id))
    }

    pub fn exists(&self, id: u64) -> bool {
        self.task_path(id).is_file()
    }

    pub fn read(&self, id: u64) -> Result<Task> {
        let path = self.task_path(id);
        if !path.exists() {
            return Err(TreeError::TaskNotFound(id));
        }
        let data = fs::read_to_string(path)?;
        let mut task: Task = serde_json::from_str(&data)?;
        task.id = id;
        tracing::trace!(id, "read task");
        Ok(task)
    }

    pub fn write(&self, task: &Task) -> Result<()> {
        let mut task = task.clone();
        task.normalize();
        let json = serde_json::to_string_pretty(&task)?;
        fs::write(self.task_path(task.id), json)?;
        tracing::debug!(id = task.id, state = %task.state, "wrote task");
        Ok(())
    }

    pub fn delete(&self, id: u64) -> Result<()> {
        let path = self.task_path(id);
        if !path.exists() {
            return Err(TreeError::TaskNotFound(id));
        }
        fs::remove_file(path)?;
        tracing::debug!(id, "deleted task");
        Ok(())
    }

    pub fn list_ids(&self) -> Result<Vec<u64>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(self.tasks_dir())? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if let Some(stem) = name.strip_suffix(".json")
                && let Ok(id) = stem.parse::<u64>()
            {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }

    pub fn read_many(&self, ids: &[u64]) -> Result<Vec<Task>> {
        ids.iter().map(|&id| self.read(id)).collect()
    }

    pub fn list_all(&self) -> Result<Vec<Task>> {
        self.list_ids()?
            .into_iter()
            .map(|id| self.read(id))
            .collect()
    }

    /// Smallest id not currently stored. Not reserved: write a task under it promptly.
    pub fn allocate(&self) -> Result<u64> {
        let ids = self.list_ids()?;
        Ok(alloc::first_free_id(&ids))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
