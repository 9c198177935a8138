use crate::error::{Result, TreeError};
use crate::model::{ROOT_ID, Task};
use crate::store::files::FileStore;

/// Parse a task id token typed by the user.
pub fn parse_id(token: &str) -> Result<u64> {
    let raw = token.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TreeError::InvalidId(token.to_string()));
    }
    raw.parse::<u64>()
        .map_err(|_| TreeError::InvalidId(token.to_string()))
}

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    id: u64,
    name: String,
}

/// Where the user is in the tree: the stack of visited tasks, root first.
#[derive(Debug, Clone)]
pub struct Context {
    history: Vec<Entry>,
    current: Task,
}

impl Context {
    pub fn at_root(store: &FileStore) -> Result<Self> {
        let root = store.read(ROOT_ID)?;
        Ok(Self {
            history: vec![Entry {
                id: root.id,
                name: root.name.clone(),
            }],
            current: root,
        })
    }

    pub fn current_id(&self) -> u64 {
        self.current.id
    }

    /// The current task as last loaded. Call [`Context::refresh`] before relying
    /// on it after other records were written.
    pub fn current(&self) -> &Task {
        &self.current
    }

    pub fn is_at_root(&self) -> bool {
        self.history.len() == 1
    }

    /// Ids from the root down to the current task.
    pub fn history_ids(&self) -> Vec<u64> {
        self.history.iter().map(|e| e.id).collect()
    }

    pub fn history_names(&self) -> Vec<&str> {
        self.history.iter().map(|e| e.name.as_str()).collect()
    }

    /// Slash-joined names, used as the prompt.
    pub fn path(&self) -> String {
        self.history_names().join("/")
    }

    /// Re-read the current task from the store.
    pub fn refresh(&mut self, store: &FileStore) -> Result<&Task> {
        self.current = store.read(self.current.id)?;
        if let Some(top) = self.history.last_mut() {
            top.name = self.current.name.clone();
        }
        Ok(&self.current)
    }

    /// Resolve a typed id to one of the current task's children.
    pub fn resolve_child(&self, store: &FileStore, token: &str) -> Result<u64> {
        let id = parse_id(token)?;
        if !store.exists(id) {
            return Err(TreeError::TaskNotFound(id));
        }
        let current = store.read(self.current.id)?;
        if !current.has_child(id) {
            return Err(TreeError::NotChild(id, current.id));
        }
        Ok(id)
    }

    /// Resolve an optional id token, defaulting to the current task.
    pub fn resolve_target(&self, store: &FileStore, token: Option<&str>) -> Result<u64> {
        match token {
            Some(token) => self.resolve_child(store, token),
            None => Ok(self.current.id),
        }
    }

    pub fn descend(&mut self, store: &FileStore, child_id: u64) -> Result<()> {
        if !store.exists(child_id) {
            return Err(TreeError::TaskNotFound(child_id));
        }
        let current = store.read(self.current.id)?;
        if !current.has_child(child_id) {
            return Err(TreeError::NotChild(child_id, current.id));
        }
        let child = store.read(child_id)?;
        self.history.push(Entry {
            id: child.id,
            name: child.name.clone(),
        });
        self.current = child;
        Ok(())
    }

    pub fn ascend(&mut self, store: &FileStore) -> Result<()> {
        if self.is_at_root() {
            return Err(TreeError::invalid("cannot go out of the root task"));
        }
        let top = self.history[self.history.len() - 2].id;
        self.current = store.read(top)?;
        self.history.pop();
        if let Some(entry) = self.history.last_mut() {
            entry.name = self.current.name.clone();
        }
        Ok(())
    }

    /// Go back to the root and descend along `path`.
    ///
    /// On any failure the context is left exactly as it was before the call.
    pub fn reset_to_root(&mut self, store: &FileStore, path: &[u64]) -> Result<()> {
        let mut next = Self::at_root(store)?;
        for &id in path {
            next.descend(store, id)?;
        }
        *self = next;
        Ok(())
    }
}
