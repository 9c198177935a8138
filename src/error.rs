use thiserror::Error;

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("no task tree found (run `tasktree init` first)")]
    NotInitialized,

    #[error("task tree already initialized in this directory")]
    AlreadyInitialized,

    #[error("invalid task id '{0}': expected a non-negative integer")]
    InvalidId(String),

    #[error("task {0} not found")]
    TaskNotFound(u64),

    #[error("task {0} is not a subtask of task {1}")]
    NotChild(u64, u64),

    #[error("{0}")]
    InvalidOperation(String),

    #[error("cancelled")]
    Cancelled,

    #[error("locked by another process: {0}")]
    Locked(String),

    #[error("editor: {0}")]
    Editor(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TreeError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotInitialized => "not_initialized",
            Self::AlreadyInitialized => "already_initialized",
            Self::InvalidId(_) => "invalid_id",
            Self::TaskNotFound(_) => "task_not_found",
            Self::NotChild(_, _) => "not_child",
            Self::InvalidOperation(_) => "invalid_operation",
            Self::Cancelled => "cancelled",
            Self::Locked(_) => "locked",
            Self::Editor(_) => "editor_error",
            Self::Io(_) => "io_error",
            Self::Json(_) => "json_error",
        }
    }

    /// Errors that end the process instead of returning to the prompt.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::NotInitialized | Self::AlreadyInitialized | Self::Locked(_)
        )
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidOperation(message.into())
    }
}

pub type Result<T> = std::result::Result<T, TreeError>;
