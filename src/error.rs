use thiserror::Error;

pub type Result<T> = std::result::Result<T, SprintdeckError>;

#[derive(Debug, Error)]
pub enum SprintdeckError {
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Sprint not found: {0}")]
    SprintNotFound(String),

    #[error("Folder not found: {0}")]
    FolderNotFound(String),

    #[error("Board status not found: {0}")]
    StatusNotFound(String),

    #[error("Deal not found: {0}")]
    DealNotFound(String),

    #[error("A task titled '{title}' already exists in this folder and sprint")]
    DuplicateTask { title: String },

    #[error("Board status '{id}' is used by {count} task(s) and cannot be deleted")]
    StatusInUse { id: String, count: usize },

    #[error("A board status named '{0}' already exists")]
    DuplicateStatus(String),

    #[error("Title must not be empty")]
    EmptyTitle,

    #[error("Invalid story points value: {0}")]
    InvalidPoints(u32),

    #[error("Invalid date range: start date must be on or before end date")]
    InvalidDateRange,

    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
