use thiserror::Error;

/// Rejected user input. Never leaves state partially modified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a task")]
    EmptyTaskText,
    #[error("Subtask text cannot be empty")]
    EmptySubtaskText,
    #[error("Tag cannot be empty")]
    EmptyTag,
    #[error("Tag \"{0}\" is already on this task")]
    DuplicateTag(String),
}

/// Import payload could not be used. The store is left unchanged.
#[derive(Debug, Error)]
pub enum ImportFormatError {
    #[error("Import file is not a valid task list: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Import file contains an invalid task: {0}")]
    Invalid(String),
}

/// Storage read/write failure. Callers degrade to in-memory operation.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Storage I/O failed for \"{key}\": {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to encode \"{key}\": {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Could not determine a data directory")]
    NoDataDir,
}
