use super::blob::BlobStore;
use crate::domain::{ImportFormatError, PersistenceError, Task};
use std::collections::HashSet;
use tracing::warn;

pub const TASKS_KEY: &str = "tasks";
pub const ACHIEVEMENTS_KEY: &str = "achievements";
pub const SCORE_KEY: &str = "productivityScore";

/// Everything that survives a restart
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub tasks: Vec<Task>,
    pub achievements: Vec<String>,
    pub productivity_score: u8,
}

/// Load the persisted snapshot.
///
/// `Ok(None)` when nothing was saved yet, and also when a stored value is
/// malformed: bad data is treated as absent, never as a crash. A storage
/// read failure is returned as an error so the caller can stop writing to
/// a store it could not read.
pub fn load_snapshot(store: &dyn BlobStore) -> Result<Option<Snapshot>, PersistenceError> {
    let Some(tasks_json) = store.get(TASKS_KEY)? else {
        return Ok(None);
    };
    let tasks = match parse_tasks(&tasks_json) {
        Ok(tasks) => tasks,
        Err(e) => {
            warn!(error = %e, "stored tasks are malformed, starting empty");
            return Ok(None);
        }
    };

    let achievements = match store.get(ACHIEVEMENTS_KEY)? {
        Some(json) => match serde_json::from_str::<Vec<String>>(&json) {
            Ok(ids) => ids,
            Err(e) => {
                warn!(error = %e, "stored achievements are malformed, starting empty");
                return Ok(None);
            }
        },
        None => Vec::new(),
    };

    let productivity_score = match store.get(SCORE_KEY)? {
        Some(json) => match serde_json::from_str::<u8>(json.trim()) {
            Ok(score) if score <= 100 => score,
            _ => {
                warn!("stored productivity score is malformed, starting empty");
                return Ok(None);
            }
        },
        None => 0,
    };

    Ok(Some(Snapshot {
        tasks,
        achievements,
        productivity_score,
    }))
}

/// Write all three keys. Not transactional: a failure may leave earlier keys written.
pub fn save_snapshot(store: &dyn BlobStore, snapshot: &Snapshot) -> Result<(), PersistenceError> {
    let tasks = encode(TASKS_KEY, &snapshot.tasks)?;
    let achievements = encode(ACHIEVEMENTS_KEY, &snapshot.achievements)?;
    let score = encode(SCORE_KEY, &snapshot.productivity_score)?;

    store.set(TASKS_KEY, &tasks)?;
    store.set(ACHIEVEMENTS_KEY, &achievements)?;
    store.set(SCORE_KEY, &score)?;
    Ok(())
}

fn encode<T: serde::Serialize + ?Sized>(key: &str, value: &T) -> Result<String, PersistenceError> {
    serde_json::to_string(value).map_err(|source| PersistenceError::Encode {
        key: key.to_string(),
        source,
    })
}

/// Serialize the full task collection for download
pub fn export_tasks(tasks: &[Task]) -> Result<String, PersistenceError> {
    serde_json::to_string_pretty(tasks).map_err(|source| PersistenceError::Encode {
        key: "export".to_string(),
        source,
    })
}

/// Parse a user-supplied blob as a complete task collection
pub fn import_tasks(content: &str) -> Result<Vec<Task>, ImportFormatError> {
    parse_tasks(content)
}

/// Decode and validate a task list: non-empty text, unique ids, clean tag sets
fn parse_tasks(content: &str) -> Result<Vec<Task>, ImportFormatError> {
    let mut tasks: Vec<Task> = serde_json::from_str(content)?;
    let mut seen = HashSet::with_capacity(tasks.len());

    for (idx, task) in tasks.iter_mut().enumerate() {
        let text = task.text.trim();
        if text.is_empty() {
            return Err(ImportFormatError::Invalid(format!("task #{} has empty text", idx + 1)));
        }
        task.text = text.to_string();
        if !seen.insert(task.id) {
            return Err(ImportFormatError::Invalid(format!("duplicate task id {}", task.id)));
        }
        if task.subtasks.iter().any(|s| s.text.trim().is_empty()) {
            return Err(ImportFormatError::Invalid(format!(
                "task \"{}\" has a subtask with empty text",
                task.text
            )));
        }
        task.normalize_tags();
    }

    Ok(tasks)
}
