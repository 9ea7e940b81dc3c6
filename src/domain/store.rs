use super::enums::{Category, Priority};
use super::error::ValidationError;
use super::task::{Subtask, Task};
use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

/// Ordered task collection and its mutations.
///
/// Every id-addressed operation treats an unknown id as a no-op, so a stale
/// reference from the UI can never fail a command.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: Uuid) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Tasks that are not archived, in insertion order
    pub fn visible(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| !t.archived)
    }

    /// Append a new task with default fields
    pub fn add(&mut self, text: &str, category: Category) -> Result<Uuid, ValidationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyTaskText);
        }
        let task = Task::new(text.to_string(), category);
        let id = task.id;
        self.tasks.push(task);
        debug!(%id, "task added");
        Ok(id)
    }

    /// Flip completion. Returns the new state, or None for an unknown id.
    pub fn toggle_complete(&mut self, id: Uuid) -> Option<bool> {
        let task = self.get_mut(id)?;
        task.completed = !task.completed;
        Some(task.completed)
    }

    /// Remove a task together with its subtasks
    pub fn delete(&mut self, id: Uuid) -> Option<Task> {
        let idx = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(idx))
    }

    pub fn archive(&mut self, id: Uuid) -> bool {
        self.set_archived(id, true)
    }

    pub fn unarchive(&mut self, id: Uuid) -> bool {
        self.set_archived(id, false)
    }

    fn set_archived(&mut self, id: Uuid, archived: bool) -> bool {
        match self.get_mut(id) {
            Some(task) => {
                task.archived = archived;
                true
            }
            None => false,
        }
    }

    pub fn toggle_star(&mut self, id: Uuid) -> Option<bool> {
        let task = self.get_mut(id)?;
        task.starred = !task.starred;
        Some(task.starred)
    }

    /// Zero the tracked time of a task
    pub fn reset_time(&mut self, id: Uuid) -> bool {
        match self.get_mut(id) {
            Some(task) => {
                task.time_spent = 0;
                true
            }
            None => false,
        }
    }

    /// Replace the display text. Empty text leaves the task untouched.
    pub fn edit_text(&mut self, id: Uuid, text: &str) -> Result<(), ValidationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyTaskText);
        }
        if let Some(task) = self.get_mut(id) {
            task.text = text.to_string();
        }
        Ok(())
    }

    /// Add a tag with set semantics
    pub fn add_tag(&mut self, id: Uuid, tag: &str) -> Result<(), ValidationError> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(ValidationError::EmptyTag);
        }
        let Some(task) = self.get_mut(id) else {
            return Ok(());
        };
        if task.has_tag(tag) {
            return Err(ValidationError::DuplicateTag(tag.to_string()));
        }
        task.tags.push(tag.to_string());
        Ok(())
    }

    pub fn remove_tag(&mut self, id: Uuid, tag: &str) -> bool {
        let tag = tag.trim();
        match self.get_mut(id) {
            Some(task) => {
                let before = task.tags.len();
                task.tags.retain(|t| t != tag);
                task.tags.len() != before
            }
            None => false,
        }
    }

    pub fn add_subtask(&mut self, task_id: Uuid, text: &str) -> Result<Option<Uuid>, ValidationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptySubtaskText);
        }
        let Some(task) = self.get_mut(task_id) else {
            return Ok(None);
        };
        let subtask = Subtask::new(text.to_string());
        let id = subtask.id;
        task.subtasks.push(subtask);
        Ok(Some(id))
    }

    pub fn toggle_subtask(&mut self, task_id: Uuid, subtask_id: Uuid) -> Option<bool> {
        let subtask = self
            .get_mut(task_id)?
            .subtasks
            .iter_mut()
            .find(|s| s.id == subtask_id)?;
        subtask.completed = !subtask.completed;
        Some(subtask.completed)
    }

    pub fn delete_subtask(&mut self, task_id: Uuid, subtask_id: Uuid) -> bool {
        match self.get_mut(task_id) {
            Some(task) => {
                let before = task.subtasks.len();
                task.subtasks.retain(|s| s.id != subtask_id);
                task.subtasks.len() != before
            }
            None => false,
        }
    }

    pub fn set_priority(&mut self, id: Uuid, priority: Priority) -> bool {
        self.update(id, |task| task.priority = priority)
    }

    pub fn set_category(&mut self, id: Uuid, category: Category) -> bool {
        self.update(id, |task| task.category = category)
    }

    pub fn set_due_date(&mut self, id: Uuid, due_date: Option<NaiveDate>) -> bool {
        self.update(id, |task| task.due_date = due_date)
    }

    pub fn set_notes(&mut self, id: Uuid, notes: &str) -> bool {
        self.update(id, |task| task.notes = notes.to_string())
    }

    pub fn set_estimate(&mut self, id: Uuid, minutes: Option<u32>) -> bool {
        self.update(id, |task| task.estimated_minutes = minutes)
    }

    fn update(&mut self, id: Uuid, f: impl FnOnce(&mut Task)) -> bool {
        match self.get_mut(id) {
            Some(task) => {
                f(task);
                true
            }
            None => false,
        }
    }

    /// Advance a task's tracked time by one second.
    /// Returns false when the task is gone or completed.
    pub fn tick_task(&mut self, id: Uuid) -> bool {
        self.get_mut(id).is_some_and(|task| task.tick())
    }

    /// Swap in a whole new collection (used by import)
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }
}
