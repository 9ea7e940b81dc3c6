use super::enums::{Category, Priority};
use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A checklist entry owned by a task. Has no timer of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: Uuid,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl Subtask {
    pub fn new(text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            completed: false,
        }
    }
}

/// A task record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    /// Display text, never empty after trimming
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub starred: bool,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub priority: Priority,
    pub created_at: DateTime<Local>,
    /// Whole seconds of tracked time
    #[serde(default)]
    pub time_spent: u64,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    #[serde(default)]
    pub estimated_minutes: Option<u32>,
}

impl Task {
    pub fn new(text: String, category: Category) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            completed: false,
            archived: false,
            starred: false,
            category,
            priority: Priority::default(),
            created_at: Local::now(),
            time_spent: 0,
            due_date: None,
            notes: String::new(),
            tags: Vec::new(),
            subtasks: Vec::new(),
            estimated_minutes: None,
        }
    }

    /// Add one second of tracked time. Completed tasks don't accrue time.
    pub fn tick(&mut self) -> bool {
        if self.completed {
            return false;
        }
        self.time_spent = self.time_spent.saturating_add(1);
        true
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Drop duplicate and blank tags, keeping first occurrence order
    pub fn normalize_tags(&mut self) {
        let mut seen: Vec<String> = Vec::with_capacity(self.tags.len());
        for tag in self.tags.drain(..) {
            let tag = tag.trim().to_string();
            if !tag.is_empty() && !seen.contains(&tag) {
                seen.push(tag);
            }
        }
        self.tags = seen;
    }

    /// (completed, total) subtask counts
    pub fn subtask_progress(&self) -> (usize, usize) {
        let done = self.subtasks.iter().filter(|s| s.completed).count();
        (done, self.subtasks.len())
    }

    /// Whether the task is past its due date and still open
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < today)
    }

    pub fn elapsed_formatted(&self) -> String {
        format_time(self.time_spent)
    }

    /// Whether tracked time has reached the estimate (false without an estimate)
    pub fn is_over_estimate(&self) -> bool {
        self.estimated_minutes
            .is_some_and(|minutes| minutes > 0 && self.time_spent >= u64::from(minutes) * 60)
    }
}

/// Format seconds as "H:MM:SS" (one hour or more) or "M:SS"
pub fn format_time(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Format a countdown as "MM:SS"
pub fn format_countdown(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
