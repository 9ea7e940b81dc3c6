use serde::{Deserialize, Serialize};

/// Fixed set of task categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Work,
    Personal,
    Shopping,
    Health,
    Learning,
}

impl Category {
    /// Parse a category from its lowercase name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "work" => Some(Self::Work),
            "personal" => Some(Self::Personal),
            "shopping" => Some(Self::Shopping),
            "health" => Some(Self::Health),
            "learning" => Some(Self::Learning),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Personal => "personal",
            Self::Shopping => "shopping",
            Self::Health => "health",
            Self::Learning => "learning",
        }
    }

    /// Next category in cycle order (used by the category key binding)
    pub fn next(&self) -> Self {
        match self {
            Self::Work => Self::Personal,
            Self::Personal => Self::Shopping,
            Self::Shopping => Self::Health,
            Self::Health => Self::Learning,
            Self::Learning => Self::Work,
        }
    }

    pub fn all() -> &'static [Category] {
        &[
            Category::Work,
            Category::Personal,
            Category::Shopping,
            Category::Health,
            Category::Learning,
        ]
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Next priority, wrapping from critical back to low
    pub fn next(&self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High => Self::Critical,
            Self::Critical => Self::Low,
        }
    }
}

/// Pomodoro phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PomodoroPhase {
    Work,
    Break,
}

impl PomodoroPhase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::Break => "Break",
        }
    }
}

/// Unlockable achievements. Stored by their string identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Achievement {
    FirstTask,
    TaskCompleted,
    ProductivityExpert,
    PomodoroMaster,
}

impl Achievement {
    /// Parse from the persisted identifier (e.g. "first_task")
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "first_task" => Some(Self::FirstTask),
            "task_completed" => Some(Self::TaskCompleted),
            "productivity_expert" => Some(Self::ProductivityExpert),
            "pomodoro_master" => Some(Self::PomodoroMaster),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::FirstTask => "first_task",
            Self::TaskCompleted => "task_completed",
            Self::ProductivityExpert => "productivity_expert",
            Self::PomodoroMaster => "pomodoro_master",
        }
    }

    /// Human readable title
    pub fn title(&self) -> &'static str {
        match self {
            Self::FirstTask => "First Task",
            Self::TaskCompleted => "Task Completed",
            Self::ProductivityExpert => "Productivity Expert",
            Self::PomodoroMaster => "Pomodoro Master",
        }
    }
}

/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    AddingTask,
    AddingSubtask,
    EditingText,
    AddingTag,
    RemovingTag,
}
