use crate::domain::{Achievement, Category, Task};
use std::collections::{BTreeMap, BTreeSet};

/// Tracked time at which the time component of the score saturates (10h)
pub const SCORE_TIME_CAP_SECS: u64 = 36_000;

/// Completed (non-archived) tasks needed for `productivity_expert`
pub const EXPERT_THRESHOLD: usize = 10;

/// Derived statistics over the task collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metrics {
    pub active_count: usize,
    pub completed_count: usize,
    /// Non-archived tasks
    pub total_count: usize,
    pub archived_count: usize,
    pub starred_count: usize,
    /// Rounded percentage, 0 for an empty view
    pub completion_pct: u8,
    /// Seconds across all tasks, archived included
    pub total_time_spent: u64,
    pub productivity_score: u8,
}

/// Recompute every derived value from scratch
pub fn compute_metrics(tasks: &[Task]) -> Metrics {
    let mut metrics = Metrics::default();

    for task in tasks {
        metrics.total_time_spent += task.time_spent;
        if task.archived {
            metrics.archived_count += 1;
            continue;
        }
        metrics.total_count += 1;
        if task.completed {
            metrics.completed_count += 1;
        } else {
            metrics.active_count += 1;
        }
        if task.starred {
            metrics.starred_count += 1;
        }
    }

    metrics.completion_pct = if metrics.total_count == 0 {
        0
    } else {
        (100.0 * metrics.completed_count as f64 / metrics.total_count as f64).round() as u8
    };
    metrics.productivity_score = productivity_score(
        metrics.completed_count,
        metrics.total_count,
        metrics.starred_count,
        metrics.total_time_spent,
    );

    metrics
}

/// Weighted composite: 50 for completion, 25 for tracked time (capped at 10h),
/// 25 for starred ratio. Lands in [0, 100] by construction.
pub fn productivity_score(completed: usize, total: usize, starred: usize, time_spent: u64) -> u8 {
    let denominator = total.max(1) as f64;
    let completion = completed as f64 / denominator;
    let time = time_spent.min(SCORE_TIME_CAP_SECS) as f64 / SCORE_TIME_CAP_SECS as f64;
    let starred = starred as f64 / denominator;

    (50.0 * completion + 25.0 * time + 25.0 * starred).round().clamp(0.0, 100.0) as u8
}

/// Seconds tracked per category, archived tasks included
pub fn time_by_category(tasks: &[Task]) -> BTreeMap<Category, u64> {
    let mut totals = BTreeMap::new();
    for task in tasks {
        *totals.entry(task.category).or_insert(0) += task.time_spent;
    }
    totals
}

/// (task count, seconds tracked) per tag, archived tasks included
pub fn tag_usage(tasks: &[Task]) -> BTreeMap<String, (usize, u64)> {
    let mut usage: BTreeMap<String, (usize, u64)> = BTreeMap::new();
    for task in tasks {
        for tag in &task.tags {
            let entry = usage.entry(tag.clone()).or_insert((0, 0));
            entry.0 += 1;
            entry.1 += task.time_spent;
        }
    }
    usage
}

/// What kind of change just happened, for achievement evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// A task was added; `store_was_empty` counts archived tasks too
    TaskAdded { store_was_empty: bool },
    /// Completion flags changed (toggle or import)
    CompletionChanged,
    /// A Pomodoro work session just ended
    WorkSessionFinished,
}

/// Achievements earned by a change, given metrics before and after it.
///
/// `productivity_expert` reads the post-change completed count.
pub fn earned_achievements(trigger: Trigger, before: &Metrics, after: &Metrics) -> Vec<Achievement> {
    let mut earned = Vec::new();
    match trigger {
        Trigger::TaskAdded { store_was_empty } => {
            if store_was_empty {
                earned.push(Achievement::FirstTask);
            }
        }
        Trigger::CompletionChanged => {
            if before.completed_count == 0 && after.completed_count > 0 {
                earned.push(Achievement::TaskCompleted);
            }
            if after.completed_count >= EXPERT_THRESHOLD {
                earned.push(Achievement::ProductivityExpert);
            }
        }
        Trigger::WorkSessionFinished => earned.push(Achievement::PomodoroMaster),
    }
    earned
}

/// Monotonic set of unlocked achievements
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AchievementSet {
    unlocked: BTreeSet<Achievement>,
}

impl AchievementSet {
    /// Build from persisted identifiers, skipping unknown ones
    pub fn from_ids<S: AsRef<str>>(ids: &[S]) -> Self {
        Self {
            unlocked: ids.iter().filter_map(|id| Achievement::from_id(id.as_ref())).collect(),
        }
    }

    /// Returns true only on first unlock
    pub fn unlock(&mut self, achievement: Achievement) -> bool {
        self.unlocked.insert(achievement)
    }

    pub fn contains(&self, achievement: Achievement) -> bool {
        self.unlocked.contains(&achievement)
    }

    pub fn len(&self) -> usize {
        self.unlocked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unlocked.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Achievement> + '_ {
        self.unlocked.iter().copied()
    }

    pub fn ids(&self) -> Vec<String> {
        self.iter().map(|a| a.id().to_string()).collect()
    }
}
