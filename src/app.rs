use crate::domain::{
    Achievement, ActiveTimer, Category, ImportFormatError, PersistenceError, PhaseChange, Pomodoro,
    Priority, Task, TaskStore, UiMode, ValidationError,
};
use crate::notifications::NotificationSink;
use crate::persistence::{
    export_tasks, import_tasks, load_snapshot, save_snapshot, BlobStore, MemoryBlobStore, Settings,
    Snapshot,
};
use crate::report::metrics::{compute_metrics, earned_achievements, AchievementSet, Metrics, Trigger};
use chrono::NaiveDate;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Main application state.
///
/// Owns the task collection, the single task-timer slot, the Pomodoro and
/// the achievement set. Every command recomputes metrics and marks the state
/// dirty; the event loop saves it.
pub struct AppState {
    pub store: TaskStore,
    pub timer: ActiveTimer,
    pub pomodoro: Pomodoro,
    pub achievements: AchievementSet,
    pub metrics: Metrics,
    pub settings: Settings,
    pub needs_save: bool,

    notifier: Box<dyn NotificationSink>,
    storage: Box<dyn BlobStore>,
    /// Set when the durable storage couldn't be read and saves go to memory
    memory_only: bool,

    // Presentation state
    pub selected_index: usize,
    pub ui_mode: UiMode,
    pub input: String,
    pub status_message: Option<String>,
    pub show_archived: bool,
}

impl AppState {
    pub fn new(
        snapshot: Option<Snapshot>,
        settings: Settings,
        storage: Box<dyn BlobStore>,
        notifier: Box<dyn NotificationSink>,
    ) -> Self {
        let snapshot = snapshot.unwrap_or_default();
        let store = TaskStore::new(snapshot.tasks);
        let metrics = compute_metrics(store.tasks());
        if metrics.productivity_score != snapshot.productivity_score {
            debug!(
                stored = snapshot.productivity_score,
                computed = metrics.productivity_score,
                "stored productivity score out of date"
            );
        }

        Self {
            store,
            timer: ActiveTimer::Idle,
            pomodoro: Pomodoro::default(),
            achievements: AchievementSet::from_ids(&snapshot.achievements),
            metrics,
            settings,
            needs_save: false,
            notifier,
            storage,
            memory_only: false,
            selected_index: 0,
            ui_mode: UiMode::Normal,
            input: String::new(),
            status_message: None,
            show_archived: false,
        }
    }

    /// Build state from whatever the storage holds (empty when absent or malformed).
    /// When the storage can't be read the app keeps running in memory only, so
    /// an autosave never overwrites data it failed to load.
    pub fn load(storage: Box<dyn BlobStore>, settings: Settings, notifier: Box<dyn NotificationSink>) -> Self {
        match load_snapshot(storage.as_ref()) {
            Ok(snapshot) => {
                match &snapshot {
                    Some(s) => info!(tasks = s.tasks.len(), "loaded saved state"),
                    None => info!("no saved state, starting empty"),
                }
                Self::new(snapshot, settings, storage, notifier)
            }
            Err(e) => {
                warn!(error = %e, "storage unreadable, changes will not be saved");
                let mut app = Self::new(None, settings, Box::new(MemoryBlobStore::default()), notifier);
                app.memory_only = true;
                app.status_message = Some(format!("Storage unreadable, changes won't be saved: {}", e));
                app
            }
        }
    }

    /// Whether saves reach durable storage
    pub fn is_memory_only(&self) -> bool {
        self.memory_only
    }

    pub fn tasks(&self) -> &[Task] {
        self.store.tasks()
    }

    /// Task whose timer is running, if any
    pub fn active_task(&self) -> Option<&Task> {
        self.timer.task_id().and_then(|id| self.store.get(id))
    }

    // ---- Task commands ----

    pub fn add_task(&mut self, text: &str, category: Category) -> Result<Uuid, ValidationError> {
        let before = self.metrics.clone();
        let store_was_empty = self.store.is_empty();
        let id = self.store.add(text, category)?;
        info!(%id, category = category.name(), "task added");
        self.after_mutation(Some(Trigger::TaskAdded { store_was_empty }), before);
        Ok(id)
    }

    /// Flip completion; the task's timer stops either way
    pub fn toggle_complete(&mut self, id: Uuid) {
        let before = self.metrics.clone();
        if let Some(completed) = self.store.toggle_complete(id) {
            if self.timer.stop_if(id) {
                debug!(%id, "timer stopped by completion toggle");
            }
            info!(%id, completed, "completion toggled");
            self.after_mutation(Some(Trigger::CompletionChanged), before);
        }
    }

    pub fn delete_task(&mut self, id: Uuid) {
        let before = self.metrics.clone();
        if self.store.delete(id).is_some() {
            self.timer.stop_if(id);
            info!(%id, "task deleted");
            self.after_mutation(None, before);
        }
    }

    /// Soft delete. A running timer keeps running until stopped.
    pub fn archive_task(&mut self, id: Uuid) {
        let before = self.metrics.clone();
        if self.store.archive(id) {
            info!(%id, "task archived");
            self.after_mutation(None, before);
        }
    }

    pub fn unarchive_task(&mut self, id: Uuid) {
        let before = self.metrics.clone();
        if self.store.unarchive(id) {
            info!(%id, "task unarchived");
            self.after_mutation(Some(Trigger::CompletionChanged), before);
        }
    }

    pub fn toggle_star(&mut self, id: Uuid) {
        let before = self.metrics.clone();
        if self.store.toggle_star(id).is_some() {
            self.after_mutation(None, before);
        }
    }

    /// Zero tracked time and stop the timer if it belongs to this task
    pub fn reset_timer(&mut self, id: Uuid) {
        let before = self.metrics.clone();
        if self.store.reset_time(id) {
            self.timer.stop_if(id);
            self.after_mutation(None, before);
        }
    }

    pub fn edit_text(&mut self, id: Uuid, text: &str) -> Result<(), ValidationError> {
        let before = self.metrics.clone();
        self.store.edit_text(id, text)?;
        self.after_mutation(None, before);
        Ok(())
    }

    pub fn add_tag(&mut self, id: Uuid, tag: &str) -> Result<(), ValidationError> {
        let before = self.metrics.clone();
        self.store.add_tag(id, tag)?;
        self.after_mutation(None, before);
        Ok(())
    }

    pub fn remove_tag(&mut self, id: Uuid, tag: &str) {
        let before = self.metrics.clone();
        if self.store.remove_tag(id, tag) {
            self.after_mutation(None, before);
        }
    }

    pub fn add_subtask(&mut self, task_id: Uuid, text: &str) -> Result<(), ValidationError> {
        let before = self.metrics.clone();
        if self.store.add_subtask(task_id, text)?.is_some() {
            self.after_mutation(None, before);
        }
        Ok(())
    }

    pub fn toggle_subtask(&mut self, task_id: Uuid, subtask_id: Uuid) {
        let before = self.metrics.clone();
        if self.store.toggle_subtask(task_id, subtask_id).is_some() {
            self.after_mutation(None, before);
        }
    }

    pub fn delete_subtask(&mut self, task_id: Uuid, subtask_id: Uuid) {
        let before = self.metrics.clone();
        if self.store.delete_subtask(task_id, subtask_id) {
            self.after_mutation(None, before);
        }
    }

    pub fn set_priority(&mut self, id: Uuid, priority: Priority) {
        let before = self.metrics.clone();
        if self.store.set_priority(id, priority) {
            self.after_mutation(None, before);
        }
    }

    pub fn set_category(&mut self, id: Uuid, category: Category) {
        let before = self.metrics.clone();
        if self.store.set_category(id, category) {
            self.after_mutation(None, before);
        }
    }

    pub fn set_due_date(&mut self, id: Uuid, due_date: Option<NaiveDate>) {
        let before = self.metrics.clone();
        if self.store.set_due_date(id, due_date) {
            self.after_mutation(None, before);
        }
    }

    pub fn set_notes(&mut self, id: Uuid, notes: &str) {
        let before = self.metrics.clone();
        if self.store.set_notes(id, notes) {
            self.after_mutation(None, before);
        }
    }

    pub fn set_estimate(&mut self, id: Uuid, minutes: Option<u32>) {
        let before = self.metrics.clone();
        if self.store.set_estimate(id, minutes) {
            self.after_mutation(None, before);
        }
    }

    // ---- Timer commands ----

    /// Pause `id` if it is running, otherwise move the single timer slot to it.
    /// Unknown and completed tasks can't hold the slot.
    pub fn toggle_timer(&mut self, id: Uuid) {
        let Some(task) = self.store.get(id) else {
            return;
        };
        if task.completed && !self.timer.is_running(id) {
            return;
        }
        let previous = self.timer.task_id();
        self.timer.toggle(id);
        match self.timer.task_id() {
            Some(current) => info!(task = %current, previous = ?previous, "timer started"),
            None => info!(task = %id, "timer paused"),
        }
    }

    pub fn stop_timer(&mut self) {
        self.timer.stop();
    }

    pub fn start_pomodoro(&mut self) {
        self.pomodoro.start();
        info!("pomodoro started");
    }

    pub fn pause_pomodoro(&mut self) {
        self.pomodoro.pause();
    }

    pub fn resume_pomodoro(&mut self) {
        self.pomodoro.resume();
    }

    pub fn reset_pomodoro(&mut self) {
        self.pomodoro.reset();
    }

    /// One second of wall-clock time: advance the active task and the Pomodoro
    pub fn tick(&mut self) {
        if let Some(id) = self.timer.task_id() {
            if self.store.tick_task(id) {
                self.metrics = compute_metrics(self.store.tasks());
                self.needs_save = true;
            }
        }

        match self.pomodoro.tick() {
            Some(PhaseChange::WorkFinished) => {
                info!(sessions = self.pomodoro.completed_sessions, "work session finished");
                let metrics = self.metrics.clone();
                for achievement in earned_achievements(Trigger::WorkSessionFinished, &metrics, &metrics) {
                    self.unlock(achievement);
                }
                self.notify("Work session complete!", "Time for a 5-minute break.");
            }
            Some(PhaseChange::BreakFinished) => {
                info!("break finished");
                self.notify("Break over!", "Time to get back to work.");
            }
            None => {}
        }
    }

    // ---- Import / export / persistence ----

    pub fn export_json(&self) -> Result<String, PersistenceError> {
        export_tasks(self.store.tasks())
    }

    /// Replace every task with the parsed payload. On error nothing changes.
    pub fn import_json(&mut self, content: &str) -> Result<usize, ImportFormatError> {
        let tasks = import_tasks(content)?;
        let count = tasks.len();
        let before = self.metrics.clone();
        self.store.replace_all(tasks);

        let timer_still_valid = self
            .active_task()
            .is_some_and(|task| !task.completed);
        if !timer_still_valid {
            self.timer.stop();
        }
        self.selected_index = 0;

        info!(count, "tasks imported");
        self.after_mutation(Some(Trigger::CompletionChanged), before);
        Ok(count)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tasks: self.store.tasks().to_vec(),
            achievements: self.achievements.ids(),
            productivity_score: self.metrics.productivity_score,
        }
    }

    /// Best-effort save. A failure keeps the in-memory state and isn't retried
    /// until the next change.
    pub fn save(&mut self) -> Result<(), PersistenceError> {
        self.needs_save = false;
        save_snapshot(self.storage.as_ref(), &self.snapshot())
    }

    fn after_mutation(&mut self, trigger: Option<Trigger>, before: Metrics) {
        self.metrics = compute_metrics(self.store.tasks());
        if let Some(trigger) = trigger {
            let after = self.metrics.clone();
            for achievement in earned_achievements(trigger, &before, &after) {
                self.unlock(achievement);
            }
        }
        self.needs_save = true;
    }

    fn unlock(&mut self, achievement: Achievement) {
        if self.achievements.unlock(achievement) {
            info!(achievement = achievement.id(), "achievement unlocked");
            self.status_message = Some(format!("Achievement unlocked: {}", achievement.title()));
            self.notify("Achievement unlocked!", achievement.title());
            self.needs_save = true;
        }
    }

    fn notify(&self, title: &str, body: &str) {
        if self.settings.notifications_enabled {
            self.notifier.notify(title, body);
        }
    }

    // ---- Selection and input (TUI) ----

    /// Tasks shown in the list, in store order
    pub fn visible_tasks(&self) -> Vec<&Task> {
        if self.show_archived {
            self.store.tasks().iter().collect()
        } else {
            self.store.visible().collect()
        }
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.visible_tasks().get(self.selected_index).copied()
    }

    pub fn selected_task_id(&self) -> Option<Uuid> {
        self.selected_task().map(|t| t.id)
    }

    pub fn move_selection_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn move_selection_down(&mut self) {
        if self.selected_index + 1 < self.visible_tasks().len() {
            self.selected_index += 1;
        }
    }

    /// Keep the selection inside the list after it shrinks
    pub fn clamp_selection(&mut self) {
        let len = self.visible_tasks().len();
        if len == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= len {
            self.selected_index = len - 1;
        }
    }

    pub fn toggle_show_archived(&mut self) {
        self.show_archived = !self.show_archived;
        self.clamp_selection();
    }

    pub fn start_input(&mut self, mode: UiMode) {
        self.input.clear();
        if mode == UiMode::EditingText {
            if let Some(task) = self.selected_task() {
                self.input = task.text.clone();
            }
        }
        self.ui_mode = mode;
    }

    pub fn cancel_input(&mut self) {
        self.input.clear();
        self.ui_mode = UiMode::Normal;
    }

    /// Apply the input buffer according to the current mode. A rejected
    /// submission keeps the form open and shows the reason.
    pub fn submit_input(&mut self) {
        self.status_message = None;
        let input = self.input.clone();
        let selected = self.selected_task_id();
        let result = match (self.ui_mode, selected) {
            (UiMode::AddingTask, _) => {
                let category = self.settings.default_category;
                self.add_task(&input, category).map(|_| {
                    self.selected_index = self.visible_tasks().len().saturating_sub(1);
                })
            }
            (UiMode::AddingSubtask, Some(id)) => self.add_subtask(id, &input),
            (UiMode::EditingText, Some(id)) => self.edit_text(id, &input),
            (UiMode::AddingTag, Some(id)) => self.add_tag(id, &input),
            (UiMode::RemovingTag, Some(id)) => {
                self.remove_tag(id, &input);
                Ok(())
            }
            _ => Ok(()),
        };

        match result {
            Ok(()) => self.cancel_input(),
            Err(e) => {
                warn!(error = %e, "input rejected");
                self.status_message = Some(e.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PomodoroPhase, BREAK_SECS, WORK_SECS};
    use crate::notifications::testing::RecordingNotifier;
    use std::cell::RefCell;
    use std::rc::Rc;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn empty_app() -> AppState {
        AppState::new(
            None,
            Settings::default(),
            Box::new(MemoryBlobStore::default()),
            Box::new(RecordingNotifier::default()),
        )
    }

    fn app_with_notifier(settings: Settings) -> (AppState, RecordingNotifier) {
        let notifier = RecordingNotifier::default();
        let app = AppState::new(
            None,
            settings,
            Box::new(MemoryBlobStore::default()),
            Box::new(notifier.clone()),
        );
        (app, notifier)
    }

    fn two_tasks() -> (AppState, Uuid, Uuid) {
        let mut app = empty_app();
        let a = app.add_task("A", Category::Work).unwrap();
        let b = app.add_task("B", Category::Work).unwrap();
        (app, a, b)
    }

    #[test]
    fn test_add_first_task() {
        let mut app = empty_app();
        let id = app.add_task("Draft proposal", Category::Work).unwrap();

        assert_eq!(app.tasks().len(), 1);
        let task = app.store.get(id).unwrap();
        assert_eq!(task.category, Category::Work);
        assert!(!task.completed);
        assert_eq!(task.time_spent, 0);
        assert!(app.achievements.contains(Achievement::FirstTask));
        assert!(app.needs_save);
    }

    #[test]
    fn test_add_empty_task_is_rejected() {
        let mut app = empty_app();
        assert_eq!(app.add_task("", Category::Work), Err(ValidationError::EmptyTaskText));
        assert!(app.tasks().is_empty());
        assert_eq!(app.achievements.len(), 0);
        assert!(!app.needs_save);
    }

    #[test]
    fn test_first_task_not_awarded_to_non_empty_store() {
        let mut app = empty_app();
        let id = app.add_task("A", Category::Work).unwrap();
        app.delete_task(id);
        app.achievements = AchievementSet::default();

        app.add_task("B", Category::Work).unwrap();
        app.add_task("C", Category::Work).unwrap();
        // Store was empty again before "B"
        assert!(app.achievements.contains(Achievement::FirstTask));

        let mut app = empty_app();
        app.store = TaskStore::new(vec![Task::new("old".to_string(), Category::Work)]);
        app.add_task("new", Category::Work).unwrap();
        assert!(!app.achievements.contains(Achievement::FirstTask));
    }

    #[test]
    fn test_toggle_timer_switches_slot() {
        let (mut app, a, b) = two_tasks();
        app.toggle_timer(a);
        app.tick();
        app.tick();
        app.toggle_timer(b);
        assert_eq!(app.timer, ActiveTimer::Running(b));

        app.tick();
        assert_eq!(app.store.get(a).unwrap().time_spent, 2);
        assert_eq!(app.store.get(b).unwrap().time_spent, 1);
    }

    #[test]
    fn test_toggle_timer_twice_pauses() {
        let (mut app, a, _) = two_tasks();
        app.toggle_timer(a);
        app.toggle_timer(a);
        assert_eq!(app.timer, ActiveTimer::Idle);
        app.tick();
        assert_eq!(app.store.get(a).unwrap().time_spent, 0);
    }

    #[test]
    fn test_toggle_timer_ignores_unknown_and_completed() {
        let (mut app, a, _) = two_tasks();
        app.toggle_timer(Uuid::new_v4());
        assert_eq!(app.timer, ActiveTimer::Idle);

        app.toggle_complete(a);
        app.toggle_timer(a);
        assert_eq!(app.timer, ActiveTimer::Idle);
    }

    #[test]
    fn test_complete_clears_active_timer() {
        let (mut app, a, _) = two_tasks();
        app.toggle_timer(a);
        app.toggle_complete(a);
        assert_eq!(app.timer, ActiveTimer::Idle);
        assert!(app.achievements.contains(Achievement::TaskCompleted));
    }

    #[test]
    fn test_complete_other_task_keeps_timer() {
        let (mut app, a, b) = two_tasks();
        app.toggle_timer(a);
        app.toggle_complete(b);
        assert_eq!(app.timer, ActiveTimer::Running(a));
    }

    #[test]
    fn test_delete_clears_active_timer() {
        let (mut app, a, _) = two_tasks();
        app.toggle_timer(a);
        app.delete_task(a);
        assert_eq!(app.timer, ActiveTimer::Idle);
        assert_eq!(app.tasks().len(), 1);
    }

    #[test]
    fn test_archive_keeps_timer_running() {
        let (mut app, a, _) = two_tasks();
        app.toggle_timer(a);
        app.archive_task(a);
        app.tick();
        assert_eq!(app.timer, ActiveTimer::Running(a));
        assert_eq!(app.store.get(a).unwrap().time_spent, 1);
        assert_eq!(app.metrics.total_count, 1);
        assert_eq!(app.metrics.total_time_spent, 1);
    }

    #[test]
    fn test_reset_timer_is_idempotent() {
        let (mut app, a, _) = two_tasks();
        app.toggle_timer(a);
        app.tick();
        app.reset_timer(a);
        assert_eq!(app.store.get(a).unwrap().time_spent, 0);
        assert_eq!(app.timer, ActiveTimer::Idle);
        app.reset_timer(a);
        assert_eq!(app.store.get(a).unwrap().time_spent, 0);
    }

    #[test]
    fn test_duplicate_tag() {
        let (mut app, a, _) = two_tasks();
        app.add_tag(a, "urgent").unwrap();
        assert!(app.add_tag(a, "urgent").is_err());
        assert_eq!(app.store.get(a).unwrap().tags.len(), 1);
    }

    #[test]
    fn test_metrics_follow_mutations() {
        let (mut app, a, b) = two_tasks();
        app.toggle_complete(a);
        app.toggle_star(b);
        assert_eq!(app.metrics.completed_count, 1);
        assert_eq!(app.metrics.completion_pct, 50);
        // 50 * 0.5 + 0 + 25 * 0.5 = 37.5 -> 38
        assert_eq!(app.metrics.productivity_score, 38);

        app.archive_task(a);
        assert_eq!(app.metrics.completion_pct, 0);
        assert_eq!(app.metrics.total_count, 1);
    }

    #[test]
    fn test_productivity_expert_at_ten_completed() {
        let mut app = empty_app();
        let ids: Vec<Uuid> = (0..10)
            .map(|i| app.add_task(&format!("Task {}", i), Category::Work).unwrap())
            .collect();

        for id in &ids[..9] {
            app.toggle_complete(*id);
        }
        assert!(!app.achievements.contains(Achievement::ProductivityExpert));

        app.toggle_complete(ids[9]);
        assert!(app.achievements.contains(Achievement::ProductivityExpert));

        // Monotonic: un-completing keeps it
        app.toggle_complete(ids[9]);
        assert!(app.achievements.contains(Achievement::ProductivityExpert));
    }

    #[test]
    fn test_unarchiving_completed_task_unlocks_task_completed() {
        let mut app = empty_app();
        let id = app.add_task("A", Category::Work).unwrap();
        app.archive_task(id);
        app.toggle_complete(id);
        assert_eq!(app.metrics.completed_count, 0);
        assert!(!app.achievements.contains(Achievement::TaskCompleted));

        app.unarchive_task(id);
        assert_eq!(app.metrics.completed_count, 1);
        assert!(app.achievements.contains(Achievement::TaskCompleted));
    }

    #[test]
    fn test_pomodoro_round_trip() {
        let (mut app, notifier) = app_with_notifier(Settings::default());
        app.start_pomodoro();
        assert_eq!(app.pomodoro.remaining, WORK_SECS);

        for _ in 0..WORK_SECS {
            assert!(app.pomodoro.running);
            app.tick();
        }

        assert_eq!(app.pomodoro.phase, PomodoroPhase::Break);
        assert_eq!(app.pomodoro.remaining, BREAK_SECS);
        assert_eq!(app.pomodoro.completed_sessions, 1);
        assert!(app.achievements.contains(Achievement::PomodoroMaster));

        let sent = notifier.sent.borrow();
        assert!(sent.iter().any(|(title, _)| title == "Work session complete!"));
    }

    #[test]
    fn test_pomodoro_auto_continues_into_work() {
        let mut app = empty_app();
        app.start_pomodoro();
        for _ in 0..(WORK_SECS + BREAK_SECS) {
            app.tick();
        }
        assert_eq!(app.pomodoro.phase, PomodoroPhase::Work);
        assert_eq!(app.pomodoro.remaining, WORK_SECS);
        assert!(app.pomodoro.running);
    }

    #[test]
    fn test_notifications_respect_setting() {
        let settings = Settings {
            notifications_enabled: false,
            ..Settings::default()
        };
        let (mut app, notifier) = app_with_notifier(settings);
        app.start_pomodoro();
        app.pomodoro.remaining = 1;
        app.tick();

        assert_eq!(app.pomodoro.phase, PomodoroPhase::Break);
        assert!(notifier.sent.borrow().is_empty());
    }

    #[test]
    fn test_pomodoro_and_task_timer_share_tick() {
        let (mut app, a, _) = two_tasks();
        app.toggle_timer(a);
        app.start_pomodoro();
        for _ in 0..5 {
            app.tick();
        }
        assert_eq!(app.store.get(a).unwrap().time_spent, 5);
        assert_eq!(app.pomodoro.remaining, WORK_SECS - 5);
    }

    #[test]
    fn test_import_invalid_leaves_store_unchanged() {
        let (mut app, a, _) = two_tasks();
        app.toggle_timer(a);
        let before = app.tasks().to_vec();

        let result = app.import_json("{\"nope\": true}");
        assert!(matches!(result, Err(ImportFormatError::Malformed(_))));
        assert_eq!(app.tasks(), &before[..]);
        assert_eq!(app.timer, ActiveTimer::Running(a));
    }

    #[test]
    fn test_import_replaces_store() {
        let (mut source, a, _) = two_tasks();
        source.toggle_complete(a);
        let exported = source.export_json().unwrap();

        let mut app = empty_app();
        let c = app.add_task("C", Category::Work).unwrap();
        app.toggle_timer(c);

        assert_eq!(app.import_json(&exported).unwrap(), 2);
        assert_eq!(app.tasks(), source.tasks());
        // The running task is gone
        assert_eq!(app.timer, ActiveTimer::Idle);
        assert_eq!(app.metrics.completed_count, 1);
        assert!(app.achievements.contains(Achievement::TaskCompleted));
    }

    #[test]
    fn test_save_and_reload() {
        let (mut app, a, _) = two_tasks();
        app.toggle_complete(a);
        app.save().unwrap();
        assert!(!app.needs_save);

        let snapshot = load_snapshot(app.storage.as_ref()).unwrap().unwrap();
        assert_eq!(snapshot.tasks.len(), 2);
        assert_eq!(snapshot.productivity_score, app.metrics.productivity_score);

        let reloaded = AppState::new(
            Some(snapshot),
            Settings::default(),
            Box::new(MemoryBlobStore::default()),
            Box::new(RecordingNotifier::default()),
        );
        assert_eq!(reloaded.tasks(), app.tasks());
        assert_eq!(reloaded.achievements, app.achievements);
        assert_eq!(reloaded.timer, ActiveTimer::Idle);
        assert!(reloaded.pomodoro.is_idle());
    }

    /// Storage whose reads fail; records every key written to it
    #[derive(Default, Clone)]
    struct UnreadableStore {
        written: Rc<RefCell<Vec<String>>>,
    }

    impl BlobStore for UnreadableStore {
        fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
            Err(PersistenceError::Io {
                key: key.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            })
        }

        fn set(&self, key: &str, _value: &str) -> Result<(), PersistenceError> {
            self.written.borrow_mut().push(key.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_unreadable_storage_is_never_overwritten() {
        let storage = UnreadableStore::default();
        let mut app = AppState::load(
            Box::new(storage.clone()),
            Settings::default(),
            Box::new(RecordingNotifier::default()),
        );
        assert!(app.tasks().is_empty());
        assert!(app.status_message.is_some());
        assert!(app.is_memory_only());

        app.add_task("A", Category::Work).unwrap();
        app.save().unwrap();

        assert!(storage.written.borrow().is_empty());
        assert_eq!(app.tasks().len(), 1);
    }

    #[test]
    fn test_stale_stored_score_is_recomputed() {
        let mut task = Task::new("done".to_string(), Category::Work);
        task.completed = true;
        let app = AppState::new(
            Some(Snapshot {
                tasks: vec![task],
                achievements: vec![],
                productivity_score: 3,
            }),
            Settings::default(),
            Box::new(MemoryBlobStore::default()),
            Box::new(RecordingNotifier::default()),
        );
        assert_eq!(app.metrics.productivity_score, 50);
    }

    #[test]
    fn test_submit_empty_input_keeps_form_open() {
        let mut app = empty_app();
        app.start_input(UiMode::AddingTask);
        app.input = "   ".to_string();
        app.submit_input();

        assert_eq!(app.ui_mode, UiMode::AddingTask);
        assert_eq!(app.status_message.as_deref(), Some("Please enter a task"));
        assert!(app.tasks().is_empty());

        app.input = "Real task".to_string();
        app.submit_input();
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert_eq!(app.tasks().len(), 1);
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_selection_skips_archived() {
        let (mut app, a, b) = two_tasks();
        app.archive_task(a);
        app.clamp_selection();
        assert_eq!(app.selected_task_id(), Some(b));

        app.toggle_show_archived();
        assert_eq!(app.visible_tasks().len(), 2);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add,
        ToggleTimer(usize),
        ToggleComplete(usize),
        Delete(usize),
        Archive(usize),
        Reset(usize),
        Tick,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Add),
            (0usize..8).prop_map(Op::ToggleTimer),
            (0usize..8).prop_map(Op::ToggleComplete),
            (0usize..8).prop_map(Op::Delete),
            (0usize..8).prop_map(Op::Archive),
            (0usize..8).prop_map(Op::Reset),
            Just(Op::Tick),
        ]
    }

    proptest! {
        /// The timer slot is empty or names exactly one existing, open task
        #[test]
        fn prop_single_active_timer(ops in prop::collection::vec(op_strategy(), 1..60)) {
            let mut app = empty_app();
            let mut expected_total = 0usize;

            for op in ops {
                let ids: Vec<Uuid> = app.tasks().iter().map(|t| t.id).collect();
                let pick = |i: usize| ids.get(i % ids.len().max(1)).copied();
                match op {
                    Op::Add => {
                        app.add_task("task", Category::Work).unwrap();
                        expected_total += 1;
                    }
                    Op::ToggleTimer(i) => if let Some(id) = pick(i) { app.toggle_timer(id) },
                    Op::ToggleComplete(i) => if let Some(id) = pick(i) { app.toggle_complete(id) },
                    Op::Delete(i) => if let Some(id) = pick(i) {
                        if !app.store.get(id).map_or(true, |t| t.archived) {
                            expected_total -= 1;
                        }
                        app.delete_task(id);
                    },
                    Op::Archive(i) => if let Some(id) = pick(i) {
                        if !app.store.get(id).map_or(true, |t| t.archived) {
                            expected_total -= 1;
                        }
                        app.archive_task(id);
                    },
                    Op::Reset(i) => if let Some(id) = pick(i) { app.reset_timer(id) },
                    Op::Tick => app.tick(),
                }

                if let Some(id) = app.timer.task_id() {
                    let task = app.store.get(id);
                    prop_assert!(task.is_some());
                    prop_assert!(!task.map_or(true, |t| t.completed));
                }
                prop_assert_eq!(app.metrics.total_count, expected_total);
            }
        }

        /// N ticks on an unchanged open task add exactly N seconds
        #[test]
        fn prop_tick_monotonicity(n in 0u32..500) {
            let mut app = empty_app();
            let id = app.add_task("focus", Category::Work).unwrap();
            app.toggle_timer(id);
            for _ in 0..n {
                app.tick();
            }
            prop_assert_eq!(app.store.get(id).map(|t| t.time_spent), Some(u64::from(n)));
        }
    }
}
