use crate::app::AppState;
use crate::domain::UiMode;
use anyhow::Result;
use chrono::{Duration, Local};
use crossterm::event::{KeyCode, KeyEvent};
use std::env;
use std::fs;
use std::process::Command;
use tempfile::NamedTempFile;

/// Minutes added or removed per estimate key press
const ESTIMATE_STEP: u32 = 5;

/// Handle keyboard input events. Returns true when the app should quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::AddingTask
        | UiMode::AddingSubtask
        | UiMode::EditingText
        | UiMode::AddingTag
        | UiMode::RemovingTag => handle_input_mode(app, key),
    }
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    app.status_message = None;

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Ok(true),

        // Navigation
        KeyCode::Up => app.move_selection_up(),
        KeyCode::Down => app.move_selection_down(),

        // Forms
        KeyCode::Char('a') => app.start_input(UiMode::AddingTask),
        KeyCode::Char('A') if app.selected_task().is_some() => app.start_input(UiMode::AddingSubtask),
        KeyCode::Char('e') if app.selected_task().is_some() => app.start_input(UiMode::EditingText),
        KeyCode::Char('t') if app.selected_task().is_some() => app.start_input(UiMode::AddingTag),
        KeyCode::Char('T') if app.selected_task().is_some() => app.start_input(UiMode::RemovingTag),

        // Pomodoro
        KeyCode::Char('s') => app.start_pomodoro(),
        KeyCode::Char('o') => {
            if app.pomodoro.running {
                app.pause_pomodoro();
            } else {
                app.resume_pomodoro();
            }
        }
        KeyCode::Char('R') => app.reset_pomodoro(),

        KeyCode::Char('v') => app.toggle_show_archived(),

        _ => handle_task_key(app, key)?,
    }

    Ok(false)
}

/// Keys acting on the selected task
fn handle_task_key(app: &mut AppState, key: KeyEvent) -> Result<()> {
    let Some(id) = app.selected_task_id() else {
        return Ok(());
    };

    match key.code {
        KeyCode::Enter => app.toggle_timer(id),
        KeyCode::Char(' ') => app.toggle_complete(id),
        KeyCode::Char('0') => app.reset_timer(id),
        KeyCode::Char('*') => app.toggle_star(id),
        KeyCode::Char('d') | KeyCode::Delete => {
            app.delete_task(id);
            app.clamp_selection();
        }
        KeyCode::Char('x') => {
            let archived = app.selected_task().map(|t| t.archived).unwrap_or(false);
            if archived {
                app.unarchive_task(id);
            } else {
                app.archive_task(id);
            }
            app.clamp_selection();
        }
        KeyCode::Char('p') => {
            if let Some(next) = app.selected_task().map(|t| t.priority.next()) {
                app.set_priority(id, next);
            }
        }
        KeyCode::Char('k') => {
            if let Some(next) = app.selected_task().map(|t| t.category.next()) {
                app.set_category(id, next);
            }
        }

        // Estimate
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let current = app.selected_task().and_then(|t| t.estimated_minutes).unwrap_or(0);
            app.set_estimate(id, Some(current + ESTIMATE_STEP));
        }
        KeyCode::Char('-') | KeyCode::Char('_') => {
            let current = app.selected_task().and_then(|t| t.estimated_minutes).unwrap_or(0);
            let next = current.checked_sub(ESTIMATE_STEP).filter(|m| *m > 0);
            app.set_estimate(id, next);
        }

        // Due date: ] later, [ earlier, Backspace clears
        KeyCode::Char(']') | KeyCode::Char('[') => {
            let today = Local::now().date_naive();
            let step = if key.code == KeyCode::Char(']') { 1 } else { -1 };
            let due = match app.selected_task().and_then(|t| t.due_date) {
                Some(date) => date + Duration::days(step),
                None => today,
            };
            app.set_due_date(id, Some(due));
        }
        KeyCode::Backspace => app.set_due_date(id, None),

        // Subtasks: 1-9 toggle, C removes the completed ones
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            let subtask_id = app
                .selected_task()
                .and_then(|t| t.subtasks.get(index))
                .map(|s| s.id);
            if let Some(subtask_id) = subtask_id {
                app.toggle_subtask(id, subtask_id);
            }
        }
        KeyCode::Char('C') => {
            let done: Vec<_> = app
                .selected_task()
                .map(|t| t.subtasks.iter().filter(|s| s.completed).map(|s| s.id).collect())
                .unwrap_or_default();
            for subtask_id in done {
                app.delete_subtask(id, subtask_id);
            }
        }

        KeyCode::Char('n') => edit_notes_external(app)?,

        _ => {}
    }

    Ok(())
}

/// Handle keys while a single-line prompt is open
fn handle_input_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.submit_input(),
        KeyCode::Esc => {
            app.status_message = None;
            app.cancel_input();
        }
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Char(c) => app.input.push(c),
        _ => {}
    }
    Ok(false)
}

/// Edit notes of the selected task in $EDITOR
fn edit_notes_external(app: &mut AppState) -> Result<()> {
    let Some(task) = app.selected_task() else {
        return Ok(());
    };
    let id = task.id;

    let editor = env::var("EDITOR").unwrap_or_else(|_| {
        if cfg!(windows) {
            "notepad".to_string()
        } else {
            "vi".to_string()
        }
    });

    let mut temp_file = NamedTempFile::new()?;
    std::io::Write::write_all(&mut temp_file, task.notes.as_bytes())?;
    let temp_path = temp_file.into_temp_path();

    // The caller leaves raw mode before this and restores it after
    let status = Command::new(&editor).arg(&temp_path).status()?;

    if status.success() {
        let notes = fs::read_to_string(&temp_path)?;
        app.set_notes(id, notes.trim_end());
    }

    Ok(())
}
