use crate::app::AppState;
use crate::ui::styles::{border_style, done_style, error_style, tag_style, title_style};
use chrono::Local;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render details for the selected task
pub fn render_details_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let mut lines = Vec::new();

    if let Some(task) = app.selected_task() {
        lines.push(Line::from(Span::styled(task.text.clone(), title_style())));
        lines.push(Line::raw(""));
        lines.push(Line::raw(format!("Created: {}", task.created_at.format("%Y-%m-%d %H:%M"))));

        if let Some(due) = task.due_date {
            let text = format!("Due: {}", due);
            if task.is_overdue(Local::now().date_naive()) {
                lines.push(Line::from(Span::styled(format!("{} (overdue)", text), error_style())));
            } else {
                lines.push(Line::raw(text));
            }
        }

        let estimate = match task.estimated_minutes {
            Some(minutes) => format!(" / est. {}m", minutes),
            None => String::new(),
        };
        let time_line = format!("Time: {}{}", task.elapsed_formatted(), estimate);
        if task.is_over_estimate() {
            lines.push(Line::from(Span::styled(time_line, error_style())));
        } else {
            lines.push(Line::raw(time_line));
        }

        if !task.tags.is_empty() {
            let mut spans = vec![Span::raw("Tags: ")];
            for tag in &task.tags {
                spans.push(Span::styled(format!("[{}] ", tag), tag_style()));
            }
            lines.push(Line::from(spans));
        }

        if !task.notes.is_empty() {
            lines.push(Line::raw(""));
            for note_line in task.notes.lines() {
                lines.push(Line::raw(note_line.to_string()));
            }
        }

        if !task.subtasks.is_empty() {
            lines.push(Line::raw(""));
            lines.push(Line::raw("Subtasks:"));
            for (idx, subtask) in task.subtasks.iter().enumerate() {
                let text = format!(
                    " {}. [{}] {}",
                    idx + 1,
                    if subtask.completed { "x" } else { " " },
                    subtask.text
                );
                if subtask.completed {
                    lines.push(Line::from(Span::styled(text, done_style())));
                } else {
                    lines.push(Line::raw(text));
                }
            }
        }
    } else {
        lines.push(Line::raw("No task selected. Press 'a' to add one."));
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title(Span::styled(" Details ", title_style())),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}
