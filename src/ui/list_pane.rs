use crate::app::AppState;
use crate::domain::Task;
use crate::ui::styles::{
    archived_style, border_style, default_style, done_style, priority_style, running_style,
    selected_style, star_style, tag_style, title_style,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Render the task list pane
pub fn render_list_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let running_id = app.timer.task_id();

    let items: Vec<ListItem> = app
        .visible_tasks()
        .into_iter()
        .enumerate()
        .map(|(idx, task)| {
            let running = running_id == Some(task.id);
            let line = create_task_line(task, running, app.settings.use_emoji);
            let style = if idx == app.selected_index {
                selected_style()
            } else if task.archived {
                archived_style()
            } else {
                default_style()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let title = format!(
        " Tasks ({} active, {} done){} ",
        app.metrics.active_count,
        app.metrics.completed_count,
        if app.show_archived { " + archived" } else { "" }
    );

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(Span::styled(title, title_style())),
    );

    f.render_widget(list, area);
}

/// Create a single line for a task
/// Format: [✓] ★ Write proposal  (high · work)  ⏱ 1:02:05 ▶ [docs] 1/3
fn create_task_line(task: &Task, running: bool, use_emoji: bool) -> Line<'static> {
    let mut spans = Vec::new();

    let checkbox = match (task.completed, use_emoji) {
        (true, true) => "[✓] ",
        (true, false) => "[x] ",
        (false, _) => "[ ] ",
    };
    spans.push(Span::raw(checkbox.to_string()));

    if task.starred {
        let star = if use_emoji { "★ " } else { "* " };
        spans.push(Span::styled(star.to_string(), star_style()));
    }

    if task.completed {
        spans.push(Span::styled(task.text.clone(), done_style()));
    } else {
        spans.push(Span::raw(task.text.clone()));
    }

    spans.push(Span::raw("  (".to_string()));
    spans.push(Span::styled(task.priority.name().to_string(), priority_style(task.priority)));
    spans.push(Span::raw(format!(" · {})  ", task.category.name())));

    let clock = if use_emoji { "⏱ " } else { "" };
    spans.push(Span::raw(format!("{}{}", clock, task.elapsed_formatted())));

    if running {
        let badge = if use_emoji { " ▶ RUNNING" } else { " (RUNNING)" };
        spans.push(Span::styled(badge.to_string(), running_style()));
    }

    for tag in &task.tags {
        spans.push(Span::raw(" ".to_string()));
        spans.push(Span::styled(format!("[{}]", tag), tag_style()));
    }

    let (done, total) = task.subtask_progress();
    if total > 0 {
        spans.push(Span::raw(format!(" {}/{}", done, total)));
    }

    Line::from(spans)
}
