use crate::app::AppState;
use crate::domain::{format_countdown, format_time, PomodoroPhase};
use crate::ui::styles::{border_style, break_gauge_style, gauge_style, running_style, title_style};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

/// Render the statistics pane: counts, time, completion gauge and score
pub fn render_stats_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(" Stats ", title_style()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let metrics = &app.metrics;
    let mut lines = vec![
        Line::raw(format!(
            "Active {}  ·  Completed {}  ·  Starred {}  ·  Archived {}",
            metrics.active_count, metrics.completed_count, metrics.starred_count, metrics.archived_count
        )),
        Line::raw(format!("Time tracked: {}", format_time(metrics.total_time_spent))),
        Line::raw(format!(
            "Productivity score: {}/100  ·  Achievements: {}/4",
            metrics.productivity_score,
            app.achievements.len()
        )),
    ];

    if !app.achievements.is_empty() {
        let titles: Vec<&str> = app.achievements.iter().map(|a| a.title()).collect();
        lines.push(Line::raw(format!("Unlocked: {}", titles.join(", "))));
    }

    if let Some(task) = app.active_task() {
        lines.push(Line::from(vec![
            Span::styled("Now tracking: ", running_style()),
            Span::raw(format!("{} ({})", task.text, task.elapsed_formatted())),
        ]));
    }

    f.render_widget(Paragraph::new(lines), chunks[0]);

    let gauge = Gauge::default()
        .gauge_style(gauge_style())
        .percent(u16::from(metrics.completion_pct.min(100)))
        .label(format!("{}% complete", metrics.completion_pct));
    f.render_widget(gauge, chunks[1]);
}

/// Render the Pomodoro pane
pub fn render_pomodoro_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let pomodoro = &app.pomodoro;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(" Pomodoro ", title_style()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let state = if pomodoro.running {
        "running"
    } else if pomodoro.is_idle() {
        "idle"
    } else {
        "paused"
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(format_countdown(pomodoro.remaining), title_style()),
            Span::raw(format!("  {} ({})", pomodoro.phase.name(), state)),
        ]),
        Line::raw(format!("Sessions completed: {}", pomodoro.completed_sessions)),
        Line::raw("s start · o pause/resume · R reset"),
    ];
    f.render_widget(Paragraph::new(lines), chunks[0]);

    let style = match pomodoro.phase {
        PomodoroPhase::Work => gauge_style(),
        PomodoroPhase::Break => break_gauge_style(),
    };
    let gauge = Gauge::default()
        .gauge_style(style)
        .ratio(pomodoro.progress().clamp(0.0, 1.0))
        .label("");
    f.render_widget(gauge, chunks[1]);
}
