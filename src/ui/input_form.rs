use crate::app::AppState;
use crate::domain::UiMode;
use crate::ui::{
    layout::create_modal_area,
    styles::{error_style, modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Title for the single-line prompt of each input mode
fn form_title(mode: UiMode) -> Option<&'static str> {
    match mode {
        UiMode::AddingTask => Some(" Add Task "),
        UiMode::AddingSubtask => Some(" Add Subtask "),
        UiMode::EditingText => Some(" Edit Task "),
        UiMode::AddingTag => Some(" Add Tag "),
        UiMode::RemovingTag => Some(" Remove Tag "),
        UiMode::Normal => None,
    }
}

/// Render the input prompt for the current mode
pub fn render_input_form(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(title) = form_title(app.ui_mode) else {
        return;
    };
    let modal_area = create_modal_area(area);

    // Clear the area behind the form
    f.render_widget(Clear, modal_area);

    let mut lines = vec![
        Line::raw(""),
        Line::from(vec![
            Span::raw("> "),
            Span::styled(app.input.clone(), modal_title_style()),
            Span::styled("█", modal_title_style()), // Cursor
        ]),
        Line::raw(""),
        Line::raw("Enter to submit  ·  Esc to cancel"),
    ];

    if let Some(message) = &app.status_message {
        lines.push(Line::from(Span::styled(message.clone(), error_style())));
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(title, modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}
