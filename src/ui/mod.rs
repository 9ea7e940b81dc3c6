pub mod details_pane;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod stats_pane;
pub mod styles;

use crate::app::AppState;
use crate::domain::UiMode;
use details_pane::render_details_pane;
use input_form::render_input_form;
use keybindings::{render_keybindings, render_status_line};
use layout::create_layout;
use list_pane::render_list_pane;
use ratatui::Frame;
use stats_pane::{render_pomodoro_pane, render_stats_pane};

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();
    let layout = create_layout(size);

    render_keybindings(f, layout.keybindings_area);
    render_list_pane(f, app, layout.list_area);
    render_details_pane(f, app, layout.details_area);
    render_stats_pane(f, app, layout.stats_area);
    render_pomodoro_pane(f, app, layout.pomodoro_area);

    if app.ui_mode == UiMode::Normal {
        render_status_line(f, app.status_message.as_deref(), layout.status_area);
    } else {
        render_input_form(f, app, size);
    }
}
