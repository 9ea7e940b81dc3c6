use crate::ui::styles::hint_style;
use ratatui::{layout::Rect, text::{Line, Span}, widgets::Paragraph, Frame};

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, area: Rect) {
    let hints = Line::from(vec![
        Span::raw(" ↑/↓ select  "),
        Span::raw("a add  "),
        Span::raw("Space done  "),
        Span::raw("Enter timer  "),
        Span::raw("0 reset  "),
        Span::raw("e edit  "),
        Span::raw("n notes  "),
        Span::raw("* star  "),
        Span::raw("p priority  "),
        Span::raw("k category  "),
        Span::raw("t/T tag  "),
        Span::raw("A/1-9/C subtasks  "),
        Span::raw("+/- estimate  "),
        Span::raw("[/] due  "),
        Span::raw("x archive  "),
        Span::raw("d delete  "),
        Span::raw("v archived  "),
        Span::raw("q quit"),
    ]);

    let paragraph = Paragraph::new(hints).style(hint_style());
    f.render_widget(paragraph, area);
}

/// Render the status line (last message, e.g. a rejected input or an unlock)
pub fn render_status_line(f: &mut Frame, message: Option<&str>, area: Rect) {
    let paragraph = Paragraph::new(Line::raw(message.unwrap_or("").to_string())).style(hint_style());
    f.render_widget(paragraph, area);
}
