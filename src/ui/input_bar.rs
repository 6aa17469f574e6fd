use crate::app::AppState;
use crate::domain::Focus;
use crate::input::handler::FOCUS_INPUT_KEY;
use crate::persistence::KeyValueStore;
use crate::ui::styles::{border_style, editing_style, focused_border_style, hint_style, title_style};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the "new task" input field
pub fn render_input_bar<S: KeyValueStore>(f: &mut Frame, app: &AppState<S>, area: Rect) {
    let focused = app.focus == Focus::Input;

    let line = if focused {
        Line::from(vec![
            Span::raw("> "),
            Span::styled(app.input.as_str(), editing_style()),
            Span::styled("█", editing_style()), // Cursor
        ])
    } else if app.input.is_empty() {
        Line::from(vec![
            Span::raw("> "),
            Span::styled(
                format!("What needs to be done? (press {} to type)", FOCUS_INPUT_KEY),
                hint_style(),
            ),
        ])
    } else {
        Line::from(vec![Span::raw("> "), Span::raw(app.input.as_str())])
    };

    let border = if focused {
        focused_border_style()
    } else {
        border_style()
    };

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(Span::styled(" New Task ", title_style())),
    );

    f.render_widget(paragraph, area);
}
