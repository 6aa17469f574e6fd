use crate::domain::{Focus, UiMode};
use crate::ui::styles::hint_style;
use ratatui::{layout::Rect, text::Line, widgets::Paragraph, Frame};

/// Hints for the current mode
pub fn hints(ui_mode: UiMode, focus: Focus) -> &'static str {
    match (ui_mode, focus) {
        (UiMode::Confirming, _) => " y confirm   n cancel",
        (UiMode::Editing, _) => " Enter save   Esc cancel   ←/→ move cursor   ↑/↓ save and move",
        (UiMode::Reordering, _) => " ↑/↓ choose position   Enter drop   Esc cancel",
        (UiMode::Normal, Focus::Input) => " Enter add task   Esc/Tab back to list",
        (UiMode::Normal, Focus::List) => {
            " / new task   ↑/↓ select   space toggle   e edit   d delete   m move   Shift+↑/↓ reorder   1/2/3 filter   C clear done   D delete all   q quit"
        }
    }
}

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, ui_mode: UiMode, focus: Focus, area: Rect) {
    let paragraph = Paragraph::new(Line::raw(hints(ui_mode, focus))).style(hint_style());
    f.render_widget(paragraph, area);
}
