use crate::app::AppState;
use crate::persistence::KeyValueStore;
use crate::ui::{
    layout::create_modal_area,
    styles::{modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the confirmation modal for a pending destructive action
pub fn render_confirm_modal<S: KeyValueStore>(f: &mut Frame, app: &AppState<S>, area: Rect) {
    if let Some(confirmation) = &app.confirmation {
        let modal_area = create_modal_area(area);

        // Clear the area behind the modal
        f.render_widget(Clear, modal_area);

        let mut lines = vec![Line::raw("")];
        for text in confirmation.prompt().lines() {
            lines.push(Line::raw(format!("  {}", text)));
        }
        lines.push(Line::raw(""));

        // Options
        lines.push(Line::from(vec![
            Span::styled("  [y]", modal_title_style()),
            Span::raw(" Yes  "),
            Span::styled("[n]", modal_title_style()),
            Span::raw(" No"),
        ]));

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(confirmation.title(), modal_title_style()))
                    .style(modal_bg_style()),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, modal_area);
    }
}
