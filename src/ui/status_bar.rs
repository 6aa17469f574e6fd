use crate::app::AppState;
use crate::domain::{items_left_label, Filter};
use crate::persistence::KeyValueStore;
use crate::ui::styles::{active_tab_style, error_style, hint_style};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Render the bottom bar: items left, filter tabs, clear hint, last error
pub fn render_status_bar<S: KeyValueStore>(f: &mut Frame, app: &AppState<S>, area: Rect) {
    let line = status_line(
        app.view.items_left,
        app.view.filter,
        app.store.has_completed(),
        app.status_message.as_deref(),
    );
    f.render_widget(Paragraph::new(line), area);
}

fn status_line(
    items_left: usize,
    active: Filter,
    has_completed: bool,
    message: Option<&str>,
) -> Line<'static> {
    let mut spans = vec![Span::raw(format!(" {}   ", items_left_label(items_left)))];

    for filter in Filter::all() {
        let label = format!(" {} {} ", filter.position() + 1, filter.label());
        if *filter == active {
            spans.push(Span::styled(label, active_tab_style()));
        } else {
            spans.push(Span::raw(label));
        }
    }

    if has_completed {
        spans.push(Span::styled("   C clear completed".to_string(), hint_style()));
    }

    if let Some(message) = message {
        spans.push(Span::styled(format!("   {}", message), error_style()));
    }

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_status_line_counts_and_tabs() {
        let line = status_line(2, Filter::Active, false, None);
        let text = line_text(&line);
        assert!(text.contains("2 items left"));
        assert!(text.contains("1 All"));
        assert!(text.contains("3 Completed"));
        assert!(!text.contains("clear completed"));

        let active = line.spans.iter().find(|s| s.content.contains("Active")).unwrap();
        assert_eq!(active.style, active_tab_style());
    }

    #[test]
    fn test_status_line_clear_hint_and_message() {
        let line = status_line(0, Filter::All, true, Some("Failed to save"));
        let text = line_text(&line);
        assert!(text.contains("clear completed"));
        assert!(text.contains("Failed to save"));
    }
}
