use crate::app::{AppState, EditState};
use crate::domain::{checkbox_glyph, drag_handle, Focus, Placeholder, RowDescriptor};
use crate::persistence::KeyValueStore;
use crate::ui::styles::{
    border_style, completed_style, default_style, drop_target_style, dragging_style,
    editing_style, focused_border_style, handle_style, hint_style, meta_style, selected_style,
    title_style,
};
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Transient marker on a row during a reorder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowMarker {
    None,
    Dragging,
    DropTarget,
}

/// Render the task list pane, rebuilt in full from the current view
pub fn render_list_pane<S: KeyValueStore>(f: &mut Frame, app: &AppState<S>, area: Rect) {
    let title = format!(" Tasks · {} ", app.view.filter.label());
    let border = if app.focus == Focus::List {
        focused_border_style()
    } else {
        border_style()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(title, title_style()));

    if let Some(placeholder) = app.view.placeholder {
        let paragraph = Paragraph::new(placeholder_lines(placeholder, app.settings.use_emoji))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let list_focused = app.focus == Focus::List;
    let items: Vec<ListItem> = app
        .view
        .rows
        .iter()
        .map(|row| {
            let marker = row_marker(app, row);
            let edit = app.editing.as_ref().filter(|edit| edit.id == row.id);
            let selected = list_focused && row.visible_index == app.selected_index;
            let lines = create_row_lines(row, app.settings.use_emoji, edit, marker, selected);

            let style = match marker {
                RowMarker::DropTarget => drop_target_style(),
                RowMarker::Dragging => dragging_style(),
                RowMarker::None if selected && edit.is_none() => selected_style(),
                RowMarker::None => default_style(),
            };
            ListItem::new(lines).style(style)
        })
        .collect();

    let mut state = ListState::default();
    if !app.view.is_empty() {
        state.select(Some(app.selected_index));
    }

    let list = List::new(items).block(block);
    f.render_stateful_widget(list, area, &mut state);
}

fn row_marker<S: KeyValueStore>(app: &AppState<S>, row: &RowDescriptor) -> RowMarker {
    match &app.drag {
        Some(drag) if drag.target == Some(row.visible_index) && drag.id != row.id => {
            RowMarker::DropTarget
        }
        Some(drag) if drag.id == row.id => RowMarker::Dragging,
        _ => RowMarker::None,
    }
}

/// Message shown instead of rows
fn placeholder_lines(placeholder: Placeholder, use_emoji: bool) -> Vec<Line<'static>> {
    match placeholder {
        Placeholder::Empty => {
            let icon = if use_emoji { "📝" } else { "(empty)" };
            vec![
                Line::raw(""),
                Line::raw(icon),
                Line::raw("No tasks yet"),
                Line::styled("Press / to add your first task", hint_style()),
            ]
        }
        Placeholder::NoMatches => vec![
            Line::raw(""),
            Line::styled("No tasks match the current filter.", hint_style()),
        ],
    }
}

/// Create the two lines of a row
/// Line 1: ⠿ ⬜ Task text                    [e]dit [d]elete
/// Line 2:      2024-03-01 09:30
pub fn create_row_lines(
    row: &RowDescriptor,
    use_emoji: bool,
    edit: Option<&EditState>,
    marker: RowMarker,
    selected: bool,
) -> Vec<Line<'static>> {
    let mut spans = Vec::new();

    let handle = match marker {
        RowMarker::DropTarget => "▶",
        _ => drag_handle(use_emoji),
    };
    spans.push(Span::styled(format!("{} ", handle), handle_style()));
    spans.push(Span::raw(format!("{} ", checkbox_glyph(row.completed, use_emoji))));

    match edit {
        Some(edit) => {
            let (before, after) = split_at_char(&edit.buffer, edit.cursor);
            spans.push(Span::styled(before, editing_style()));
            spans.push(Span::styled("█".to_string(), editing_style()));
            spans.push(Span::styled(after, editing_style()));
            spans.push(Span::styled(
                "   Enter save · Esc cancel".to_string(),
                hint_style(),
            ));
        }
        None => {
            let text_style = if row.completed {
                completed_style()
            } else {
                Style::default()
            };
            spans.push(Span::styled(row.text.clone(), text_style));
            if selected {
                spans.push(Span::raw("   [e]dit [d]elete".to_string()));
            }
        }
    }

    let meta = Line::from(vec![
        Span::raw("    ".to_string()),
        Span::styled(row.created.clone(), meta_style()),
    ]);

    vec![Line::from(spans), meta]
}

fn split_at_char(s: &str, char_idx: usize) -> (String, String) {
    let byte_idx = s
        .char_indices()
        .nth(char_idx)
        .map(|(idx, _)| idx)
        .unwrap_or(s.len());
    (s[..byte_idx].to_string(), s[byte_idx..].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(text: &str, completed: bool) -> RowDescriptor {
        RowDescriptor {
            visible_index: 0,
            true_index: 0,
            id: "id-1".to_string(),
            text: text.to_string(),
            completed,
            created: "2024-03-01 09:30".to_string(),
        }
    }

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_create_row_lines() {
        let lines = create_row_lines(&row("Test task", false), false, None, RowMarker::None, false);
        assert_eq!(lines.len(), 2);
        assert_eq!(line_text(&lines[0]), ":: [ ] Test task");
        assert!(line_text(&lines[1]).contains("2024-03-01 09:30"));
    }

    #[test]
    fn test_completed_row_is_struck_through() {
        let lines = create_row_lines(&row("Done", true), false, None, RowMarker::None, false);
        let text_span = lines[0]
            .spans
            .iter()
            .find(|s| s.content == "Done")
            .unwrap();
        assert_eq!(text_span.style, completed_style());
        assert!(line_text(&lines[0]).contains("[x]"));
    }

    #[test]
    fn test_selected_row_shows_affordances() {
        let lines = create_row_lines(&row("Task", false), false, None, RowMarker::None, true);
        let text = line_text(&lines[0]);
        assert!(text.contains("[e]dit"));
        assert!(text.contains("[d]elete"));
    }

    #[test]
    fn test_editing_row_shows_buffer_with_cursor() {
        let edit = EditState {
            id: "id-1".to_string(),
            buffer: "Hello".to_string(),
            cursor: 2,
        };
        let lines = create_row_lines(&row("Old", false), false, Some(&edit), RowMarker::None, true);
        let text = line_text(&lines[0]);
        assert!(text.contains("He█llo"));
        assert!(!text.contains("Old"));
    }

    #[test]
    fn test_drop_target_marker() {
        let lines = create_row_lines(&row("T", false), false, None, RowMarker::DropTarget, false);
        assert!(line_text(&lines[0]).starts_with("▶"));
    }

    #[test]
    fn test_split_at_char() {
        assert_eq!(split_at_char("héllo", 2), ("hé".to_string(), "llo".to_string()));
        assert_eq!(split_at_char("ab", 9), ("ab".to_string(), String::new()));
    }
}
