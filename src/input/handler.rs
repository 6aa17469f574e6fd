use crate::app::AppState;
use crate::domain::{Filter, Focus, UiMode};
use crate::persistence::KeyValueStore;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Key that moves focus to the task input from anywhere in the list
pub const FOCUS_INPUT_KEY: char = '/';

/// Handle keyboard input events. Returns true when the app should quit.
pub fn handle_key<S: KeyValueStore>(app: &mut AppState<S>, key: KeyEvent) -> Result<bool> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }

    match app.ui_mode {
        UiMode::Confirming => handle_confirm_mode(app, key),
        UiMode::Editing => handle_editing_mode(app, key),
        UiMode::Reordering => handle_reorder_mode(app, key),
        UiMode::Normal => match app.focus {
            Focus::Input => handle_input_mode(app, key),
            Focus::List => handle_list_mode(app, key),
        },
    }
}

/// Handle keys while the task list has focus
fn handle_list_mode<S: KeyValueStore>(app: &mut AppState<S>, key: KeyEvent) -> Result<bool> {
    match key.code {
        // Global shortcut: the input does not have focus here, so take it
        KeyCode::Char(FOCUS_INPUT_KEY) | KeyCode::Tab => {
            app.focus_input();
            Ok(false)
        }

        // Navigation (with Shift modifier for reordering)
        KeyCode::Up | KeyCode::Char('k') => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.move_item_up()?;
            } else {
                app.move_selection_up();
            }
            Ok(false)
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.move_item_down()?;
            } else {
                app.move_selection_down();
            }
            Ok(false)
        }
        KeyCode::Char('K') => {
            app.move_item_up()?;
            Ok(false)
        }
        KeyCode::Char('J') => {
            app.move_item_down()?;
            Ok(false)
        }

        KeyCode::Char(' ') | KeyCode::Char('x') => {
            app.toggle_selected()?;
            Ok(false)
        }

        KeyCode::Char('e') | KeyCode::Enter => {
            app.begin_edit();
            Ok(false)
        }

        KeyCode::Char('d') | KeyCode::Delete => {
            app.request_delete_selected();
            Ok(false)
        }

        // Pick up the selected row
        KeyCode::Char('m') => {
            app.begin_reorder_selected();
            Ok(false)
        }

        // Filters
        KeyCode::Char('1') => {
            app.set_filter(Filter::All);
            Ok(false)
        }
        KeyCode::Char('2') => {
            app.set_filter(Filter::Active);
            Ok(false)
        }
        KeyCode::Char('3') => {
            app.set_filter(Filter::Completed);
            Ok(false)
        }
        KeyCode::Char('f') => {
            app.cycle_filter();
            Ok(false)
        }

        KeyCode::Char('C') => {
            app.request_clear_completed();
            Ok(false)
        }
        KeyCode::Char('D') => {
            app.request_delete_all();
            Ok(false)
        }

        KeyCode::Char('q') => Ok(true),

        _ => Ok(false),
    }
}

/// Handle keys while the task input has focus
fn handle_input_mode<S: KeyValueStore>(app: &mut AppState<S>, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => {
            app.submit_input()?;
            Ok(false)
        }
        KeyCode::Esc | KeyCode::Tab | KeyCode::Down => {
            app.focus_list();
            Ok(false)
        }
        KeyCode::Backspace => {
            app.input_backspace();
            Ok(false)
        }
        KeyCode::Char(c) => {
            app.input_add_char(c);
            Ok(false)
        }
        _ => Ok(false),
    }
}

/// Handle keys while a row is being edited inline
fn handle_editing_mode<S: KeyValueStore>(app: &mut AppState<S>, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => {
            app.commit_edit()?;
            Ok(false)
        }
        KeyCode::Esc => {
            app.cancel_edit();
            Ok(false)
        }

        // Leaving the row commits, like losing focus
        KeyCode::Tab | KeyCode::Char(FOCUS_INPUT_KEY) => {
            app.commit_edit()?;
            app.focus_input();
            Ok(false)
        }
        KeyCode::Up => {
            app.commit_edit()?;
            app.move_selection_up();
            Ok(false)
        }
        KeyCode::Down => {
            app.commit_edit()?;
            app.move_selection_down();
            Ok(false)
        }

        KeyCode::Left => {
            app.edit_cursor_left();
            Ok(false)
        }
        KeyCode::Right => {
            app.edit_cursor_right();
            Ok(false)
        }
        KeyCode::Home => {
            app.edit_cursor_home();
            Ok(false)
        }
        KeyCode::End => {
            app.edit_cursor_end();
            Ok(false)
        }
        KeyCode::Backspace => {
            app.edit_backspace();
            Ok(false)
        }
        KeyCode::Delete => {
            app.edit_delete();
            Ok(false)
        }
        KeyCode::Char(c) => {
            app.edit_add_char(c);
            Ok(false)
        }
        _ => Ok(false),
    }
}

/// Handle keys while a row is picked up
fn handle_reorder_mode<S: KeyValueStore>(app: &mut AppState<S>, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            app.move_selection_up();
            Ok(false)
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.move_selection_down();
            Ok(false)
        }
        KeyCode::Enter | KeyCode::Char('m') | KeyCode::Char(' ') => {
            app.drop_on_target()?;
            Ok(false)
        }
        KeyCode::Esc => {
            app.end_reorder();
            Ok(false)
        }
        // Drops nothing; the row stays where it was
        KeyCode::Tab | KeyCode::Char(FOCUS_INPUT_KEY) => {
            app.end_reorder();
            app.focus_input();
            Ok(false)
        }
        _ => Ok(false),
    }
}

/// Handle keys while a destructive action waits for confirmation
fn handle_confirm_mode<S: KeyValueStore>(app: &mut AppState<S>, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            app.confirm()?;
            Ok(false)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.decline();
            Ok(false)
        }
        _ => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, Settings, TaskRepository};
    use crate::store::TaskStore;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use pretty_assertions::assert_eq;

    fn create_test_app() -> AppState<MemoryStore> {
        let store = TaskStore::open(TaskRepository::new(MemoryStore::new()));
        AppState::new(store, Settings::default())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn type_text(app: &mut AppState<MemoryStore>, text: &str) {
        for c in text.chars() {
            handle_key(app, key(KeyCode::Char(c))).unwrap();
        }
    }

    fn add_via_keys(app: &mut AppState<MemoryStore>, text: &str) {
        handle_key(app, key(KeyCode::Char(FOCUS_INPUT_KEY))).unwrap();
        type_text(app, text);
        handle_key(app, key(KeyCode::Enter)).unwrap();
        handle_key(app, key(KeyCode::Esc)).unwrap();
    }

    fn texts(app: &AppState<MemoryStore>) -> Vec<String> {
        app.store.tasks().iter().map(|t| t.text.clone()).collect()
    }

    #[test]
    fn test_handle_quit() {
        let mut app = create_test_app();
        assert!(handle_key(&mut app, key(KeyCode::Char('q'))).unwrap());

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(handle_key(&mut app, ctrl_c).unwrap());
    }

    #[test]
    fn test_focus_shortcut() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('/'))).unwrap();
        assert_eq!(app.focus, Focus::Input);
        // The shortcut key itself is consumed
        assert!(app.input.is_empty());

        // Once focused, the same key is ordinary text
        handle_key(&mut app, key(KeyCode::Char('/'))).unwrap();
        assert_eq!(app.input, "/");
    }

    #[test]
    fn test_focus_shortcut_commits_inline_edit() {
        let mut app = create_test_app();
        add_via_keys(&mut app, "Draft");

        handle_key(&mut app, key(KeyCode::Char('e'))).unwrap();
        type_text(&mut app, " v2");
        handle_key(&mut app, key(KeyCode::Char(FOCUS_INPUT_KEY))).unwrap();

        assert_eq!(app.focus, Focus::Input);
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(app.editing.is_none());
        assert_eq!(texts(&app), vec!["Draft v2"]);
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_focus_shortcut_abandons_reorder() {
        let mut app = create_test_app();
        add_via_keys(&mut app, "A");
        add_via_keys(&mut app, "B");

        handle_key(&mut app, key(KeyCode::Char('m'))).unwrap();
        handle_key(&mut app, key(KeyCode::Down)).unwrap();
        handle_key(&mut app, key(KeyCode::Char(FOCUS_INPUT_KEY))).unwrap();

        assert_eq!(app.focus, Focus::Input);
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(app.drag.is_none());
        assert_eq!(texts(&app), vec!["B", "A"]);
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_typing_q_in_input_does_not_quit() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('/'))).unwrap();
        let should_quit = handle_key(&mut app, key(KeyCode::Char('q'))).unwrap();
        assert!(!should_quit);
        assert_eq!(app.input, "q");
    }

    #[test]
    fn test_handle_add_task() {
        let mut app = create_test_app();
        add_via_keys(&mut app, "Task1");
        add_via_keys(&mut app, "Task2");
        assert_eq!(texts(&app), vec!["Task2", "Task1"]);
        assert_eq!(app.focus, Focus::List);
    }

    #[test]
    fn test_handle_toggle_and_filter() {
        let mut app = create_test_app();
        add_via_keys(&mut app, "A");
        add_via_keys(&mut app, "B");

        handle_key(&mut app, key(KeyCode::Char(' '))).unwrap();
        assert!(app.store.tasks()[0].completed);

        handle_key(&mut app, key(KeyCode::Char('2'))).unwrap();
        assert_eq!(app.store.filter(), Filter::Active);
        assert_eq!(app.view.rows.len(), 1);
        assert_eq!(app.view.rows[0].text, "A");

        handle_key(&mut app, key(KeyCode::Char('f'))).unwrap();
        assert_eq!(app.store.filter(), Filter::Completed);
        handle_key(&mut app, key(KeyCode::Char('1'))).unwrap();
        assert_eq!(app.store.filter(), Filter::All);
    }

    #[test]
    fn test_handle_inline_edit() {
        let mut app = create_test_app();
        add_via_keys(&mut app, "Draft");

        handle_key(&mut app, key(KeyCode::Char('e'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::Editing);
        type_text(&mut app, " v2");
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(texts(&app), vec!["Draft v2"]);

        // Esc discards
        handle_key(&mut app, key(KeyCode::Char('e'))).unwrap();
        type_text(&mut app, "xyz");
        handle_key(&mut app, key(KeyCode::Esc)).unwrap();
        assert_eq!(texts(&app), vec!["Draft v2"]);
        assert_eq!(app.ui_mode, UiMode::Normal);
    }

    #[test]
    fn test_edit_commits_on_leaving_row() {
        let mut app = create_test_app();
        add_via_keys(&mut app, "A");
        add_via_keys(&mut app, "B");

        handle_key(&mut app, key(KeyCode::Char('e'))).unwrap();
        type_text(&mut app, "!");
        handle_key(&mut app, key(KeyCode::Down)).unwrap();
        assert_eq!(texts(&app), vec!["B!", "A"]);
        assert_eq!(app.selected_index, 1);
    }

    #[test]
    fn test_edit_to_empty_deletes() {
        let mut app = create_test_app();
        add_via_keys(&mut app, "Hi");
        handle_key(&mut app, key(KeyCode::Char('e'))).unwrap();
        handle_key(&mut app, key(KeyCode::Backspace)).unwrap();
        handle_key(&mut app, key(KeyCode::Backspace)).unwrap();
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        assert!(app.store.tasks().is_empty());
    }

    #[test]
    fn test_handle_delete_confirmation() {
        let mut app = create_test_app();
        add_via_keys(&mut app, "A");

        handle_key(&mut app, key(KeyCode::Char('d'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::Confirming);
        handle_key(&mut app, key(KeyCode::Char('n'))).unwrap();
        assert_eq!(texts(&app), vec!["A"]);

        handle_key(&mut app, key(KeyCode::Char('d'))).unwrap();
        handle_key(&mut app, key(KeyCode::Char('y'))).unwrap();
        assert!(app.store.tasks().is_empty());
    }

    #[test]
    fn test_handle_drag_reorder() {
        let mut app = create_test_app();
        add_via_keys(&mut app, "A");
        add_via_keys(&mut app, "B");
        add_via_keys(&mut app, "C");
        assert_eq!(app.selected_index, 0);

        handle_key(&mut app, key(KeyCode::Char('m'))).unwrap();
        handle_key(&mut app, key(KeyCode::Down)).unwrap();
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(texts(&app), vec!["B", "C", "A"]);
        assert_eq!(app.ui_mode, UiMode::Normal);

        // Aborted drag leaves order alone
        handle_key(&mut app, key(KeyCode::Char('m'))).unwrap();
        handle_key(&mut app, key(KeyCode::Down)).unwrap();
        handle_key(&mut app, key(KeyCode::Esc)).unwrap();
        assert_eq!(texts(&app), vec!["B", "C", "A"]);
        assert!(app.drag.is_none());
    }

    #[test]
    fn test_handle_shift_move() {
        let mut app = create_test_app();
        add_via_keys(&mut app, "A");
        add_via_keys(&mut app, "B");

        let shift_down = KeyEvent::new(KeyCode::Down, KeyModifiers::SHIFT);
        handle_key(&mut app, shift_down).unwrap();
        assert_eq!(texts(&app), vec!["A", "B"]);
        assert_eq!(app.selected_index, 1);
    }

    #[test]
    fn test_handle_delete_all() {
        let mut app = create_test_app();
        add_via_keys(&mut app, "A");
        add_via_keys(&mut app, "B");

        handle_key(&mut app, key(KeyCode::Char('D'))).unwrap();
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        assert!(app.store.tasks().is_empty());
    }
}
