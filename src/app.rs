use crate::domain::{Filter, Focus, ListView, UiMode};
use crate::persistence::{KeyValueStore, Settings};
use crate::store::TaskStore;
use anyhow::Result;
use tracing::debug;

/// Inline edit of a single row
#[derive(Debug, Clone)]
pub struct EditState {
    pub id: String,
    pub buffer: String,
    /// Cursor position in chars
    pub cursor: usize,
}

/// A row picked up for reordering
#[derive(Debug, Clone)]
pub struct DragState {
    pub id: String,
    /// Position of the dragged task in the full collection
    pub source: usize,
    /// Visible row currently marked as drop target
    pub target: Option<usize>,
}

/// Destructive action waiting for a yes/no answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    DeleteTask { id: String, text: String },
    ClearCompleted,
    DeleteAll,
}

impl Confirmation {
    pub fn prompt(&self) -> String {
        match self {
            Self::DeleteTask { text, .. } => format!("Delete this task?\n\n  \"{}\"", text),
            Self::ClearCompleted => String::from("Remove all completed tasks?"),
            Self::DeleteAll => String::from("Are you sure you want to delete ALL tasks?"),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::DeleteTask { .. } => " Delete Task ",
            Self::ClearCompleted => " Clear Completed ",
            Self::DeleteAll => " Delete Everything ",
        }
    }
}

/// Main application state: the store plus transient UI state.
///
/// All collection changes go through `store`; `view` is rebuilt from
/// scratch after every change.
pub struct AppState<S: KeyValueStore> {
    pub store: TaskStore<S>,
    pub settings: Settings,
    pub view: ListView,
    pub focus: Focus,
    pub ui_mode: UiMode,
    pub input: String,
    pub selected_index: usize,
    pub editing: Option<EditState>,
    pub drag: Option<DragState>,
    pub confirmation: Option<Confirmation>,
    /// Last error shown in the status bar
    pub status_message: Option<String>,
}

impl<S: KeyValueStore> AppState<S> {
    pub fn new(store: TaskStore<S>, settings: Settings) -> Self {
        let view = store.view(&settings.timestamp_format);
        Self {
            store,
            settings,
            view,
            focus: Focus::List,
            ui_mode: UiMode::Normal,
            input: String::new(),
            selected_index: 0,
            editing: None,
            drag: None,
            confirmation: None,
            status_message: None,
        }
    }

    /// Rebuild the visible list and keep the selection in range
    pub fn refresh(&mut self) {
        self.view = self.store.view(&self.settings.timestamp_format);
        if self.view.is_empty() {
            self.selected_index = 0;
        } else if self.selected_index >= self.view.len() {
            self.selected_index = self.view.len() - 1;
        }
    }

    fn select_id(&mut self, id: &str) {
        if let Some(idx) = self.view.visible_index_of(id) {
            self.selected_index = idx;
        }
    }

    fn selected_id(&self) -> Option<String> {
        self.view.rows.get(self.selected_index).map(|row| row.id.clone())
    }

    // ---- focus & task input ----

    /// Global shortcut target: move focus to the task input
    pub fn focus_input(&mut self) {
        self.focus = Focus::Input;
    }

    pub fn focus_list(&mut self) {
        self.focus = Focus::List;
    }

    pub fn input_add_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn input_backspace(&mut self) {
        self.input.pop();
    }

    /// Add the typed text as a new task, clear the field and keep focus on it
    pub fn submit_input(&mut self) -> Result<()> {
        let text = std::mem::take(&mut self.input);
        let result = self.store.add(&text);
        self.refresh();
        if let Ok(Some(id)) = &result {
            self.select_id(id);
        }
        self.focus = Focus::Input;
        result?;
        Ok(())
    }

    // ---- selection ----

    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
        self.track_drop_target();
    }

    pub fn move_selection_down(&mut self) {
        if self.selected_index + 1 < self.view.len() {
            self.selected_index += 1;
        }
        self.track_drop_target();
    }

    fn track_drop_target(&mut self) {
        if self.ui_mode == UiMode::Reordering {
            self.drag_over(self.selected_index);
        }
    }

    // ---- filters ----

    pub fn set_filter(&mut self, filter: Filter) {
        debug!(filter = filter.name(), "setting filter");
        self.store.set_filter(filter);
        self.refresh();
    }

    pub fn cycle_filter(&mut self) {
        self.set_filter(self.store.filter().next());
    }

    // ---- completion ----

    pub fn toggle_selected(&mut self) -> Result<()> {
        let Some(id) = self.selected_id() else {
            return Ok(());
        };
        let result = self.store.toggle(&id);
        self.refresh();
        result?;
        Ok(())
    }

    // ---- inline editing ----

    /// Replace the selected row's text with an edit buffer holding the current text
    pub fn begin_edit(&mut self) {
        let Some(row) = self.view.rows.get(self.selected_index) else {
            return;
        };
        let buffer = row.text.clone();
        self.editing = Some(EditState {
            id: row.id.clone(),
            cursor: buffer.chars().count(),
            buffer,
        });
        self.ui_mode = UiMode::Editing;
    }

    pub fn edit_add_char(&mut self, c: char) {
        if let Some(edit) = &mut self.editing {
            let byte_idx = char_to_byte(&edit.buffer, edit.cursor);
            edit.buffer.insert(byte_idx, c);
            edit.cursor += 1;
        }
    }

    pub fn edit_backspace(&mut self) {
        if let Some(edit) = &mut self.editing {
            if edit.cursor > 0 {
                let byte_idx = char_to_byte(&edit.buffer, edit.cursor - 1);
                edit.buffer.remove(byte_idx);
                edit.cursor -= 1;
            }
        }
    }

    pub fn edit_delete(&mut self) {
        if let Some(edit) = &mut self.editing {
            if edit.cursor < edit.buffer.chars().count() {
                let byte_idx = char_to_byte(&edit.buffer, edit.cursor);
                edit.buffer.remove(byte_idx);
            }
        }
    }

    pub fn edit_cursor_left(&mut self) {
        if let Some(edit) = &mut self.editing {
            edit.cursor = edit.cursor.saturating_sub(1);
        }
    }

    pub fn edit_cursor_right(&mut self) {
        if let Some(edit) = &mut self.editing {
            edit.cursor = (edit.cursor + 1).min(edit.buffer.chars().count());
        }
    }

    pub fn edit_cursor_home(&mut self) {
        if let Some(edit) = &mut self.editing {
            edit.cursor = 0;
        }
    }

    pub fn edit_cursor_end(&mut self) {
        if let Some(edit) = &mut self.editing {
            edit.cursor = edit.buffer.chars().count();
        }
    }

    /// Save the edit buffer; empty text deletes the task instead
    pub fn commit_edit(&mut self) -> Result<()> {
        self.ui_mode = UiMode::Normal;
        let Some(edit) = self.editing.take() else {
            return Ok(());
        };
        let result = if edit.buffer.trim().is_empty() {
            self.store.delete(&edit.id)
        } else {
            self.store.edit_text(&edit.id, &edit.buffer)
        };
        self.refresh();
        result?;
        Ok(())
    }

    /// Drop the edit buffer, leaving the task untouched
    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.ui_mode = UiMode::Normal;
        self.refresh();
    }

    // ---- reordering ----

    /// Pick up the task at this position in the full collection
    pub fn begin_reorder(&mut self, source: usize) {
        let Some(task) = self.store.tasks().get(source) else {
            return;
        };
        self.drag = Some(DragState {
            id: task.id.clone(),
            source,
            target: None,
        });
        self.ui_mode = UiMode::Reordering;
    }

    /// Pick up the selected row
    pub fn begin_reorder_selected(&mut self) {
        if let Some(source) = self.view.true_index(self.selected_index) {
            self.begin_reorder(source);
            self.drag_over(self.selected_index);
        }
    }

    /// Mark a visible row as the current drop target
    pub fn drag_over(&mut self, visible_index: usize) {
        if visible_index >= self.view.len() {
            return;
        }
        if let Some(drag) = &mut self.drag {
            drag.target = Some(visible_index);
        }
    }

    /// Drop the picked-up task at this position in the full collection
    pub fn complete_reorder(&mut self, target: usize) -> Result<()> {
        let picked = self.drag.as_ref().map(|drag| (drag.id.clone(), drag.source));
        let result = match picked {
            Some((id, source)) => {
                let result = self.store.reorder(source, target);
                self.refresh();
                self.select_id(&id);
                result
            }
            None => Ok(false),
        };
        self.end_reorder();
        result?;
        Ok(())
    }

    /// Drop onto the marked target row
    pub fn drop_on_target(&mut self) -> Result<()> {
        let target = self
            .drag
            .as_ref()
            .and_then(|drag| drag.target)
            .and_then(|visible| self.view.true_index(visible));
        match target {
            Some(target) => self.complete_reorder(target),
            None => {
                self.end_reorder();
                Ok(())
            }
        }
    }

    /// Clear all transient drag state, whether or not a drop happened
    pub fn end_reorder(&mut self) {
        self.drag = None;
        if self.ui_mode == UiMode::Reordering {
            self.ui_mode = UiMode::Normal;
        }
    }

    /// Move the selected row above its visible neighbour
    pub fn move_item_up(&mut self) -> Result<()> {
        if self.selected_index == 0 {
            return Ok(());
        }
        self.move_selected_to(self.selected_index - 1)
    }

    /// Move the selected row below its visible neighbour
    pub fn move_item_down(&mut self) -> Result<()> {
        self.move_selected_to(self.selected_index + 1)
    }

    fn move_selected_to(&mut self, visible_target: usize) -> Result<()> {
        let (Some(source), Some(target)) = (
            self.view.true_index(self.selected_index),
            self.view.true_index(visible_target),
        ) else {
            return Ok(());
        };
        self.begin_reorder(source);
        self.complete_reorder(target)
    }

    // ---- destructive actions ----

    pub fn request_delete_selected(&mut self) {
        if let Some(row) = self.view.rows.get(self.selected_index) {
            self.ask(Confirmation::DeleteTask {
                id: row.id.clone(),
                text: row.text.clone(),
            });
        }
    }

    /// Only asks when there is something to clear
    pub fn request_clear_completed(&mut self) {
        if self.store.has_completed() {
            self.ask(Confirmation::ClearCompleted);
        }
    }

    pub fn request_delete_all(&mut self) {
        self.ask(Confirmation::DeleteAll);
    }

    fn ask(&mut self, confirmation: Confirmation) {
        self.confirmation = Some(confirmation);
        self.ui_mode = UiMode::Confirming;
    }

    /// Run the pending destructive action
    pub fn confirm(&mut self) -> Result<()> {
        self.ui_mode = UiMode::Normal;
        let Some(confirmation) = self.confirmation.take() else {
            return Ok(());
        };
        match confirmation {
            Confirmation::DeleteTask { id, .. } => {
                let result = self.store.delete(&id);
                self.refresh();
                result?;
            }
            Confirmation::ClearCompleted => {
                let result = self.store.clear_completed();
                self.refresh();
                result?;
            }
            Confirmation::DeleteAll => {
                let result = self.store.clear_all();
                self.reset();
                result?;
            }
        }
        Ok(())
    }

    /// Leave state unchanged
    pub fn decline(&mut self) {
        self.confirmation = None;
        self.ui_mode = UiMode::Normal;
    }

    /// Discard transient UI state as if freshly started
    fn reset(&mut self) {
        self.focus = Focus::List;
        self.ui_mode = UiMode::Normal;
        self.input.clear();
        self.selected_index = 0;
        self.editing = None;
        self.drag = None;
        self.confirmation = None;
        self.status_message = None;
        self.refresh();
    }
}

/// Byte offset of the char at `char_idx` (or the end of the string)
fn char_to_byte(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(idx, _)| idx)
        .unwrap_or(s.len())
}
