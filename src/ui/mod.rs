pub mod input_bar;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod modal;
pub mod status_bar;
pub mod styles;

use crate::app::AppState;
use crate::domain::UiMode;
use crate::persistence::KeyValueStore;
use input_bar::render_input_bar;
use keybindings::render_keybindings;
use layout::create_layout;
use list_pane::render_list_pane;
use modal::render_confirm_modal;
use ratatui::Frame;
use status_bar::render_status_bar;

/// Main render function - draws the entire UI from scratch
pub fn render<S: KeyValueStore>(f: &mut Frame, app: &AppState<S>) {
    let size = f.size();
    let layout = create_layout(size);

    render_keybindings(f, app.ui_mode, app.focus, layout.keybindings_area);
    render_input_bar(f, app, layout.input_area);
    render_list_pane(f, app, layout.list_area);
    render_status_bar(f, app, layout.status_area);

    if app.ui_mode == UiMode::Confirming {
        render_confirm_modal(f, app, size);
    }
}
