pub mod enums;
pub mod task;
pub mod views;

pub use enums::{Filter, Focus, UiMode};
pub use task::{normalize_text, Task};
pub use views::{checkbox_glyph, drag_handle, items_left_label, ListView, Placeholder, RowDescriptor};
