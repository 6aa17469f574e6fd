use super::enums::Filter;
use super::task::Task;

/// One visible row of the task list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDescriptor {
    /// Position in the filtered (displayed) list
    pub visible_index: usize,
    /// Position in the full collection
    pub true_index: usize,
    pub id: String,
    pub text: String,
    pub completed: bool,
    /// Creation time, already formatted for display
    pub created: String,
}

/// What to show in place of rows when nothing is listed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// The collection itself is empty
    Empty,
    /// Tasks exist but none pass the active filter
    NoMatches,
}

/// Full projection of the collection for one render pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    pub rows: Vec<RowDescriptor>,
    /// Incomplete tasks over the unfiltered collection
    pub items_left: usize,
    pub placeholder: Option<Placeholder>,
    pub filter: Filter,
}

impl ListView {
    /// Rebuild the view from scratch for the given collection and filter
    pub fn build(tasks: &[Task], filter: Filter, timestamp_format: &str) -> Self {
        let rows: Vec<RowDescriptor> = filter_tasks(tasks, filter)
            .into_iter()
            .enumerate()
            .map(|(visible_index, true_index)| {
                let task = &tasks[true_index];
                RowDescriptor {
                    visible_index,
                    true_index,
                    id: task.id.clone(),
                    text: task.text.clone(),
                    completed: task.completed,
                    created: task.created_at_formatted(timestamp_format),
                }
            })
            .collect();

        let placeholder = if tasks.is_empty() {
            Some(Placeholder::Empty)
        } else if rows.is_empty() {
            Some(Placeholder::NoMatches)
        } else {
            None
        };

        Self {
            rows,
            items_left: incomplete_count(tasks),
            placeholder,
            filter,
        }
    }

    /// Map a visible row back to its position in the full collection
    pub fn true_index(&self, visible_index: usize) -> Option<usize> {
        self.rows.get(visible_index).map(|row| row.true_index)
    }

    /// Find the visible row holding the task with this id
    pub fn visible_index_of(&self, id: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.id == id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// True indices of the tasks passing the filter, in collection order
pub fn filter_tasks(tasks: &[Task], filter: Filter) -> Vec<usize> {
    tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| filter.matches(task))
        .map(|(idx, _)| idx)
        .collect()
}

/// Count tasks not yet completed
pub fn incomplete_count(tasks: &[Task]) -> usize {
    tasks.iter().filter(|task| !task.completed).count()
}

/// "1 item left" / "3 items left"
pub fn items_left_label(count: usize) -> String {
    if count == 1 {
        String::from("1 item left")
    } else {
        format!("{} items left", count)
    }
}

/// Checkbox glyph reflecting completion
pub fn checkbox_glyph(completed: bool, use_emoji: bool) -> &'static str {
    match (completed, use_emoji) {
        (true, true) => "✅",
        (false, true) => "⬜",
        (true, false) => "[x]",
        (false, false) => "[ ]",
    }
}

/// Drag handle shown at the start of each row
pub fn drag_handle(use_emoji: bool) -> &'static str {
    if use_emoji {
        "⠿"
    } else {
        "::"
    }
}
