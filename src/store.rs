use crate::domain::{normalize_text, Filter, ListView, Task};
use crate::persistence::{KeyValueStore, StorageError, TaskRepository};
use tracing::{debug, info};

/// Owns the ordered task collection and the active filter.
///
/// Every mutating operation persists the whole collection before returning.
/// Lookups by id that miss are silent no-ops and report `false`. A failed
/// write leaves the in-memory change in place and returns the error.
#[derive(Debug)]
pub struct TaskStore<S: KeyValueStore> {
    tasks: Vec<Task>,
    filter: Filter,
    repo: TaskRepository<S>,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Load the collection from storage with the filter reset to `All`
    pub fn open(repo: TaskRepository<S>) -> Self {
        let tasks = repo.load();
        Self {
            tasks,
            filter: Filter::All,
            repo,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn has_completed(&self) -> bool {
        self.tasks.iter().any(|t| t.completed)
    }

    /// Project the collection through the active filter
    pub fn view(&self, timestamp_format: &str) -> ListView {
        ListView::build(&self.tasks, self.filter, timestamp_format)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        self.repo.save(&self.tasks)
    }

    /// Add a task at the front. Returns the new id, None for blank input.
    pub fn add(&mut self, text: &str) -> Result<Option<String>, StorageError> {
        let Some(task) = Task::new(text) else {
            debug!("ignoring blank task text");
            return Ok(None);
        };
        let id = task.id.clone();
        info!(id = %id, "adding task");
        self.tasks.insert(0, task);
        self.persist()?;
        Ok(Some(id))
    }

    /// Flip completion of the task with this id
    pub fn toggle(&mut self, id: &str) -> Result<bool, StorageError> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        task.completed = !task.completed;
        debug!(id = %id, completed = task.completed, "toggled task");
        self.persist()?;
        Ok(true)
    }

    /// Replace the text of a task; text that trims to empty deletes it
    pub fn edit_text(&mut self, id: &str, new_text: &str) -> Result<bool, StorageError> {
        let Some(idx) = self.position(id) else {
            return Ok(false);
        };
        match normalize_text(new_text) {
            Some(text) => {
                debug!(id = %id, "editing task text");
                self.tasks[idx].text = text;
            }
            None => {
                info!(id = %id, "edited to empty text, deleting task");
                self.tasks.remove(idx);
            }
        }
        self.persist()?;
        Ok(true)
    }

    pub fn delete(&mut self, id: &str) -> Result<bool, StorageError> {
        let Some(idx) = self.position(id) else {
            return Ok(false);
        };
        info!(id = %id, "deleting task");
        self.tasks.remove(idx);
        self.persist()?;
        Ok(true)
    }

    /// Drop every completed task, keeping the rest in order. Returns how many were removed.
    pub fn clear_completed(&mut self) -> Result<usize, StorageError> {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        let removed = before - self.tasks.len();
        if removed > 0 {
            info!(removed, "cleared completed tasks");
            self.persist()?;
        }
        Ok(removed)
    }

    /// Move the task at `from` to `to`, both positions in the full collection
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<bool, StorageError> {
        if from == to {
            return Ok(false);
        }
        if from >= self.tasks.len() || to >= self.tasks.len() {
            debug!(from, to, len = self.tasks.len(), "reorder out of range");
            return Ok(false);
        }
        let task = self.tasks.remove(from);
        self.tasks.insert(to, task);
        debug!(from, to, "reordered task");
        self.persist()?;
        Ok(true)
    }

    /// Change the active filter. Not persisted.
    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    /// Discard in-memory state and reload as if freshly started
    pub fn reload(&mut self) {
        self.tasks = self.repo.load();
        self.filter = Filter::All;
    }

    /// Remove the stored collection, then reload
    pub fn clear_all(&mut self) -> Result<(), StorageError> {
        let result = self.repo.clear_all();
        self.reload();
        result
    }
}
