use crate::domain::Task;
use crate::persistence::kv::{KeyValueStore, StorageError};
use tracing::{debug, info, warn};

/// Fixed key holding the serialized collection
pub const STORAGE_KEY: &str = "todos-v1";

/// Reads and writes the whole task collection under one storage key
#[derive(Debug)]
pub struct TaskRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> TaskRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Load the collection. Absent, unreadable or malformed data yields
    /// an empty collection; failures are logged, never returned.
    #[tracing::instrument(skip(self))]
    pub fn load(&self) -> Vec<Task> {
        let raw = match self.store.get(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = STORAGE_KEY, "no stored tasks, starting empty");
                return Vec::new();
            }
            Err(e) => {
                warn!(key = STORAGE_KEY, error = %e, "failed to read stored tasks, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Task>>(&raw) {
            Ok(tasks) => {
                info!(count = tasks.len(), "loaded tasks");
                tasks
            }
            Err(e) => {
                warn!(key = STORAGE_KEY, error = %e, "stored tasks are corrupt, starting empty");
                Vec::new()
            }
        }
    }

    /// Serialize the full collection and overwrite the stored value
    #[tracing::instrument(skip(self, tasks), fields(count = tasks.len()))]
    pub fn save(&mut self, tasks: &[Task]) -> Result<(), StorageError> {
        let json = serde_json::to_string(tasks)?;
        self.store.set(STORAGE_KEY, &json)
    }

    /// Remove the stored collection entirely
    #[tracing::instrument(skip(self))]
    pub fn clear_all(&mut self) -> Result<(), StorageError> {
        info!(key = STORAGE_KEY, "removing all stored tasks");
        self.store.remove(STORAGE_KEY)
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::kv::{FileStore, MemoryStore};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn sample_tasks() -> Vec<Task> {
        vec![
            Task {
                id: "lq2x9k3a1b2c".to_string(),
                text: "Buy milk".to_string(),
                completed: false,
                created_at: 1_700_000_000_000,
            },
            Task {
                id: "lq2x9k3d4e5f".to_string(),
                text: "Walk the dog".to_string(),
                completed: true,
                created_at: 1_700_000_100_000,
            },
        ]
    }

    #[test]
    fn test_load_missing_key() {
        let repo = TaskRepository::new(MemoryStore::new());
        assert!(repo.load().is_empty());
    }

    #[test]
    fn test_load_malformed_value() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, r#""just a string""#).unwrap();
        let repo = TaskRepository::new(store);
        assert!(repo.load().is_empty());

        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, "{not json").unwrap();
        let repo = TaskRepository::new(store);
        assert!(repo.load().is_empty());
    }

    #[test]
    fn test_load_shape_mismatch() {
        let mut store = MemoryStore::new();
        store
            .set(STORAGE_KEY, r#"[{"id":"a","text":"x","completed":"yes","createdAt":1}]"#)
            .unwrap();
        let repo = TaskRepository::new(store);
        assert!(repo.load().is_empty());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let mut repo = TaskRepository::new(MemoryStore::new());
        let tasks = sample_tasks();

        repo.save(&tasks).unwrap();
        assert_eq!(repo.load(), tasks);
    }

    #[test]
    fn test_save_overwrites_previous_value() {
        let mut repo = TaskRepository::new(MemoryStore::new());
        let mut tasks = sample_tasks();
        repo.save(&tasks).unwrap();

        tasks.remove(0);
        repo.save(&tasks).unwrap();
        assert_eq!(repo.load(), tasks);
    }

    #[test]
    fn test_loads_browser_written_layout() {
        let mut store = MemoryStore::new();
        store
            .set(
                STORAGE_KEY,
                r#"[{"id":"lq2x9k3abc12","text":"Call mom","completed":false,"createdAt":1700000000000}]"#,
            )
            .unwrap();
        let tasks = TaskRepository::new(store).load();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "lq2x9k3abc12");
        assert_eq!(tasks[0].created_at, 1_700_000_000_000);
    }

    #[test]
    fn test_clear_all() {
        let mut repo = TaskRepository::new(MemoryStore::new());
        repo.save(&sample_tasks()).unwrap();
        repo.clear_all().unwrap();

        assert_eq!(repo.store().get(STORAGE_KEY).unwrap(), None);
        assert!(repo.load().is_empty());
    }

    #[test]
    fn test_file_backed_round_trip() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("storage.json");

        let mut repo = TaskRepository::new(FileStore::new(&path));
        repo.save(&sample_tasks()).unwrap();

        let reopened = TaskRepository::new(FileStore::new(&path));
        assert_eq!(reopened.load(), sample_tasks());
    }

    #[test]
    fn test_corrupt_storage_file_loads_empty() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("storage.json");
        std::fs::write(&path, "garbage").unwrap();

        let repo = TaskRepository::new(FileStore::new(&path));
        assert!(repo.load().is_empty());
    }
}
