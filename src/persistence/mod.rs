pub mod files;
pub mod kv;
pub mod repository;
pub mod settings;

pub use files::{atomic_write, ensure_data_dir, init_data_dir, log_file, settings_file, storage_file};
pub use kv::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use repository::{TaskRepository, STORAGE_KEY};
pub use settings::{load_settings_or_default, Settings};
