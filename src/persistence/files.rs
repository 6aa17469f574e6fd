use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use super::settings::{save_settings, Settings};

/// Name of the data directory (local or under $HOME)
pub const DATA_DIR_NAME: &str = ".tasklist";

/// Resolve the data directory - explicit override first, then a local
/// .tasklist found walking up from the current directory, then ~/.tasklist
pub fn get_data_dir(override_dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        return Ok(dir.to_path_buf());
    }

    let current_dir = env::current_dir().context("Could not determine current directory")?;
    if let Some(local_dir) = find_local_dir(&current_dir) {
        return Ok(local_dir);
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(DATA_DIR_NAME))
}

/// Find local .tasklist directory by walking up the directory tree
fn find_local_dir(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir;

    loop {
        let candidate = current.join(DATA_DIR_NAME);
        if candidate.is_dir() {
            return Some(candidate);
        }

        current = current.parent()?;
    }
}

/// Ensure the data directory exists
pub fn ensure_data_dir(override_dir: Option<&Path>) -> Result<PathBuf> {
    let dir = get_data_dir(override_dir)?;
    if !dir.exists() {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    Ok(dir)
}

/// Initialize a data directory with default settings. Without an override
/// this is a local .tasklist in the current directory.
pub fn init_data_dir(override_dir: Option<&Path>) -> Result<PathBuf> {
    let data_dir = match override_dir {
        Some(dir) => dir.to_path_buf(),
        None => env::current_dir()
            .context("Could not determine current directory")?
            .join(DATA_DIR_NAME),
    };

    let settings_path = settings_file(&data_dir);
    if settings_path.exists() {
        anyhow::bail!("Data directory already initialized: {}", data_dir.display());
    }

    fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create directory: {}", data_dir.display()))?;
    save_settings(&settings_path, &Settings::default())?;

    Ok(data_dir)
}

/// Key-value storage file inside the data directory
pub fn storage_file(data_dir: &Path) -> PathBuf {
    data_dir.join("storage.json")
}

pub fn settings_file(data_dir: &Path) -> PathBuf {
    data_dir.join("settings.json")
}

pub fn log_file(data_dir: &Path) -> PathBuf {
    data_dir.join("tasklist.log")
}

/// Temp file in the target's directory, synced, then renamed over the target.
/// Callers map the io error into their own error type.
pub fn persist_atomically(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut temp_file = NamedTempFile::new_in(dir)?;
    temp_file.write_all(content)?;
    temp_file.as_file().sync_all()?;
    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Atomically write content to a file using temp file + rename
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let path = path.as_ref();
    persist_atomically(path, content.as_bytes())
        .with_context(|| format!("Failed to write file: {}", path.display()))
}
