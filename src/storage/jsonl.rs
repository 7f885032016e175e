//! JSONL file storage for the task forest
//!
//! The whole forest lives in one file (see [`codec`](super::codec) for the
//! line format). Every save rewrites the file through a temp file and an
//! atomic rename, under an exclusive lock.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;
use tracing::debug;

use super::codec;
use super::store::ForestStore;
use crate::domain::Forest;

/// Store for the task forest in JSONL format
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    /// Creates a new task store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the raw file content, or `None` if the file does not exist
    fn read_text(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let mut file = File::open(&self.path)
            .with_context(|| format!("Failed to open task store: {}", self.path.display()))?;

        // Acquire shared lock for reading
        file.lock_shared()
            .context("Failed to acquire read lock on task store")?;

        let mut text = String::new();
        file.read_to_string(&mut text)
            .with_context(|| format!("Failed to read task store: {}", self.path.display()))?;

        // Lock is released when file is dropped
        Ok(Some(text))
    }

    /// Writes the encoded forest (full rewrite)
    fn write_text(&self, text: &str) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }

        // Write to temp file first
        let temp_path = self.path.with_extension("jsonl.tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            // Acquire exclusive lock
            file.lock_exclusive()
                .context("Failed to acquire write lock on task store")?;

            let mut writer = BufWriter::new(&file);
            writer
                .write_all(text.as_bytes())
                .context("Failed to write tasks")?;
            writer.flush().context("Failed to flush task store")?;
        }

        // Atomic rename
        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }
}

impl ForestStore for TaskStore {
    fn save(&self, forest: &Forest) -> Result<()> {
        let text = codec::encode(forest).context("Failed to serialize tasks")?;
        self.write_text(&text)?;
        debug!(path = %self.path.display(), lines = text.lines().count(), "saved tasks");
        Ok(())
    }

    fn load(&self) -> Result<Option<Forest>> {
        let Some(text) = self.read_text()? else {
            return Ok(None);
        };

        let forest = codec::decode(&text)
            .with_context(|| format!("Failed to decode task store: {}", self.path.display()))?;
        debug!(path = %self.path.display(), tasks = forest.len(), "loaded tasks");
        Ok(Some(forest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::seed_forest;
    use chrono::Utc;
    use tempfile::TempDir;

    #[test]
    fn read_missing_store() {
        let dir = TempDir::new().unwrap();
        let store = TaskStore::new(dir.path().join("tasks.jsonl"));

        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn write_and_read_forest() {
        let dir = TempDir::new().unwrap();
        let store = TaskStore::new(dir.path().join("tasks.jsonl"));
        let forest = seed_forest(Utc::now()).unwrap();

        store.save(&forest).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.len(), forest.len());
        assert_eq!(loaded.root(), forest.root());
        assert_eq!(
            loaded.node(loaded.root()).unwrap().children(),
            forest.node(forest.root()).unwrap().children()
        );
    }

    #[test]
    fn save_overwrites_wholesale() {
        let dir = TempDir::new().unwrap();
        let store = TaskStore::new(dir.path().join("tasks.jsonl"));

        store.save(&seed_forest(Utc::now()).unwrap()).unwrap();
        store.save(&Forest::new("Fresh", Utc::now())).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.node(loaded.root()).unwrap().name(), "Fresh");
    }

    #[test]
    fn creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = TaskStore::new(dir.path().join("nested").join("dir").join("tasks.jsonl"));

        store.save(&Forest::new("Root", Utc::now())).unwrap();

        assert!(store.path().exists());
    }

    #[test]
    fn atomic_write() {
        let dir = TempDir::new().unwrap();
        let store = TaskStore::new(dir.path().join("tasks.jsonl"));

        store.save(&Forest::new("Root", Utc::now())).unwrap();

        // Temp file should not exist after write
        let temp_path = store.path().with_extension("jsonl.tmp");
        assert!(!temp_path.exists());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.jsonl");
        fs::write(&path, "this is not a task\n").unwrap();

        let store = TaskStore::new(&path);
        assert!(store.load().is_err());
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "a file, not a directory").unwrap();

        let store = TaskStore::new(blocker.join("tasks.jsonl"));
        assert!(store.save(&Forest::new("Root", Utc::now())).is_err());
    }
}
