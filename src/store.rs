//! Durable storage for named text blobs.
//!
//! One file per key under the store root (the user data dir in
//! production, a temp dir in tests). The notes tool is the only
//! consumer today; it reads its blob at session open and overwrites it
//! wholesale at close.

use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Key for the sticky-notes blob.
pub const NOTES_KEY: &str = "sticky_notes";

pub struct PersistenceStore {
    root: PathBuf,
}

impl PersistenceStore {
    /// Store rooted at the user data directory.
    pub fn open() -> Result<Self> {
        let root = dirs::data_dir()
            .context("Could not find data directory")?
            .join("utilitui");
        Ok(Self { root })
    }

    /// Store rooted at an arbitrary directory (for testing).
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Read the blob for `key`. A missing file is empty initial
    /// content, not an error.
    pub fn load(&self, key: &str) -> Result<String> {
        let path = self.blob_path(key);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(err) => {
                Err(err).with_context(|| format!("Failed to read blob: {}", path.display()))
            }
        }
    }

    /// Overwrite the blob for `key` wholesale.
    pub fn save(&self, key: &str, text: &str) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create data directory: {}", self.root.display()))?;

        let path = self.blob_path(key);
        fs::write(&path, text)
            .with_context(|| format!("Failed to write blob: {}", path.display()))?;

        Ok(())
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.txt"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = PersistenceStore::at(dir.path());

        store.save(NOTES_KEY, "buy oat milk\n").unwrap();
        assert_eq!(store.load(NOTES_KEY).unwrap(), "buy oat milk\n");
    }

    #[test]
    fn empty_string_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = PersistenceStore::at(dir.path());

        store.save(NOTES_KEY, "").unwrap();
        assert_eq!(store.load(NOTES_KEY).unwrap(), "");
    }

    #[test]
    fn missing_blob_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = PersistenceStore::at(dir.path());

        assert_eq!(store.load("never_written").unwrap(), "");
    }

    #[test]
    fn save_overwrites_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = PersistenceStore::at(dir.path());

        store.save(NOTES_KEY, "old").unwrap();
        store.save(NOTES_KEY, "new").unwrap();
        assert_eq!(store.load(NOTES_KEY).unwrap(), "new");
    }
}
