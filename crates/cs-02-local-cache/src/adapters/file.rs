//! # File Storage
//!
//! Durable storage as a single JSON object on disk. Every operation takes an
//! `fs2` advisory lock on the file, so separate processes sharing the same
//! data directory see consistent reads.

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use parking_lot::Mutex;
use tracing::debug;

use crate::domain::StorageError;
use crate::ports::KeyValueStorage;

type Document = BTreeMap<String, String>;

/// Key-value storage backed by one JSON file.
///
/// Offers no change notification; `watch()` returns `None`.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    // Serializes access from threads of this process; the flock covers
    // other processes.
    guard: Mutex<()>,
}

impl FileStorage {
    /// Default file name inside a data directory.
    pub const FILE_NAME: &'static str = "consent-storage.json";

    /// Open (or lazily create) the storage file at `path`.
    ///
    /// Parent directories are created if missing.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        debug!(path = %path.display(), "[cs-02] File storage opened");
        Ok(Self {
            path,
            guard: Mutex::new(()),
        })
    }

    /// Open `FILE_NAME` inside `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Result<Self, StorageError> {
        Self::open(data_dir.join(Self::FILE_NAME))
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open_file(&self) -> Result<File, StorageError> {
        Ok(OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?)
    }

    fn read_document(file: &mut File) -> Result<Document, StorageError> {
        let mut contents = String::new();
        file.seek(SeekFrom::Start(0))?;
        file.read_to_string(&mut contents)?;
        if contents.trim().is_empty() {
            return Ok(Document::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    fn write_document(file: &mut File, document: &Document) -> Result<(), StorageError> {
        let encoded = serde_json::to_vec_pretty(document)?;
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(&encoded)?;
        file.sync_all()?;
        Ok(())
    }

    /// Run `f` against the document under an exclusive lock, writing it back
    /// if `f` reports a change.
    fn modify<F>(&self, f: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut Document) -> bool,
    {
        let _guard = self.guard.lock();
        let mut file = self.open_file()?;
        FileExt::lock_exclusive(&file)?;

        let result = Self::read_document(&mut file).and_then(|mut document| {
            if f(&mut document) {
                Self::write_document(&mut file, &document)?;
            }
            Ok(())
        });

        FileExt::unlock(&file)?;
        result
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.guard.lock();
        let mut file = self.open_file()?;
        FileExt::lock_shared(&file)?;
        let result = Self::read_document(&mut file).map(|mut document| document.remove(key));
        FileExt::unlock(&file)?;
        result
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.modify(|document| {
            document.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.modify(|document| document.remove(key).is_some())
    }
}
