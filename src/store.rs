use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::StoreError;

/// One saved maze, in the shape of the settings file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeRecord {
    #[serde(rename = "Name")]
    pub name: String,
    /// Milliseconds.
    #[serde(rename = "FastestTime", default)]
    pub fastest_time: Option<u64>,
    #[serde(rename = "Layout")]
    pub layout: String,
}

impl MazeRecord {
    pub fn new(name: impl Into<String>, layout: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fastest_time: None,
            layout: layout.into(),
        }
    }
}

/// Named mazes, looked up by exact name and kept in insertion order.
pub trait MazeStore {
    fn records(&self) -> &[MazeRecord];

    /// Inserts or overwrites the record with the same name.
    fn save(&mut self, record: MazeRecord) -> Result<(), StoreError>;

    /// Puts `record` where `old_name` was (appending if absent), dropping any
    /// other record that already carries the new name.
    fn replace(&mut self, old_name: &str, record: MazeRecord) -> Result<(), StoreError>;

    fn delete(&mut self, name: &str) -> Result<bool, StoreError>;

    fn clear(&mut self) -> Result<(), StoreError>;

    fn load(&self, name: &str) -> Option<&MazeRecord> {
        self.records().iter().find(|r| r.name == name)
    }

    fn contains(&self, name: &str) -> bool {
        self.load(name).is_some()
    }

    fn names(&self) -> Vec<String> {
        self.records().iter().map(|r| r.name.clone()).collect()
    }

    fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    mazes: Vec<MazeRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(mazes: Vec<MazeRecord>) -> Self {
        Self { mazes }
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.mazes.iter().position(|r| r.name == name)
    }
}

impl MazeStore for MemoryStore {
    fn records(&self) -> &[MazeRecord] {
        &self.mazes
    }

    fn save(&mut self, record: MazeRecord) -> Result<(), StoreError> {
        match self.index_of(&record.name) {
            Some(idx) => self.mazes[idx] = record,
            None => self.mazes.push(record),
        }
        Ok(())
    }

    fn replace(&mut self, old_name: &str, record: MazeRecord) -> Result<(), StoreError> {
        if old_name != record.name {
            if let Some(dup) = self.index_of(&record.name) {
                self.mazes.remove(dup);
            }
        }
        match self.index_of(old_name) {
            Some(idx) => self.mazes[idx] = record,
            None => self.mazes.push(record),
        }
        Ok(())
    }

    fn delete(&mut self, name: &str) -> Result<bool, StoreError> {
        match self.index_of(name) {
            Some(idx) => {
                self.mazes.remove(idx);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.mazes.clear();
        Ok(())
    }
}

/// Older settings files hold `null` where a maze was deleted.
#[derive(Serialize, Deserialize, Default)]
struct Catalog {
    #[serde(default)]
    mazes: Vec<Option<MazeRecord>>,
}

/// A [`MemoryStore`] mirrored to a JSON file after every change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl FileStore {
    /// A missing file opens as an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let inner = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => MemoryStore::new(),
            Ok(text) => {
                let catalog: Catalog = serde_json::from_str(&text)?;
                MemoryStore::with_records(catalog.mazes.into_iter().flatten().collect())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => MemoryStore::new(),
            Err(err) => return Err(err.into()),
        };
        info!(
            "opened maze store {} ({} mazes)",
            path.display(),
            inner.records().len()
        );
        Ok(Self { path, inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `next` to disk and only then adopts it, so a failed write
    /// leaves both the file and the in-memory records as they were.
    fn commit(&mut self, next: MemoryStore) -> Result<(), StoreError> {
        write_catalog(&self.path, next.records())?;
        self.inner = next;
        Ok(())
    }
}

/// Temp file in the target directory, synced, then renamed over the old file.
fn write_catalog(path: &Path, records: &[MazeRecord]) -> Result<(), StoreError> {
    let catalog = Catalog {
        mazes: records.iter().cloned().map(Some).collect(),
    };
    let json = serde_json::to_string_pretty(&catalog)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(json.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| err.error)?;
    debug!("wrote {}", path.display());
    Ok(())
}

impl MazeStore for FileStore {
    fn records(&self) -> &[MazeRecord] {
        self.inner.records()
    }

    fn save(&mut self, record: MazeRecord) -> Result<(), StoreError> {
        let mut next = self.inner.clone();
        next.save(record)?;
        self.commit(next)
    }

    fn replace(&mut self, old_name: &str, record: MazeRecord) -> Result<(), StoreError> {
        let mut next = self.inner.clone();
        next.replace(old_name, record)?;
        self.commit(next)
    }

    fn delete(&mut self, name: &str) -> Result<bool, StoreError> {
        let mut next = self.inner.clone();
        let removed = next.delete(name)?;
        if removed {
            self.commit(next)?;
        }
        Ok(removed)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        let mut next = self.inner.clone();
        next.clear()?;
        self.commit(next)
    }
}
