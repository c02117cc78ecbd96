//! Persistent store: one JSON array file, rewritten whole on every append.
//!
//! Reads never fail: a missing, unreadable, or malformed file is an empty journal.
//! Writes go to a uniquely named sibling temp file first and are renamed into
//! place. Writers sharing a `JournalStore` (or its clones) are serialized; two
//! separate processes appending at once can still drop each other's entry.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::error::JournalError;
use super::types::JournalEntry;

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone)]
pub struct JournalStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl JournalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All entries in insertion order, or none if the file is missing or corrupt.
    pub fn load(&self) -> Vec<JournalEntry> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "journal file not found, starting empty");
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "journal file unreadable, treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<JournalEntry>>(&contents) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "journal file is corrupt, treating as empty");
                Vec::new()
            }
        }
    }

    /// Overwrite the file with `entries`. Uses atomic write (tmp + rename).
    pub fn save(&self, entries: &[JournalEntry]) -> Result<(), JournalError> {
        let _guard = self.lock();
        self.write(entries)
    }

    /// Load, push, save. Returns the number of entries now stored.
    ///
    /// The write lock is held across the whole read-modify-write so concurrent
    /// appends through this store never lose each other's entry.
    pub fn append(&self, entry: JournalEntry) -> Result<usize, JournalError> {
        let _guard = self.lock();
        let mut entries = self.load();
        entries.push(entry);
        self.write(&entries)?;
        Ok(entries.len())
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self, entries: &[JournalEntry]) -> Result<(), JournalError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| JournalError::Store {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(entries)?;
        let tmp_path = self.tmp_path();

        std::fs::write(&tmp_path, json).map_err(|source| JournalError::Store {
            path: tmp_path.clone(),
            source,
        })?;
        std::fs::rename(&tmp_path, &self.path).map_err(|source| JournalError::Store {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(path = %self.path.display(), entries = entries.len(), "journal saved");
        Ok(())
    }

    /// `<path>.<pid>.<n>.tmp`, unique per write.
    fn tmp_path(&self) -> PathBuf {
        let n = TMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".{}.{n}.tmp", std::process::id()));
        PathBuf::from(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(dream: &str) -> JournalEntry {
        JournalEntry {
            timestamp: "2024-03-01T07:30:00".into(),
            dream: dream.into(),
            analysis: "analysis".into(),
            tags: vec!["water".into()],
            mood: Some("neutral".into()),
            model_used: Some("test-model".into()),
        }
    }

    #[test]
    fn missing_file_loads_empty() {
        let tmp = TempDir::new().unwrap();
        let store = JournalStore::new(tmp.path().join("none.json"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("journal.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(JournalStore::new(&path).load().is_empty());

        // Valid JSON that is not an array of entries is also corrupt.
        std::fs::write(&path, r#"{"dream":"x"}"#).unwrap();
        assert!(JournalStore::new(&path).load().is_empty());
    }

    #[test]
    fn append_preserves_order_and_creates_parent() {
        let tmp = TempDir::new().unwrap();
        let store = JournalStore::new(tmp.path().join("nested").join("journal.json"));

        assert_eq!(store.append(entry("first")).unwrap(), 1);
        assert_eq!(store.append(entry("second")).unwrap(), 2);

        let dreams: Vec<String> = store.load().into_iter().map(|e| e.dream).collect();
        assert_eq!(dreams, vec!["first", "second"]);
        let leftovers = std::fs::read_dir(store.path().parent().unwrap())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0, "temp files should be renamed away");
    }

    #[test]
    fn append_after_corruption_starts_over() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("journal.json");
        std::fs::write(&path, "garbage").unwrap();

        let store = JournalStore::new(&path);
        assert_eq!(store.append(entry("fresh")).unwrap(), 1);
        assert_eq!(store.load().len(), 1);
    }

    #[test]
    fn concurrent_appends_keep_every_entry() {
        let tmp = TempDir::new().unwrap();
        let store = JournalStore::new(tmp.path().join("journal.json"));

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || store.append(entry(&format!("dream {i}"))))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        assert_eq!(store.load().len(), 16);
    }

    #[test]
    fn tmp_paths_are_unique() {
        let store = JournalStore::new("journal.json");
        assert_ne!(store.tmp_path(), store.tmp_path());
    }

    #[test]
    fn save_load_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let store = JournalStore::new(tmp.path().join("journal.json"));
        store.append(entry("one")).unwrap();
        store.append(entry("two")).unwrap();

        let before = store.load();
        store.save(&before).unwrap();
        assert_eq!(store.load(), before);
    }
}
