#![forbid(unsafe_code)]

//! Persisted identity record.
//!
//! The record lives under the fixed key [`IDENTITY_KEY`] in a small
//! key-value store. Values are serialized JSON strings, so a store file can
//! hold other keys without this module knowing their shape.
//!
//! ```text
//! ┌──────────────┐  get/set   ┌──────────────────────┐
//! │ screens/gate │ ─────────▶ │ dyn IdentityStore    │
//! └──────────────┘            │  ├ FileIdentityStore │  JSON file, atomic rename
//!                             │  └ MemoryIdentityStore (tests)
//!                             └──────────────────────┘
//! ```
//!
//! Reads never fail: a missing, unreadable, or malformed value reads as
//! absent and is logged.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::domain::IdentityRecord;

/// Key the identity record is stored under.
pub const IDENTITY_KEY: &str = "userDetails";

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum StoreError {
    /// I/O error during file operations.
    Io(std::io::Error),
    /// Serialization or deserialization error.
    Serialization(String),
    /// Store file has an unexpected layout or version.
    Invalid(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "I/O error: {e}"),
            StoreError::Serialization(msg) => write!(f, "serialization error: {msg}"),
            StoreError::Invalid(msg) => write!(f, "invalid store: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Serialization(_) | StoreError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

// ─────────────────────────────────────────────────────────────────────────────
// Store trait
// ─────────────────────────────────────────────────────────────────────────────

/// Persisted identity record that survives restarts.
pub trait IdentityStore: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// The stored record, or `None` when absent or unreadable.
    fn get(&self) -> Option<IdentityRecord>;

    /// Overwrite the stored record.
    ///
    /// # Errors
    ///
    /// Fails if the record could not be durably written.
    fn set(&self, record: &IdentityRecord) -> StoreResult<()>;
}

fn decode_record(raw: &str, store: &str) -> Option<IdentityRecord> {
    match serde_json::from_str(raw) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!(store, key = IDENTITY_KEY, error = %e, "stored identity is malformed, treating as absent");
            None
        }
    }
}

fn encode_record(record: &IdentityRecord) -> StoreResult<String> {
    serde_json::to_string(record)
        .map_err(|e| StoreError::Serialization(format!("failed to serialize identity: {e}")))
}

// ─────────────────────────────────────────────────────────────────────────────
// File store
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
struct StoreFile {
    format_version: u32,
    entries: BTreeMap<String, String>,
}

impl StoreFile {
    const FORMAT_VERSION: u32 = 1;

    fn new() -> Self {
        Self {
            format_version: Self::FORMAT_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

/// JSON file store.
///
/// # File Format
///
/// ```json
/// {
///   "format_version": 1,
///   "entries": {
///     "userDetails": "{\"name\":\"Ada\",\"phone\":\"555\",\"email\":\"ada@example.com\"}"
///   }
/// }
/// ```
///
/// # Atomic Writes
///
/// 1. Write to `{path}.tmp`
/// 2. Flush and sync
/// 3. Rename `{path}.tmp` -> `{path}`
pub struct FileIdentityStore {
    path: PathBuf,
}

impl FileIdentityStore {
    /// The file does not need to exist; it is created on first write.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// `$XDG_STATE_HOME/deptgate/store.json`, or the `~/.local/state` and
    /// current-directory fallbacks.
    #[must_use]
    pub fn default_path() -> PathBuf {
        state_dir().join("deptgate").join("store.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone();
        tmp.set_extension("json.tmp");
        tmp
    }

    fn load(&self) -> StoreResult<StoreFile> {
        if !self.path.exists() {
            return Ok(StoreFile::new());
        }
        let reader = BufReader::new(File::open(&self.path)?);
        let file: StoreFile = serde_json::from_reader(reader)
            .map_err(|e| StoreError::Serialization(format!("failed to parse store file: {e}")))?;
        if file.format_version != StoreFile::FORMAT_VERSION {
            return Err(StoreError::Invalid(format!(
                "format version {} (expected {})",
                file.format_version,
                StoreFile::FORMAT_VERSION
            )));
        }
        Ok(file)
    }

    fn save(&self, file: &StoreFile) -> StoreResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = self.temp_path();
        let result = write_synced(&tmp_path, file)
            .and_then(|()| fs::rename(&tmp_path, &self.path).map_err(StoreError::from));
        if result.is_err() {
            // Never leave a partial temp file behind.
            let _ = fs::remove_file(&tmp_path);
        }
        result
    }
}

fn write_synced(path: &Path, file: &StoreFile) -> StoreResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, file)
        .map_err(|e| StoreError::Serialization(format!("failed to write store: {e}")))?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

fn state_dir() -> PathBuf {
    if let Ok(state_home) = std::env::var("XDG_STATE_HOME") {
        return PathBuf::from(state_home);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local").join("state");
    }
    PathBuf::from(".")
}

impl IdentityStore for FileIdentityStore {
    fn name(&self) -> &str {
        "FileIdentityStore"
    }

    fn get(&self) -> Option<IdentityRecord> {
        let file = match self.load() {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "identity store unreadable, treating as absent");
                return None;
            }
        };
        let raw = file.entries.get(IDENTITY_KEY)?;
        decode_record(raw, self.name())
    }

    fn set(&self, record: &IdentityRecord) -> StoreResult<()> {
        // Keep unrelated keys; a corrupt file is replaced rather than blocking the write.
        let mut file = self.load().unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "replacing unreadable identity store");
            StoreFile::new()
        });
        file.entries
            .insert(IDENTITY_KEY.to_string(), encode_record(record)?);
        self.save(&file)?;
        tracing::info!(path = %self.path.display(), "identity saved");
        Ok(())
    }
}

impl fmt::Debug for FileIdentityStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileIdentityStore")
            .field("path", &self.path)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Memory store
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory store for tests.
///
/// Counts writes and can be told to fail them.
#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    entries: Mutex<BTreeMap<String, String>>,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a valid record.
    pub fn with_record(record: &IdentityRecord) -> Self {
        let store = Self::new();
        if let Ok(raw) = encode_record(record) {
            store.put_raw(&raw);
        }
        store
    }

    /// Put an arbitrary string under the identity key, bypassing validation.
    pub fn put_raw(&self, raw: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(IDENTITY_KEY.to_string(), raw.to_string());
    }

    pub fn raw(&self) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(IDENTITY_KEY)
            .cloned()
    }

    /// Number of successful writes.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl IdentityStore for MemoryIdentityStore {
    fn name(&self) -> &str {
        "MemoryIdentityStore"
    }

    fn get(&self) -> Option<IdentityRecord> {
        let raw = self.raw()?;
        decode_record(&raw, self.name())
    }

    fn set(&self, record: &IdentityRecord) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Io(std::io::Error::other("write refused")));
        }
        let raw = encode_record(record)?;
        self.put_raw(&raw);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ada() -> IdentityRecord {
        IdentityRecord::new("Ada", "555-0100", "ada@example.com").expect("valid")
    }

    #[test]
    fn missing_file_reads_as_absent() {
        let dir = TempDir::new().expect("tempdir");
        let store = FileIdentityStore::new(dir.path().join("store.json"));
        assert!(store.get().is_none());
    }

    #[test]
    fn file_store_round_trip() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("nested").join("store.json");
        let store = FileIdentityStore::new(&path);
        store.set(&ada()).expect("write");
        assert_eq!(store.get(), Some(ada()));
        assert!(!path.with_extension("json.tmp").exists());

        // A fresh handle sees the same record.
        assert_eq!(FileIdentityStore::new(&path).get(), Some(ada()));
    }

    #[test]
    fn set_overwrites_fully() {
        let dir = TempDir::new().expect("tempdir");
        let store = FileIdentityStore::new(dir.path().join("store.json"));
        store.set(&ada()).expect("write");
        let grace = IdentityRecord::new("Grace", "1", "g@example.com").expect("valid");
        store.set(&grace).expect("write");
        assert_eq!(store.get(), Some(grace));
    }

    #[test]
    fn malformed_file_reads_as_absent() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("store.json");
        fs::write(&path, "not json").expect("write");
        let store = FileIdentityStore::new(&path);
        assert!(store.get().is_none());

        // Writing recovers the file.
        store.set(&ada()).expect("write");
        assert_eq!(store.get(), Some(ada()));
    }

    #[test]
    fn malformed_value_reads_as_absent() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("store.json");
        fs::write(
            &path,
            r#"{"format_version":1,"entries":{"userDetails":"{\"name\":\"\",\"phone\":\"1\",\"email\":\"e\"}"}}"#,
        )
        .expect("write");
        assert!(FileIdentityStore::new(&path).get().is_none());
    }

    #[test]
    fn other_keys_survive_writes() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("store.json");
        fs::write(
            &path,
            r#"{"format_version":1,"entries":{"theme":"\"dark\""}}"#,
        )
        .expect("write");
        FileIdentityStore::new(&path).set(&ada()).expect("write");
        let text = fs::read_to_string(&path).expect("read");
        assert!(text.contains("theme"));
        assert!(text.contains(IDENTITY_KEY));
    }

    #[test]
    fn unknown_format_version_reads_as_absent() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("store.json");
        fs::write(&path, r#"{"format_version":99,"entries":{}}"#).expect("write");
        assert!(FileIdentityStore::new(&path).get().is_none());
    }

    #[test]
    fn failed_rename_removes_temp_file() {
        let dir = TempDir::new().expect("tempdir");
        // A directory in the store's place makes the final rename fail.
        let path = dir.path().join("store.json");
        fs::create_dir(&path).expect("mkdir");
        let store = FileIdentityStore::new(&path);

        assert!(store.set(&ada()).is_err());
        assert!(!store.temp_path().exists());
        assert!(path.is_dir());
    }

    #[test]
    fn memory_store_counts_and_fails_writes() {
        let store = MemoryIdentityStore::new();
        assert!(store.get().is_none());
        store.set(&ada()).expect("write");
        assert_eq!(store.write_count(), 1);
        assert_eq!(store.get(), Some(ada()));

        store.set_fail_writes(true);
        assert!(matches!(store.set(&ada()), Err(StoreError::Io(_))));
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn memory_store_malformed_raw_is_absent() {
        let store = MemoryIdentityStore::new();
        store.put_raw("{\"name\":\"Ada\"}");
        assert!(store.get().is_none());
    }

    #[test]
    fn store_error_display() {
        let err = StoreError::Invalid("bad".into());
        assert_eq!(err.to_string(), "invalid store: bad");
        let io: StoreError = std::io::Error::other("boom").into();
        assert!(std::error::Error::source(&io).is_some());
    }
}
