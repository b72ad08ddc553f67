//! Settings persistence boundary

use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};
use serde_json::{Map, Value};
use tracing::debug;

use super::{PersistenceError, Settings, SETTINGS_RECORD};

/// Key-value persistence used by the timer engine for its settings record
pub trait SettingsStore: Send + Sync {
    /// Read the stored settings, `Ok(None)` when nothing has been saved yet
    fn load(&self) -> Result<Option<Settings>, PersistenceError>;

    /// Replace the stored settings wholesale
    fn save(&self, settings: &Settings) -> Result<(), PersistenceError>;
}

fn decode_record(raw: Value) -> Result<Settings, PersistenceError> {
    let settings: Settings = serde_json::from_value(raw)?;
    settings.validate()?;
    Ok(settings)
}

/// JSON document on disk holding named records, one of which is the settings
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store backed by the given file (created on first save)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Option<Map<String, Value>>, PersistenceError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl SettingsStore for JsonFileStore {
    fn load(&self) -> Result<Option<Settings>, PersistenceError> {
        let Some(mut document) = self.read_document()? else {
            debug!("No settings file at {}", self.path.display());
            return Ok(None);
        };

        match document.remove(SETTINGS_RECORD) {
            Some(raw) => decode_record(raw).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, settings: &Settings) -> Result<(), PersistenceError> {
        // Other records in the document are kept; a corrupt document is replaced
        let mut document = self.read_document().ok().flatten().unwrap_or_default();
        document.insert(SETTINGS_RECORD.to_string(), serde_json::to_value(settings)?);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, serde_json::to_string_pretty(&Value::Object(document))?)?;
        fs::rename(&tmp_path, &self.path)?;

        debug!("Saved settings to {}", self.path.display());
        Ok(())
    }
}

/// In-process store, records are kept as serialized strings
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding the given settings
    pub fn with_settings(settings: Settings) -> Self {
        let store = Self::new();
        if let Ok(raw) = serde_json::to_string(&settings) {
            store.put_raw(raw);
        }
        store
    }

    /// Overwrite the raw settings record, bypassing validation
    pub fn put_raw(&self, raw: impl Into<String>) {
        if let Ok(mut records) = self.records.lock() {
            records.insert(SETTINGS_RECORD.to_string(), raw.into());
        }
    }

    /// Number of successful `save` calls
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Result<Option<Settings>, PersistenceError> {
        let records = self.records.lock().map_err(|_| PersistenceError::Poisoned)?;
        match records.get(SETTINGS_RECORD) {
            Some(raw) => decode_record(serde_json::from_str(raw)?).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, settings: &Settings) -> Result<(), PersistenceError> {
        let raw = serde_json::to_string(settings)?;
        let mut records = self.records.lock().map_err(|_| PersistenceError::Poisoned)?;
        records.insert(SETTINGS_RECORD.to_string(), raw);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
