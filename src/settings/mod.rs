//! Settings module
//! 
//! This module contains the durable timer configuration, its input
//! validation and the persistence boundary it is stored through.

pub mod error;
pub mod settings;
pub mod store;

// Re-export main types
pub use error::{PersistenceError, ValidationError};
pub use settings::{check_minutes, minutes_from_json, parse_minutes, Settings, SETTINGS_RECORD};
pub use store::{JsonFileStore, MemoryStore, SettingsStore};
