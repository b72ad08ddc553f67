//! Pomodoro Server - A state-managed HTTP server running a work/break timer
//! 
//! This library provides the interval timer state machine, persistence of
//! its durations, the background task ticking it and an HTTP surface to
//! drive it.

pub mod config;
pub mod settings;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use settings::{JsonFileStore, Settings, SettingsStore};
pub use state::{AppState, TimerEngine};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
