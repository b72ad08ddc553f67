//! State management module
//! 
//! This module contains the timer state machine, the structures it works on
//! and the shared application state wrapping it.

pub mod app_state;
pub mod engine;
pub mod error;
pub mod notification;
pub mod snapshot;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use engine::TimerEngine;
pub use error::StateError;
pub use notification::{PhaseNotification, Severity};
pub use snapshot::TimerSnapshot;
pub use timer_state::{Phase, TimerState};
