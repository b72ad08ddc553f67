//! Main application state management

use std::{
    sync::{Mutex, MutexGuard},
    time::Instant,
};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info};

use crate::settings::{minutes_from_json, Settings};
use super::{engine::persist_settings, Phase, PhaseNotification, StateError, TimerEngine, TimerSnapshot};

/// Shared state handed to the HTTP handlers and the background tasks.
///
/// Every engine call goes through one lock, so ticks and user commands are
/// applied strictly one after the other. Settings writes happen outside
/// that lock, ordered by a second one.
#[derive(Debug)]
pub struct AppState {
    engine: Mutex<TimerEngine>,
    /// Held across a settings write so saves land in edit order
    settings_writer: Mutex<()>,
    /// Mirrors the engine's running flag for the tick driver
    running_tx: watch::Sender<bool>,
    /// Phase change notifications for the presentation layer
    pub notification_tx: broadcast::Sender<PhaseNotification>,
    last_notification: Mutex<Option<PhaseNotification>>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    last_action: Mutex<Option<String>>,
    last_action_time: Mutex<Option<DateTime<Utc>>>,
}

impl AppState {
    /// Wrap an engine, mirroring its current running flag
    pub fn new(engine: TimerEngine, port: u16, host: String) -> Self {
        let (running_tx, _) = watch::channel(engine.is_running());
        let (notification_tx, _) = broadcast::channel(16);

        Self {
            engine: Mutex::new(engine),
            settings_writer: Mutex::new(()),
            running_tx,
            notification_tx,
            last_notification: Mutex::new(None),
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
        }
    }

    fn engine(&self) -> Result<MutexGuard<'_, TimerEngine>, StateError> {
        self.engine
            .lock()
            .map_err(|_| StateError::LockPoisoned("timer engine"))
    }

    /// Run a command against the engine, then publish the running flag
    fn command<F>(&self, action: &str, command: F) -> Result<TimerSnapshot, StateError>
    where
        F: FnOnce(&mut TimerEngine) -> Result<(), StateError>,
    {
        let mut engine = self.engine()?;
        command(&mut engine)?;
        let running = engine.is_running();
        let snapshot = TimerSnapshot::capture(&engine);

        // Published under the lock so the tick driver never sees flags out of order
        self.running_tx.send_if_modified(|current| {
            let changed = *current != running;
            *current = running;
            changed
        });
        drop(engine);

        self.record_action(action);
        Ok(snapshot)
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    pub fn start(&self) -> Result<TimerSnapshot, StateError> {
        info!("Start requested");
        self.command("start", |engine| {
            engine.start();
            Ok(())
        })
    }

    pub fn pause(&self) -> Result<TimerSnapshot, StateError> {
        info!("Pause requested");
        self.command("pause", |engine| {
            engine.pause();
            Ok(())
        })
    }

    pub fn reset(&self) -> Result<TimerSnapshot, StateError> {
        info!("Reset requested");
        self.command("reset", |engine| {
            engine.reset();
            Ok(())
        })
    }

    /// Validate a raw duration value and apply it to the given phase
    pub fn set_duration(&self, phase: Phase, minutes: &Value) -> Result<TimerSnapshot, StateError> {
        let minutes = i64::from(minutes_from_json(minutes)?);
        let action = match phase {
            Phase::Work => "set-work-duration",
            Phase::Break => "set-break-duration",
        };

        let mut pending = None;
        let snapshot = self.command(action, |engine| {
            let settings = engine.apply_duration(phase, minutes)?;
            // Taken before the engine lock is released so writes keep edit order
            let writer = self
                .settings_writer
                .lock()
                .map_err(|_| StateError::LockPoisoned("settings writer"))?;
            pending = Some((settings, engine.store(), writer));
            Ok(())
        })?;

        // Ticks keep running while the store does its I/O
        if let Some((settings, store, _writer)) = pending {
            persist_settings(store.as_ref(), &settings);
        }
        Ok(snapshot)
    }

    /// Advance the engine by one second, publishing any rollover
    pub fn tick(&self) -> Result<Option<PhaseNotification>, StateError> {
        let notification = self.engine()?.tick();

        if let Some(notification) = &notification {
            if let Ok(mut last) = self.last_notification.lock() {
                *last = Some(notification.clone());
            }
            if self.notification_tx.send(notification.clone()).is_err() {
                debug!("No listeners for phase notification");
            }
        }

        Ok(notification)
    }

    /// Receiver following the running flag
    pub fn subscribe_running(&self) -> watch::Receiver<bool> {
        self.running_tx.subscribe()
    }

    /// Receiver for phase change notifications
    pub fn subscribe_notifications(&self) -> broadcast::Receiver<PhaseNotification> {
        self.notification_tx.subscribe()
    }

    /// Get current timer view
    pub fn snapshot(&self) -> Result<TimerSnapshot, StateError> {
        Ok(TimerSnapshot::capture(&*self.engine()?))
    }

    /// Get current settings
    pub fn settings(&self) -> Result<Settings, StateError> {
        Ok(self.engine()?.settings())
    }

    /// Most recent rollover notification, if any happened yet
    pub fn last_notification(&self) -> Option<PhaseNotification> {
        self.last_notification.lock().ok().and_then(|n| n.clone())
    }

    /// Seconds since the state was created
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
