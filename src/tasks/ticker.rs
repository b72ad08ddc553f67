//! Tick driver background task

use std::{sync::Weak, time::Duration};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::state::AppState;

/// Interval between engine ticks
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Drives `AppState::tick` once per second while the timer is running.
///
/// Holds only a weak reference: once the state is dropped the running
/// channel closes and the task exits instead of ticking a discarded timer.
pub async fn ticker_task(state: Weak<AppState>) {
    let Some(mut running_rx) = state.upgrade().map(|s| s.subscribe_running()) else {
        return;
    };
    info!("Starting tick driver task");

    loop {
        // Idle until the timer is started
        if !*running_rx.borrow_and_update() {
            if running_rx.changed().await.is_err() {
                break;
            }
            continue;
        }

        debug!("Timer running, scheduling ticks");
        let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let Some(state) = state.upgrade() else {
                        debug!("Timer state dropped, stopping tick driver");
                        return;
                    };
                    if let Err(e) = state.tick() {
                        error!("Failed to advance timer: {}", e);
                    }
                }

                changed = running_rx.changed() => {
                    if changed.is_err() {
                        debug!("Running channel closed, stopping tick driver");
                        return;
                    }
                    if !*running_rx.borrow_and_update() {
                        debug!("Timer stopped, cancelling ticks");
                        break;
                    }
                }
            }
        }
    }

    debug!("Tick driver task finished");
}
