//! Phase change announcement background task

use tokio::sync::broadcast::{error::RecvError, Receiver};
use tracing::{info, warn};

use crate::state::{PhaseNotification, Severity};

/// Logs every phase change notification until the channel closes
pub async fn announcer_task(mut notifications: Receiver<PhaseNotification>) {
    info!("Starting phase announcer task");

    loop {
        match notifications.recv().await {
            Ok(note) => match note.severity {
                Severity::Default => info!(
                    "{} {} ({} pomodoros completed)",
                    note.title, note.description, note.completed_pomodoros
                ),
                Severity::Destructive => warn!(
                    "{} {} ({} pomodoros completed)",
                    note.title, note.description, note.completed_pomodoros
                ),
            },
            Err(RecvError::Lagged(skipped)) => {
                warn!("Announcer fell behind, {} notifications skipped", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }
}
