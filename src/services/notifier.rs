//! Completion notifier: plays the alarm when a countdown finishes

use tokio::{process::Command, sync::broadcast};
use tracing::{debug, error, info, warn};

use crate::timer::CompletionEvent;

/// Run the configured alarm command through the shell
pub async fn play_completion_sound(command: &str) -> Result<(), String> {
    debug!("Running completion sound command: {}", command);

    let output = Command::new("sh")
        .args(["-c", command])
        .output()
        .await
        .map_err(|e| format!("Failed to execute sound command: {}", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("Sound command failed: {}", stderr));
    }

    Ok(())
}

/// Background task reacting to completed countdowns
///
/// The engine never waits on this task; a failing alarm is only logged.
pub async fn completion_notifier_task(
    mut completions: broadcast::Receiver<CompletionEvent>,
    sound_command: Option<String>,
) {
    info!("Starting completion notifier task");

    loop {
        match completions.recv().await {
            Ok(event) => {
                info!(
                    "Focus session finished: {}s{}",
                    event.record.duration_seconds,
                    event.record.task_ref.map(|task| format!(" on task {}", task.0)).unwrap_or_default()
                );

                if !event.sound_enabled {
                    debug!("Completion sound disabled");
                    continue;
                }
                match &sound_command {
                    Some(command) => {
                        if let Err(e) = play_completion_sound(command).await {
                            error!("Failed to play completion sound: {}", e);
                        }
                    }
                    None => debug!("No sound command configured"),
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("Completion notifier skipped {} events", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => {
                info!("Completion channel closed, stopping notifier task");
                break;
            }
        }
    }
}
