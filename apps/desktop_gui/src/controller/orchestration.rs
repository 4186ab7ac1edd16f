//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) {
    let cmd_name = cmd.name();
    tracing::debug!(command = cmd_name, "queueing ui->backend command");
    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued ui->backend command"),
        Err(TrySendError::Full(_)) => {
            *status = "UI command queue is full; please retry".to_string();
            tracing::warn!(command = cmd_name, "ui->backend command queue is full");
        }
        Err(TrySendError::Disconnected(_)) => {
            *status =
                "Backend worker disconnected (possible startup/runtime failure); restart the app"
                    .to_string();
            tracing::error!(command = cmd_name, "ui->backend command queue disconnected");
        }
    }
}

pub fn dispatch_all(
    cmd_tx: &Sender<BackendCommand>,
    cmds: impl IntoIterator<Item = BackendCommand>,
    status: &mut String,
) {
    for cmd in cmds {
        dispatch_backend_command(cmd_tx, cmd, status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    #[test]
    fn queues_commands_in_order() {
        let (tx, rx) = bounded(4);
        let mut status = String::new();
        dispatch_all(
            &tx,
            [BackendCommand::LoadStats, BackendCommand::CancelPolling],
            &mut status,
        );
        assert_eq!(rx.try_recv().ok(), Some(BackendCommand::LoadStats));
        assert_eq!(rx.try_recv().ok(), Some(BackendCommand::CancelPolling));
        assert!(status.is_empty());
    }

    #[test]
    fn reports_full_queue_in_status() {
        let (tx, _rx) = bounded(1);
        let mut status = String::new();
        dispatch_backend_command(&tx, BackendCommand::LoadStats, &mut status);
        dispatch_backend_command(&tx, BackendCommand::LoadStats, &mut status);
        assert!(status.contains("full"));
    }

    #[test]
    fn reports_disconnected_worker_in_status() {
        let (tx, rx) = bounded(1);
        drop(rx);
        let mut status = String::new();
        dispatch_backend_command(&tx, BackendCommand::LoadStats, &mut status);
        assert!(status.contains("disconnected"));
    }
}
