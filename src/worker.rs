use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use crate::email::{NotificationMessage, Notifier};

/// Sending half of the notification queue. Never waits for delivery.
#[derive(Clone)]
pub struct NotificationDispatcher {
    tx: mpsc::Sender<NotificationMessage>,
}

impl NotificationDispatcher {
    /// Queue a message for the worker pool. Returns false if it was dropped.
    pub fn dispatch(&self, message: NotificationMessage) -> bool {
        match self.tx.try_send(message) {
            Ok(()) => true,
            Err(TrySendError::Full(message)) => {
                tracing::error!(
                    "Notification queue full, dropping confirmation for {}",
                    message.to
                );
                false
            }
            Err(TrySendError::Closed(message)) => {
                tracing::error!(
                    "Notification queue closed, dropping confirmation for {}",
                    message.to
                );
                false
            }
        }
    }
}

pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Wait for the workers to drain the queue once every dispatcher is gone.
    /// Whatever is still running after `grace` is abandoned.
    pub async fn shutdown(self, grace: Duration) {
        let workers = self.handles.len();
        let drained = tokio::time::timeout(
            grace,
            futures_util::future::join_all(self.handles),
        )
        .await;

        match drained {
            Ok(_) => tracing::info!("Notification worker pool stopped ({workers} workers)"),
            Err(_) => tracing::warn!(
                "Notification workers still busy after {}s, abandoning pending mail",
                grace.as_secs()
            ),
        }
    }
}

/// Start `worker_count` workers behind a queue holding at most `capacity` messages.
pub fn start(
    notifier: Arc<dyn Notifier>,
    worker_count: usize,
    capacity: usize,
) -> (NotificationDispatcher, WorkerPool) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let rx = Arc::new(Mutex::new(rx));

    let handles = (0..worker_count.max(1))
        .map(|id| tokio::spawn(run(id, rx.clone(), notifier.clone())))
        .collect();

    tracing::info!("Notification worker pool started ({worker_count} workers)");

    (NotificationDispatcher { tx }, WorkerPool { handles })
}

/// A single worker loop. Exits once the queue is closed and empty.
async fn run(
    id: usize,
    rx: Arc<Mutex<mpsc::Receiver<NotificationMessage>>>,
    notifier: Arc<dyn Notifier>,
) {
    tracing::debug!("Worker {id} started");

    loop {
        let next = rx.lock().await.recv().await;
        let Some(message) = next else {
            break;
        };

        match notifier.send(&message).await {
            Ok(()) => tracing::debug!("Worker {id} sent confirmation to {}", message.to),
            Err(e) => tracing::error!("Failed to send confirmation to {}: {e}", message.to),
        }
    }

    tracing::debug!("Worker {id} stopped");
}
