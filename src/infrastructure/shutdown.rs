//! Graceful Shutdown Handler
//!
//! Lets the API server stop accepting requests and finish in-flight
//! resolutions when the process is asked to terminate.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Shutdown coordinator.
///
/// Cloning shares the same underlying state; `shutdown` on any clone is seen
/// by every subscriber.
#[derive(Clone)]
pub struct ShutdownController {
    shutdown_initiated: Arc<AtomicBool>,
    shutdown_tx: broadcast::Sender<()>,
}

impl ShutdownController {
    pub fn new() -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            shutdown_initiated: Arc::new(AtomicBool::new(false)),
            shutdown_tx,
        }
    }

    /// Subscribe to the shutdown notification.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Initiate graceful shutdown. Idempotent.
    pub fn shutdown(&self) {
        if !self.shutdown_initiated.swap(true, Ordering::SeqCst) {
            tracing::info!("initiating graceful shutdown");
            let _ = self.shutdown_tx.send(());
        }
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown_initiated.load(Ordering::SeqCst)
    }

    /// Wait until shutdown is initiated, returning at once if it already was.
    pub async fn wait(&self) {
        let mut rx = self.subscribe();
        if self.is_shutdown() {
            return;
        }
        let _ = rx.recv().await;
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for Ctrl+C or SIGTERM, then trigger `controller`.
#[cfg_attr(coverage_nightly, coverage(off))]
pub async fn shutdown_signal(controller: ShutdownController) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received Ctrl+C, initiating shutdown");
        }
        _ = terminate => {
            tracing::info!("received SIGTERM, initiating shutdown");
        }
    }

    controller.shutdown();
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_shutdown_controller_new() {
        let controller = ShutdownController::new();
        assert!(!controller.is_shutdown());
    }

    #[test]
    fn test_shutdown_initiates_once() {
        let controller = ShutdownController::default();

        controller.shutdown();
        assert!(controller.is_shutdown());

        // Calling again should be idempotent
        controller.shutdown();
        assert!(controller.is_shutdown());
    }

    #[tokio::test]
    async fn test_subscribe_receives_shutdown() {
        let controller = ShutdownController::new();
        let mut rx = controller.subscribe();

        controller.shutdown();

        let result = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_wait_after_shutdown_returns_immediately() {
        let controller = ShutdownController::new();
        controller.shutdown();

        let result = tokio::time::timeout(Duration::from_millis(100), controller.wait()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_wait_from_clone() {
        let controller = ShutdownController::new();
        let cloned = controller.clone();

        let waiter = tokio::spawn(async move { cloned.wait().await });
        tokio::time::sleep(Duration::from_millis(20)).await;
        controller.shutdown();

        let result = tokio::time::timeout(Duration::from_millis(200), waiter).await;
        assert!(result.is_ok());
    }
}
