//! Cancellation of in-flight work.

use tokio::sync::broadcast;

/// Broadcast cancel signal. Every long wait (the verification window in
/// particular) subscribes and gives up when it fires.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    tx: broadcast::Sender<()>,
}

impl CancelSignal {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Number of waits currently listening.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve when `rx` fires. A closed channel means nobody can cancel any
/// more, so it never resolves.
pub async fn cancelled(rx: &mut broadcast::Receiver<()>) {
    match rx.recv().await {
        Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {}
        Err(broadcast::error::RecvError::Closed) => std::future::pending::<()>().await,
    }
}
