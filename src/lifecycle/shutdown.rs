//! Shutdown coordination for the service.

use tokio::sync::broadcast;

/// Broadcast handle that stops a running [`HttpServer`](crate::http::HttpServer).
///
/// Each server subscribes once; [`Shutdown::trigger`] wakes every subscriber.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Signal every subscriber. Subscribers that already exited are ignored.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Number of servers still waiting for the signal.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
