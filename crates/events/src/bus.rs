//! Publish/subscribe abstraction (mechanics only).
//!
//! Every subscriber receives its own copy of each published message
//! (broadcast semantics). Delivery is best-effort: a subscriber that has been
//! dropped is silently forgotten on the next publish.

use std::sync::mpsc::Receiver;

/// A subscription to a message stream.
///
/// ```ignore
/// let sub = bus.subscribe();
/// while let Ok(notice) = sub.try_recv() {
///     render(notice);
/// }
/// ```
///
/// Subscriptions are meant for a single consumer. Messages arrive in
/// publication order.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Drain everything currently queued without blocking.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}

/// Transport-agnostic pub/sub bus.
///
/// Used both for "list changed" notices from the sync store and for snapshot
/// fan-out inside the in-memory document store.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}
