//! Resolution Events
//!
//! Broadcast channel that lets independent consumers react when a
//! resolution finishes, instead of sharing mutable state.

use crate::domain::entities::Address;
use crate::domain::value_objects::Coordinates;
use tokio::sync::broadcast;

/// Default capacity of the event channel. Slow subscribers skip old events.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Published once per resolution performed by the service.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionEvent {
    Resolved { base: Coordinates, address: Address },
    Failed { base: Coordinates, reason: String },
}

impl ResolutionEvent {
    pub fn base(&self) -> Coordinates {
        match self {
            Self::Resolved { base, .. } | Self::Failed { base, .. } => *base,
        }
    }
}

/// Publisher side of the event channel.
#[derive(Clone)]
pub struct ResolutionEvents {
    tx: broadcast::Sender<ResolutionEvent>,
}

impl ResolutionEvents {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ResolutionEvent> {
        self.tx.subscribe()
    }

    /// Publish an event. Having no subscriber is not an error.
    pub fn publish(&self, event: ResolutionEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ResolutionEvents {
    fn default() -> Self {
        Self::new(EVENT_CHANNEL_CAPACITY)
    }
}
