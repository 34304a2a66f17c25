//! # Session Events
//!
//! One-way channel from the game session to whatever draws it.
//!
//! ```text
//! ┌─────────────┐      ┌─────────────┐      ┌─────────────┐
//! │ GameSession │─────>│  EventBus   │─────>│  Renderer   │
//! │  (logic)    │      │  (bounded)  │      │  (drawing)  │
//! └─────────────┘      └─────────────┘      └─────────────┘
//! ```
//!
//! The session never waits on the renderer: a full channel drops the event
//! and logs it.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use twenty48_core::{Grid, Position};

use crate::render::Overlay;

/// Default channel capacity.
pub const DEFAULT_CAPACITY: usize = 256;

/// Something the renderer should reflect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// The board or score changed; draw everything again.
    Redraw {
        /// Tiles after the change.
        grid: Grid,
        /// Current score.
        score: u64,
        /// Best score.
        high_score: u64,
        /// Most recent spawn.
        last_spawned: Option<Position>,
    },

    /// The game reached a terminal state.
    OverlayShown(Overlay),

    /// A new game removed the overlay.
    OverlayCleared,

    /// The debug controls were toggled.
    DebugPanel {
        /// New visibility.
        visible: bool,
    },
}

/// Bounded session-to-renderer channel.
pub struct EventBus {
    sender: Sender<GameEvent>,
    receiver: Receiver<GameEvent>,
}

impl EventBus {
    /// Creates a bus holding at most `capacity` undelivered events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity.max(1));
        Self { sender, receiver }
    }

    /// Creates a sender handle.
    #[must_use]
    pub fn sender(&self) -> EventSender {
        EventSender {
            sender: self.sender.clone(),
        }
    }

    /// Creates a receiver handle.
    #[must_use]
    pub fn receiver(&self) -> EventReceiver {
        EventReceiver {
            receiver: self.receiver.clone(),
        }
    }

    /// Creates a connected sender and receiver.
    #[must_use]
    pub fn create_pair(capacity: usize) -> (EventSender, EventReceiver) {
        let bus = Self::new(capacity);
        (bus.sender(), bus.receiver())
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Handle for sending events.
#[derive(Clone, Debug)]
pub struct EventSender {
    sender: Sender<GameEvent>,
}

impl EventSender {
    /// Sends an event without blocking.
    ///
    /// Returns `false` if the event was dropped.
    #[inline]
    pub fn send(&self, event: GameEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                tracing::warn!("event channel full, dropping {event:?}");
                false
            }
            // Headless sessions run without a renderer.
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Handle for receiving events.
#[derive(Clone, Debug)]
pub struct EventReceiver {
    receiver: Receiver<GameEvent>,
}

impl EventReceiver {
    /// Takes every pending event.
    #[inline]
    pub fn drain(&self) -> Vec<GameEvent> {
        self.receiver.try_iter().collect()
    }

    /// Takes one pending event.
    #[inline]
    pub fn try_recv(&self) -> Option<GameEvent> {
        self.receiver.try_recv().ok()
    }

    /// Number of pending events.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns true if events are pending.
    #[inline]
    #[must_use]
    pub fn has_events(&self) -> bool {
        !self.receiver.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_send_receive() {
        let (sender, receiver) = EventBus::create_pair(8);

        assert!(sender.send(GameEvent::DebugPanel { visible: true }));
        assert!(receiver.has_events());
        assert_eq!(
            receiver.try_recv(),
            Some(GameEvent::DebugPanel { visible: true })
        );
        assert_eq!(receiver.try_recv(), None);
    }

    #[test]
    fn test_drain_preserves_order() {
        let (sender, receiver) = EventBus::create_pair(8);
        sender.send(GameEvent::OverlayShown(Overlay::WON));
        sender.send(GameEvent::OverlayCleared);

        assert_eq!(receiver.pending_count(), 2);
        assert_eq!(
            receiver.drain(),
            vec![GameEvent::OverlayShown(Overlay::WON), GameEvent::OverlayCleared]
        );
        assert!(!receiver.has_events());
    }

    #[test]
    fn test_full_channel_drops_instead_of_blocking() {
        let (sender, receiver) = EventBus::create_pair(1);
        assert!(sender.send(GameEvent::OverlayCleared));
        assert!(!sender.send(GameEvent::OverlayCleared));
        assert_eq!(receiver.drain().len(), 1);
    }

    #[test]
    fn test_send_without_receiver_is_harmless() {
        let sender = EventBus::new(4).sender();
        assert!(!sender.send(GameEvent::OverlayCleared));
    }
}
