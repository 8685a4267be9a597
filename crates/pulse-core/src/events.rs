/// Event bus — tokio broadcast channel carrying SessionEvents.
///
/// The orchestrator publishes here; the TUI subscribes and drains the
/// receiver once per frame to pick up stream deltas and notices.

use tokio::sync::broadcast;

use pulse_types::event::SessionEvent;

const BUS_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<SessionEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(BUS_CAPACITY);
        Self { sender }
    }

    /// Subscribe to receive future events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    /// Publish an event to all current subscribers.
    /// Silently drops the event if there are no subscribers.
    pub fn send(&self, event: SessionEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
