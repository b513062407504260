//! Event handling types for the TUI.

/// Whether a widget used a key event.
///
/// Widgets return this from `handle_key_event` so the caller knows whether
/// to offer the key to the next handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStatus {
    Consumed,
    NotConsumed,
}

impl EventStatus {
    pub fn is_consumed(self) -> bool {
        self == EventStatus::Consumed
    }
}
