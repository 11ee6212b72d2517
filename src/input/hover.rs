use super::{Buttons, PointerEvent};
use crate::pitch::KeyId;

/// Turns "the pointer is now over this key" into per-key enter/leave events.
///
/// Terminals and canvases report raw pointer positions, not element
/// boundaries. The tracker remembers the key under the pointer and emits the
/// boundary events a key element would have received. When the pointer moves
/// between keys the Leave for the old key comes before the Enter for the new.
#[derive(Debug, Default)]
pub struct HoverTracker {
    current: Option<KeyId>,
}

impl HoverTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The key under the pointer, if any.
    pub fn current(&self) -> Option<KeyId> {
        self.current
    }

    /// Move the pointer. `over` is the key now under it; `buttons` are held.
    pub fn update(&mut self, over: Option<KeyId>, buttons: Buttons) -> Vec<(KeyId, PointerEvent)> {
        if over == self.current {
            return Vec::new();
        }
        let mut events = Vec::with_capacity(2);
        if let Some(prev) = self.current {
            events.push((prev, PointerEvent::leave(buttons)));
        }
        if let Some(next) = over {
            events.push((next, PointerEvent::enter(buttons)));
        }
        self.current = over;
        events
    }

    /// Primary button pressed at `over`.
    pub fn down(&mut self, over: Option<KeyId>) -> Vec<(KeyId, PointerEvent)> {
        let mut events = self.update(over, Buttons::PRIMARY);
        if let Some(key) = over {
            events.push((key, PointerEvent::down()));
        }
        events
    }

    /// Buttons released at `over`.
    pub fn up(&mut self, over: Option<KeyId>) -> Vec<(KeyId, PointerEvent)> {
        let mut events = self.update(over, Buttons::NONE);
        if let Some(key) = over {
            events.push((key, PointerEvent::up()));
        }
        events
    }
}
