/// Mouse buttons held while an event was delivered (bitmask, primary = 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Buttons(pub u8);

impl Buttons {
    pub const NONE: Buttons = Buttons(0);
    pub const PRIMARY: Buttons = Buttons(1);
    pub const SECONDARY: Buttons = Buttons(2);
    pub const MIDDLE: Buttons = Buttons(4);

    pub fn primary_held(self) -> bool {
        self.0 & Self::PRIMARY.0 != 0
    }

    pub fn with(self, other: Buttons) -> Buttons {
        Buttons(self.0 | other.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Up,
    Enter,
    Leave,
}

/// A pointer event delivered to one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub buttons: Buttons,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, buttons: Buttons) -> Self {
        Self { kind, buttons }
    }

    /// Primary button pressed on the key.
    pub fn down() -> Self {
        Self::new(PointerKind::Down, Buttons::PRIMARY)
    }

    /// All buttons released over the key.
    pub fn up() -> Self {
        Self::new(PointerKind::Up, Buttons::NONE)
    }

    pub fn enter(buttons: Buttons) -> Self {
        Self::new(PointerKind::Enter, buttons)
    }

    pub fn leave(buttons: Buttons) -> Self {
        Self::new(PointerKind::Leave, buttons)
    }

    /// Down or enter with the primary button held: the key should sound.
    pub fn is_press(&self) -> bool {
        matches!(self.kind, PointerKind::Down | PointerKind::Enter) && self.buttons.primary_held()
    }

    /// Up or leave: the key should stop, whatever the buttons.
    pub fn is_release(&self) -> bool {
        matches!(self.kind, PointerKind::Up | PointerKind::Leave)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_bit_detected_among_others() {
        assert!(Buttons::PRIMARY.with(Buttons::MIDDLE).primary_held());
        assert!(!Buttons::SECONDARY.primary_held());
        assert!(!Buttons::NONE.primary_held());
    }

    #[test]
    fn classification() {
        assert!(PointerEvent::down().is_press());
        assert!(PointerEvent::enter(Buttons::PRIMARY).is_press());
        assert!(!PointerEvent::enter(Buttons::NONE).is_press());
        assert!(!PointerEvent::new(PointerKind::Down, Buttons::SECONDARY).is_press());
        assert!(PointerEvent::up().is_release());
        assert!(PointerEvent::leave(Buttons::PRIMARY).is_release());
        assert!(!PointerEvent::enter(Buttons::PRIMARY).is_release());
    }
}
