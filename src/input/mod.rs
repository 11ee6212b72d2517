//! Pointer events and the per-key press/release state machine.

mod event;
mod hover;
mod machine;

pub use event::{Buttons, PointerEvent, PointerKind};
pub use hover::HoverTracker;
pub use machine::{InputStateMachine, KeyPhase, KeyState, Transition};
