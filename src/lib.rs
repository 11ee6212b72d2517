pub mod dsp;
pub mod input; // Pointer events and per-key state
pub mod output; // Control-to-audio bridge and the tone engine
pub mod pitch; // Note names and the frequency table
pub mod session;
pub mod tone; // Waveform selection and gain
pub mod voice; // Live voices by key

pub use input::{Buttons, HoverTracker, InputStateMachine, PointerEvent, PointerKind, Transition};
pub use output::{AudioOutput, MasterGain, OutputError, ToneEngine, VoiceHandle};
pub use pitch::{KeyId, NoteName, PitchError, PitchTable};
pub use session::Session;
pub use tone::{CustomWaveform, ToneConfig, ToneError, WaveformKind, WaveformSpec};
pub use voice::{VoiceError, VoiceRegistry};

#[cfg(feature = "rtrb")]
pub use output::{channel, RingEngine, RingOutput};

pub const MAX_BLOCK_SIZE: usize = 2048;
