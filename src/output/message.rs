use std::sync::Arc;

use super::VoiceHandle;
use crate::dsp::PeriodicWave;
use crate::tone::WaveformSpec;

/// Commands sent from the control thread to the tone engine.
#[derive(Debug, Clone)]
pub enum ToneMessage {
    /// Claim a voice slot for `handle`, silent until started.
    Create {
        handle: VoiceHandle,
        frequency: f32,
        waveform: WaveformSpec,
    },
    Start { handle: VoiceHandle },
    /// Silence the voice and free its slot.
    Stop { handle: VoiceHandle },
}

/// The engine's end of the control link.
pub trait MessageReceiver {
    fn pop(&mut self) -> Option<ToneMessage>;

    /// Hand back a wavetable no slot uses any more.
    ///
    /// The default drops it in place. The ring link sends it to the control
    /// thread instead, so the last reference is never released while rendering.
    fn retire(&mut self, wave: Arc<PeriodicWave>) {
        drop(wave);
    }
}
