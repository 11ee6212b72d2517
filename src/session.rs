//! The instrument session: pitch table, tone settings and live voices in one
//! owned context.
//!
//! Everything here runs on the single control thread. The input state
//! machine receives `&mut Session` with each event instead of reaching for
//! shared globals.

use crate::output::{AudioOutput, VoiceHandle};
use crate::pitch::{KeyId, PitchTable};
use crate::tone::{ToneConfig, ToneError, WaveformKind};
use crate::voice::{VoiceError, VoiceRegistry};

pub struct Session<O: AudioOutput> {
    pitch: PitchTable,
    tone: ToneConfig,
    voices: VoiceRegistry<O>,
}

impl<O: AudioOutput> Session<O> {
    /// Build a session and push the configured gain into `output`.
    pub fn new(pitch: PitchTable, tone: ToneConfig, mut output: O) -> Self {
        output.set_master_gain(tone.current_gain());
        Self {
            pitch,
            tone,
            voices: VoiceRegistry::new(output),
        }
    }

    pub fn start(&mut self, key: KeyId) -> Result<VoiceHandle, VoiceError> {
        self.voices.start(key, &self.pitch, &self.tone)
    }

    pub fn stop(&mut self, key: KeyId) -> bool {
        self.voices.stop(key)
    }

    pub fn stop_all(&mut self) -> usize {
        self.voices.stop_all()
    }

    /// Store a new master gain and apply it to the output immediately.
    pub fn set_gain(&mut self, gain: f32) -> Result<f32, ToneError> {
        let gain = self.tone.set_gain(gain)?;
        self.voices.output_mut().set_master_gain(gain);
        tracing::debug!(gain, "master gain");
        Ok(gain)
    }

    /// Select the waveform for voices started from now on.
    pub fn select_waveform(&mut self, kind: WaveformKind) {
        self.tone.select(kind);
        tracing::debug!(waveform = %kind, "waveform selected");
    }

    pub fn set_custom_waveform(
        &mut self,
        sine: Vec<f32>,
        cosine: Vec<f32>,
    ) -> Result<(), ToneError> {
        self.tone.set_custom(sine, cosine)
    }

    pub fn pitch(&self) -> &PitchTable {
        &self.pitch
    }

    pub fn tone(&self) -> &ToneConfig {
        &self.tone
    }

    pub fn voices(&self) -> &VoiceRegistry<O> {
        &self.voices
    }

    pub fn output(&self) -> &O {
        self.voices.output()
    }

    pub fn output_mut(&mut self) -> &mut O {
        self.voices.output_mut()
    }
}
