use std::collections::HashMap;

use super::VoiceError;
use crate::output::{AudioOutput, VoiceHandle};
use crate::pitch::{KeyId, PitchTable};
use crate::tone::{ToneConfig, WaveformSpec};

/// One sounding tone, tied to a key.
///
/// The waveform is captured when the voice is created; changing the selector
/// afterwards does not touch voices that are already sounding.
#[derive(Debug, Clone)]
pub struct Voice {
    pub key: KeyId,
    pub frequency: f64,
    pub waveform: WaveformSpec,
    pub handle: VoiceHandle,
}

/// Live voices by key, plus the output they were created on.
///
/// A key has zero or one live voice. Every successful `start` is matched by
/// exactly one `stop_voice` on the output, issued by `stop` or `stop_all`.
pub struct VoiceRegistry<O: AudioOutput> {
    voices: HashMap<KeyId, Voice>,
    output: O,
}

impl<O: AudioOutput> VoiceRegistry<O> {
    pub fn new(output: O) -> Self {
        Self {
            voices: HashMap::new(),
            output,
        }
    }

    /// Start a voice for `key`, or return the one already sounding.
    ///
    /// Nothing is recorded unless the output accepted both the create and the
    /// start.
    pub fn start(
        &mut self,
        key: KeyId,
        pitch: &PitchTable,
        tone: &ToneConfig,
    ) -> Result<VoiceHandle, VoiceError> {
        if let Some(voice) = self.voices.get(&key) {
            return Ok(voice.handle);
        }

        let frequency = pitch.frequency(key)?;
        let waveform = tone.current_waveform();

        let handle = self.output.create_voice(frequency, &waveform)?;
        if let Err(err) = self.output.start_voice(handle) {
            self.output.stop_voice(handle);
            return Err(err.into());
        }

        tracing::debug!(%key, %handle, frequency, waveform = %waveform.kind(), "voice started");
        self.voices.insert(
            key,
            Voice {
                key,
                frequency,
                waveform,
                handle,
            },
        );
        Ok(handle)
    }

    /// Stop the voice for `key`. Returns false if none was sounding.
    pub fn stop(&mut self, key: KeyId) -> bool {
        let Some(voice) = self.voices.remove(&key) else {
            return false;
        };
        self.output.stop_voice(voice.handle);
        tracing::debug!(%key, handle = %voice.handle, "voice stopped");
        true
    }

    /// Stop every live voice. Returns how many were stopped.
    pub fn stop_all(&mut self) -> usize {
        let count = self.voices.len();
        for (_, voice) in self.voices.drain() {
            self.output.stop_voice(voice.handle);
        }
        if count > 0 {
            tracing::debug!(count, "all voices stopped");
        }
        count
    }

    pub fn is_live(&self, key: KeyId) -> bool {
        self.voices.contains_key(&key)
    }

    pub fn handle(&self, key: KeyId) -> Option<VoiceHandle> {
        self.voices.get(&key).map(|v| v.handle)
    }

    pub fn voice(&self, key: KeyId) -> Option<&Voice> {
        self.voices.get(&key)
    }

    pub fn live_count(&self) -> usize {
        self.voices.len()
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }
}
