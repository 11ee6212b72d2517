use std::sync::Arc;

use super::{CustomWaveform, ToneError, WaveformKind, WaveformSpec};
use crate::dsp::PeriodicWave;

/// Gain used when nothing else is configured.
pub const DEFAULT_GAIN: f32 = 0.5;

/// Current waveform selection and master gain.
///
/// Read on demand (pull model): the voice registry asks for the waveform at
/// the moment a key starts, so the selector never needs to notify anyone.
#[derive(Debug, Clone)]
pub struct ToneConfig {
    kind: WaveformKind,
    custom: CustomWaveform,
    custom_wave: Arc<PeriodicWave>,
    gain: f32,
}

impl ToneConfig {
    pub fn new(kind: WaveformKind, gain: f32) -> Result<Self, ToneError> {
        let mut config = Self {
            kind,
            ..Self::default()
        };
        config.set_gain(gain)?;
        Ok(config)
    }

    /// Waveform a voice started now would use.
    pub fn current_waveform(&self) -> WaveformSpec {
        match self.kind {
            WaveformKind::Sine => WaveformSpec::Sine,
            WaveformKind::Square => WaveformSpec::Square,
            WaveformKind::Sawtooth => WaveformSpec::Sawtooth,
            WaveformKind::Triangle => WaveformSpec::Triangle,
            WaveformKind::Custom => WaveformSpec::Custom(Arc::clone(&self.custom_wave)),
        }
    }

    pub fn current_gain(&self) -> f32 {
        self.gain
    }

    pub fn kind(&self) -> WaveformKind {
        self.kind
    }

    pub fn custom(&self) -> &CustomWaveform {
        &self.custom
    }

    pub fn select(&mut self, kind: WaveformKind) {
        self.kind = kind;
    }

    /// Replace the custom waveform definition.
    ///
    /// Coefficients are validated here, so a bad definition is reported when
    /// it is configured rather than when a key is pressed.
    pub fn set_custom(&mut self, sine: Vec<f32>, cosine: Vec<f32>) -> Result<(), ToneError> {
        let custom = CustomWaveform::new(sine, cosine)?;
        self.custom_wave = Arc::new(custom.build());
        self.custom = custom;
        Ok(())
    }

    /// Store a new gain, clamped to [0, 1]. Returns the stored value.
    pub fn set_gain(&mut self, gain: f32) -> Result<f32, ToneError> {
        if !gain.is_finite() {
            return Err(ToneError::InvalidGain(gain));
        }
        self.gain = gain.clamp(0.0, 1.0);
        Ok(self.gain)
    }
}

impl Default for ToneConfig {
    fn default() -> Self {
        let custom = CustomWaveform::default();
        Self {
            kind: WaveformKind::default(),
            custom_wave: Arc::new(custom.build()),
            custom,
            gain: DEFAULT_GAIN,
        }
    }
}
