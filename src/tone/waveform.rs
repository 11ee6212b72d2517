use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::ToneError;
use crate::dsp::{PeriodicWave, Shape};

/// Waveform selector values, including the `custom` sentinel.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WaveformKind {
    #[default]
    Sine,
    Square,
    Sawtooth,
    Triangle,
    Custom,
}

impl WaveformKind {
    pub const ALL: [WaveformKind; 5] = [
        WaveformKind::Sine,
        WaveformKind::Square,
        WaveformKind::Sawtooth,
        WaveformKind::Triangle,
        WaveformKind::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WaveformKind::Sine => "sine",
            WaveformKind::Square => "square",
            WaveformKind::Sawtooth => "sawtooth",
            WaveformKind::Triangle => "triangle",
            WaveformKind::Custom => "custom",
        }
    }

    /// Next entry in selector order, wrapping around.
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|&k| k == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for WaveformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for WaveformKind {
    type Err = ToneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ToneError::UnknownWaveform(s.to_string()))
    }
}

/// Fourier definition of the custom waveform.
///
/// Both sequences always have the same length (at least two terms) and only
/// finite values; [`CustomWaveform::new`] is the only way to build one.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomWaveform {
    sine: Vec<f32>,
    cosine: Vec<f32>,
}

impl CustomWaveform {
    pub fn new(sine: Vec<f32>, cosine: Vec<f32>) -> Result<Self, ToneError> {
        if sine.len() != cosine.len() {
            return Err(ToneError::CoefficientMismatch {
                sine: sine.len(),
                cosine: cosine.len(),
            });
        }
        if sine.len() < 2 {
            return Err(ToneError::TooFewCoefficients(sine.len()));
        }
        if let Some(index) = sine
            .iter()
            .chain(cosine.iter())
            .position(|term| !term.is_finite())
        {
            return Err(ToneError::NonFiniteCoefficient(index % sine.len()));
        }
        Ok(Self { sine, cosine })
    }

    /// Sine terms with only the given harmonics set to `1.0`.
    pub fn harmonics(harmonics: &[usize]) -> Result<Self, ToneError> {
        let len = harmonics.iter().copied().max().unwrap_or(0) + 1;
        let mut sine = vec![0.0; len.max(2)];
        for &h in harmonics {
            sine[h] = 1.0;
        }
        let cosine = vec![0.0; sine.len()];
        Self::new(sine, cosine)
    }

    pub fn sine_terms(&self) -> &[f32] {
        &self.sine
    }

    pub fn cosine_terms(&self) -> &[f32] {
        &self.cosine
    }

    /// Render the normalized single-cycle table for this definition.
    pub fn build(&self) -> PeriodicWave {
        PeriodicWave::from_terms(&self.sine, &self.cosine)
    }
}

impl Default for CustomWaveform {
    /// Second and fourth harmonics, no fundamental.
    fn default() -> Self {
        Self {
            sine: vec![0.0, 0.0, 1.0, 0.0, 1.0],
            cosine: vec![0.0; 5],
        }
    }
}

/// Waveform handed to the output when a voice is created.
///
/// Cloning is cheap: the custom table is shared.
#[derive(Debug, Clone)]
pub enum WaveformSpec {
    Sine,
    Square,
    Sawtooth,
    Triangle,
    Custom(Arc<PeriodicWave>),
}

impl WaveformSpec {
    pub fn kind(&self) -> WaveformKind {
        match self {
            WaveformSpec::Sine => WaveformKind::Sine,
            WaveformSpec::Square => WaveformKind::Square,
            WaveformSpec::Sawtooth => WaveformKind::Sawtooth,
            WaveformSpec::Triangle => WaveformKind::Triangle,
            WaveformSpec::Custom(_) => WaveformKind::Custom,
        }
    }

    /// The oscillator shape, moving the shared table rather than cloning it.
    pub fn into_shape(self) -> Shape {
        match self {
            WaveformSpec::Sine => Shape::Sine,
            WaveformSpec::Square => Shape::Square,
            WaveformSpec::Sawtooth => Shape::Sawtooth,
            WaveformSpec::Triangle => Shape::Triangle,
            WaveformSpec::Custom(wave) => Shape::Periodic(wave),
        }
    }
}
