/*
Tone Oscillator
===============

Every voice on the keyboard is one oscillator: a phase accumulator that walks
from 0.0 to 1.0 once per cycle and a shaping function that turns the phase
into a sample.

    phase += frequency / sample_rate      (wrap back into 0.0..1.0)
    sample = shape(phase)

Shapes
------

All shapes start at zero and rise, so a freshly started voice does not begin
with a step.

    sine       sin(2π·phase)                       pure fundamental
    sawtooth   2·frac(phase + 0.5) − 1             all harmonics, 1/n
    square     +1 for the first half, −1 after     odd harmonics, 1/n
    triangle   2·|2·frac(phase + 0.75) − 1| − 1    odd harmonics, 1/n²
    periodic   wavetable lookup                    whatever the coefficients say

The periodic shape reads a `PeriodicWave`, a single-cycle table built from
Fourier coefficients (see `dsp/periodic.rs`). The table is shared with `Arc`
so the same custom waveform can back every voice without copying it.

The basic shapes are generated naively (no band-limiting). Within the
playable octaves the aliased partials sit far below the fundamental.
*/

use std::f32::consts::TAU;
use std::sync::Arc;

use super::periodic::PeriodicWave;

/// Waveform an oscillator renders.
#[derive(Debug, Clone)]
pub enum Shape {
    Sine,
    Sawtooth,
    Square,
    Triangle,
    Periodic(Arc<PeriodicWave>),
}

pub struct OscillatorBlock {
    shape: Shape,
    phase: f32,
}

impl OscillatorBlock {
    pub fn new(shape: Shape) -> Self {
        Self { shape, phase: 0.0 }
    }

    pub fn sine() -> Self {
        Self::new(Shape::Sine)
    }

    pub fn sawtooth() -> Self {
        Self::new(Shape::Sawtooth)
    }

    pub fn square() -> Self {
        Self::new(Shape::Square)
    }

    pub fn triangle() -> Self {
        Self::new(Shape::Triangle)
    }

    pub fn periodic(wave: Arc<PeriodicWave>) -> Self {
        Self::new(Shape::Periodic(wave))
    }

    /// Swap the waveform and restart the cycle.
    pub fn set_shape(&mut self, shape: Shape) {
        self.shape = shape;
        self.reset();
    }

    /// Take the current shape out, leaving a sine in its place.
    ///
    /// Lets the caller decide where a shared wavetable is dropped.
    pub fn take_shape(&mut self) -> Shape {
        self.reset();
        std::mem::replace(&mut self.shape, Shape::Sine)
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Overwrite `out` with the next `out.len()` samples at `frequency` Hz.
    pub fn render(&mut self, out: &mut [f32], sample_rate: f32, frequency: f32) {
        let increment = frequency / sample_rate;
        let mut phase = self.phase;

        match &self.shape {
            Shape::Sine => {
                for sample in out.iter_mut() {
                    *sample = (TAU * phase).sin();
                    phase = advance(phase, increment);
                }
            }
            Shape::Sawtooth => {
                for sample in out.iter_mut() {
                    *sample = 2.0 * (phase + 0.5).fract() - 1.0;
                    phase = advance(phase, increment);
                }
            }
            Shape::Square => {
                for sample in out.iter_mut() {
                    *sample = if phase < 0.5 { 1.0 } else { -1.0 };
                    phase = advance(phase, increment);
                }
            }
            Shape::Triangle => {
                for sample in out.iter_mut() {
                    *sample = 2.0 * (2.0 * (phase + 0.75).fract() - 1.0).abs() - 1.0;
                    phase = advance(phase, increment);
                }
            }
            Shape::Periodic(wave) => {
                for sample in out.iter_mut() {
                    *sample = wave.sample(phase);
                    phase = advance(phase, increment);
                }
            }
        }

        self.phase = phase;
    }
}

#[inline]
fn advance(phase: f32, increment: f32) -> f32 {
    let next = phase + increment;
    next - next.floor()
}
