//! Low-level DSP primitives used by the tone engine.
//!
//! These components are allocation-free once built and realtime-safe, making
//! them safe to embed directly inside voice slots. They stay focused on the
//! signal math; scheduling and voice bookkeeping live in `output`.

/// Gain, summing and clamping for the voice bus.
pub mod amplify;
/// Phase-accumulating oscillator with the built-in shapes.
pub mod oscillator;
/// Single-cycle wavetables built from Fourier coefficients.
pub mod periodic;

pub use oscillator::{OscillatorBlock, Shape};
pub use periodic::PeriodicWave;
