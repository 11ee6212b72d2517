/*
Periodic Waveforms from Fourier Coefficients
============================================

Any periodic tone can be described as a sum of harmonics. Given two
coefficient sequences of the same length, `sine` (b) and `cosine` (a), one
cycle of the waveform is

    x in [0, 1)
    w(x) = Σ  a[k]·cos(2πkx) + b[k]·sin(2πkx)      for k = 1 .. len-1

Index 0 is the DC term. It would only shift the wave off centre, so it is
ignored, the same way a browser's PeriodicWave ignores it.

Example
-------

    sine   = [0, 0, 1, 0, 1]
    cosine = [0, 0, 0, 0, 0]

has energy at the 2nd and 4th harmonics only. Played at C4 (261.6 Hz) you
hear 523.3 Hz and 1046.5 Hz: an octave-up organ-like tone with no
fundamental.

Normalization
-------------

The raw sum can peak well above 1.0 (five harmonics in phase peak at 5.0).
The table is scaled so its largest absolute sample is exactly 1.0, which keeps
a custom waveform at the same loudness as the built-in shapes. A table whose
coefficients are all zero stays silent instead of being divided by zero.

The cycle is stored once as a `TABLE_SIZE`-point table and read with linear
interpolation. Harmonics at or above TABLE_SIZE / 2 cannot be represented
and are dropped.
*/

use std::f64::consts::TAU;

/// Points in one stored cycle.
pub const TABLE_SIZE: usize = 2048;

/// One normalized cycle of a custom waveform.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodicWave {
    table: Box<[f32]>,
}

impl PeriodicWave {
    /// Build the table from sine (b) and cosine (a) terms.
    ///
    /// Callers validate lengths; extra terms on the longer side are ignored.
    pub fn from_terms(sine: &[f32], cosine: &[f32]) -> Self {
        let harmonics = sine.len().min(cosine.len()).min(TABLE_SIZE / 2);

        let mut table: Vec<f32> = (0..TABLE_SIZE)
            .map(|i| {
                let x = i as f64 / TABLE_SIZE as f64;
                (1..harmonics)
                    .map(|k| {
                        let angle = TAU * k as f64 * x;
                        cosine[k] as f64 * angle.cos() + sine[k] as f64 * angle.sin()
                    })
                    .sum::<f64>() as f32
            })
            .collect();

        let peak = table.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
        if peak > 0.0 {
            for sample in table.iter_mut() {
                *sample /= peak;
            }
        }

        Self {
            table: table.into_boxed_slice(),
        }
    }

    /// Sample at `phase` in [0, 1), linearly interpolated.
    #[inline]
    pub fn sample(&self, phase: f32) -> f32 {
        let position = phase * TABLE_SIZE as f32;
        let index = position as usize % TABLE_SIZE;
        let frac = position - position.floor();
        let a = self.table[index];
        let b = self.table[(index + 1) % TABLE_SIZE];
        a + (b - a) * frac
    }

    pub fn is_silent(&self) -> bool {
        self.table.iter().all(|&s| s == 0.0)
    }
}
