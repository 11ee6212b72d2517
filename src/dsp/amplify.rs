//! Gain and summing primitives for the voice bus.

/*
Gain and the Voice Bus
======================

Every sounding key renders into its own scratch block. The engine then sums
those blocks onto one bus and scales the bus by the master volume.

    bus[i]  = Σ voice_level · voice[i]          for every sounding voice
    out[i]  = clamp(master_gain · bus[i], −1, 1)

Vocabulary
----------

  gain          A multiplier applied to amplitude.
                  gain = 1.0  →  unchanged (unity gain)
                  gain < 1.0  →  quieter (attenuation)
                  gain = 0.0  →  silence

  headroom      Space left below full scale so several voices can be summed
                without clipping. Ten full-scale voices in phase would reach
                10.0; a fixed per-voice level keeps typical chords in range.

  clipping      Samples beyond ±1.0 cannot be reproduced by the device. The
                final clamp makes overload audible as distortion instead of
                wrapping or undefined behaviour in the driver.

Decibels
--------

Volume sliders are linear here (0.0 to 1.0), as the browser gain node they
replace was. For reference:

    ×1.0   =   0 dB
    ×0.5   =  −6 dB
    ×0.3   = −10.5 dB
    ×0.1   = −20 dB
*/

/// Multiply a signal by a constant gain factor (in-place).
#[inline]
pub fn apply_gain(signal: &mut [f32], gain: f32) {
    for sample in signal.iter_mut() {
        *sample *= gain;
    }
}

/// Add `source · level` onto `bus`.
#[inline]
pub fn mix_into(bus: &mut [f32], source: &[f32], level: f32) {
    debug_assert_eq!(bus.len(), source.len());

    for (b, &s) in bus.iter_mut().zip(source.iter()) {
        *b += s * level;
    }
}

/// Hard-limit a block to the device's [−1, 1] range.
#[inline]
pub fn clamp_unit(signal: &mut [f32]) {
    for sample in signal.iter_mut() {
        *sample = sample.clamp(-1.0, 1.0);
    }
}

/// Peak absolute sample of a block.
#[inline]
pub fn peak(signal: &[f32]) -> f32 {
    signal.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_gain() {
        let mut signal = [1.0, 0.5, -0.5, -1.0];
        apply_gain(&mut signal, 0.5);
        assert_eq!(signal, [0.5, 0.25, -0.25, -0.5]);
    }

    #[test]
    fn test_zero_gain_silences() {
        let mut signal = [0.3, -0.7, 0.5];
        apply_gain(&mut signal, 0.0);
        assert_eq!(signal, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_mix_into_accumulates() {
        let mut bus = [0.0; 3];
        mix_into(&mut bus, &[1.0, -1.0, 0.5], 0.5);
        mix_into(&mut bus, &[1.0, 1.0, 0.5], 0.5);
        assert_eq!(bus, [1.0, 0.0, 0.5]);
    }

    #[test]
    fn test_clamp_unit() {
        let mut signal = [2.0, -3.0, 0.25];
        clamp_unit(&mut signal);
        assert_eq!(signal, [1.0, -1.0, 0.25]);
    }

    #[test]
    fn test_peak() {
        assert_eq!(peak(&[0.1, -0.8, 0.5]), 0.8);
        assert_eq!(peak(&[]), 0.0);
    }
}
