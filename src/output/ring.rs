use std::collections::VecDeque;
use std::sync::Arc;

use rtrb::{Consumer, Producer, RingBuffer};

use super::{
    AudioOutput, MasterGain, MessageReceiver, OutputError, ToneEngine, ToneMessage, VoiceHandle,
};
use crate::dsp::PeriodicWave;
use crate::tone::WaveformSpec;

/// Engine fed by a [`RingOutput`].
pub type RingEngine = ToneEngine<EngineLink>;

/// The engine's two ring ends: commands in, retired wavetables out.
pub struct EngineLink {
    commands: Consumer<ToneMessage>,
    retired: Producer<Arc<PeriodicWave>>,
}

impl MessageReceiver for EngineLink {
    fn pop(&mut self) -> Option<ToneMessage> {
        self.commands.pop().ok()
    }

    fn retire(&mut self, wave: Arc<PeriodicWave>) {
        // Sized like the command ring and drained ahead of every command.
        // Only a stalled control thread makes this drop in place.
        let _ = self.retired.push(wave);
    }
}

/// Control-thread side of the audio output.
///
/// Commands go to the [`ToneEngine`] over a lock-free ring and never block.
/// A stop that finds the ring full is parked and re-sent ahead of the next
/// command, so a released key can not leave its voice running. Wavetables
/// the engine is done with come back on a second ring and are dropped here.
pub struct RingOutput {
    tx: Producer<ToneMessage>,
    retired: Consumer<Arc<PeriodicWave>>,
    gain: MasterGain,
    next_handle: u32,
    live: usize,
    capacity: usize,
    parked: VecDeque<VoiceHandle>,
}

/// Build a connected output/engine pair.
///
/// `max_voices` sizes the engine's slot pool; the ring holds enough commands
/// for every slot to be created, started and stopped within one block.
pub fn channel(sample_rate: f32, max_voices: usize, gain: f32) -> (RingOutput, RingEngine) {
    let ring_size = (max_voices * 3).max(64);
    let (tx, commands) = RingBuffer::<ToneMessage>::new(ring_size);
    let (retired_tx, retired) = RingBuffer::<Arc<PeriodicWave>>::new(ring_size);
    let gain = MasterGain::new(gain);
    let output = RingOutput {
        tx,
        retired,
        gain: gain.clone(),
        next_handle: 0,
        live: 0,
        capacity: max_voices,
        parked: VecDeque::new(),
    };
    let link = EngineLink {
        commands,
        retired: retired_tx,
    };
    let engine = ToneEngine::new(sample_rate, max_voices, link, gain);
    (output, engine)
}

impl RingOutput {
    /// Drop retired wavetables, then re-send parked stops in order. Returns
    /// true once no stop remains parked.
    ///
    /// Every command flushes first; call this when idle so a parked stop does
    /// not wait for the next key.
    pub fn flush_parked(&mut self) -> bool {
        while self.retired.pop().is_ok() {}
        while let Some(&handle) = self.parked.front() {
            if self.tx.push(ToneMessage::Stop { handle }).is_err() {
                return false;
            }
            self.parked.pop_front();
        }
        true
    }

    pub fn master_gain(&self) -> &MasterGain {
        &self.gain
    }

    /// Voices created and not yet stopped.
    pub fn live_voices(&self) -> usize {
        self.live
    }

    pub fn parked_stops(&self) -> usize {
        self.parked.len()
    }
}

impl AudioOutput for RingOutput {
    fn create_voice(
        &mut self,
        frequency: f64,
        waveform: &WaveformSpec,
    ) -> Result<VoiceHandle, OutputError> {
        if !self.flush_parked() {
            return Err(OutputError::QueueFull);
        }
        if self.live >= self.capacity {
            return Err(OutputError::VoicesExhausted {
                capacity: self.capacity,
            });
        }
        // Leave room for the Start that follows.
        if self.tx.slots() < 2 {
            return Err(OutputError::QueueFull);
        }

        let handle = VoiceHandle(self.next_handle);
        self.tx
            .push(ToneMessage::Create {
                handle,
                frequency: frequency as f32,
                waveform: waveform.clone(),
            })
            .map_err(|_| OutputError::QueueFull)?;
        self.next_handle = self.next_handle.wrapping_add(1);
        self.live += 1;
        Ok(handle)
    }

    fn start_voice(&mut self, handle: VoiceHandle) -> Result<(), OutputError> {
        if !self.flush_parked() {
            return Err(OutputError::QueueFull);
        }
        self.tx
            .push(ToneMessage::Start { handle })
            .map_err(|_| OutputError::QueueFull)
    }

    fn stop_voice(&mut self, handle: VoiceHandle) {
        self.live = self.live.saturating_sub(1);
        if self.flush_parked() && self.tx.push(ToneMessage::Stop { handle }).is_ok() {
            return;
        }
        tracing::warn!(%handle, "command ring full, parking stop");
        self.parked.push_back(handle);
    }

    fn set_master_gain(&mut self, gain: f32) {
        self.gain.set(gain);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::amplify::peak;

    #[test]
    fn created_and_started_voice_sounds() {
        let (mut output, mut engine) = channel(48_000.0, 4, 1.0);
        let handle = output.create_voice(440.0, &WaveformSpec::Sine).unwrap();
        output.start_voice(handle).unwrap();

        let mut out = vec![0.0f32; 256];
        engine.render_block(&mut out);
        assert!(engine.is_sounding(handle));
        assert!(peak(&out) > 0.0);
    }

    #[test]
    fn handles_are_unique() {
        let (mut output, _engine) = channel(48_000.0, 4, 1.0);
        let a = output.create_voice(440.0, &WaveformSpec::Sine).unwrap();
        output.stop_voice(a);
        let b = output.create_voice(440.0, &WaveformSpec::Sine).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn capacity_is_enforced_on_control_side() {
        let (mut output, _engine) = channel(48_000.0, 2, 1.0);
        output.create_voice(220.0, &WaveformSpec::Sine).unwrap();
        let b = output.create_voice(330.0, &WaveformSpec::Sine).unwrap();
        assert_eq!(
            output.create_voice(440.0, &WaveformSpec::Sine),
            Err(OutputError::VoicesExhausted { capacity: 2 })
        );
        output.stop_voice(b);
        assert!(output.create_voice(440.0, &WaveformSpec::Sine).is_ok());
    }

    #[test]
    fn stop_on_full_ring_is_parked_then_delivered() {
        let (mut output, mut engine) = channel(48_000.0, 64, 1.0);
        let handle = output.create_voice(440.0, &WaveformSpec::Sine).unwrap();
        output.start_voice(handle).unwrap();

        // Fill the remaining ring with starts for the same handle.
        while output.tx.push(ToneMessage::Start { handle }).is_ok() {}

        output.stop_voice(handle);
        assert_eq!(output.parked_stops(), 1);

        let mut out = vec![0.0f32; 64];
        engine.render_block(&mut out);
        assert!(engine.is_sounding(handle));

        // The next command flushes the parked stop ahead of itself.
        output.set_master_gain(0.5);
        let next = output.create_voice(440.0, &WaveformSpec::Sine).unwrap();
        assert_eq!(output.parked_stops(), 0);

        engine.render_block(&mut out);
        assert!(!engine.is_sounding(handle));
        assert_eq!(engine.allocated_voices(), 1);
        output.stop_voice(next);
    }

    #[test]
    fn custom_table_is_released_on_the_control_side() {
        let (mut output, mut engine) = channel(48_000.0, 4, 1.0);
        let wave = Arc::new(PeriodicWave::from_terms(&[0.0, 1.0], &[0.0, 0.0]));
        let weak = Arc::downgrade(&wave);

        let handle = output
            .create_voice(440.0, &WaveformSpec::Custom(wave))
            .unwrap();
        output.start_voice(handle).unwrap();
        let mut out = vec![0.0f32; 64];
        engine.render_block(&mut out);
        assert!(peak(&out) > 0.0);

        // The engine frees the slot but the table travels back, still alive.
        output.stop_voice(handle);
        engine.render_block(&mut out);
        assert_eq!(engine.allocated_voices(), 0);
        assert!(weak.upgrade().is_some());

        assert!(output.flush_parked());
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn master_gain_is_shared_with_engine() {
        let (mut output, _engine) = channel(48_000.0, 4, 0.5);
        output.set_master_gain(0.3);
        assert_eq!(output.master_gain().get(), 0.3);
    }
}
