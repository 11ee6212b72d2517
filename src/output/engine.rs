use super::message::{MessageReceiver, ToneMessage};
use super::slot::VoiceSlot;
use super::MasterGain;
use crate::dsp::amplify::{apply_gain, clamp_unit, mix_into};
use crate::dsp::Shape;
use crate::MAX_BLOCK_SIZE;

/// Level each voice is summed at before the master gain.
pub const VOICE_LEVEL: f32 = 0.25;

/// Audio-thread side of the instrument.
///
/// Owns a fixed pool of voice slots, applies queued commands at the top of
/// every block, and renders the sounding voices through the master gain.
/// Nothing here allocates or frees after construction: wavetables of freed
/// voices go back through [`MessageReceiver::retire`].
pub struct ToneEngine<R: MessageReceiver> {
    slots: Vec<VoiceSlot>,
    rx: R,
    gain: MasterGain,
    sample_rate: f32,
    temp_buffer: Vec<f32>,
}

impl<R: MessageReceiver> ToneEngine<R> {
    pub fn new(sample_rate: f32, max_voices: usize, rx: R, gain: MasterGain) -> Self {
        Self {
            slots: (0..max_voices).map(|_| VoiceSlot::new()).collect(),
            rx,
            gain,
            sample_rate,
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    /// Drain pending commands, then overwrite `out` with the mixed voices.
    pub fn render_block(&mut self, out: &mut [f32]) {
        self.process_messages();

        for block in out.chunks_mut(MAX_BLOCK_SIZE) {
            block.fill(0.0);
            for slot in self.slots.iter_mut().filter(|s| s.is_sounding()) {
                let frames = &mut self.temp_buffer[..block.len()];
                slot.render(frames, self.sample_rate);
                mix_into(block, frames, VOICE_LEVEL);
            }
            apply_gain(block, self.gain.get());
            clamp_unit(block);
        }
    }

    fn process_messages(&mut self) {
        while let Some(msg) = self.rx.pop() {
            match msg {
                ToneMessage::Create {
                    handle,
                    frequency,
                    waveform,
                } => {
                    // The sender never creates past capacity; a full pool drops the voice.
                    let shape = waveform.into_shape();
                    match self.slots.iter().position(VoiceSlot::is_free) {
                        Some(index) => self.slots[index].claim(handle, frequency, shape),
                        None => self.retire(shape),
                    }
                }
                ToneMessage::Start { handle } => {
                    if let Some(slot) = self.find_slot(handle) {
                        slot.start();
                    }
                }
                ToneMessage::Stop { handle } => {
                    if let Some(shape) = self.find_slot(handle).map(VoiceSlot::free) {
                        self.retire(shape);
                    }
                }
            }
        }
    }

    fn retire(&mut self, shape: Shape) {
        if let Shape::Periodic(wave) = shape {
            self.rx.retire(wave);
        }
    }

    fn find_slot(&mut self, handle: super::VoiceHandle) -> Option<&mut VoiceSlot> {
        self.slots.iter_mut().find(|s| s.handle() == Some(handle))
    }

    /// Voices currently producing sound.
    pub fn active_voices(&self) -> usize {
        self.slots.iter().filter(|s| s.is_sounding()).count()
    }

    /// Slots claimed by a handle, sounding or not.
    pub fn allocated_voices(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_free()).count()
    }

    pub fn is_sounding(&self, handle: super::VoiceHandle) -> bool {
        self.slots
            .iter()
            .any(|s| s.handle() == Some(handle) && s.is_sounding())
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}
