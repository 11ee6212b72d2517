use super::VoiceHandle;
use crate::dsp::{OscillatorBlock, Shape};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Free,     // Available for a new voice
    Created,  // Claimed by a handle, not yet sounding
    Sounding, // Rendering into the bus
}

/// One preallocated voice slot on the audio side.
pub struct VoiceSlot {
    handle: Option<VoiceHandle>,
    state: SlotState,
    frequency: f32,
    osc: OscillatorBlock,
}

impl VoiceSlot {
    pub fn new() -> Self {
        Self {
            handle: None,
            state: SlotState::Free,
            frequency: 0.0,
            osc: OscillatorBlock::sine(),
        }
    }

    pub fn claim(&mut self, handle: VoiceHandle, frequency: f32, shape: Shape) {
        self.handle = Some(handle);
        self.state = SlotState::Created;
        self.frequency = frequency;
        self.osc.set_shape(shape);
    }

    pub fn start(&mut self) {
        if self.state == SlotState::Created {
            self.state = SlotState::Sounding;
        }
    }

    /// Release the slot. Returns the shape it was playing so a shared
    /// wavetable is not dropped here.
    pub fn free(&mut self) -> Shape {
        self.handle = None;
        self.state = SlotState::Free;
        self.frequency = 0.0;
        self.osc.take_shape()
    }

    pub fn render(&mut self, out: &mut [f32], sample_rate: f32) {
        self.osc.render(out, sample_rate, self.frequency);
    }

    pub fn handle(&self) -> Option<VoiceHandle> {
        self.handle
    }

    pub fn state(&self) -> SlotState {
        self.state
    }

    pub fn is_free(&self) -> bool {
        self.state == SlotState::Free
    }

    pub fn is_sounding(&self) -> bool {
        self.state == SlotState::Sounding
    }
}

impl Default for VoiceSlot {
    fn default() -> Self {
        Self::new()
    }
}
