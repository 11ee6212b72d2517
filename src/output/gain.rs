use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Master volume shared between the control thread and the audio callback.
///
/// The value is an `f32` stored as raw bits in an atomic, so the audio side
/// reads the latest slider position every block without locking. Voices never
/// copy it; a change is heard on all of them at the next block.
#[derive(Debug, Clone)]
pub struct MasterGain(Arc<AtomicU32>);

impl MasterGain {
    pub fn new(gain: f32) -> Self {
        Self(Arc::new(AtomicU32::new(gain.to_bits())))
    }

    #[inline]
    pub fn get(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn set(&self, gain: f32) {
        self.0.store(gain.to_bits(), Ordering::Relaxed);
    }
}
