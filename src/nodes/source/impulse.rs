//! Single-sample impulse source

use crate::node::Generator;
use crate::sample::StereoSample;

/// Emits one sample of `value`, then silence until re-armed.
///
/// Useful for measuring impulse responses of modifiers and blocks.
pub struct Impulse {
    value: StereoSample,
    armed: bool,
}

impl Impulse {
    pub fn new(value: StereoSample) -> Self {
        Self { value, armed: true }
    }

    /// A unit impulse on both channels.
    pub fn unit() -> Self {
        Self::new(StereoSample::mono(1.0))
    }

    /// Fire again on the next pull.
    pub fn rearm(&mut self) {
        self.armed = true;
    }
}

impl Generator for Impulse {
    fn next_sample(&mut self) -> StereoSample {
        if core::mem::replace(&mut self.armed, false) {
            self.value
        } else {
            StereoSample::SILENCE
        }
    }
}
