//! Built-in nodes.
//!
//! Nodes are organized into two categories:
//!
//! ## Sources ([`source`])
//!
//! Generate samples with no input:
//! - [`Sine`] - Sine wave oscillator
//! - [`Impulse`] - One unit sample, then silence
//!
//! ## Effects ([`effect`])
//!
//! Transform an input sample (modifiers):
//! - [`LowPassFilter`] - Resonant third-order low-pass
//! - [`HighPassFilter`] - Resonant third-order high-pass
//! - [`Gain`] - Smoothed volume control with mute
//!
//! # Named Methods
//!
//! Every modifier exposes its setters by name, so hosts can drive any of them
//! through [`ModifierNode`] without knowing the concrete type:
//! - [`LowPassFilter`], [`HighPassFilter`] - `SetCutoff(Float)`, `SetResonance(Float)`
//! - [`Gain`] - `SetGain(Float)`, `SetMuted(Bool)`

pub mod effect;
pub mod source;

// Re-export common types at the top level for convenience
pub use effect::{Gain, HighPassFilter, LowPassFilter};
pub use source::{Impulse, Sine};

use crate::error::ModifierError;
use crate::method::{MethodView, Param};
use crate::node::Modifier;
use crate::sample::StereoSample;

/// The closed set of modifier kinds.
pub enum ModifierNode {
    LowPass(LowPassFilter),
    HighPass(HighPassFilter),
    Gain(Gain),
}

impl ModifierNode {
    /// Short name of the variant, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ModifierNode::LowPass(_) => "low-pass",
            ModifierNode::HighPass(_) => "high-pass",
            ModifierNode::Gain(_) => "gain",
        }
    }
}

impl Modifier for ModifierNode {
    fn filter_sample(&mut self, input: StereoSample) -> StereoSample {
        match self {
            ModifierNode::LowPass(m) => m.filter_sample(input),
            ModifierNode::HighPass(m) => m.filter_sample(input),
            ModifierNode::Gain(m) => m.filter_sample(input),
        }
    }

    fn methods(&self) -> MethodView<'_> {
        match self {
            ModifierNode::LowPass(m) => m.methods(),
            ModifierNode::HighPass(m) => m.methods(),
            ModifierNode::Gain(m) => m.methods(),
        }
    }

    fn invoke_at(&mut self, index: usize, param: Param) -> Result<(), ModifierError> {
        match self {
            ModifierNode::LowPass(m) => m.invoke_at(index, param),
            ModifierNode::HighPass(m) => m.invoke_at(index, param),
            ModifierNode::Gain(m) => m.invoke_at(index, param),
        }
    }

    fn clear(&mut self) {
        match self {
            ModifierNode::LowPass(m) => m.clear(),
            ModifierNode::HighPass(m) => m.clear(),
            ModifierNode::Gain(m) => m.clear(),
        }
    }
}

impl From<LowPassFilter> for ModifierNode {
    fn from(m: LowPassFilter) -> Self {
        ModifierNode::LowPass(m)
    }
}

impl From<HighPassFilter> for ModifierNode {
    fn from(m: HighPassFilter) -> Self {
        ModifierNode::HighPass(m)
    }
}

impl From<Gain> for ModifierNode {
    fn from(m: Gain) -> Self {
        ModifierNode::Gain(m)
    }
}
