//! Core node traits and processing context.

use crate::error::ModifierError;
use crate::method::{MethodView, Param};
use crate::sample::StereoSample;

/// Sample rate used when none is configured explicitly.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Information every node needs to turn parameters into per-sample math.
///
/// Passed to node constructors. The sample rate is fixed for the lifetime of a
/// node; coefficients derived from it are cached.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProcessContext {
    /// Processing rate in Hz (e.g., 44100, 48000)
    pub sample_rate: u32,
}

impl ProcessContext {
    /// A context at `sample_rate` Hz. A rate of zero is clamped to 1 Hz so the
    /// sample period stays finite.
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate: sample_rate.max(1) }
    }

    /// Replace the sample rate, clamping zero to 1 Hz like [`new`](Self::new).
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate.max(1);
        self
    }

    /// Duration of one sample in seconds.
    #[inline]
    pub fn sample_period(&self) -> f64 {
        1.0 / self.sample_rate as f64
    }
}

impl Default for ProcessContext {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

/// A pull-based source of stereo samples.
///
/// Called once per tick; there is no backpressure.
pub trait Generator: Send + 'static {
    fn next_sample(&mut self) -> StereoSample;
}

impl Generator for Box<dyn Generator> {
    fn next_sample(&mut self) -> StereoSample {
        (**self).next_sample()
    }
}

/// A per-sample signal transform with named, runtime-invokable setters.
///
/// # Contract
///
/// - [`filter_sample`](Modifier::filter_sample) is deterministic: the same
///   input and the same internal state give the same output. It never
///   allocates, blocks or fails.
/// - Every setter, whether called directly or through [`invoke`](Modifier::invoke),
///   re-derives cached coefficients before it returns. A setter that fails
///   leaves the previous parameters in effect.
/// - The methods listed by [`methods`](Modifier::methods) only ever mutate the
///   node they are invoked on.
///
/// ```
/// use resona::{Modifier, Param, ProcessContext, StereoSample};
/// use resona::nodes::LowPassFilter;
///
/// let ctx = ProcessContext::default();
/// let mut lpf = LowPassFilter::new(&ctx, 1_000.0, 0.0).unwrap();
///
/// // A host that only knows "some modifier" can still sweep the cutoff
/// lpf.invoke("SetCutoff", Param::Float(2_000.0)).unwrap();
/// let out = lpf.filter_sample(StereoSample::mono(1.0));
/// assert!(out.is_finite());
/// ```
pub trait Modifier: Send + 'static {
    /// Transform one input sample.
    fn filter_sample(&mut self, input: StereoSample) -> StereoSample;

    /// Read-only listing of the node's named setters.
    fn methods(&self) -> MethodView<'_>;

    /// Call a setter by its index in [`methods`](Modifier::methods).
    fn invoke_at(&mut self, index: usize, param: Param) -> Result<(), ModifierError>;

    /// Call a setter by name.
    fn invoke(&mut self, name: &str, param: Param) -> Result<(), ModifierError> {
        let call = self.methods().resolve(name, param)?;
        self.invoke_at(call.index, call.param)
    }

    /// Forget the signal history, keeping parameters.
    fn clear(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sample_rate_is_clamped() {
        let ctx = ProcessContext::new(0);
        assert_eq!(ctx.sample_rate, 1);
        assert_eq!(ctx.sample_period(), 1.0);

        assert_eq!(ProcessContext::default().with_sample_rate(0).sample_rate, 1);
        assert_eq!(ProcessContext::default().sample_rate, DEFAULT_SAMPLE_RATE);
    }
}
