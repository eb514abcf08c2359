//! Gain/volume control modifier

use crate::error::ModifierError;
use crate::method::{MethodTable, MethodView, Mutator, Param, ParamKind};
use crate::node::{Modifier, ProcessContext};
use crate::sample::StereoSample;

/// A gain (volume) control that scales both channels.
///
/// Gain changes are smoothed with a one-pole slide towards the target so that
/// automation does not click. Exposes `SetGain(Float)` and `SetMuted(Bool)`.
pub struct Gain {
    gain: f32,
    /// Smoothing to prevent clicks on rapid gain changes
    smoothed_gain: f32,
    /// Smoothing coefficient (0.0 = instant, 1.0 = no change)
    smooth_coeff: f32,
    muted: bool,
    methods: MethodTable<Self>,
}

impl Gain {
    /// Create a new gain node with the specified gain value
    pub fn new(gain: f32) -> Result<Self, ModifierError> {
        if !gain.is_finite() {
            return Err(ModifierError::InvalidParameter { name: "gain", value: gain as f64 });
        }

        Ok(Self {
            gain,
            smoothed_gain: gain,
            smooth_coeff: 0.995, // ~5ms at 44.1kHz
            muted: false,
            methods: MethodTable::from_entries([
                ("SetGain", ParamKind::Float, Self::invoke_set_gain as Mutator<Self>),
                ("SetMuted", ParamKind::Bool, Self::invoke_set_muted as Mutator<Self>),
            ])?,
        })
    }

    /// Set the smoothing time in milliseconds
    pub fn with_smoothing_ms(mut self, ms: f32, ctx: &ProcessContext) -> Self {
        // Time constant: after `ms` milliseconds, we've reached ~63% of target
        let samples = (ms / 1000.0) * ctx.sample_rate as f32;
        self.smooth_coeff = if samples > 0.0 { (-1.0 / samples).exp() } else { 0.0 };
        self
    }

    /// Disable smoothing for instant gain changes
    pub fn without_smoothing(mut self) -> Self {
        self.smooth_coeff = 0.0;
        self
    }

    fn invoke_set_gain(&mut self, param: Param) -> Result<(), ModifierError> {
        match param {
            Param::Float(gain) => self.set_gain(gain as f32),
            other => Err(ModifierError::TypeMismatch {
                method: "SetGain",
                expected: ParamKind::Float,
                found: other.kind(),
            }),
        }
    }

    fn invoke_set_muted(&mut self, param: Param) -> Result<(), ModifierError> {
        match param {
            Param::Bool(muted) => {
                self.set_muted(muted);
                Ok(())
            }
            other => Err(ModifierError::TypeMismatch {
                method: "SetMuted",
                expected: ParamKind::Bool,
                found: other.kind(),
            }),
        }
    }

    /// Set the target gain (1.0 = unity, 0.0 = silence)
    pub fn set_gain(&mut self, gain: f32) -> Result<(), ModifierError> {
        if !gain.is_finite() {
            return Err(ModifierError::InvalidParameter { name: "gain", value: gain as f64 });
        }
        self.gain = gain;
        Ok(())
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    #[inline]
    pub fn gain(&self) -> f32 {
        self.gain
    }

    #[inline]
    pub fn is_muted(&self) -> bool {
        self.muted
    }
}

impl Modifier for Gain {
    fn filter_sample(&mut self, input: StereoSample) -> StereoSample {
        let target = if self.muted { 0.0 } else { self.gain };

        // Apply smoothing: gain moves toward target
        self.smoothed_gain = target + self.smooth_coeff * (self.smoothed_gain - target);
        input * self.smoothed_gain
    }

    fn methods(&self) -> MethodView<'_> {
        self.methods.view()
    }

    fn invoke_at(&mut self, index: usize, param: Param) -> Result<(), ModifierError> {
        let mutator = self.methods.checked_mutator(index, param)?;
        mutator(self, param)
    }

    fn clear(&mut self) {
        self.smoothed_gain = if self.muted { 0.0 } else { self.gain };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsmoothed_gain_is_immediate() {
        let mut gain = Gain::new(0.5).unwrap().without_smoothing();
        assert_eq!(gain.filter_sample(StereoSample::new(1.0, -1.0)), StereoSample::new(0.5, -0.5));

        gain.invoke("SetGain", Param::Float(2.0)).unwrap();
        assert_eq!(gain.filter_sample(StereoSample::mono(0.25)), StereoSample::mono(0.5));
    }

    #[test]
    fn smoothed_gain_glides_to_target() {
        let ctx = ProcessContext::new(48_000);
        let mut gain = Gain::new(0.0).unwrap().with_smoothing_ms(1.0, &ctx);
        gain.set_gain(1.0).unwrap();

        let first = gain.filter_sample(StereoSample::mono(1.0));
        assert!(first.left > 0.0 && first.left < 0.1);

        let mut last = first;
        for _ in 0..2_000 {
            last = gain.filter_sample(StereoSample::mono(1.0));
        }
        assert!((last.left - 1.0).abs() < 1e-3);
    }

    #[test]
    fn mute_through_method_table() {
        let mut gain = Gain::new(1.0).unwrap().without_smoothing();

        gain.invoke("SetMuted", Param::Bool(true)).unwrap();
        assert!(gain.is_muted());
        assert_eq!(gain.filter_sample(StereoSample::mono(1.0)), StereoSample::SILENCE);

        assert!(matches!(
            gain.invoke("SetMuted", Param::Float(1.0)),
            Err(ModifierError::TypeMismatch { method: "SetMuted", .. })
        ));
        assert!(gain.is_muted());
    }

    #[test]
    fn rejects_non_finite_gain() {
        assert!(Gain::new(f32::NAN).is_err());

        let mut gain = Gain::new(0.5).unwrap();
        assert!(gain.invoke("SetGain", Param::Float(f64::INFINITY)).is_err());
        assert_eq!(gain.gain(), 0.5);
    }
}
