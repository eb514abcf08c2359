//! Resonant third-order high-pass filter

use crate::error::ModifierError;
use crate::method::{MethodTable, MethodView, Mutator, Param, ParamKind};
use crate::node::{Modifier, ProcessContext};
use crate::sample::StereoSample;

use super::iir::{narrow, widen, Coefficients, Frame, History};

/// The high-pass sibling of [`LowPassFilter`](super::LowPassFilter).
///
/// Shares the low-pass denominator (and so its feedback coefficients and
/// resonance behaviour) but feeds forward the third backward difference of
/// the input:
///
/// ```text
/// y[n] = g·(x[n] - 3x[n-1] + 3x[n-2] - x[n-3]) + c1·y[n-1] + c2·y[n-2] + c3·y[n-3]
/// ```
///
/// Exposes `SetCutoff(Float)` and `SetResonance(Float)`.
pub struct HighPassFilter {
    ctx: ProcessContext,
    cutoff: f64,
    resonance: f64,
    coefficients: Coefficients,
    inputs: History,
    outputs: History,
    non_finite: u32,
    methods: MethodTable<Self>,
}

impl HighPassFilter {
    pub fn new(ctx: &ProcessContext, cutoff: f64, resonance: f64) -> Result<Self, ModifierError> {
        let coefficients = Coefficients::derive(ctx, cutoff, resonance)?;

        Ok(Self {
            ctx: *ctx,
            cutoff,
            resonance,
            coefficients,
            inputs: History::new(),
            outputs: History::new(),
            non_finite: 0,
            methods: MethodTable::from_entries([
                ("SetCutoff", ParamKind::Float, Self::invoke_set_cutoff as Mutator<Self>),
                ("SetResonance", ParamKind::Float, Self::invoke_set_resonance as Mutator<Self>),
            ])?,
        })
    }

    fn invoke_set_cutoff(&mut self, param: Param) -> Result<(), ModifierError> {
        let cutoff = param.as_float().ok_or(ModifierError::TypeMismatch {
            method: "SetCutoff",
            expected: ParamKind::Float,
            found: param.kind(),
        })?;
        self.set_cutoff(cutoff)
    }

    fn invoke_set_resonance(&mut self, param: Param) -> Result<(), ModifierError> {
        let resonance = param.as_float().ok_or(ModifierError::TypeMismatch {
            method: "SetResonance",
            expected: ParamKind::Float,
            found: param.kind(),
        })?;
        self.set_resonance(resonance)
    }

    pub fn set_cutoff(&mut self, cutoff: f64) -> Result<(), ModifierError> {
        self.reset(cutoff, self.resonance)
    }

    pub fn set_resonance(&mut self, resonance: f64) -> Result<(), ModifierError> {
        self.reset(self.cutoff, resonance)
    }

    fn reset(&mut self, cutoff: f64, resonance: f64) -> Result<(), ModifierError> {
        self.coefficients = Coefficients::derive(&self.ctx, cutoff, resonance)?;
        self.cutoff = cutoff;
        self.resonance = resonance;

        tracing::debug!(cutoff, resonance, coefficients = ?self.coefficients.c, "high-pass reset");
        Ok(())
    }

    #[inline]
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    #[inline]
    pub fn resonance(&self) -> f64 {
        self.resonance
    }

    #[inline]
    pub fn coefficients(&self) -> Coefficients {
        self.coefficients
    }

    pub fn non_finite_count(&self) -> u32 {
        self.non_finite
    }
}

impl Modifier for HighPassFilter {
    fn filter_sample(&mut self, input: StereoSample) -> StereoSample {
        let x = widen(input);
        let [x1, x2, x3] = self.inputs.to_array();
        let [y1, y2, y3] = self.outputs.to_array();
        let c = &self.coefficients;

        let y: Frame = [0usize, 1].map(|ch| {
            let difference = x[ch] - 3.0 * x1[ch] + 3.0 * x2[ch] - x3[ch];
            c.g() * difference + c.feedback(y1[ch], y2[ch], y3[ch])
        });
        let output = narrow(y);

        if !output.is_finite() {
            self.non_finite = self.non_finite.saturating_add(1);
            tracing::warn!(?input, cutoff = self.cutoff, "non-finite high-pass output, resetting to silence");
            self.clear();
            return StereoSample::SILENCE;
        }

        self.inputs.push(x);
        self.outputs.push(y);
        output
    }

    fn methods(&self) -> MethodView<'_> {
        self.methods.view()
    }

    fn invoke_at(&mut self, index: usize, param: Param) -> Result<(), ModifierError> {
        let mutator = self.methods.checked_mutator(index, param)?;
        mutator(self, param)
    }

    fn clear(&mut self) {
        self.inputs.clear();
        self.outputs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(cutoff: f64) -> HighPassFilter {
        HighPassFilter::new(&ProcessContext::new(48_000), cutoff, 0.0).unwrap()
    }

    #[test]
    fn blocks_dc() {
        let mut hpf = filter(200.0);

        let mut out = StereoSample::SILENCE;
        for _ in 0..4_000 {
            out = hpf.filter_sample(StereoSample::mono(1.0));
        }

        assert!(out.peak() < 1e-4, "dc leaked: {:?}", out);
    }

    #[test]
    fn low_cutoff_settles_on_dc_over_long_runs() {
        let mut hpf = filter(20.0);

        let mut worst = 0.0f32;
        for n in 0..400_000 {
            let out = hpf.filter_sample(StereoSample::mono(0.5));
            if n >= 300_000 {
                worst = worst.max(out.peak());
            }
        }

        assert!(worst < 1e-3, "dc leaked: {worst}");
    }

    #[test]
    fn failed_setter_commits_nothing() {
        let mut hpf = filter(200.0);
        let before = hpf.coefficients();

        assert!(hpf.set_resonance(f64::NAN).is_err());
        assert!(hpf.invoke("SetCutoff", Param::Float(f64::INFINITY)).is_err());

        assert_eq!(hpf.coefficients(), before);
        assert_eq!((hpf.cutoff(), hpf.resonance()), (200.0, 0.0));
    }

    #[test]
    fn passes_nyquist() {
        let mut hpf = filter(200.0);

        let mut peak = 0.0f32;
        for n in 0..2_000 {
            let x = if n % 2 == 0 { 1.0 } else { -1.0 };
            let out = hpf.filter_sample(StereoSample::mono(x));
            if n > 1_000 {
                peak = peak.max(out.peak());
            }
        }

        assert!(peak > 0.5, "nyquist peak {peak}");
    }

    #[test]
    fn shares_low_pass_coefficients() {
        let ctx = ProcessContext::new(48_000);
        let hpf = HighPassFilter::new(&ctx, 750.0, 0.1).unwrap();
        let lpf = super::super::LowPassFilter::new(&ctx, 750.0, 0.1).unwrap();

        assert_eq!(hpf.coefficients(), lpf.coefficients());
    }

    #[test]
    fn named_setters_match_direct_ones() {
        let mut direct = filter(200.0);
        let mut named = filter(200.0);

        direct.set_resonance(0.15).unwrap();
        named.invoke("SetResonance", Param::Float(0.15)).unwrap();
        direct.set_cutoff(90.0).unwrap();
        named.invoke("SetCutoff", Param::Float(90.0)).unwrap();

        assert_eq!(direct.coefficients(), named.coefficients());
        assert_eq!(named.resonance(), 0.15);
    }
}
