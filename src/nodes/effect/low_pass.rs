//! Resonant third-order low-pass filter

use crate::error::ModifierError;
use crate::method::{MethodTable, MethodView, Mutator, Param, ParamKind};
use crate::node::{Modifier, ProcessContext};
use crate::sample::StereoSample;

use super::iir::{narrow, widen, Coefficients, Frame, History};

/// A resonant low-pass filter built on a third-order recursion.
///
/// Each channel computes
///
/// ```text
/// y[n] = c0·x[n] + c1·y[n-1] + c2·y[n-2] + c3·y[n-3]
/// ```
///
/// with coefficients re-derived from cutoff and resonance whenever either
/// changes. Because only outputs are fed back, the response to any input is
/// infinite: a short transient after construction or after a parameter change
/// is expected. The passband gain is `1/g`, slightly above unity.
///
/// Exposes `SetCutoff(Float)` and `SetResonance(Float)` through its
/// [`MethodTable`].
pub struct LowPassFilter {
    ctx: ProcessContext,
    cutoff: f64,
    resonance: f64,
    coefficients: Coefficients,
    outputs: History,
    non_finite: u32,
    methods: MethodTable<Self>,
}

impl LowPassFilter {
    /// Create a filter.
    ///
    /// `cutoff` is in Hz. `resonance` is an angle control meant to lie in
    /// `[0, 1/6]`; values outside that range are accepted and just shape the
    /// response differently.
    pub fn new(ctx: &ProcessContext, cutoff: f64, resonance: f64) -> Result<Self, ModifierError> {
        let coefficients = Coefficients::derive(ctx, cutoff, resonance)?;

        Ok(Self {
            ctx: *ctx,
            cutoff,
            resonance,
            coefficients,
            outputs: History::new(),
            non_finite: 0,
            methods: Self::method_table()?,
        })
    }

    fn method_table() -> Result<MethodTable<Self>, ModifierError> {
        MethodTable::from_entries([
            ("SetCutoff", ParamKind::Float, Self::invoke_set_cutoff as Mutator<Self>),
            ("SetResonance", ParamKind::Float, Self::invoke_set_resonance as Mutator<Self>),
        ])
    }

    fn invoke_set_cutoff(&mut self, param: Param) -> Result<(), ModifierError> {
        match param {
            Param::Float(cutoff) => self.set_cutoff(cutoff),
            other => Err(ModifierError::TypeMismatch {
                method: "SetCutoff",
                expected: ParamKind::Float,
                found: other.kind(),
            }),
        }
    }

    fn invoke_set_resonance(&mut self, param: Param) -> Result<(), ModifierError> {
        match param {
            Param::Float(resonance) => self.set_resonance(resonance),
            other => Err(ModifierError::TypeMismatch {
                method: "SetResonance",
                expected: ParamKind::Float,
                found: other.kind(),
            }),
        }
    }

    /// Set the cutoff frequency in Hz.
    pub fn set_cutoff(&mut self, cutoff: f64) -> Result<(), ModifierError> {
        self.reset(cutoff, self.resonance)
    }

    /// Set the resonance angle, nominally in `[0, 1/6]`. No range check.
    pub fn set_resonance(&mut self, resonance: f64) -> Result<(), ModifierError> {
        self.reset(self.cutoff, resonance)
    }

    /// Re-derive all coefficients, committing the new parameters only if the
    /// derivation succeeds.
    fn reset(&mut self, cutoff: f64, resonance: f64) -> Result<(), ModifierError> {
        self.coefficients = Coefficients::derive(&self.ctx, cutoff, resonance)?;
        self.cutoff = cutoff;
        self.resonance = resonance;

        tracing::debug!(cutoff, resonance, coefficients = ?self.coefficients.c, "low-pass reset");
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

    /// The last three outputs, newest first.
    pub fn history(&self) -> [StereoSample; 3] {
        self.outputs.to_array().map(narrow)
    }

    /// How many times a non-finite output was replaced by silence.
    pub fn non_finite_count(&self) -> u32 {
        self.non_finite
    }
}

impl Modifier for LowPassFilter {
    fn filter_sample(&mut self, input: StereoSample) -> StereoSample {
        let x = widen(input);
        let [y1, y2, y3] = self.outputs.to_array();
        let c = &self.coefficients;

        let y: Frame = [0usize, 1].map(|ch| c.c[0] * x[ch] + c.feedback(y1[ch], y2[ch], y3[ch]));
        let output = narrow(y);

        if !output.is_finite() {
            self.non_finite = self.non_finite.saturating_add(1);
            tracing::warn!(?input, cutoff = self.cutoff, "non-finite low-pass output, resetting to silence");
            self.outputs.clear();
            return StereoSample::SILENCE;
        }

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
        self.outputs.clear();
    }
}
