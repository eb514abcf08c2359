//! Shared third-order recursive core
//!
//! Both resonant filters discretize `1 / (s³ + K·s² + K·s + 1)` with a
//! backward difference, where `K` is derived from the resonance angle. They
//! share the denominator, hence the feedback coefficients, and differ only in
//! what they feed forward.

use core::f64::consts::{FRAC_PI_6, TAU};

use dasp_ring_buffer::Fixed;

use crate::error::ModifierError;
use crate::node::ProcessContext;
use crate::sample::StereoSample;

/// Number of past samples the recursion looks at.
pub const DEPTH: usize = 3;

/// Denominators closer to zero than this are treated as singular.
const MIN_DENOMINATOR: f64 = 1e-9;

/// One complete coefficient set.
///
/// Always derived and replaced as a whole: every coefficient depends on both
/// `K` and `T`, so there is no meaningful partial update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coefficients {
    /// `[c0, c1, c2, c3]`: input gain, then feedback weights for the
    /// outputs 1, 2 and 3 samples back.
    pub c: [f64; 4],
}

impl Coefficients {
    /// Derive the coefficients for `cutoff` (Hz) and `resonance` at the
    /// context's sample rate.
    ///
    /// `resonance` is meant to lie in `[0, 1/6]` but is not range-checked.
    /// A cutoff at or below zero collapses to `T = 0`. Fails if either value is
    /// non-finite or the normalization denominator vanishes.
    pub fn derive(ctx: &ProcessContext, cutoff: f64, resonance: f64) -> Result<Self, ModifierError> {
        if !cutoff.is_finite() {
            return Err(ModifierError::InvalidParameter { name: "cutoff", value: cutoff });
        }
        if !resonance.is_finite() {
            return Err(ModifierError::InvalidParameter { name: "resonance", value: resonance });
        }

        let angle = FRAC_PI_6 * (4.0 - resonance);
        let k = 1.0 - 2.0 * angle.cos();
        let t = if cutoff > 0.0 { TAU * cutoff * ctx.sample_period() } else { 0.0 };

        let t2 = t * t;
        let t3 = t2 * t;
        let denominator = t3 + k * t2 + k * t + 1.0;

        if !denominator.is_finite() || denominator.abs() < MIN_DENOMINATOR {
            return Err(ModifierError::InvalidParameter { name: "resonance", value: resonance });
        }

        let g = 1.0 / denominator;

        Ok(Self {
            c: [
                t3,
                (k * t2 + 2.0 * k * t + 3.0) * g,
                (-k * t - 3.0) * g,
                g,
            ],
        })
    }

    /// The normalization factor `g`.
    #[inline]
    pub fn g(&self) -> f64 {
        self.c[3]
    }

    /// Feedback part of the recursion for one channel.
    #[inline]
    pub(crate) fn feedback(&self, y1: f64, y2: f64, y3: f64) -> f64 {
        self.c[1] * y1 + self.c[2] * y2 + self.c[3] * y3
    }
}

/// One stereo frame at recursion precision, `[left, right]`.
///
/// Filter state is kept in `f64` and only narrowed on output: at low cutoffs
/// the feedback weights approach `3, -3, 1` and nearly cancel.
pub type Frame = [f64; 2];

#[inline]
pub(crate) fn widen(sample: StereoSample) -> Frame {
    [sample.left as f64, sample.right as f64]
}

#[inline]
pub(crate) fn narrow([left, right]: Frame) -> StereoSample {
    StereoSample::new(left as f32, right as f32)
}

/// The last [`DEPTH`] frames of a signal, newest addressed as age 0.
#[derive(Clone, Debug)]
pub struct History {
    ring: Fixed<[Frame; DEPTH]>,
}

impl History {
    pub fn new() -> Self {
        Self { ring: Fixed::from([[0.0; 2]; DEPTH]) }
    }

    /// The frame pushed `age` calls ago (0 = most recent).
    #[inline]
    pub fn get(&self, age: usize) -> Frame {
        // the ring's front is its oldest element
        *self.ring.get(DEPTH - 1 - age)
    }

    /// Record a new frame, dropping the oldest.
    #[inline]
    pub fn push(&mut self, frame: Frame) {
        self.ring.push(frame);
    }

    pub fn clear(&mut self) {
        for _ in 0..DEPTH {
            self.ring.push([0.0; 2]);
        }
    }

    /// Newest-first copy of the contents.
    pub fn to_array(&self) -> [Frame; DEPTH] {
        [self.get(0), self.get(1), self.get(2)]
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_is_newest_first() {
        let mut history = History::new();
        for v in 1..=4 {
            history.push([v as f64, -(v as f64)]);
        }

        assert_eq!(history.to_array(), [[4.0, -4.0], [3.0, -3.0], [2.0, -2.0]]);

        history.clear();
        assert_eq!(history.to_array(), [[0.0; 2]; DEPTH]);
    }

    #[test]
    fn frames_keep_precision_below_f32() {
        let mut history = History::new();
        let fine = 0.5 + 1e-12;
        history.push([fine, 0.0]);

        assert_eq!(history.get(0)[0], fine);
        assert_eq!(narrow(history.get(0)), StereoSample::new(0.5, 0.0));
        assert_eq!(widen(StereoSample::new(0.25, -1.0)), [0.25, -1.0]);
    }

    #[test]
    fn derive_matches_closed_form() {
        let ctx = ProcessContext::new(44_100);
        let coeffs = Coefficients::derive(&ctx, 1_000.0, 0.0).unwrap();

        // resonance 0 puts the angle at 2π/3, so K = 2
        let t = TAU * 1_000.0 / 44_100.0;
        let g = 1.0 / (t * t * t + 2.0 * t * t + 2.0 * t + 1.0);

        assert!((coeffs.c[0] - t * t * t).abs() < 1e-15);
        assert!((coeffs.c[1] - (2.0 * t * t + 4.0 * t + 3.0) * g).abs() < 1e-12);
        assert!((coeffs.c[2] - (-2.0 * t - 3.0) * g).abs() < 1e-12);
        assert!((coeffs.g() - g).abs() < 1e-12);
    }

    #[test]
    fn derive_is_bit_reproducible() {
        let ctx = ProcessContext::new(48_000);
        let a = Coefficients::derive(&ctx, 523.25, 0.1).unwrap();
        let b = Coefficients::derive(&ctx, 523.25, 0.1).unwrap();

        for (x, y) in a.c.iter().zip(b.c.iter()) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
    }

    #[test]
    fn non_positive_cutoff_collapses_to_zero_t() {
        let ctx = ProcessContext::default();

        for cutoff in [0.0, -250.0] {
            let coeffs = Coefficients::derive(&ctx, cutoff, 0.0).unwrap();
            assert_eq!(coeffs.c, [0.0, 3.0, -3.0, 1.0]);
        }
    }

    #[test]
    fn vanishing_denominator_is_rejected() {
        // resonance 4 gives K = -1, and T = 1 is then a double root
        let ctx = ProcessContext::new(48_000);
        let cutoff = 48_000.0 / TAU;

        assert_eq!(
            Coefficients::derive(&ctx, cutoff, 4.0),
            Err(ModifierError::InvalidParameter { name: "resonance", value: 4.0 })
        );
    }

    #[test]
    fn non_finite_parameters_are_rejected() {
        let ctx = ProcessContext::default();

        assert!(matches!(
            Coefficients::derive(&ctx, f64::NAN, 0.0),
            Err(ModifierError::InvalidParameter { name: "cutoff", .. })
        ));
        assert!(matches!(
            Coefficients::derive(&ctx, 1_000.0, f64::INFINITY),
            Err(ModifierError::InvalidParameter { name: "resonance", .. })
        ));
    }
}
