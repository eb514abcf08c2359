//! Stereo sample value

use core::ops::{Add, Mul};

/// One stereo frame: a left and a right amplitude.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StereoSample {
    pub left: f32,
    pub right: f32,
}

impl StereoSample {
    /// Digital silence on both channels.
    pub const SILENCE: StereoSample = StereoSample { left: 0.0, right: 0.0 };

    #[inline]
    pub const fn new(left: f32, right: f32) -> Self {
        Self { left, right }
    }

    /// The same value on both channels.
    #[inline]
    pub const fn mono(value: f32) -> Self {
        Self { left: value, right: value }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.left.is_finite() && self.right.is_finite()
    }

    /// Largest absolute amplitude across both channels.
    #[inline]
    pub fn peak(&self) -> f32 {
        self.left.abs().max(self.right.abs())
    }

    /// Per-channel linear interpolation towards `other` (`t = 0` keeps `self`).
    #[inline]
    pub fn lerp(self, other: StereoSample, t: f32) -> Self {
        Self::new(
            self.left + (other.left - self.left) * t,
            self.right + (other.right - self.right) * t,
        )
    }
}

impl Add for StereoSample {
    type Output = StereoSample;

    #[inline]
    fn add(self, rhs: StereoSample) -> StereoSample {
        StereoSample::new(self.left + rhs.left, self.right + rhs.right)
    }
}

impl Mul<f32> for StereoSample {
    type Output = StereoSample;

    #[inline]
    fn mul(self, rhs: f32) -> StereoSample {
        StereoSample::new(self.left * rhs, self.right * rhs)
    }
}

impl Mul for StereoSample {
    type Output = StereoSample;

    /// Channel-wise product (ring modulation).
    #[inline]
    fn mul(self, rhs: StereoSample) -> StereoSample {
        StereoSample::new(self.left * rhs.left, self.right * rhs.right)
    }
}

impl From<[f32; 2]> for StereoSample {
    fn from([left, right]: [f32; 2]) -> Self {
        Self { left, right }
    }
}

impl From<StereoSample> for [f32; 2] {
    fn from(s: StereoSample) -> Self {
        [s.left, s.right]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_is_per_channel() {
        let a = StereoSample::new(0.5, -0.25);
        let b = StereoSample::new(0.25, 0.75);

        assert_eq!(a + b, StereoSample::new(0.75, 0.5));
        assert_eq!(a * 2.0, StereoSample::new(1.0, -0.5));
        assert_eq!(a * b, StereoSample::new(0.125, -0.1875));
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
    }

    #[test]
    fn peak_and_finiteness() {
        assert_eq!(StereoSample::new(-0.8, 0.3).peak(), 0.8);
        assert!(StereoSample::SILENCE.is_finite());
        assert!(!StereoSample::new(f32::NAN, 0.0).is_finite());
        assert!(!StereoSample::new(0.0, f32::INFINITY).is_finite());
    }
}
