//! Sine wave oscillator

use crate::node::{Generator, ProcessContext};
use crate::sample::StereoSample;

/// A sine wave oscillator, identical on both channels.
pub struct Sine {
    frequency: f32,
    phase: f32,
    amplitude: f32,
    sample_rate: f32,
}

impl Sine {
    pub fn new(ctx: &ProcessContext, frequency: f32) -> Self {
        Self {
            frequency: frequency.max(0.0),
            phase: 0.0,
            amplitude: 0.25, // -12dB, safe default
            sample_rate: ctx.sample_rate as f32,
        }
    }

    pub fn with_amplitude(mut self, amplitude: f32) -> Self {
        self.amplitude = amplitude.clamp(0.0, 1.0);
        self
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency.max(0.0);
    }

    #[inline]
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    #[inline]
    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }
}

impl Generator for Sine {
    fn next_sample(&mut self) -> StereoSample {
        let sample = (self.phase * core::f32::consts::TAU).sin() * self.amplitude;

        // frequencies above the sample rate advance more than a cycle per sample
        self.phase = (self.phase + self.frequency / self.sample_rate).fract();

        StereoSample::mono(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero_and_peaks_at_quarter_cycle() {
        // 1 kHz at 4 kHz: one quarter cycle per sample
        let mut sine = Sine::new(&ProcessContext::new(4_000), 1_000.0).with_amplitude(1.0);

        let first = sine.next_sample();
        let second = sine.next_sample();

        assert!(first.left.abs() < 1e-6);
        assert!((second.left - 1.0).abs() < 1e-6);
        assert_eq!(second.left, second.right);
    }

    #[test]
    fn phase_stays_wrapped_above_sample_rate() {
        // 5 kHz at 4 kHz: one and a quarter cycles per sample
        let mut sine = Sine::new(&ProcessContext::new(4_000), 5_000.0).with_amplitude(1.0);

        sine.next_sample();
        assert!((sine.next_sample().left - 1.0).abs() < 1e-6);

        for _ in 0..100_000 {
            sine.next_sample();
            assert!((0.0..1.0).contains(&sine.phase), "phase {}", sine.phase);
        }
    }

    #[test]
    fn amplitude_is_clamped() {
        let sine = Sine::new(&ProcessContext::default(), 440.0).with_amplitude(3.0);
        assert_eq!(sine.amplitude(), 1.0);
    }
}
