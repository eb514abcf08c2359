//! Mixer - sums a set of sounds into one output

use crate::sample::StereoSample;
use crate::sound::Sound;

/// Identifies a sound added to a [`Mixer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SoundId(u32);

/// Sums every sound it holds with equal weight, then applies a master gain.
///
/// Each sound receives the same input sample and processes it with its own
/// gains, pause and mute state. Sounds are processed in the order they were
/// added.
pub struct Mixer {
    sounds: Vec<(SoundId, Sound)>,
    next_id: u32,
    master_gain: f32,
}

impl Mixer {
    pub fn new() -> Self {
        Self {
            sounds: Vec::new(),
            next_id: 0,
            master_gain: 1.0,
        }
    }

    pub fn with_master_gain(mut self, gain: f32) -> Self {
        self.master_gain = gain;
        self
    }

    pub fn set_master_gain(&mut self, gain: f32) {
        self.master_gain = gain;
    }

    pub fn master_gain(&self) -> f32 {
        self.master_gain
    }

    /// Add a sound, returning the id used to reach it later.
    pub fn add(&mut self, sound: Sound) -> SoundId {
        let id = SoundId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.sounds.push((id, sound));
        tracing::debug!(?id, count = self.sounds.len(), "sound added to mixer");
        id
    }

    /// Take a sound back out of the mixer.
    pub fn remove(&mut self, id: SoundId) -> Option<Sound> {
        let pos = self.sounds.iter().position(|(sid, _)| *sid == id)?;
        let (_, sound) = self.sounds.remove(pos);
        tracing::debug!(?id, count = self.sounds.len(), "sound removed from mixer");
        Some(sound)
    }

    pub fn get(&self, id: SoundId) -> Option<&Sound> {
        self.sounds.iter().find(|(sid, _)| *sid == id).map(|(_, s)| s)
    }

    pub fn get_mut(&mut self, id: SoundId) -> Option<&mut Sound> {
        self.sounds.iter_mut().find(|(sid, _)| *sid == id).map(|(_, s)| s)
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    /// Process one tick of every sound and return the sum.
    pub fn process(&mut self, input: StereoSample) -> StereoSample {
        let mut acc = StereoSample::SILENCE;
        for (_, sound) in self.sounds.iter_mut() {
            acc = acc + sound.process(input);
        }
        acc * self.master_gain
    }

    pub fn next_sample(&mut self) -> StereoSample {
        self.process(StereoSample::SILENCE)
    }
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{Gain, Impulse};
    use crate::sound::{create_basic_generator, create_basic_modifier};

    #[test]
    fn sums_sounds() {
        let mut mixer = Mixer::new();
        mixer.add(create_basic_generator(Impulse::new(StereoSample::new(1.0, 0.0))));
        mixer.add(create_basic_generator(Impulse::new(StereoSample::new(0.0, 0.5))));

        assert_eq!(mixer.next_sample(), StereoSample::new(1.0, 0.5));
        assert_eq!(mixer.next_sample(), StereoSample::SILENCE);
    }

    #[test]
    fn modifiers_share_the_input() {
        let mut mixer = Mixer::new().with_master_gain(0.5);
        mixer.add(create_basic_modifier(Gain::new(1.0).unwrap().without_smoothing()));
        mixer.add(create_basic_modifier(Gain::new(3.0).unwrap().without_smoothing()));

        assert_eq!(mixer.process(StereoSample::mono(1.0)), StereoSample::mono(2.0));
    }

    #[test]
    fn remove_returns_the_sound() {
        let mut mixer = Mixer::default();
        let a = mixer.add(create_basic_generator(Impulse::unit()));
        let b = mixer.add(create_basic_generator(Impulse::unit()).with_output_gain(0.5));
        assert_ne!(a, b);

        let mut removed = mixer.remove(b).unwrap();
        assert_eq!(removed.next_sample(), StereoSample::mono(0.5));
        assert!(mixer.remove(b).is_none());
        assert_eq!(mixer.len(), 1);

        mixer.get_mut(a).unwrap().toggle_mute();
        assert!(mixer.get(a).unwrap().is_muted());
        assert_eq!(mixer.next_sample(), StereoSample::SILENCE);
    }

    #[test]
    fn empty_mixer_is_silent() {
        let mut mixer = Mixer::new();
        assert!(mixer.is_empty());
        assert_eq!(mixer.process(StereoSample::mono(1.0)), StereoSample::SILENCE);
    }
}
