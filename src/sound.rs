//! Sounds, blocks and the functions that assemble them

use core::fmt;

use rtrb::{Consumer, Producer, RingBuffer};

use crate::error::ModifierError;
use crate::method::{MethodCall, MethodDirectory, MethodView, Param};
use crate::node::{Generator, Modifier};
use crate::nodes::ModifierNode;
use crate::sample::StereoSample;

/// Default capacity of a controller's queue, in calls.
pub const DEFAULT_QUEUE_SIZE: usize = 64;

/// Combines a block's generator sample with the modifier's output.
///
/// Arguments are `(dry, wet)`: the generator's sample and the modifier's
/// response to it.
pub type Interaction = Box<dyn FnMut(StereoSample, StereoSample) -> StereoSample + Send>;

/// Linear crossfade between dry (`0.0`) and wet (`1.0`).
pub fn crossfade(wet: f32) -> Interaction {
    let wet = wet.clamp(0.0, 1.0);
    Box::new(move |dry, filtered| dry.lerp(filtered, wet))
}

/// Dry plus wet.
pub fn sum() -> Interaction {
    Box::new(|dry, filtered| dry + filtered)
}

/// Channel-wise product of dry and wet.
pub fn multiply() -> Interaction {
    Box::new(|dry, filtered| dry * filtered)
}

/// A generator and/or a modifier combined into one processing unit.
///
/// | children             | output per tick                                 |
/// | -------------------- | ----------------------------------------------- |
/// | generator            | `generator.next_sample()`                       |
/// | modifier             | `modifier.filter_sample(input)`                 |
/// | generator + modifier | `modifier.filter_sample(generator.next_sample())` |
/// | ... + interaction    | `interaction(dry, modifier.filter_sample(dry))` |
pub struct Block {
    generator: Option<Box<dyn Generator>>,
    modifier: Option<ModifierNode>,
    interaction: Option<Interaction>,
}

impl Block {
    /// Assemble a block from optional parts.
    ///
    /// Fails with [`ModifierError::NullChild`] if both children are absent.
    /// An interaction only applies when both children are present; with a
    /// single child it is dropped and the child's output passes through.
    pub fn from_parts(
        generator: Option<Box<dyn Generator>>,
        modifier: Option<ModifierNode>,
        interaction: Option<Interaction>,
    ) -> Result<Self, ModifierError> {
        if generator.is_none() && modifier.is_none() {
            return Err(ModifierError::NullChild);
        }

        let interaction = match (&generator, &modifier) {
            (Some(_), Some(_)) => interaction,
            _ => {
                if interaction.is_some() {
                    tracing::debug!("interaction ignored on a single-child block");
                }
                None
            }
        };

        Ok(Self { generator, modifier, interaction })
    }

    /// Produce one sample. `input` only reaches a modifier-only block.
    pub fn process(&mut self, input: StereoSample) -> StereoSample {
        match (&mut self.generator, &mut self.modifier) {
            (Some(generator), None) => generator.next_sample(),
            (None, Some(modifier)) => modifier.filter_sample(input),
            (Some(generator), Some(modifier)) => {
                let dry = generator.next_sample();
                let wet = modifier.filter_sample(dry);
                match &mut self.interaction {
                    Some(interaction) => interaction(dry, wet),
                    None => wet,
                }
            }
            (None, None) => StereoSample::SILENCE,
        }
    }

    pub fn modifier(&self) -> Option<&ModifierNode> {
        self.modifier.as_ref()
    }

    pub fn modifier_mut(&mut self) -> Option<&mut ModifierNode> {
        self.modifier.as_mut()
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    pub fn has_interaction(&self) -> bool {
        self.interaction.is_some()
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("generator", &self.generator.is_some())
            .field("modifier", &self.modifier.as_ref().map(|m| m.kind()))
            .field("interaction", &self.interaction.is_some())
            .finish()
    }
}

/// A block whose output is the generator's next sample.
pub fn create_block_generator(generator: impl Generator) -> Block {
    tracing::debug!("created generator block");
    Block {
        generator: Some(Box::new(generator)),
        modifier: None,
        interaction: None,
    }
}

/// A block that filters whatever input it is given.
pub fn create_block_modifier(modifier: impl Into<ModifierNode>) -> Block {
    let modifier = modifier.into();
    tracing::debug!(modifier = modifier.kind(), "created modifier block");
    Block {
        generator: None,
        modifier: Some(modifier),
        interaction: None,
    }
}

/// A block that filters its generator.
pub fn create_block(generator: impl Generator, modifier: impl Into<ModifierNode>) -> Block {
    let modifier = modifier.into();
    tracing::debug!(modifier = modifier.kind(), "created chained block");
    Block {
        generator: Some(Box::new(generator)),
        modifier: Some(modifier),
        interaction: None,
    }
}

/// A block that combines its generator and modifier with `interaction`.
pub fn create_block_with<F>(generator: impl Generator, modifier: impl Into<ModifierNode>, interaction: F) -> Block
where
    F: FnMut(StereoSample, StereoSample) -> StereoSample + Send + 'static,
{
    let modifier = modifier.into();
    tracing::debug!(modifier = modifier.kind(), "created interacting block");
    Block {
        generator: Some(Box::new(generator)),
        modifier: Some(modifier),
        interaction: Some(Box::new(interaction)),
    }
}

/// A sound playing a single generator.
pub fn create_basic_generator(generator: impl Generator) -> Sound {
    Sound::new(Source::Generator(Box::new(generator)))
}

/// A sound that filters its input through a single modifier.
pub fn create_basic_modifier(modifier: impl Into<ModifierNode>) -> Sound {
    Sound::new(Source::Modifier(modifier.into()))
}

/// A sound driven by a block.
pub fn create_sound(block: Block) -> Sound {
    Sound::new(Source::Block(block))
}

enum Source {
    Generator(Box<dyn Generator>),
    Modifier(ModifierNode),
    Block(Block),
}

impl Source {
    fn process(&mut self, input: StereoSample) -> StereoSample {
        match self {
            Source::Generator(g) => g.next_sample(),
            Source::Modifier(m) => m.filter_sample(input),
            Source::Block(b) => b.process(input),
        }
    }

    fn modifier(&self) -> Option<&ModifierNode> {
        match self {
            Source::Generator(_) => None,
            Source::Modifier(m) => Some(m),
            Source::Block(b) => b.modifier(),
        }
    }

    fn modifier_mut(&mut self) -> Option<&mut ModifierNode> {
        match self {
            Source::Generator(_) => None,
            Source::Modifier(m) => Some(m),
            Source::Block(b) => b.modifier_mut(),
        }
    }
}

/// The unit a host ticks: a generator, a modifier or a block, with input and
/// output gain, pause and mute.
///
/// A paused sound outputs silence and does not advance its children. A muted
/// sound keeps running but outputs silence.
pub struct Sound {
    source: Source,
    input_gain: f32,
    output_gain: f32,
    paused: bool,
    muted: bool,
    receiver: Option<Consumer<MethodCall>>,
}

impl Sound {
    fn new(source: Source) -> Self {
        Self {
            source,
            input_gain: 1.0,
            output_gain: 1.0,
            paused: false,
            muted: false,
            receiver: None,
        }
    }

    pub fn with_input_gain(mut self, gain: f32) -> Self {
        self.input_gain = gain;
        self
    }

    pub fn with_output_gain(mut self, gain: f32) -> Self {
        self.output_gain = gain;
        self
    }

    pub fn input_gain(&self) -> f32 {
        self.input_gain
    }

    pub fn output_gain(&self) -> f32 {
        self.output_gain
    }

    pub fn set_input_gain(&mut self, gain: f32) {
        self.input_gain = gain;
    }

    pub fn set_output_gain(&mut self, gain: f32) {
        self.output_gain = gain;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// The sound's modifier, if it has one.
    pub fn modifier(&self) -> Option<&ModifierNode> {
        self.source.modifier()
    }

    pub fn modifier_mut(&mut self) -> Option<&mut ModifierNode> {
        self.source.modifier_mut()
    }

    /// Re-trigger: zero the modifier's signal history, keeping its parameters.
    pub fn clear(&mut self) {
        if let Some(modifier) = self.source.modifier_mut() {
            modifier.clear();
        }
    }

    /// Call a method on this sound's modifier directly, from the thread that
    /// owns the sound.
    pub fn invoke(&mut self, name: &str, param: Param) -> Result<(), ModifierError> {
        match self.source.modifier_mut() {
            Some(modifier) => modifier.invoke(name, param),
            None => Err(ModifierError::UnknownMethod { name: name.into() }),
        }
    }

    /// Open a control channel for calling the modifier's methods from another
    /// thread.
    ///
    /// Returns `None` when the sound has no modifier. Opening a new channel
    /// closes the previous one; calls still queued on it are discarded.
    pub fn controller(&mut self, queue_size: usize) -> Option<Controller> {
        let directory = self.source.modifier()?.methods().to_directory();
        let (sender, receiver) = RingBuffer::new(queue_size.max(1));
        self.receiver = Some(receiver);

        Some(Controller { sender, directory })
    }

    /// Apply every queued control call to the modifier. Returns how many were
    /// applied. Called automatically at the start of [`process`](Self::process).
    pub fn apply_pending(&mut self) -> usize {
        let (receiver, modifier) = match (self.receiver.as_mut(), self.source.modifier_mut()) {
            (Some(receiver), Some(modifier)) => (receiver, modifier),
            _ => return 0,
        };

        let mut applied = 0;
        while let Ok(call) = receiver.pop() {
            match modifier.invoke_at(call.index, call.param) {
                Ok(()) => applied += 1,
                Err(err) => tracing::warn!(%err, modifier = modifier.kind(), "queued call rejected"),
            }
        }
        applied
    }

    /// Process one tick. `input` is scaled by the input gain and only reaches
    /// a modifier; generator-driven sounds ignore it.
    pub fn process(&mut self, input: StereoSample) -> StereoSample {
        self.apply_pending();

        if self.paused {
            return StereoSample::SILENCE;
        }

        let out = self.source.process(input * self.input_gain) * self.output_gain;

        if self.muted {
            StereoSample::SILENCE
        } else {
            out
        }
    }

    /// Process one tick with silent input.
    pub fn next_sample(&mut self) -> StereoSample {
        self.process(StereoSample::SILENCE)
    }
}

/// Calls a sound's modifier methods from another thread.
///
/// Names and parameter kinds are checked here, synchronously; accepted calls
/// are queued lock-free and applied by the audio thread before its next
/// sample. There is one controller per channel, so writes are serialized.
///
/// ```
/// use resona::{create_block, nodes::{LowPassFilter, Sine}, Param, ProcessContext};
///
/// let ctx = ProcessContext::default();
/// let mut sound = resona::create_sound(create_block(
///     Sine::new(&ctx, 220.0),
///     LowPassFilter::new(&ctx, 800.0, 0.0).unwrap(),
/// ));
/// let mut control = sound.controller(16).unwrap();
///
/// std::thread::spawn(move || {
///     control.invoke("SetCutoff", Param::Float(1_600.0)).ok();
/// })
/// .join()
/// .unwrap();
///
/// sound.next_sample(); // applies the queued call first
/// ```
pub struct Controller {
    sender: Producer<MethodCall>,
    directory: MethodDirectory,
}

impl Controller {
    /// The methods this controller can call.
    pub fn methods(&self) -> MethodView<'_> {
        self.directory.view()
    }

    /// Queue a call to `name`.
    ///
    /// Fails immediately with [`ModifierError::UnknownMethod`] or
    /// [`ModifierError::TypeMismatch`], or with [`ModifierError::QueueFull`]
    /// if the audio thread has fallen behind. Value errors (e.g. a non-finite
    /// cutoff) surface on the audio thread as a `tracing` warning and leave
    /// the modifier unchanged.
    pub fn invoke(&mut self, name: &str, param: Param) -> Result<(), ModifierError> {
        let view = self.directory.view();
        let call = view.resolve(name, param)?;
        let method = view.signatures()[call.index].name;

        self.sender
            .push(call)
            .map_err(|rtrb::PushError::Full(_)| ModifierError::QueueFull { method })
    }

    /// Number of calls that can be queued before [`invoke`](Self::invoke)
    /// reports a full queue.
    pub fn available(&self) -> usize {
        self.sender.slots()
    }

    /// Whether the sound side of the channel is gone.
    pub fn is_abandoned(&self) -> bool {
        self.sender.is_abandoned()
    }
}
