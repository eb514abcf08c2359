//! Composable stereo sound blocks.
//!
//! A [`Generator`] produces samples, a [`Modifier`] transforms them, and a
//! [`Block`] joins the two (optionally through an [`Interaction`]). A
//! [`Sound`] wraps any of them with gains, pause and mute, and is what a host
//! ticks once per sample.
//!
//! Modifiers expose their setters as named methods, so a host can drive a
//! parameter by name, either directly or from another thread through a
//! [`Controller`].
//!
//! ```
//! use resona::nodes::{LowPassFilter, Sine};
//! use resona::{create_block, create_sound, Param, ProcessContext};
//!
//! let ctx = ProcessContext::new(48_000);
//! let mut sound = create_sound(create_block(
//!     Sine::new(&ctx, 440.0),
//!     LowPassFilter::new(&ctx, 1_000.0, 0.0)?,
//! ));
//!
//! sound.invoke("SetCutoff", Param::Float(2_000.0))?;
//! let frame = sound.next_sample();
//! assert!(frame.is_finite());
//! # Ok::<(), resona::ModifierError>(())
//! ```

mod error;
pub mod graph;
mod method;
mod mixer;
mod node;
pub mod nodes;
mod sample;
mod sound;

pub use error::ModifierError;
pub use graph::{GraphNode, SoundGraph, SoundNode, SoundProcessor};
pub use method::{MethodCall, MethodDirectory, MethodSignature, MethodTable, MethodView, Mutator, Param, ParamKind};
pub use mixer::{Mixer, SoundId};
pub use node::{Generator, Modifier, ProcessContext, DEFAULT_SAMPLE_RATE};
pub use nodes::ModifierNode;
pub use sample::StereoSample;
pub use sound::{
    create_basic_generator, create_basic_modifier, create_block, create_block_generator, create_block_modifier,
    create_block_with, create_sound, crossfade, multiply, sum, Block, Controller, Interaction, Sound,
    DEFAULT_QUEUE_SIZE,
};
