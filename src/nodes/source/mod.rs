//! Generators: nodes that produce samples without an input

mod impulse;
mod sine;

pub use impulse::Impulse;
pub use sine::Sine;
