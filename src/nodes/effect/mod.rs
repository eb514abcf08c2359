//! Modifiers: nodes that transform an input sample

mod gain;
mod high_pass;
pub mod iir;
mod low_pass;

pub use gain::Gain;
pub use high_pass::HighPassFilter;
pub use iir::Coefficients;
pub use low_pass::LowPassFilter;
