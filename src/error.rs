//! Error type shared by method dispatch, setters and factories

use core::fmt;

use crate::method::ParamKind;

#[derive(Debug, Clone, PartialEq)]
pub enum ModifierError {
    /// No method with this name is registered on the node.
    UnknownMethod { name: String },
    /// A pre-resolved call names an index past the end of the method table.
    UnknownIndex { index: usize },
    /// The parameter variant does not match what the method expects.
    TypeMismatch {
        method: &'static str,
        expected: ParamKind,
        found: ParamKind,
    },
    /// A parameter lies outside the domain the node can compute with.
    InvalidParameter { name: &'static str, value: f64 },
    /// A block or sound was requested with no generator and no modifier.
    NullChild,
    /// A method table already holds an entry with this name.
    DuplicateMethod { name: &'static str },
    /// The control queue to the audio thread is full; the call was dropped.
    QueueFull { method: &'static str },
}

impl fmt::Display for ModifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModifierError::UnknownMethod { name } => write!(f, "Unknown method '{name}'"),
            ModifierError::UnknownIndex { index } => write!(f, "No method at index {index}"),
            ModifierError::TypeMismatch { method, expected, found } => {
                write!(f, "Method '{method}' expects a {expected} parameter, got {found}")
            }
            ModifierError::InvalidParameter { name, value } => {
                write!(f, "Invalid value {value} for parameter '{name}'")
            }
            ModifierError::NullChild => write!(f, "Cannot build a sound without a generator or modifier"),
            ModifierError::DuplicateMethod { name } => write!(f, "Method '{name}' is already registered"),
            ModifierError::QueueFull { method } => write!(f, "Control queue full, dropped call to '{method}'"),
        }
    }
}

impl std::error::Error for ModifierError {}
