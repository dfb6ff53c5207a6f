//! Target errors.

use core::fmt;

/// The error type for target commands.
#[derive(Debug, PartialEq, Eq)]
pub enum TargetError {
    /// `encrypt` was called before `set_key`.
    NoKey,
    /// Payload does not match the mode's fixed size.
    PayloadLength {
        /// Size the configured mode processes.
        expected: usize,
        /// Size received.
        actual: usize,
    },
    /// The engine rejected the input.
    Engine(aes_core::Error),
}

impl fmt::Display for TargetError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TargetError::NoKey => write!(f, "No key loaded"),
            TargetError::PayloadLength { expected, actual } => {
                write!(f, "Payload must be {expected} bytes, got {actual}")
            }
            TargetError::Engine(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for TargetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TargetError::Engine(err) => Some(err),
            _ => None,
        }
    }
}

impl From<aes_core::Error> for TargetError {
    fn from(err: aes_core::Error) -> Self {
        TargetError::Engine(err)
    }
}
