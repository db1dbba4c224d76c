//! Error types shared by every finite-volume component.

use std::panic::Location;

use thiserror::Error;

/// Errors raised while configuring or running a finite-volume simulation.
///
/// Non-physical states are not errors; they are reported by
/// [`Equation::obeys_constraints`](crate::equations::Equation::obeys_constraints)
/// and turned into [`FvmError::Numerical`] by the simulator only when
/// admissibility checking is enabled.
#[derive(Error, Debug)]
pub enum FvmError {
    /// A factory was asked for a component it does not know.
    #[error("Unknown {kind} type {name}. At {location}")]
    UnknownName {
        kind: &'static str,
        name: String,
        location: String,
    },

    /// A parameter lookup failed.
    #[error("Unknown parameter {0}")]
    UnknownParameter(String),

    /// A parameter was registered twice.
    #[error("Parameter already registered: {0}")]
    DuplicateParameter(String),

    /// A variable name or index is not part of a volume.
    #[error("Unknown variable {0}")]
    UnknownVariable(String),

    /// Allocation of a memory area failed.
    #[error("Allocation of {requested} values failed: {reason}")]
    Allocation { requested: usize, reason: String },

    /// Two operands of an element-wise operation differ in shape.
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// An operation needed memory on a specific placement (host/device).
    #[error("Placement mismatch: {0}")]
    PlacementMismatch(String),

    /// A kernel was requested for a platform it cannot run on.
    #[error("Platform not supported: {0}")]
    UnsupportedPlatform(String),

    /// A precondition on an argument was violated.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Host/device transfer failed.
    #[error("Data transfer failed: {0}")]
    Transfer(String),

    /// The solution left the admissible set.
    #[error("Numerical error: {0}")]
    Numerical(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl FvmError {
    /// Unknown factory name, tagged with the caller's source location.
    #[track_caller]
    pub fn unknown_name(kind: &'static str, name: impl Into<String>) -> Self {
        let location = Location::caller();
        Self::UnknownName {
            kind,
            name: name.into(),
            location: format!("{}:{}", location.file(), location.line()),
        }
    }

    /// Create a shape mismatch error.
    pub fn shape_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FvmError>;
