//! Error types for simulation operations.

use thiserror::Error;

/// Errors raised when validating simulation inputs.
///
/// The numeric kernels themselves never fail; these surface only at
/// construction and run entry points.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-physical condition: {what}")]
    NonPhysical {
        what: &'static str,
        #[source]
        source: gs_core::GsError,
    },

    #[error("Shape mismatch: {what} (expected {expected}, found {found})")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Unknown integration method: {name}")]
    UnknownMethod { name: String },

    #[error(transparent)]
    Core(#[from] gs_core::GsError),
}

pub type SimResult<T> = Result<T, SimError>;
