//! Error types shared across the Cumulus workspace.
//!
//! Storage-specific failures live in `cumulus-store`; this module covers
//! configuration, array construction, and producer execution.

use std::error::Error;
use std::fmt;

/// Errors detected while building or validating run settings.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A grid dimension is zero.
    EmptyGrid {
        /// Requested horizontal cell count.
        nx: usize,
        /// Requested vertical cell count.
        nz: usize,
    },
    /// `dt` is NaN, infinite, zero, or negative.
    InvalidTimestep {
        /// The invalid value.
        value: f64,
    },
    /// Simulation time is NaN, negative, or shorter than one timestep.
    InvalidSimulationTime {
        /// The invalid value.
        value: f64,
    },
    /// Output interval is shorter than `dt` or not finite.
    InvalidOutputInterval {
        /// The configured interval.
        interval: f64,
        /// The configured timestep.
        dt: f64,
    },
    /// Spin-up time is NaN or negative.
    InvalidSpinUp {
        /// The invalid value.
        value: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid { nx, nz } => {
                write!(f, "grid dimensions must be positive, got ({nx}, {nz})")
            }
            Self::InvalidTimestep { value } => {
                write!(f, "dt must be finite and positive, got {value}")
            }
            Self::InvalidSimulationTime { value } => {
                write!(f, "simulation time must cover at least one step, got {value}")
            }
            Self::InvalidOutputInterval { interval, dt } => {
                write!(
                    f,
                    "output interval {interval} must be finite and at least dt ({dt})"
                )
            }
            Self::InvalidSpinUp { value } => {
                write!(f, "spin-up time must be finite and non-negative, got {value}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Errors from constructing a [`FieldArray`](crate::FieldArray).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArrayError {
    /// The element count does not match the product of the shape.
    LengthMismatch {
        /// The requested shape.
        shape: Vec<usize>,
        /// Elements implied by the shape.
        expected: usize,
        /// Elements supplied.
        actual: usize,
    },
    /// The product of the shape does not fit in memory.
    ShapeOverflow {
        /// The requested shape.
        shape: Vec<usize>,
    },
}

impl fmt::Display for ArrayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch {
                shape,
                expected,
                actual,
            } => write!(
                f,
                "shape {shape:?} needs {expected} elements, got {actual}"
            ),
            Self::ShapeOverflow { shape } => {
                write!(f, "shape {shape:?} has too many elements")
            }
        }
    }
}

impl Error for ArrayError {}

/// Errors reported by a [`Producer`](crate::Producer) while stepping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProducerError {
    /// The underlying simulation failed to advance.
    ExecutionFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
    /// A product could not be evaluated for the current state.
    ProductUnavailable {
        /// Name of the product.
        name: String,
    },
}

impl fmt::Display for ProducerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExecutionFailed { reason } => write!(f, "execution failed: {reason}"),
            Self::ProductUnavailable { name } => {
                write!(f, "product '{name}' unavailable")
            }
        }
    }
}

impl Error for ProducerError {}
