//! Error types for the storage layer.

use std::fmt;
use std::io;

use ndarray_npy::{ReadNpyError, WriteNpyError};

use cumulus_core::{Grid, Step};

/// Errors that can occur while saving, loading, or decoding stored fields.
#[derive(Debug)]
pub enum StoreError {
    /// A filesystem error other than a missing file.
    Io(io::Error),
    /// The requested field (or field/step pair) was never written.
    ///
    /// Recoverable: a viewer polling a running producer treats this as
    /// "not ready yet".
    NotFound {
        /// Field name.
        name: String,
        /// Snapshot step, or `None` for a scalar series or range lookup.
        step: Option<Step>,
    },
    /// A gridded save whose leading dimensions disagree with the bound grid.
    ShapeMismatch {
        /// Field name.
        name: String,
        /// The grid bound at `init`.
        expected: Grid,
        /// The shape that was passed in.
        found: Vec<usize>,
    },
    /// `save`, `load` or `data_range` was called before `init`.
    Uninitialized,
    /// The field name cannot be mapped to a file in the backing directory.
    InvalidName {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },
    /// A stored file could not be decoded: not `.npy`, an element type
    /// other than `f4`/`f8`, a truncated body, or an impossible shape.
    Decode(ReadNpyError),
    /// An array could not be encoded.
    Encode(WriteNpyError),
}

impl StoreError {
    /// Whether this is the recoverable [`NotFound`](Self::NotFound) kind.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::NotFound { name, step } => match step {
                Some(step) => write!(f, "field '{name}' has no data for step {step}"),
                None => write!(f, "field '{name}' has no data"),
            },
            Self::ShapeMismatch {
                name,
                expected,
                found,
            } => write!(
                f,
                "unsupported shape {found:?} for field '{name}': leading dimensions must be {expected}"
            ),
            Self::Uninitialized => write!(f, "storage used before init"),
            Self::InvalidName { name, reason } => {
                write!(f, "invalid field name {name:?}: {reason}")
            }
            Self::Decode(e) => write!(f, "malformed file: {e}"),
            Self::Encode(e) => write!(f, "encode failed: {e}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Decode(e) => Some(e),
            Self::Encode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ReadNpyError> for StoreError {
    fn from(e: ReadNpyError) -> Self {
        Self::Decode(e)
    }
}

impl From<WriteNpyError> for StoreError {
    fn from(e: WriteNpyError) -> Self {
        match e {
            WriteNpyError::Io(e) => Self::Io(e),
            other => Self::Encode(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_distinguishable() {
        let nf = StoreError::NotFound {
            name: "qc".into(),
            step: Some(Step(3)),
        };
        let sm = StoreError::ShapeMismatch {
            name: "qc".into(),
            expected: Grid::new(4, 5).unwrap(),
            found: vec![3, 5],
        };
        assert!(nf.is_not_found());
        assert!(!sm.is_not_found());
        assert_eq!(nf.to_string(), "field 'qc' has no data for step 3");
        assert!(sm.to_string().contains("unsupported shape [3, 5]"));
    }
}
