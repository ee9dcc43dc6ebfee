//! Core types and traits for the Cumulus output storage framework.
//!
//! This is the leaf crate with no internal dependencies. It defines the
//! vocabulary shared by the storage layer and the output loop: step
//! identifiers, the bound grid, field arrays and their element precision,
//! run settings, error types, and the producer/listener traits.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod array;
pub mod error;
pub mod grid;
pub mod id;
pub mod settings;
pub mod traits;

pub use array::{FieldArray, FieldValue, Precision, Sample};
pub use error::{ArrayError, ConfigError, ProducerError};
pub use grid::Grid;
pub use id::Step;
pub use settings::RunSettings;
pub use traits::{Producer, StepListener};
