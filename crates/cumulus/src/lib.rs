//! Cumulus: step-indexed output storage and run driver for particle-based
//! cloud simulations.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Cumulus sub-crates. For most users, adding `cumulus` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use cumulus::prelude::*;
//!
//! let grid = Grid::new(4, 5).unwrap();
//! let mut storage = StepStorage::open(StorageConfig::default()).unwrap();
//! storage.init(&RunSettings::with_grid(grid));
//!
//! // Scalars accumulate into a series.
//! storage.save(2.5, Step(0), "t").unwrap();
//! storage.save(3.5, Step(1), "t").unwrap();
//! assert_eq!(storage.load("t", None).unwrap().to_vec(), vec![2.5, 3.5]);
//!
//! // Arrays are stored one file per step.
//! let ones = FieldArray::filled(&[4, 5], 1.0);
//! storage.save(&ones, Step(0), "qc").unwrap();
//! assert_eq!(storage.load("qc", Some(Step(0))).unwrap(), ones);
//!
//! // Wrong shapes are rejected, missing steps are `NotFound`.
//! let wrong = FieldArray::filled(&[3, 5], 1.0);
//! assert!(matches!(
//!     storage.save(&wrong, Step(1), "qc"),
//!     Err(StoreError::ShapeMismatch { .. })
//! ));
//! assert!(storage.load("qc", Some(Step(1))).unwrap_err().is_not_found());
//!
//! assert_eq!(storage.data_range("t").unwrap().as_tuple(), (2.5, 3.5));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `cumulus-core` | Grid, steps, arrays, run settings, producer traits |
//! | [`store`] | `cumulus-store` | `StepStorage`, readers, the `.npy` codec |
//! | [`engine`] | `cumulus-engine` | Output loop, controllers, spin-up, viewer |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`cumulus-core`).
///
/// Contains [`types::Grid`], [`types::FieldArray`], [`types::RunSettings`],
/// and the [`types::Producer`] and [`types::StepListener`] seams.
pub use cumulus_core as types;

/// Step-indexed on-disk storage (`cumulus-store`).
///
/// [`store::StepStorage`] owns a run's outputs; [`store::StorageReader`]
/// reads them from another thread or process.
pub use cumulus_store as store;

/// Output loop and consumers (`cumulus-engine`).
///
/// [`engine::Simulation`] drives a producer through a run;
/// [`engine::Viewer`] follows it from elsewhere.
pub use cumulus_engine as engine;

/// Common imports for typical Cumulus usage.
///
/// ```rust
/// use cumulus::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use cumulus_core::{
        FieldArray, FieldValue, Grid, Precision, Producer, RunSettings, Sample, Step,
        StepListener,
    };

    // Errors
    pub use cumulus_core::{ConfigError, ProducerError};
    pub use cumulus_store::StoreError;

    // Storage
    pub use cumulus_store::{DataRange, StepStorage, StorageConfig, StorageReader};

    // Engine
    pub use cumulus_engine::{
        ChannelController, Controller, Event, NullController, ProcessSwitches, RunError,
        RunReport, Simulation, Viewer,
    };
}
