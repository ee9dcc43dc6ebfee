//! Step-indexed on-disk storage for simulation outputs.
//!
//! Decouples a simulation loop from the viewers and exporters that read
//! its outputs later, possibly from another thread or process. Scalars are
//! recorded as one growing series per field; gridded snapshots as one file
//! per (field, step) pair.
//!
//! # Architecture
//!
//! - [`StepStorage`] owns the backing directory, binds the grid at `init`,
//!   and tracks per-field value ranges
//! - [`StorageReader`] loads files from a directory without owning it
//! - [`ArrayWriter`] replaces whole files atomically
//! - [`codec`] reads and writes the `.npy` array format via `ndarray-npy`
//!
//! # Layout
//!
//! ```text
//! <dir>/surf_precip.npy        scalar series
//! <dir>/qc_000000.npy          snapshot of qc at step 0
//! <dir>/qc_000012.npy          snapshot of qc at step 12
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod layout;
pub mod range;
pub mod reader;
pub mod storage;
pub mod writer;

pub use error::StoreError;
pub use layout::Entry;
pub use range::{DataRange, RangeTable};
pub use reader::StorageReader;
pub use storage::{StepStorage, StorageConfig};
pub use writer::ArrayWriter;
