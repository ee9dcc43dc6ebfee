//! Reusable array and storage fixtures.
//!
//! - [`ramp`] builds a grid-shaped array with known, distinct values.
//! - [`temp_storage`] opens and initialises a temporary-directory store.
//! - [`init_tracing`] routes `tracing` output through the test harness.

use ndarray::Array2;

use cumulus_core::{FieldArray, Grid, RunSettings};
use cumulus_store::{StepStorage, StorageConfig};

/// An `(nx, nz)` array whose element `i` (C order) is `offset + i`.
pub fn ramp(grid: Grid, offset: f64) -> FieldArray {
    let nz = grid.nz();
    Array2::from_shape_fn(grid.dims(), |(i, j)| offset + (i * nz + j) as f64)
        .into_dyn()
        .into()
}

/// A temporary storage initialised for `grid` with default settings.
///
/// # Panics
///
/// If the temporary directory cannot be created.
pub fn temp_storage(grid: Grid) -> StepStorage {
    let mut storage = StepStorage::open(StorageConfig::default())
        .unwrap_or_else(|e| panic!("failed to open temporary storage: {e}"));
    storage.init(&RunSettings::with_grid(grid));
    storage
}

/// Install a test-writer subscriber filtered by `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
