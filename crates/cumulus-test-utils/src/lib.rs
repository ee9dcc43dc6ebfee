//! Test utilities and mock types for Cumulus development.
//!
//! Provides a deterministic [`MockProducer`] standing in for the particle
//! simulation, a [`RecordingListener`] for observing step callbacks, and
//! array/storage fixtures in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::{Arc, Mutex};

use ndarray::Array2;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use cumulus_core::{FieldArray, FieldValue, Grid, Producer, ProducerError, Step, StepListener};

pub use fixtures::{init_tracing, ramp, temp_storage};

/// Name of the scalar product emitted by [`MockProducer`].
pub const SCALAR_PRODUCT: &str = "surf_precip";
/// Name of the gridded product emitted by [`MockProducer`].
pub const GRID_PRODUCT: &str = "qc";
/// Name of the spectrum product emitted when bins are enabled.
pub const SPECTRUM_PRODUCT: &str = "Particles Wet Size Spectrum";

/// A deterministic stand-in for the particle simulation.
///
/// Values are drawn from a ChaCha8 RNG seeded with `seed ^ n_steps`, so the
/// products at a given step are the same across runs with the same seed.
pub struct MockProducer {
    grid: Grid,
    seed: u64,
    steps: u64,
    spectrum_bins: Option<usize>,
    fail_after: Option<u64>,
}

impl MockProducer {
    pub fn new(grid: Grid, seed: u64) -> Self {
        Self {
            grid,
            seed,
            steps: 0,
            spectrum_bins: None,
            fail_after: None,
        }
    }

    /// Also emit a `(nx, nz, bins)` spectrum product.
    pub fn with_spectrum(mut self, bins: usize) -> Self {
        self.spectrum_bins = Some(bins);
        self
    }

    /// Fail every `step()` once `n` steps have completed.
    pub fn failing_after(mut self, n: u64) -> Self {
        self.fail_after = Some(n);
        self
    }

    /// The scalar value this producer reports at `step`.
    pub fn scalar_at(&self, step: u64) -> f64 {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed ^ step);
        rng.random::<f64>() * 10.0
    }

    /// The gridded value this producer reports at `step`.
    pub fn grid_at(&self, step: u64) -> FieldArray {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed ^ step ^ 0x9e37_79b9);
        Array2::from_shape_fn(self.grid.dims(), |_| rng.random::<f64>() * 1e-3)
            .into_dyn()
            .into()
    }
}

impl Producer for MockProducer {
    fn n_steps(&self) -> u64 {
        self.steps
    }

    fn step(&mut self) -> Result<(), ProducerError> {
        if let Some(n) = self.fail_after {
            if self.steps >= n {
                return Err(ProducerError::ExecutionFailed {
                    reason: format!("deliberate failure after {n} steps"),
                });
            }
        }
        self.steps += 1;
        Ok(())
    }

    fn products(&self) -> Result<Vec<(String, FieldValue)>, ProducerError> {
        let mut out = vec![
            (
                SCALAR_PRODUCT.to_string(),
                FieldValue::Scalar(self.scalar_at(self.steps)),
            ),
            (
                GRID_PRODUCT.to_string(),
                FieldValue::Array(self.grid_at(self.steps)),
            ),
        ];
        if let Some(bins) = self.spectrum_bins {
            let [nx, nz] = self.grid.dims();
            let step = self.steps as f64;
            out.push((
                SPECTRUM_PRODUCT.to_string(),
                FieldValue::Array(FieldArray::filled(&[nx, nz, bins], step)),
            ));
        }
        Ok(out)
    }
}

/// A [`StepListener`] that records every step it is notified of.
///
/// Clones share the same log, so a test can keep one handle while the
/// simulation owns the other.
#[derive(Clone, Default)]
pub struct RecordingListener {
    seen: Arc<Mutex<Vec<Step>>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Steps seen so far, in notification order.
    pub fn steps(&self) -> Vec<Step> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl StepListener for RecordingListener {
    fn on_step(&mut self, step: Step) {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(step);
        }
    }
}
