//! Benchmark profiles and utilities for Cumulus.
//!
//! Provides pre-built [`RunSettings`] profiles for benchmarking and examples:
//!
//! - [`reference_profile`]: 75x75 grid, 90 min at dt = 5 s, 91 outputs
//! - [`stress_profile`]: 256x256 grid, 10 min run
//! - [`reference_simulation`]: a ready-to-run simulation over a mock producer

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use cumulus_core::{Grid, RunSettings};
use cumulus_engine::{RunError, Simulation};
use cumulus_store::{StepStorage, StorageConfig};
use cumulus_test_utils::MockProducer;

/// Build the reference profile: 75x75 grid, default timing.
pub fn reference_profile() -> Result<RunSettings, RunError> {
    let settings = RunSettings::with_grid(Grid::new(75, 75)?);
    settings.validate()?;
    Ok(settings)
}

/// Build the stress profile: 256x256 grid, 11 outputs, no spin-up.
pub fn stress_profile() -> Result<RunSettings, RunError> {
    let settings = RunSettings {
        simulation_time: 600.0,
        spin_up_time: 0.0,
        ..RunSettings::with_grid(Grid::new(256, 256)?)
    };
    settings.validate()?;
    Ok(settings)
}

/// A reinitialised simulation of `settings` over a seeded mock producer,
/// storing into a fresh temporary directory.
pub fn reference_simulation(
    settings: RunSettings,
    seed: u64,
) -> Result<Simulation<MockProducer>, RunError> {
    let producer = MockProducer::new(settings.grid, seed).with_spectrum(32);
    let storage = StepStorage::open(StorageConfig::default())?;
    let mut sim = Simulation::new(settings, storage, producer)?;
    sim.reinit();
    Ok(sim)
}
