//! Typed run settings.
//!
//! [`RunSettings`] is the explicit configuration of one simulation run as
//! seen by the storage and the output loop. Every derived quantity (step
//! counts, output schedule) is computed from named fields; nothing is read
//! reflectively.

use crate::error::ConfigError;
use crate::grid::Grid;
use crate::id::Step;

/// Timing and grid settings for one run. Times are in seconds.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSettings {
    /// Spatial discretisation bound to the storage at `init`.
    pub grid: Grid,
    /// Integration timestep. Default: 5 s.
    pub dt: f64,
    /// Total simulated time. Default: 90 min.
    pub simulation_time: f64,
    /// Time between recorded outputs. Default: 60 s.
    pub output_interval: f64,
    /// Time during which coalescence and sedimentation stay disabled.
    /// Default: 1 h.
    pub spin_up_time: f64,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            grid: Grid::default(),
            dt: 5.0,
            simulation_time: 90.0 * 60.0,
            output_interval: 60.0,
            spin_up_time: 3600.0,
        }
    }
}

impl RunSettings {
    /// Settings for `grid` with default timing.
    pub fn with_grid(grid: Grid) -> Self {
        Self {
            grid,
            ..Self::default()
        }
    }

    /// Check timing invariants.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `dt` is not finite and positive, the simulation is
    /// shorter than one step, the output interval is shorter than `dt`, or
    /// the spin-up time is negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(ConfigError::InvalidTimestep { value: self.dt });
        }
        if !self.simulation_time.is_finite() || self.simulation_time < self.dt {
            return Err(ConfigError::InvalidSimulationTime {
                value: self.simulation_time,
            });
        }
        if !self.output_interval.is_finite() || self.output_interval < self.dt {
            return Err(ConfigError::InvalidOutputInterval {
                interval: self.output_interval,
                dt: self.dt,
            });
        }
        if !self.spin_up_time.is_finite() || self.spin_up_time < 0.0 {
            return Err(ConfigError::InvalidSpinUp {
                value: self.spin_up_time,
            });
        }
        Ok(())
    }

    /// Number of integration steps in the run (truncated).
    pub fn n_steps(&self) -> u64 {
        (self.simulation_time / self.dt) as u64
    }

    /// Integration steps between two outputs (at least 1).
    pub fn steps_per_output_interval(&self) -> u64 {
        ((self.output_interval / self.dt) as u64).max(1)
    }

    /// Integration steps before spin-up ends.
    pub fn n_spin_up(&self) -> u64 {
        (self.spin_up_time / self.dt) as u64
    }

    /// Recorded steps: `0, k, 2k, ...` up to and including `n_steps`.
    pub fn output_steps(&self) -> Vec<Step> {
        let stride = self.steps_per_output_interval() as usize;
        (0..=self.n_steps()).step_by(stride).map(Step).collect()
    }
}
