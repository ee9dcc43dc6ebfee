//! Spin-up: hold back slow processes for the first part of a run.
//!
//! During spin-up the flow and thermodynamics settle while coalescence and
//! sedimentation stay off. [`SpinUp`] disables both switches when built
//! and re-enables them once the producer reaches the spin-up step count.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::info;

use cumulus_core::{Step, StepListener};

/// Process toggles shared between a [`SpinUp`] and the producer.
///
/// The producer reads these before each step. Both default to enabled.
#[derive(Debug)]
pub struct ProcessSwitches {
    coalescence: AtomicBool,
    sedimentation: AtomicBool,
}

impl ProcessSwitches {
    /// Both processes enabled, behind an `Arc` ready to share.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Whether droplet coalescence is active.
    pub fn coalescence(&self) -> bool {
        self.coalescence.load(Ordering::Acquire)
    }

    /// Whether sedimentation is active.
    pub fn sedimentation(&self) -> bool {
        self.sedimentation.load(Ordering::Acquire)
    }

    /// Toggle coalescence and sedimentation together.
    pub fn set_all(&self, enabled: bool) {
        self.coalescence.store(enabled, Ordering::Release);
        self.sedimentation.store(enabled, Ordering::Release);
    }
}

impl Default for ProcessSwitches {
    fn default() -> Self {
        Self {
            coalescence: AtomicBool::new(true),
            sedimentation: AtomicBool::new(true),
        }
    }
}

/// Re-enables held-back processes after `n_spin_up` steps.
#[derive(Debug)]
pub struct SpinUp {
    switches: Arc<ProcessSwitches>,
    n_spin_up: u64,
}

impl SpinUp {
    /// Disable the switched processes until step `n_spin_up`.
    ///
    /// A zero-length spin-up leaves them enabled.
    pub fn new(switches: Arc<ProcessSwitches>, n_spin_up: u64) -> Self {
        switches.set_all(n_spin_up == 0);
        Self {
            switches,
            n_spin_up,
        }
    }

    /// Steps of spin-up.
    pub fn n_spin_up(&self) -> u64 {
        self.n_spin_up
    }
}

impl StepListener for SpinUp {
    fn on_step(&mut self, step: Step) {
        if step.0 == self.n_spin_up {
            self.switches.set_all(true);
            info!(%step, "spin-up complete, coalescence and sedimentation enabled");
        }
    }
}
