//! The output loop.
//!
//! [`Simulation`] advances a [`Producer`] from one output step to the next,
//! notifying [`StepListener`]s after every internal step, and saves every
//! product into the storage at each output step.
//!
//! # Run sequence
//!
//! ```text
//! for step in settings.output_steps():        0, k, 2k, … ≤ n_steps
//!     controller.panic()?  → stop
//!     producer.step() × (step - n_steps)      listeners.on_step(n)
//!     storage.save(product, step, name)       in producer order
//!     controller.set_percent(step / last)
//! ```

use std::sync::Arc;

use tracing::{debug, info};

use cumulus_core::{Producer, RunSettings, Step, StepListener};
use cumulus_store::StepStorage;

use crate::controller::{Controller, Progress};
use crate::error::RunError;
use crate::spin_up::{ProcessSwitches, SpinUp};

// Compile-time assertion: a Simulation can be moved to a worker thread.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check<P: Producer>() {
        assert_send::<Simulation<P>>();
    }
};

// ── RunReport ───────────────────────────────────────────────────

/// Summary of a completed or cancelled run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Output steps whose products were stored.
    pub outputs_stored: usize,
    /// The last output step stored, if any.
    pub last_step: Option<Step>,
    /// Whether the controller stopped the run early.
    pub cancelled: bool,
}

// ── Simulation ──────────────────────────────────────────────────

/// Drives a producer through a run and records its outputs.
///
/// # Example
///
/// ```
/// use cumulus_core::{FieldValue, Grid, Producer, ProducerError, RunSettings, Step};
/// use cumulus_engine::{NullController, ProcessSwitches, Simulation};
/// use cumulus_store::{StepStorage, StorageConfig};
///
/// /// Reports its own step count.
/// struct Clock(u64);
///
/// impl Producer for Clock {
///     fn n_steps(&self) -> u64 {
///         self.0
///     }
///
///     fn step(&mut self) -> Result<(), ProducerError> {
///         self.0 += 1;
///         Ok(())
///     }
///
///     fn products(&self) -> Result<Vec<(String, FieldValue)>, ProducerError> {
///         Ok(vec![("t".into(), FieldValue::Scalar(self.0 as f64))])
///     }
/// }
///
/// let settings = RunSettings {
///     dt: 1.0,
///     simulation_time: 10.0,
///     output_interval: 5.0,
///     spin_up_time: 3.0,
///     ..RunSettings::with_grid(Grid::new(4, 4).unwrap())
/// };
/// let storage = StepStorage::open(StorageConfig::default()).unwrap();
/// let mut sim = Simulation::new(settings, storage, Clock(0)).unwrap();
/// let switches = ProcessSwitches::new();
/// sim.with_spin_up(switches.clone());
/// sim.reinit();
///
/// let report = sim.run(&mut NullController).unwrap();
/// assert_eq!(report.last_step, Some(Step(10)));
/// let series = sim.storage().load("t", None).unwrap();
/// assert_eq!(series.to_vec(), vec![0.0, 5.0, 10.0]);
/// assert!(switches.coalescence());
/// ```
pub struct Simulation<P: Producer> {
    settings: RunSettings,
    storage: StepStorage,
    producer: P,
    listeners: Vec<Box<dyn StepListener>>,
}

impl<P: Producer> Simulation<P> {
    /// Validate `settings` and assemble a simulation.
    ///
    /// The storage is not bound until [`reinit`](Self::reinit).
    pub fn new(settings: RunSettings, storage: StepStorage, producer: P) -> Result<Self, RunError> {
        settings.validate()?;
        Ok(Self {
            settings,
            storage,
            producer,
            listeners: Vec::new(),
        })
    }

    /// Register a listener called after every internal step.
    pub fn add_listener(&mut self, listener: Box<dyn StepListener>) {
        self.listeners.push(listener);
    }

    /// Hold back coalescence and sedimentation for the configured spin-up.
    pub fn with_spin_up(&mut self, switches: Arc<ProcessSwitches>) {
        let n_spin_up = self.settings.n_spin_up();
        self.add_listener(Box::new(SpinUp::new(switches, n_spin_up)));
    }

    /// Bind the storage to this run's settings.
    pub fn reinit(&mut self) {
        self.storage.init(&self.settings);
    }

    /// Run settings.
    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    /// The storage outputs are recorded into.
    pub fn storage(&self) -> &StepStorage {
        &self.storage
    }

    /// The driven producer.
    pub fn producer(&self) -> &P {
        &self.producer
    }

    /// Tear down into storage and producer.
    pub fn into_parts(self) -> (StepStorage, P) {
        (self.storage, self.producer)
    }

    /// Run every output step, or until `controller` asks to stop.
    ///
    /// `controller.end` is called with the outcome on every exit path.
    ///
    /// # Errors
    ///
    /// The first producer or storage failure ends the run. Outputs stored
    /// before it stay on disk.
    pub fn run(&mut self, controller: &mut dyn Controller) -> Result<RunReport, RunError> {
        let steps = self.settings.output_steps();
        info!(
            outputs = steps.len(),
            n_steps = self.settings.n_steps(),
            dir = %self.storage.dir().display(),
            "run started"
        );
        controller.begin(steps.len());
        let outcome = self.run_outputs(&steps, controller);
        controller.end(outcome.as_ref());
        match &outcome {
            Ok(report) => info!(
                stored = report.outputs_stored,
                cancelled = report.cancelled,
                "run finished"
            ),
            Err(e) => info!(error = %e, "run failed"),
        }
        outcome
    }

    /// Save every current product at `step`, in producer order.
    pub fn store(&mut self, step: Step) -> Result<(), RunError> {
        let products = self.producer.products()?;
        for (name, value) in &products {
            self.storage.save(value, step, name)?;
        }
        debug!(%step, products = products.len(), "outputs stored");
        Ok(())
    }

    fn run_outputs(
        &mut self,
        steps: &[Step],
        controller: &mut dyn Controller,
    ) -> Result<RunReport, RunError> {
        let last = steps.last().copied().unwrap_or(Step::ZERO);
        let mut report = RunReport::default();
        for &step in steps {
            if controller.panic() {
                info!(%step, "run cancelled");
                report.cancelled = true;
                break;
            }
            self.advance_to(step)?;
            self.store(step)?;
            report.outputs_stored += 1;
            report.last_step = Some(step);
            controller.set_percent(self.progress(step, last)?);
        }
        Ok(report)
    }

    fn advance_to(&mut self, target: Step) -> Result<(), RunError> {
        let pending = target.0.saturating_sub(self.producer.n_steps());
        for _ in 0..pending {
            self.producer.step()?;
            let now = Step(self.producer.n_steps());
            for listener in &mut self.listeners {
                listener.on_step(now);
            }
        }
        Ok(())
    }

    fn progress(&self, step: Step, last: Step) -> Result<Progress, RunError> {
        let fraction = if last.0 == 0 {
            1.0
        } else {
            step.0 as f64 / last.0 as f64
        };
        let ranges = self
            .storage
            .ranges()?
            .iter()
            .map(|(name, range)| (name.to_string(), range))
            .collect();
        Ok(Progress {
            step,
            fraction,
            ranges,
        })
    }
}
