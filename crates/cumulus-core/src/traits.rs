//! Seams between the output loop and the external simulation engine.

use crate::array::FieldValue;
use crate::error::ProducerError;
use crate::id::Step;

/// The simulation engine as seen by the output loop.
///
/// Implementations wrap whatever actually integrates the particle system.
/// The loop only advances it one internal step at a time and asks for the
/// named products to record at output steps.
///
/// `Send` so a whole run can be handed to a worker thread.
pub trait Producer: Send {
    /// Internal steps completed so far.
    fn n_steps(&self) -> u64;

    /// Advance by one internal step.
    fn step(&mut self) -> Result<(), ProducerError>;

    /// Current values of every tracked product, in recording order.
    ///
    /// Scalar products become time series; array products must match the
    /// run's grid in their first two dimensions.
    fn products(&self) -> Result<Vec<(String, FieldValue)>, ProducerError>;
}

/// Callback invoked after every internal step of a [`Producer`].
///
/// Listeners are owned by the output loop, which may be moved to a worker
/// thread, so they must be `Send`.
pub trait StepListener: Send {
    /// Called with the number of internal steps completed so far.
    fn on_step(&mut self, step: Step);
}
