//! Run controllers: cancellation and progress reporting.
//!
//! A [`Controller`] is consulted before every output step and told about
//! progress after it. [`NullController`] ignores everything.
//! [`ChannelController`] forwards [`Event`]s over a crossbeam channel to
//! whatever is watching the run, and stops it when its [`CancelHandle`]
//! fires.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use tracing::trace;

use cumulus_core::Step;
use cumulus_store::DataRange;

use crate::error::RunError;
use crate::simulation::RunReport;

// ── Events ──────────────────────────────────────────────────────

/// State of a run after an output step was stored.
#[derive(Clone, Debug, PartialEq)]
pub struct Progress {
    /// The output step just stored.
    pub step: Step,
    /// `step / last_output_step`, in `[0, 1]`.
    pub fraction: f64,
    /// Cumulative ranges of every field saved so far, in first-save order.
    pub ranges: Vec<(String, DataRange)>,
}

/// Messages sent by a [`ChannelController`].
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The run is starting with this many output steps.
    Started {
        /// Number of output steps scheduled.
        outputs: usize,
    },
    /// An output step was stored.
    Progress(Progress),
    /// The run ended without error (possibly cancelled).
    Finished(RunReport),
    /// The run ended with an error.
    Failed {
        /// Display form of the error.
        reason: String,
    },
}

// ── Controller ──────────────────────────────────────────────────

/// Supervises a [`Simulation::run`](crate::Simulation::run).
pub trait Controller {
    /// Whether the run should stop before the next output step.
    fn panic(&self) -> bool;

    /// Called after each output step is stored.
    fn set_percent(&mut self, progress: Progress);

    /// Called once before the first output step.
    fn begin(&mut self, _outputs: usize) {}

    /// Called once when the run ends, whether it succeeded or not.
    fn end(&mut self, _outcome: Result<&RunReport, &RunError>) {}
}

/// A controller that never stops the run and discards progress.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullController;

impl Controller for NullController {
    fn panic(&self) -> bool {
        false
    }

    fn set_percent(&mut self, _progress: Progress) {}
}

// ── ChannelController ───────────────────────────────────────────

/// Requests cancellation of a run driven by a [`ChannelController`].
///
/// Cloneable and `Send`; cancelling is sticky.
#[derive(Clone, Debug)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Ask the run to stop before its next output step.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Forwards run events over a channel and honours a shared cancel flag.
///
/// Events are sent on an unbounded channel so a slow consumer never
/// stalls the simulation. A disconnected receiver is not an error; the
/// run continues and events are dropped.
#[derive(Debug)]
pub struct ChannelController {
    tx: Sender<Event>,
    cancel: CancelHandle,
}

impl ChannelController {
    /// A controller and the receiving end of its event channel.
    pub fn new() -> (Self, Receiver<Event>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self::with_sender(tx), rx)
    }

    /// A controller sending into an existing channel.
    pub fn with_sender(tx: Sender<Event>) -> Self {
        Self {
            tx,
            cancel: CancelHandle {
                flag: Arc::new(AtomicBool::new(false)),
            },
        }
    }

    /// A handle that cancels this controller's run.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    fn send(&self, event: Event) {
        if self.tx.send(event).is_err() {
            trace!("event receiver disconnected");
        }
    }
}

impl Controller for ChannelController {
    fn panic(&self) -> bool {
        self.cancel.is_cancelled()
    }

    fn set_percent(&mut self, progress: Progress) {
        self.send(Event::Progress(progress));
    }

    fn begin(&mut self, outputs: usize) {
        self.send(Event::Started { outputs });
    }

    fn end(&mut self, outcome: Result<&RunReport, &RunError>) {
        let event = match outcome {
            Ok(report) => Event::Finished(report.clone()),
            Err(e) => Event::Failed {
                reason: e.to_string(),
            },
        };
        self.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cumulus_core::ProducerError;

    fn progress(step: u64) -> Progress {
        Progress {
            step: Step(step),
            fraction: 0.5,
            ranges: vec![("t".into(), DataRange { min: 0.0, max: 1.0 })],
        }
    }

    #[test]
    fn null_controller_never_panics() {
        let mut c = NullController;
        c.set_percent(progress(1));
        assert!(!c.panic());
    }

    #[test]
    fn events_arrive_in_order() {
        let (mut c, rx) = ChannelController::new();
        c.begin(3);
        c.set_percent(progress(12));
        let report = RunReport::default();
        c.end(Ok(&report));

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                Event::Started { outputs: 3 },
                Event::Progress(progress(12)),
                Event::Finished(report),
            ]
        );
    }

    #[test]
    fn failure_is_reported_as_text() {
        let (mut c, rx) = ChannelController::new();
        let err = RunError::Producer(ProducerError::ExecutionFailed {
            reason: "boom".into(),
        });
        c.end(Err(&err));
        match rx.try_recv().unwrap() {
            Event::Failed { reason } => assert!(reason.contains("boom")),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn cancel_is_shared_and_sticky() {
        let (c, _rx) = ChannelController::new();
        let handle = c.cancel_handle();
        assert!(!c.panic());
        std::thread::spawn(move || handle.cancel()).join().unwrap();
        assert!(c.panic());
        assert!(c.cancel_handle().is_cancelled());
    }

    #[test]
    fn dropped_receiver_is_tolerated() {
        let (mut c, rx) = ChannelController::new();
        drop(rx);
        c.set_percent(progress(0));
        assert!(!c.panic());
    }
}
