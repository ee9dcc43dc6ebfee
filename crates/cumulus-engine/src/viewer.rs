//! Consumer-side view of a run.
//!
//! A [`Viewer`] reads stored outputs through a [`StorageReader`] and keeps
//! the latest range table received from a [`ChannelController`]'s events.
//! Missing data is not an error here: a field or step that has not been
//! written yet comes back as `None` so the caller can show an empty panel.
//!
//! [`ChannelController`]: crate::ChannelController

use crossbeam_channel::Receiver;
use indexmap::IndexMap;
use tracing::debug;

use cumulus_core::{FieldArray, Step};
use cumulus_store::{DataRange, StorageReader, StoreError};

use crate::controller::Event;
use crate::simulation::RunReport;

/// Follows a run from another thread.
#[derive(Debug)]
pub struct Viewer {
    reader: StorageReader,
    ranges: IndexMap<String, DataRange>,
    latest: Option<Step>,
    fraction: f64,
    outputs: Option<usize>,
    finished: Option<RunReport>,
    failure: Option<String>,
}

impl Viewer {
    /// A viewer over the directory `reader` points at.
    pub fn new(reader: StorageReader) -> Self {
        Self {
            reader,
            ranges: IndexMap::new(),
            latest: None,
            fraction: 0.0,
            outputs: None,
            finished: None,
            failure: None,
        }
    }

    /// The snapshot of `name` at `step`, or `None` if not written yet.
    pub fn snapshot(&self, name: &str, step: Step) -> Result<Option<FieldArray>, StoreError> {
        blank_if_missing(self.reader.load(name, Some(step)))
    }

    /// The scalar series of `name`, or `None` if not written yet.
    pub fn series(&self, name: &str) -> Result<Option<Vec<f64>>, StoreError> {
        blank_if_missing(self.reader.load_series(name))
    }

    /// Colour-scale bounds for `name` from the most recent progress event.
    ///
    /// `None` until the field has a non-empty range.
    pub fn color_range(&self, name: &str) -> Option<DataRange> {
        self.ranges.get(name).copied().filter(|r| !r.is_empty())
    }

    /// Fields that have at least one stored snapshot, sorted.
    pub fn gridded_fields(&self) -> Result<Vec<String>, StoreError> {
        let mut names: Vec<String> = self
            .reader
            .entries()?
            .into_iter()
            .filter(|e| e.step.is_some())
            .map(|e| e.name)
            .collect();
        names.dedup();
        Ok(names)
    }

    /// Stored steps of `name`, ascending.
    pub fn steps(&self, name: &str) -> Result<Vec<Step>, StoreError> {
        self.reader.steps(name)
    }

    /// Apply every event waiting on `rx` without blocking.
    ///
    /// Returns the number of events applied.
    pub fn poll(&mut self, rx: &Receiver<Event>) -> usize {
        let mut applied = 0;
        for event in rx.try_iter() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Apply a single event.
    pub fn apply(&mut self, event: Event) {
        match event {
            Event::Started { outputs } => {
                self.ranges.clear();
                self.latest = None;
                self.fraction = 0.0;
                self.outputs = Some(outputs);
                self.finished = None;
                self.failure = None;
            }
            Event::Progress(progress) => {
                debug!(step = %progress.step, fraction = progress.fraction, "progress");
                self.latest = Some(progress.step);
                self.fraction = progress.fraction;
                self.ranges = progress.ranges.into_iter().collect();
            }
            Event::Finished(report) => self.finished = Some(report),
            Event::Failed { reason } => self.failure = Some(reason),
        }
    }

    /// The most recent output step reported.
    pub fn latest_step(&self) -> Option<Step> {
        self.latest
    }

    /// Progress of the run in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    /// Output steps scheduled by the current run, once it has started.
    pub fn outputs(&self) -> Option<usize> {
        self.outputs
    }

    /// The report of a run that ended without error.
    pub fn finished(&self) -> Option<&RunReport> {
        self.finished.as_ref()
    }

    /// The error message of a run that failed.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// The underlying reader.
    pub fn reader(&self) -> &StorageReader {
        &self.reader
    }
}

fn blank_if_missing<T>(result: Result<T, StoreError>) -> Result<Option<T>, StoreError> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}
