//! Output loop, run controllers, and viewers for Cumulus simulations.
//!
//! Drives a [`Producer`](cumulus_core::Producer) through a run, storing its
//! products at every output step into a
//! [`StepStorage`](cumulus_store::StepStorage), and exposes the stored
//! outputs to consumers on other threads.
//!
//! # Architecture
//!
//! ```text
//! Simulation thread                         Viewer thread
//!     |                                          |
//!     | producer.step() ×k ──► listeners         |
//!     | storage.save(products)                   |
//!     | controller.set_percent(progress) ──────► | viewer.poll(&rx)
//!     |   [crossbeam unbounded]                  | viewer.snapshot(name, step)
//!     |                                          |   (StorageReader, same dir)
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod controller;
pub mod error;
pub mod simulation;
pub mod spin_up;
pub mod viewer;

pub use controller::{CancelHandle, ChannelController, Controller, Event, NullController, Progress};
pub use error::RunError;
pub use simulation::{RunReport, Simulation};
pub use spin_up::{ProcessSwitches, SpinUp};
pub use viewer::Viewer;
