//! Errors raised while driving a run.

use std::error::Error;
use std::fmt;

use cumulus_core::{ConfigError, ProducerError};
use cumulus_store::StoreError;

/// Failure of [`Simulation`](crate::Simulation) construction or a run.
#[derive(Debug)]
pub enum RunError {
    /// Run settings failed validation.
    Config(ConfigError),
    /// The producer could not advance or evaluate its products.
    Producer(ProducerError),
    /// Saving a product failed.
    Store(StoreError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Producer(e) => write!(f, "producer: {e}"),
            Self::Store(e) => write!(f, "store: {e}"),
        }
    }
}

impl Error for RunError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Producer(e) => Some(e),
            Self::Store(e) => Some(e),
        }
    }
}

impl From<ConfigError> for RunError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<ProducerError> for RunError {
    fn from(e: ProducerError) -> Self {
        Self::Producer(e)
    }
}

impl From<StoreError> for RunError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}
