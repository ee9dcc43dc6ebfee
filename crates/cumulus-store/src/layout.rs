//! File naming inside a backing directory.
//!
//! - `<name>.npy` holds the whole scalar series of `name`.
//! - `<name>_<step:06>.npy` holds the gridded snapshot of `name` at `step`.
//!
//! A directory listing therefore maps one-to-one onto (field, step) pairs.
//! Field names that already end in a step suffix (`_` plus six or more
//! digits) are rejected, since their series file would collide with a
//! snapshot of the shorter name.

use cumulus_core::Step;

use crate::error::StoreError;

/// Extension of every stored file.
pub const EXTENSION: &str = "npy";

/// Minimum zero-padded width of the step suffix.
const STEP_WIDTH: usize = 6;

/// A stored file, identified by field name and optional step.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entry {
    /// Field name.
    pub name: String,
    /// Snapshot step, or `None` for a scalar series.
    pub step: Option<Step>,
}

/// Reject names that cannot be used as a file stem.
pub fn validate_name(name: &str) -> Result<(), StoreError> {
    let reason = if name.is_empty() {
        "name is empty"
    } else if name.starts_with('.') {
        "name starts with '.'"
    } else if name.contains(['/', '\\']) {
        "name contains a path separator"
    } else if name.contains('\0') {
        "name contains NUL"
    } else if split_step(name).is_some() {
        "name ends in a step suffix"
    } else {
        return Ok(());
    };
    Err(StoreError::InvalidName {
        name: name.to_string(),
        reason,
    })
}

/// File name for `name`, keyed by `step` for snapshots.
pub fn file_name(name: &str, step: Option<Step>) -> String {
    match step {
        None => format!("{name}.{EXTENSION}"),
        Some(step) => format!("{name}_{:0width$}.{EXTENSION}", step.0, width = STEP_WIDTH),
    }
}

/// Split `stem` into a field name and the step encoded in its suffix.
fn split_step(stem: &str) -> Option<(&str, Step)> {
    let (name, digits) = stem.rsplit_once('_')?;
    if name.is_empty() || digits.len() < STEP_WIDTH || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    let step = digits.parse::<u64>().ok()?;
    Some((name, Step(step)))
}

/// Inverse of [`file_name`]. Returns `None` for files this crate did not write.
pub fn parse_file_name(file_name: &str) -> Option<Entry> {
    let stem = file_name.strip_suffix(EXTENSION)?.strip_suffix('.')?;
    if stem.is_empty() || stem.starts_with('.') {
        return None;
    }
    Some(match split_step(stem) {
        Some((name, step)) => Entry {
            name: name.to_string(),
            step: Some(step),
        },
        None => Entry {
            name: stem.to_string(),
            step: None,
        },
    })
}
