//! Whole-file atomic array writer.
//!
//! [`ArrayWriter`] encodes into a temporary file created next to the
//! target and renames it into place, so a concurrent reader sees either
//! the previous complete file or the new complete file.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::trace;

use cumulus_core::{FieldArray, Precision};

use crate::codec::encode_array;
use crate::error::StoreError;

/// Writes `.npy` files into one directory with a fixed element precision.
#[derive(Debug)]
pub struct ArrayWriter {
    dir: PathBuf,
    precision: Precision,
    files_written: u64,
}

impl ArrayWriter {
    /// A writer targeting `dir`, which must already exist.
    pub fn new(dir: impl Into<PathBuf>, precision: Precision) -> Self {
        Self {
            dir: dir.into(),
            precision,
            files_written: 0,
        }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Element precision of written files.
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Encode `array` and atomically replace `dir/file_name` with it.
    ///
    /// Returns the final path.
    pub fn write(&mut self, file_name: &str, array: &FieldArray) -> Result<PathBuf, StoreError> {
        let target = self.dir.join(file_name);
        let mut staged = NamedTempFile::new_in(&self.dir)?;
        {
            let mut w = BufWriter::new(staged.as_file_mut());
            encode_array(&mut w, array, self.precision)?;
            w.flush()?;
        }
        staged.persist(&target).map_err(|e| StoreError::Io(e.error))?;
        self.files_written += 1;
        trace!(path = %target.display(), elements = array.len(), "array written");
        Ok(target)
    }

    /// Number of files written so far.
    pub fn files_written(&self) -> u64 {
        self.files_written
    }
}
