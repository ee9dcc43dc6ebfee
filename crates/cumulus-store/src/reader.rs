//! Read-only access to a backing directory.
//!
//! [`StorageReader`] needs nothing but the directory path, so a viewer in
//! another thread or process can follow a run while it is being written.
//! Element precision is taken from each file's header.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;

use cumulus_core::{FieldArray, Step};

use crate::codec::decode_array;
use crate::error::StoreError;
use crate::layout::{file_name, parse_file_name, validate_name, Entry};

/// Loads stored fields from a directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageReader {
    dir: PathBuf,
}

impl StorageReader {
    /// A reader over `dir`. The directory is not checked until first use.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The backing directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load a scalar series (`step == None`) or a gridded snapshot.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when no such file exists; other filesystem
    /// and decoding failures propagate unchanged.
    pub fn load(&self, name: &str, step: Option<Step>) -> Result<FieldArray, StoreError> {
        validate_name(name)?;
        let path = self.dir.join(file_name(name, step));
        let file = File::open(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound {
                name: name.to_string(),
                step,
            },
            _ => StoreError::Io(e),
        })?;
        let (array, precision) = decode_array(&mut BufReader::new(file))?;
        debug!(field = name, ?step, shape = ?array.shape(), ?precision, "loaded");
        Ok(array)
    }

    /// Load the full scalar series of `name` as a flat vector.
    pub fn load_series(&self, name: &str) -> Result<Vec<f64>, StoreError> {
        Ok(self.load(name, None)?.to_vec())
    }

    /// Every stored file, sorted by name then step (series first).
    pub fn entries(&self) -> Result<Vec<Entry>, StoreError> {
        let mut entries = Vec::new();
        for dirent in std::fs::read_dir(&self.dir)? {
            let dirent = dirent?;
            let Some(entry) = dirent.file_name().to_str().and_then(parse_file_name) else {
                continue;
            };
            match dirent.file_type() {
                Ok(kind) if kind.is_file() => entries.push(entry),
                Ok(_) => {}
                // Renamed or removed by a concurrent writer since the listing.
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        entries.sort();
        Ok(entries)
    }

    /// Steps with a stored snapshot of `name`, ascending.
    pub fn steps(&self, name: &str) -> Result<Vec<Step>, StoreError> {
        Ok(self
            .entries()?
            .into_iter()
            .filter(|e| e.name == name)
            .filter_map(|e| e.step)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::ArrayWriter;
    use cumulus_core::Precision;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let reader = StorageReader::new(dir.path());
        let err = reader.load("qc", Some(Step(3))).unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound { ref name, step: Some(Step(3)) } if name == "qc"
        ));
        assert!(reader.load_series("surf_precip").unwrap_err().is_not_found());
    }

    #[test]
    fn corrupt_file_is_not_not_found() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("t.npy"), b"garbage").unwrap();
        let err = StorageReader::new(dir.path()).load("t", None).unwrap_err();
        assert!(!err.is_not_found());
    }

    #[test]
    fn entries_list_series_and_snapshots() {
        let dir = tempdir().unwrap();
        let mut writer = ArrayWriter::new(dir.path(), Precision::F32);
        let grid = FieldArray::filled(&[2, 3], 0.0);
        writer.write("qc_000012.npy", &grid).unwrap();
        writer.write("qc_000000.npy", &grid).unwrap();
        writer
            .write("surf_precip.npy", &FieldArray::from_vec(vec![0.0]))
            .unwrap();
        std::fs::write(dir.path().join("README.txt"), b"run notes").unwrap();
        std::fs::create_dir(dir.path().join("plots.npy")).unwrap();

        let reader = StorageReader::new(dir.path());
        let entries = reader.entries().unwrap();
        assert_eq!(
            entries,
            vec![
                Entry { name: "qc".into(), step: Some(Step(0)) },
                Entry { name: "qc".into(), step: Some(Step(12)) },
                Entry { name: "surf_precip".into(), step: None },
            ]
        );
        assert_eq!(reader.steps("qc").unwrap(), vec![Step(0), Step(12)]);
        assert!(reader.steps("surf_precip").unwrap().is_empty());
    }
}
