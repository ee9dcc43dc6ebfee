//! The step-indexed field store.
//!
//! [`StepStorage`] buffers simulation outputs on disk between the loop that
//! produces them and the viewers and exporters that consume them later.
//!
//! # Lifecycle
//!
//! ```text
//! open ──► init(settings) ──► { save | load | data_range }*
//!              ▲                        │
//!              └────── re-init ─────────┘   (clears ranges, keeps files)
//! ```
//!
//! Dropping a storage opened on a temporary directory deletes the
//! directory. A persistent path is left in place for later readers.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, info};

use cumulus_core::{FieldArray, Grid, Precision, RunSettings, Sample, Step};

use crate::error::StoreError;
use crate::layout::{file_name, validate_name, Entry};
use crate::range::{DataRange, RangeTable};
use crate::reader::StorageReader;
use crate::writer::ArrayWriter;

// ── StorageConfig ───────────────────────────────────────────────

/// How to open a [`StepStorage`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StorageConfig {
    /// Element precision of stored files. Default: single precision.
    pub precision: Precision,
    /// Backing directory. `None` creates a temporary directory that is
    /// removed on drop; `Some` is created if missing and never removed.
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    /// A persistent store at `path` with default precision.
    pub fn persistent(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Same configuration with a different precision.
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }
}

// ── Backing directory ───────────────────────────────────────────

#[derive(Debug)]
enum Backing {
    Temporary(TempDir),
    Persistent(PathBuf),
}

impl Backing {
    fn path(&self) -> &Path {
        match self {
            Self::Temporary(dir) => dir.path(),
            Self::Persistent(path) => path,
        }
    }
}

// ── StepStorage ─────────────────────────────────────────────────

/// Grid and range state that only exists after `init`.
#[derive(Debug)]
struct Bound {
    grid: Grid,
    ranges: RangeTable,
}

/// A keyed, step-indexed cache of scalar series and gridded snapshots.
///
/// # Examples
///
/// ```
/// use cumulus_core::{FieldArray, Grid, RunSettings, Step};
/// use cumulus_store::{StepStorage, StorageConfig};
///
/// let mut storage = StepStorage::open(StorageConfig::default()).unwrap();
/// storage.init(&RunSettings::with_grid(Grid::new(4, 5).unwrap()));
///
/// storage.save(2.5, Step(0), "t").unwrap();
/// storage.save(3.5, Step(1), "t").unwrap();
/// assert_eq!(storage.load("t", None).unwrap().to_vec(), vec![2.5, 3.5]);
/// assert_eq!(storage.data_range("t").unwrap().as_tuple(), (2.5, 3.5));
///
/// let ones = FieldArray::filled(&[4, 5], 1.0);
/// storage.save(&ones, Step(0), "qc").unwrap();
/// assert_eq!(storage.load("qc", Some(Step(0))).unwrap(), ones);
/// ```
#[derive(Debug)]
pub struct StepStorage {
    backing: Backing,
    writer: ArrayWriter,
    reader: StorageReader,
    bound: Option<Bound>,
}

impl StepStorage {
    /// Open a storage, creating its backing directory.
    pub fn open(config: StorageConfig) -> Result<Self, StoreError> {
        let backing = match config.path {
            None => Backing::Temporary(tempfile::Builder::new().prefix("cumulus-").tempdir()?),
            Some(path) => {
                std::fs::create_dir_all(&path)?;
                Backing::Persistent(std::path::absolute(&path)?)
            }
        };
        let dir = backing.path().to_path_buf();
        debug!(dir = %dir.display(), precision = ?config.precision, "storage opened");
        Ok(Self {
            writer: ArrayWriter::new(dir.clone(), config.precision),
            reader: StorageReader::new(dir),
            backing,
            bound: None,
        })
    }

    /// Bind the grid from `settings` and reset range tracking.
    ///
    /// Files already on disk are left alone.
    pub fn init(&mut self, settings: &RunSettings) {
        info!(grid = %settings.grid, dir = %self.dir().display(), "storage initialised");
        self.bound = Some(Bound {
            grid: settings.grid,
            ranges: RangeTable::new(),
        });
    }

    /// Whether [`init`](Self::init) has been called.
    pub fn is_initialized(&self) -> bool {
        self.bound.is_some()
    }

    /// The bound grid.
    pub fn grid(&self) -> Result<Grid, StoreError> {
        Ok(self.bound()?.grid)
    }

    /// The backing directory.
    pub fn dir(&self) -> &Path {
        self.backing.path()
    }

    /// Whether the backing directory is removed on drop.
    pub fn is_temporary(&self) -> bool {
        matches!(self.backing, Backing::Temporary(_))
    }

    /// Element precision of stored files.
    pub fn precision(&self) -> Precision {
        self.writer.precision()
    }

    /// A detached reader over the same directory.
    pub fn reader(&self) -> StorageReader {
        self.reader.clone()
    }

    /// Record `data` for field `name` at `step`.
    ///
    /// Scalars form a series: step 0 starts it, later steps append to the
    /// stored sequence. Arrays are stored one file per step and must match
    /// the bound grid in their first two dimensions.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Uninitialized`] before `init`.
    /// - [`StoreError::ShapeMismatch`] for an array not matching the grid.
    /// - [`StoreError::NotFound`] when appending to a series that has no
    ///   step-0 file.
    /// - [`StoreError::InvalidName`] or I/O errors otherwise.
    pub fn save<'a>(
        &mut self,
        data: impl Into<Sample<'a>>,
        step: impl Into<Step>,
        name: &str,
    ) -> Result<(), StoreError> {
        let data = data.into();
        let step = step.into();
        validate_name(name)?;
        let grid = self.bound()?.grid;

        match data {
            Sample::Scalar(value) => {
                let mut series = if step.is_first() {
                    Vec::with_capacity(1)
                } else {
                    self.reader.load_series(name)?
                };
                series.push(self.precision().reduce(value));
                self.writer
                    .write(&file_name(name, None), &FieldArray::from_vec(series))?;
            }
            Sample::Array(array) => {
                if !grid.matches(array.shape()) {
                    return Err(StoreError::ShapeMismatch {
                        name: name.to_string(),
                        expected: grid,
                        found: array.shape().to_vec(),
                    });
                }
                self.writer.write(&file_name(name, Some(step)), array)?;
            }
        }

        self.bound_mut()?.ranges.record(name, data);
        debug!(field = name, %step, "saved");
        Ok(())
    }

    /// Load a scalar series (`step == None`) or the snapshot at `step`.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when the field or step was never written.
    pub fn load(&self, name: &str, step: Option<Step>) -> Result<FieldArray, StoreError> {
        self.bound()?;
        self.reader.load(name, step)
    }

    /// Cumulative `(min, max)` of everything saved for `name` since `init`.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when `name` was never saved.
    pub fn data_range(&self, name: &str) -> Result<DataRange, StoreError> {
        self.bound()?
            .ranges
            .get(name)
            .ok_or_else(|| StoreError::NotFound {
                name: name.to_string(),
                step: None,
            })
    }

    /// All ranges recorded since `init`.
    pub fn ranges(&self) -> Result<&RangeTable, StoreError> {
        Ok(&self.bound()?.ranges)
    }

    /// Files currently in the backing directory.
    pub fn entries(&self) -> Result<Vec<Entry>, StoreError> {
        self.reader.entries()
    }

    fn bound(&self) -> Result<&Bound, StoreError> {
        self.bound.as_ref().ok_or(StoreError::Uninitialized)
    }

    fn bound_mut(&mut self) -> Result<&mut Bound, StoreError> {
        self.bound.as_mut().ok_or(StoreError::Uninitialized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn settings(nx: usize, nz: usize) -> RunSettings {
        RunSettings::with_grid(Grid::new(nx, nz).unwrap())
    }

    fn initialised(nx: usize, nz: usize) -> StepStorage {
        let mut storage = StepStorage::open(StorageConfig::default()).unwrap();
        storage.init(&settings(nx, nz));
        storage
    }

    #[test]
    fn use_before_init_is_rejected() {
        let mut storage = StepStorage::open(StorageConfig::default()).unwrap();
        assert!(!storage.is_initialized());
        assert!(matches!(
            storage.save(1.0, Step(0), "t"),
            Err(StoreError::Uninitialized)
        ));
        assert!(matches!(storage.load("t", None), Err(StoreError::Uninitialized)));
        assert!(matches!(storage.data_range("t"), Err(StoreError::Uninitialized)));
        assert!(matches!(storage.grid(), Err(StoreError::Uninitialized)));
    }

    #[test]
    fn scalar_series_scenario() {
        let mut storage = initialised(4, 5);
        storage.save(2.5, Step(0), "t").unwrap();
        storage.save(3.5, Step(1), "t").unwrap();
        assert_eq!(storage.load("t", None).unwrap().to_vec(), vec![2.5, 3.5]);
        assert_eq!(storage.data_range("t").unwrap().as_tuple(), (2.5, 3.5));
    }

    #[test]
    fn step_zero_restarts_series() {
        let mut storage = initialised(4, 5);
        for (i, v) in [1.0, 2.0, 3.0].into_iter().enumerate() {
            storage.save(v, Step(i as u64), "t").unwrap();
        }
        storage.save(9.0, Step(0), "t").unwrap();
        assert_eq!(storage.load("t", None).unwrap().to_vec(), vec![9.0]);
        // The range keeps widening across restarts.
        assert_eq!(storage.data_range("t").unwrap().as_tuple(), (1.0, 9.0));
    }

    #[test]
    fn append_without_series_is_not_found() {
        let mut storage = initialised(4, 5);
        let err = storage.save(1.0, Step(3), "t").unwrap_err();
        assert!(err.is_not_found());
        assert!(storage.data_range("t").unwrap_err().is_not_found());
    }

    #[test]
    fn gridded_scenario() {
        let mut storage = initialised(4, 5);
        let ones = FieldArray::filled(&[4, 5], 1.0);
        storage.save(&ones, Step(0), "qc").unwrap();
        assert_eq!(storage.load("qc", Some(Step(0))).unwrap(), ones);

        let wrong = FieldArray::filled(&[3, 5], 1.0);
        let err = storage.save(&wrong, Step(1), "qc").unwrap_err();
        assert!(matches!(
            err,
            StoreError::ShapeMismatch { ref found, .. } if found == &vec![3, 5]
        ));
        assert!(storage.load("qc", Some(Step(1))).unwrap_err().is_not_found());
    }

    #[test]
    fn trailing_dimensions_are_allowed() {
        let mut storage = initialised(4, 5);
        let spectrum = FieldArray::filled(&[4, 5, 8], 0.25);
        storage.save(&spectrum, Step(12), "Particles Wet Size Spectrum").unwrap();
        let got = storage
            .load("Particles Wet Size Spectrum", Some(Step(12)))
            .unwrap();
        assert_eq!(got.shape(), &[4, 5, 8]);
    }

    #[test]
    fn transposed_grid_is_mismatch() {
        let mut storage = initialised(4, 5);
        let err = storage
            .save(&FieldArray::filled(&[5, 4], 0.0), Step(0), "qv")
            .unwrap_err();
        assert!(matches!(err, StoreError::ShapeMismatch { .. }));
        assert!(!err.is_not_found());
    }

    #[test]
    fn one_dimensional_array_is_mismatch() {
        let mut storage = initialised(4, 5);
        let err = storage
            .save(&FieldArray::from_vec(vec![0.0; 20]), Step(0), "qv")
            .unwrap_err();
        assert!(matches!(err, StoreError::ShapeMismatch { .. }));
    }

    #[test]
    fn values_are_stored_in_single_precision() {
        let mut storage = initialised(2, 2);
        let third = 1.0 / 3.0;
        storage.save(third, Step(0), "t").unwrap();
        let got = storage.load("t", None).unwrap().to_vec()[0];
        assert_eq!(got, (1.0f32 / 3.0f32) as f64);
        assert_ne!(got, third);
        // The range is tracked on the values as passed in.
        assert_eq!(storage.data_range("t").unwrap().min, third);
    }

    #[test]
    fn double_precision_is_lossless() {
        let mut storage =
            StepStorage::open(StorageConfig::default().with_precision(Precision::F64)).unwrap();
        storage.init(&settings(2, 2));
        let third = 1.0 / 3.0;
        storage.save(third, Step(0), "t").unwrap();
        assert_eq!(storage.load("t", None).unwrap().to_vec(), vec![third]);
    }

    #[test]
    fn gridded_range_covers_all_steps() {
        let mut storage = initialised(2, 2);
        let a = FieldArray::new(&[2, 2], vec![0.0, 1.0, 2.0, 3.0]).unwrap();
        let b = FieldArray::new(&[2, 2], vec![-5.0, 1.0, 2.0, 0.5]).unwrap();
        storage.save(&a, Step(0), "th").unwrap();
        storage.save(&b, Step(6), "th").unwrap();
        assert_eq!(storage.data_range("th").unwrap().as_tuple(), (-5.0, 3.0));
    }

    #[test]
    fn failed_save_does_not_touch_range() {
        let mut storage = initialised(2, 2);
        storage.save(&FieldArray::filled(&[2, 2], 1.0), Step(0), "qr").unwrap();
        let _ = storage.save(&FieldArray::filled(&[3, 3], 100.0), Step(1), "qr");
        assert_eq!(storage.data_range("qr").unwrap().as_tuple(), (1.0, 1.0));
    }

    #[test]
    fn reinit_resets_ranges_but_keeps_files() {
        let mut storage = initialised(2, 2);
        storage.save(4.0, Step(0), "t").unwrap();
        storage.init(&settings(3, 3));
        assert!(storage.data_range("t").unwrap_err().is_not_found());
        assert_eq!(storage.load("t", None).unwrap().to_vec(), vec![4.0]);
        assert_eq!(storage.grid().unwrap(), Grid::new(3, 3).unwrap());
    }

    #[test]
    fn temporary_directory_removed_on_drop() {
        let storage = initialised(2, 2);
        let dir = storage.dir().to_path_buf();
        assert!(storage.is_temporary());
        assert!(dir.is_dir());
        drop(storage);
        assert!(!dir.exists());
    }

    #[test]
    fn persistent_directory_survives_drop() {
        let root = tempdir().unwrap();
        let path = root.path().join("run").join("outputs");
        {
            let mut storage = StepStorage::open(StorageConfig::persistent(&path)).unwrap();
            assert!(!storage.is_temporary());
            storage.init(&settings(2, 2));
            storage.save(7.0, Step(0), "surf_precip").unwrap();
        }
        assert!(path.join("surf_precip.npy").is_file());

        // A second storage on the same path reads the earlier run.
        let mut again = StepStorage::open(StorageConfig::persistent(&path)).unwrap();
        again.init(&settings(2, 2));
        assert_eq!(again.load("surf_precip", None).unwrap().to_vec(), vec![7.0]);
    }

    #[test]
    fn directory_listing_maps_to_fields() {
        let mut storage = initialised(2, 2);
        storage.save(0.0, Step(0), "surf_precip").unwrap();
        storage.save(&FieldArray::filled(&[2, 2], 0.0), Step(0), "qc").unwrap();
        storage.save(&FieldArray::filled(&[2, 2], 0.0), Step(12), "qc").unwrap();
        let entries = storage.entries().unwrap();
        assert_eq!(
            entries,
            vec![
                Entry { name: "qc".into(), step: Some(Step(0)) },
                Entry { name: "qc".into(), step: Some(Step(12)) },
                Entry { name: "surf_precip".into(), step: None },
            ]
        );
    }

    #[test]
    fn invalid_names_rejected() {
        let mut storage = initialised(2, 2);
        for bad in ["", "../escape", "a/b"] {
            assert!(matches!(
                storage.save(1.0, Step(0), bad),
                Err(StoreError::InvalidName { .. })
            ));
        }
    }
}
