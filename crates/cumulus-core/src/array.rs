//! Field values: scalars and n-dimensional arrays, plus element precision.
//!
//! Arrays are kept as `f64` in memory regardless of the precision they are
//! stored with. [`Precision::reduce`] rounds a value to what a stored file
//! can represent, so a loaded array compares equal to the reduced input.

use ndarray::{ArrayD, ArrayViewD, IxDyn};

use crate::error::ArrayError;

/// Fixed-width element type used for stored values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Precision {
    /// IEEE-754 single precision (`<f4`). Default.
    #[default]
    F32,
    /// IEEE-754 double precision (`<f8`).
    F64,
}

impl Precision {
    /// Round a value to this precision.
    #[inline]
    pub fn reduce(self, v: f64) -> f64 {
        match self {
            Self::F32 => v as f32 as f64,
            Self::F64 => v,
        }
    }
}

/// A dense n-dimensional array of `f64`, indexed in C order.
///
/// A thin wrapper over [`ndarray::ArrayD`] that always holds its elements
/// in standard (row-major) layout.
///
/// # Examples
///
/// ```
/// use cumulus_core::FieldArray;
///
/// let a = FieldArray::new(&[2, 3], vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
/// assert_eq!(a.get(&[1, 2]), Some(5.0));
/// assert_eq!(a.extent(), Some((0.0, 5.0)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FieldArray {
    data: ArrayD<f64>,
}

impl FieldArray {
    /// Wrap C-ordered `values` with the given shape.
    ///
    /// Fails when the product of `shape` differs from `values.len()` or
    /// does not fit in `usize`.
    pub fn new(shape: &[usize], values: Vec<f64>) -> Result<Self, ArrayError> {
        let expected = element_count(shape).ok_or_else(|| ArrayError::ShapeOverflow {
            shape: shape.to_vec(),
        })?;
        if expected != values.len() {
            return Err(ArrayError::LengthMismatch {
                shape: shape.to_vec(),
                expected,
                actual: values.len(),
            });
        }
        ArrayD::from_shape_vec(IxDyn(shape), values)
            .map(Self::from)
            .map_err(|_| ArrayError::ShapeOverflow {
                shape: shape.to_vec(),
            })
    }

    /// An array of `shape` with every element set to `value`.
    ///
    /// # Panics
    ///
    /// If the element count of `shape` overflows `isize`.
    pub fn filled(shape: &[usize], value: f64) -> Self {
        Self {
            data: ArrayD::from_elem(IxDyn(shape), value),
        }
    }

    /// A one-dimensional array.
    pub fn from_vec(values: Vec<f64>) -> Self {
        Self {
            data: ndarray::Array1::from_vec(values).into_dyn(),
        }
    }

    /// The array's shape.
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    /// Elements copied out in C order.
    pub fn to_vec(&self) -> Vec<f64> {
        self.data.iter().copied().collect()
    }

    /// Elements in C order.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().copied()
    }

    /// Borrow the underlying array.
    pub fn view(&self) -> ArrayViewD<'_, f64> {
        self.data.view()
    }

    /// Consume the wrapper and return the underlying array.
    pub fn into_inner(self) -> ArrayD<f64> {
        self.data
    }

    /// Total element count.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Element at a multi-dimensional index, or `None` if out of bounds.
    pub fn get(&self, index: &[usize]) -> Option<f64> {
        self.data.get(index).copied()
    }

    /// Minimum and maximum element, ignoring NaN. `None` when empty or all-NaN.
    pub fn extent(&self) -> Option<(f64, f64)> {
        extent_of(self.data.iter().copied())
    }

    /// A copy with every element rounded to `precision`.
    pub fn reduced(&self, precision: Precision) -> Self {
        Self {
            data: self.data.mapv(|v| precision.reduce(v)),
        }
    }
}

impl From<ArrayD<f64>> for FieldArray {
    /// Arrays in any other memory order are copied into C order.
    fn from(data: ArrayD<f64>) -> Self {
        let data = if data.is_standard_layout() {
            data
        } else {
            data.as_standard_layout().into_owned()
        };
        Self { data }
    }
}

/// An owned field value produced by a simulation step.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// One number per step (a time series entry).
    Scalar(f64),
    /// A gridded snapshot.
    Array(FieldArray),
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Scalar(v)
    }
}

impl From<FieldArray> for FieldValue {
    fn from(a: FieldArray) -> Self {
        Self::Array(a)
    }
}

/// A borrowed view of the data passed to a save.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Sample<'a> {
    /// A single number.
    Scalar(f64),
    /// An array whose leading dimensions must match the bound grid.
    Array(&'a FieldArray),
}

impl Sample<'_> {
    /// Minimum and maximum of the sample, ignoring NaN.
    pub fn extent(&self) -> Option<(f64, f64)> {
        match self {
            Self::Scalar(v) => extent_of(std::iter::once(*v)),
            Self::Array(a) => a.extent(),
        }
    }
}

impl From<f64> for Sample<'_> {
    fn from(v: f64) -> Self {
        Self::Scalar(v)
    }
}

impl<'a> From<&'a FieldArray> for Sample<'a> {
    fn from(a: &'a FieldArray) -> Self {
        Self::Array(a)
    }
}

impl<'a> From<&'a FieldValue> for Sample<'a> {
    fn from(v: &'a FieldValue) -> Self {
        match v {
            FieldValue::Scalar(s) => Self::Scalar(*s),
            FieldValue::Array(a) => Self::Array(a),
        }
    }
}

fn element_count(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
}

fn extent_of(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
