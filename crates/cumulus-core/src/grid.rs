//! The fixed 2D discretisation bound to a storage at `init`.

use std::fmt;

use crate::error::ConfigError;

/// A 2D grid shape `(nx, nz)` with both dimensions positive.
///
/// Gridded snapshots must match this shape in their first two dimensions.
/// Trailing dimensions (e.g. size-spectrum bins per cell) are free.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    nx: usize,
    nz: usize,
}

impl Grid {
    /// Create a grid, rejecting zero-sized dimensions.
    pub fn new(nx: usize, nz: usize) -> Result<Self, ConfigError> {
        if nx == 0 || nz == 0 {
            return Err(ConfigError::EmptyGrid { nx, nz });
        }
        Ok(Self { nx, nz })
    }

    /// Number of cells along the horizontal axis.
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Number of cells along the vertical axis.
    pub fn nz(&self) -> usize {
        self.nz
    }

    /// Both dimensions as an array, in `(nx, nz)` order.
    pub fn dims(&self) -> [usize; 2] {
        [self.nx, self.nz]
    }

    /// Total number of grid cells.
    pub fn cell_count(&self) -> usize {
        self.nx * self.nz
    }

    /// Whether `shape` starts with this grid's dimensions.
    pub fn matches(&self, shape: &[usize]) -> bool {
        shape.len() >= 2 && shape[0] == self.nx && shape[1] == self.nz
    }
}

impl Default for Grid {
    /// The 25x25 grid of the stratocumulus reference setup.
    fn default() -> Self {
        Self { nx: 25, nz: 25 }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.nx, self.nz)
    }
}

impl TryFrom<(usize, usize)> for Grid {
    type Error = ConfigError;

    fn try_from((nx, nz): (usize, usize)) -> Result<Self, Self::Error> {
        Self::new(nx, nz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_dimension_rejected() {
        assert_eq!(
            Grid::new(0, 5),
            Err(ConfigError::EmptyGrid { nx: 0, nz: 5 })
        );
        assert!(Grid::new(4, 0).is_err());
    }

    #[test]
    fn matches_leading_dims_only() {
        let grid = Grid::new(4, 5).unwrap();
        assert!(grid.matches(&[4, 5]));
        assert!(grid.matches(&[4, 5, 32]));
        assert!(!grid.matches(&[5, 4]));
        assert!(!grid.matches(&[4]));
        assert!(!grid.matches(&[]));
    }

    #[test]
    fn display_is_tuple_like() {
        let grid = Grid::try_from((25, 25)).unwrap();
        assert_eq!(grid.to_string(), "(25, 25)");
        assert_eq!(grid.cell_count(), 625);
    }
}
