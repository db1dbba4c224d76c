//! Uniform Cartesian grid.
//!
//! A grid partitions the box `[origin, top]` into `dimensions.x *
//! dimensions.y * dimensions.z` equally sized cells. Axes with a single cell
//! are inactive: they carry no ghost cells and no flux sweep.

use crate::error::{FvmError, Result};
use crate::types::{IVec3, RVec3};

/// Uniform Cartesian grid geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    /// Lower corner of the domain
    origin: RVec3,
    /// Upper corner of the domain
    top: RVec3,
    /// Number of interior cells per axis
    dimensions: IVec3,
    /// Cell size per axis
    cell_lengths: RVec3,
}

impl Grid {
    /// Create a grid on `[origin, top]` with `dimensions` interior cells.
    pub fn new(origin: RVec3, top: RVec3, dimensions: IVec3) -> Result<Self> {
        for d in 0..3 {
            if dimensions[d] == 0 {
                return Err(FvmError::invalid_argument(format!(
                    "grid needs at least one cell along axis {d}"
                )));
            }
            if !(top[d] >= origin[d]) {
                return Err(FvmError::invalid_argument(format!(
                    "grid top {top} is below origin {origin} along axis {d}"
                )));
            }
        }

        let mut cell_lengths = RVec3::splat(1.0);
        for d in 0..3 {
            let extent = top[d] - origin[d];
            if extent > 0.0 {
                cell_lengths[d] = extent / dimensions[d] as f64;
            } else if dimensions[d] > 1 {
                return Err(FvmError::invalid_argument(format!(
                    "axis {d} has {} cells but zero extent",
                    dimensions[d]
                )));
            }
        }

        Ok(Self {
            origin,
            top,
            dimensions,
            cell_lengths,
        })
    }

    /// Convenience constructor for a 1D grid on `[x_min, x_max]`.
    pub fn uniform_1d(x_min: f64, x_max: f64, nx: usize) -> Result<Self> {
        Self::new(
            RVec3::new(x_min, 0.0, 0.0),
            RVec3::new(x_max, 0.0, 0.0),
            IVec3::new(nx, 1, 1),
        )
    }

    pub fn origin(&self) -> RVec3 {
        self.origin
    }

    pub fn top(&self) -> RVec3 {
        self.top
    }

    pub fn dimensions(&self) -> IVec3 {
        self.dimensions
    }

    pub fn cell_lengths(&self) -> RVec3 {
        self.cell_lengths
    }

    /// Number of axes with more than one cell.
    pub fn active_dimension(&self) -> usize {
        self.dimensions.active_dimension()
    }

    /// Centre of interior cell `(i, j, k)`.
    #[inline]
    pub fn cell_midpoint(&self, i: usize, j: usize, k: usize) -> RVec3 {
        let index = RVec3::new(i as f64 + 0.5, j as f64 + 0.5, k as f64 + 0.5);
        self.origin + index * self.cell_lengths
    }

    /// Centres of all interior cells, x fastest.
    pub fn cell_midpoints(&self) -> Vec<RVec3> {
        let n = self.dimensions;
        let mut midpoints = Vec::with_capacity(n.product());
        for k in 0..n.z {
            for j in 0..n.y {
                for i in 0..n.x {
                    midpoints.push(self.cell_midpoint(i, j, k));
                }
            }
        }
        midpoints
    }
}
