//! Ghost-cell boundary conditions.
//!
//! A boundary fills the ghost margin of every field of a volume from its
//! interior cells. Axes are processed in order x, y, z over the full extent
//! of the other axes, so corner ghost cells are filled as well.

mod neumann;
mod periodic;

pub use neumann::Neumann;
pub use periodic::Periodic;

use tracing::debug;

use crate::error::{FvmError, Result};
use crate::grid::Grid;
use crate::memory::Platform;
use crate::volume::{CellBox, Volume};

/// Fills the ghost cells of a volume.
pub trait Boundary: Send + Sync {
    fn name(&self) -> &'static str;

    fn apply_boundary_conditions(&self, volume: &mut Volume, grid: &Grid) -> Result<()>;
}

/// One line of cells along an axis, starting at the lower ghost layer.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Line {
    /// Flat index of the first (ghost) cell
    pub start: usize,
    /// Flat distance between neighbours
    pub stride: usize,
    /// Ghost layers on each side
    pub ghost: usize,
    /// Interior cells
    pub interior: usize,
}

impl Line {
    #[inline(always)]
    pub fn at(&self, position: usize) -> usize {
        self.start + position * self.stride
    }
}

/// Apply `fill` to every line of every field along every active axis.
pub(crate) fn for_each_line(
    volume: &mut Volume,
    grid: &Grid,
    mut fill: impl FnMut(&mut [f64], Line),
) -> Result<()> {
    if volume.interior_size() != grid.dimensions() {
        return Err(FvmError::shape_mismatch(
            format!("grid of {} cells", grid.dimensions()),
            format!("volume of {} cells", volume.interior_size()),
        ));
    }

    let total = volume.total_size();
    let ghost = volume.ghost_cells();
    let interior = volume.interior_size();
    let strides = [volume.stride(0), volume.stride(1), volume.stride(2)];

    for axis in (0..3).filter(|&d| interior[d] > 1) {
        if ghost[axis] == 0 {
            return Err(FvmError::invalid_argument(format!(
                "volume has no ghost cells along active axis {axis}"
            )));
        }
        let starts = CellBox::new(total, Default::default(), total)
            .with_range(axis, 0, 1)
            .flat_indices();

        for field in volume.host_fields_mut()? {
            for &start in &starts {
                fill(
                    &mut *field,
                    Line {
                        start,
                        stride: strides[axis],
                        ghost: ghost[axis],
                        interior: interior[axis],
                    },
                );
            }
        }
    }
    Ok(())
}

/// Create a boundary condition by name: `periodic` or `neumann`.
#[track_caller]
pub fn create_boundary(name: &str, platform: Platform) -> Result<Box<dyn Boundary>> {
    if platform != Platform::Cpu {
        return Err(FvmError::UnsupportedPlatform(platform.to_string()));
    }
    let boundary: Box<dyn Boundary> = match name {
        "periodic" => Box::new(Periodic),
        "neumann" => Box::new(Neumann),
        _ => return Err(FvmError::unknown_name("boundary", name)),
    };
    debug!(boundary = name, "created boundary");
    Ok(boundary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory() {
        assert_eq!(create_boundary("periodic", Platform::Cpu).unwrap().name(), "periodic");
        assert_eq!(create_boundary("neumann", Platform::Cpu).unwrap().name(), "neumann");
        assert!(matches!(
            create_boundary("dirichlet", Platform::Cpu),
            Err(FvmError::UnknownName { kind: "boundary", .. })
        ));
    }
}
