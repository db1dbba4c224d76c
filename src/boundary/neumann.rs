//! Zero-gradient boundary conditions.

use super::{Boundary, Line, for_each_line};
use crate::error::Result;
use crate::grid::Grid;
use crate::volume::Volume;

/// Ghost cells mirror the interior cells across the boundary face.
#[derive(Clone, Copy, Debug, Default)]
pub struct Neumann;

impl Boundary for Neumann {
    fn name(&self) -> &'static str {
        "neumann"
    }

    fn apply_boundary_conditions(&self, volume: &mut Volume, grid: &Grid) -> Result<()> {
        for_each_line(volume, grid, |data, line: Line| {
            let (g, n) = (line.ghost, line.interior);
            for l in 0..g {
                let m = mirror(l, n);
                data[line.at(g - 1 - l)] = data[line.at(g + m)];
                data[line.at(g + n + l)] = data[line.at(g + n - 1 - m)];
            }
        })
    }
}

/// Interior offset seen by the `l`-th ghost layer under repeated
/// reflection, for ghost margins wider than the interior.
#[inline(always)]
fn mirror(l: usize, n: usize) -> usize {
    let m = l % (2 * n);
    if m < n { m } else { 2 * n - 1 - m }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryFactory;

    #[test]
    fn test_mirror() {
        let grid = Grid::uniform_1d(0.0, 1.0, 3).unwrap();
        let mut volume = Volume::new(&["u"], &MemoryFactory::host(), 3, 1, 1, 2).unwrap();
        volume
            .scalar_memory_area_mut(0)
            .unwrap()
            .copy_from_host(&[0.0, 0.0, 1.0, 2.0, 3.0, 0.0, 0.0])
            .unwrap();

        Neumann.apply_boundary_conditions(&mut volume, &grid).unwrap();
        assert_eq!(
            volume.copy_to_host(0).unwrap(),
            vec![2.0, 1.0, 1.0, 2.0, 3.0, 3.0, 2.0]
        );
    }

    #[test]
    fn test_ghost_wider_than_interior() {
        let grid = Grid::uniform_1d(0.0, 1.0, 2).unwrap();
        let mut volume = Volume::new(&["u"], &MemoryFactory::host(), 2, 1, 1, 3).unwrap();
        volume
            .scalar_memory_area_mut(0)
            .unwrap()
            .copy_from_host(&[9.0, 9.0, 9.0, 1.0, 2.0, 9.0, 9.0, 9.0])
            .unwrap();

        Neumann.apply_boundary_conditions(&mut volume, &grid).unwrap();
        assert_eq!(
            volume.copy_to_host(0).unwrap(),
            vec![2.0, 2.0, 1.0, 1.0, 2.0, 2.0, 1.0, 1.0]
        );
    }
}
