//! Periodic boundary conditions.

use super::{Boundary, Line, for_each_line};
use crate::error::Result;
use crate::grid::Grid;
use crate::volume::Volume;

/// Ghost cells copy the interior cells from the opposite side of the domain.
#[derive(Clone, Copy, Debug, Default)]
pub struct Periodic;

impl Boundary for Periodic {
    fn name(&self) -> &'static str {
        "periodic"
    }

    fn apply_boundary_conditions(&self, volume: &mut Volume, grid: &Grid) -> Result<()> {
        for_each_line(volume, grid, |data, line: Line| {
            let (g, n) = (line.ghost, line.interior);
            // Ghost layers may be wider than the interior; wrap modulo n.
            let shift = n - g % n;
            for l in 0..g {
                data[line.at(l)] = data[line.at(g + (l + shift) % n)];
                data[line.at(g + n + l)] = data[line.at(g + l % n)];
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryFactory;
    use crate::types::{IVec3, RVec3};

    #[test]
    fn test_periodic_1d() {
        let grid = Grid::uniform_1d(0.0, 1.0, 4).unwrap();
        let mut volume = Volume::new(&["u"], &MemoryFactory::host(), 4, 1, 1, 2).unwrap();
        volume
            .scalar_memory_area_mut(0)
            .unwrap()
            .copy_from_host(&[0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 0.0, 0.0])
            .unwrap();

        Periodic.apply_boundary_conditions(&mut volume, &grid).unwrap();
        assert_eq!(
            volume.copy_to_host(0).unwrap(),
            vec![3.0, 4.0, 1.0, 2.0, 3.0, 4.0, 1.0, 2.0]
        );
    }

    #[test]
    fn test_periodic_2d_corners() {
        let grid = Grid::new(RVec3::splat(0.0), RVec3::new(1.0, 1.0, 0.0), IVec3::new(3, 3, 1)).unwrap();
        let mut volume = Volume::new(&["u"], &MemoryFactory::host(), 3, 3, 1, 1).unwrap();
        {
            let mut view = volume.view_mut(0).unwrap();
            for y in 1..4 {
                for x in 1..4 {
                    *view.at_mut(x, y, 0) = (10 * y + x) as f64;
                }
            }
        }

        Periodic.apply_boundary_conditions(&mut volume, &grid).unwrap();
        let view = volume.view(0).unwrap();
        assert_eq!(view.at(0, 2, 0), 23.0);
        assert_eq!(view.at(4, 2, 0), 21.0);
        assert_eq!(view.at(2, 0, 0), 32.0);
        assert_eq!(view.at(0, 0, 0), 33.0);
        assert_eq!(view.at(4, 4, 0), 11.0);
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

        Periodic.apply_boundary_conditions(&mut volume, &grid).unwrap();
        assert_eq!(
            volume.copy_to_host(0).unwrap(),
            vec![2.0, 1.0, 2.0, 1.0, 2.0, 1.0, 2.0, 1.0]
        );
    }

    #[test]
    fn test_grid_mismatch() {
        let grid = Grid::uniform_1d(0.0, 1.0, 5).unwrap();
        let mut volume = Volume::new(&["u"], &MemoryFactory::host(), 4, 1, 1, 2).unwrap();
        assert!(Periodic.apply_boundary_conditions(&mut volume, &grid).is_err());
    }
}
