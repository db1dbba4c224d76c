//! Rectangular ranges of cells inside a volume.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::types::IVec3;

/// Evaluate `f` for every cell index, preserving order.
///
/// Runs on the rayon pool when the `parallel` feature is enabled.
pub fn map_cells<T, F>(cells: &[usize], f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Send + Sync,
{
    #[cfg(feature = "parallel")]
    {
        cells.par_iter().map(|&cell| f(cell)).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        cells.iter().map(|&cell| f(cell)).collect()
    }
}

/// Half-open box of cells `[start, end)` in the total (ghost-inclusive)
/// coordinates of a volume of size `size`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellBox {
    size: IVec3,
    start: IVec3,
    end: IVec3,
}

impl CellBox {
    pub fn new(size: IVec3, start: IVec3, end: IVec3) -> Self {
        Self { size, start, end }
    }

    pub fn start(&self) -> IVec3 {
        self.start
    }

    pub fn end(&self) -> IVec3 {
        self.end
    }

    /// Number of cells in the box.
    pub fn len(&self) -> usize {
        (self.end - self.start).product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Grow the box by `cells` on both sides along `axis`, clipped to the volume.
    pub fn extend(mut self, axis: usize, cells: usize) -> Self {
        self.start[axis] = self.start[axis].saturating_sub(cells);
        self.end[axis] = (self.end[axis] + cells).min(self.size[axis]);
        self
    }

    /// Replace the range along `axis`.
    pub fn with_range(mut self, axis: usize, start: usize, end: usize) -> Self {
        self.start[axis] = start;
        self.end[axis] = end.min(self.size[axis]);
        self
    }

    /// Flat indices of all cells, x fastest.
    pub fn flat_indices(&self) -> Vec<usize> {
        let mut indices = Vec::with_capacity(self.len());
        for z in self.start.z..self.end.z {
            for y in self.start.y..self.end.y {
                let row = (z * self.size.y + y) * self.size.x;
                indices.extend((self.start.x..self.end.x).map(|x| row + x));
            }
        }
        indices
    }

    /// Cell coordinates, x fastest.
    pub fn coordinates(self) -> impl Iterator<Item = IVec3> {
        let (start, end) = (self.start, self.end);
        (start.z..end.z).flat_map(move |z| {
            (start.y..end.y).flat_map(move |y| (start.x..end.x).map(move |x| IVec3::new(x, y, z)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_indices() {
        let size = IVec3::new(4, 3, 1);
        let cells = CellBox::new(size, IVec3::new(1, 1, 0), IVec3::new(3, 2, 1));
        assert_eq!(cells.flat_indices(), vec![5, 6]);
        assert_eq!(cells.len(), 2);

        let wider = cells.extend(0, 1);
        assert_eq!(wider.flat_indices(), vec![4, 5, 6, 7]);

        let coords: Vec<_> = cells.coordinates().collect();
        assert_eq!(coords, vec![IVec3::new(1, 1, 0), IVec3::new(2, 1, 0)]);
    }

    #[test]
    fn test_extend_is_clipped() {
        let size = IVec3::new(4, 1, 1);
        let cells = CellBox::new(size, IVec3::new(1, 0, 0), IVec3::new(3, 1, 1)).extend(0, 5);
        assert_eq!(cells.start().x, 0);
        assert_eq!(cells.end().x, 4);
    }
}
