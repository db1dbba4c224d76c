//! Borrowed 3D accessors over host memory.

/// Read-only `(x, y, z)` accessor over a host slice.
#[derive(Clone, Copy, Debug)]
pub struct View<'a> {
    data: &'a [f64],
    nx: usize,
    ny: usize,
    nz: usize,
}

impl<'a> View<'a> {
    pub fn new(data: &'a [f64], nx: usize, ny: usize, nz: usize) -> Self {
        debug_assert_eq!(data.len(), nx * ny * nz);
        Self { data, nx, ny, nz }
    }

    /// Flat index of `(x, y, z)`.
    #[inline(always)]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        (z * self.ny + y) * self.nx + x
    }

    #[inline(always)]
    pub fn at(&self, x: usize, y: usize, z: usize) -> f64 {
        self.data[self.index(x, y, z)]
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn nz(&self) -> usize {
        self.nz
    }

    pub fn as_slice(&self) -> &'a [f64] {
        self.data
    }
}

/// Mutable `(x, y, z)` accessor over a host slice.
#[derive(Debug)]
pub struct ViewMut<'a> {
    data: &'a mut [f64],
    nx: usize,
    ny: usize,
    nz: usize,
}

impl<'a> ViewMut<'a> {
    pub fn new(data: &'a mut [f64], nx: usize, ny: usize, nz: usize) -> Self {
        debug_assert_eq!(data.len(), nx * ny * nz);
        Self { data, nx, ny, nz }
    }

    #[inline(always)]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        (z * self.ny + y) * self.nx + x
    }

    #[inline(always)]
    pub fn at(&self, x: usize, y: usize, z: usize) -> f64 {
        self.data[self.index(x, y, z)]
    }

    #[inline(always)]
    pub fn at_mut(&mut self, x: usize, y: usize, z: usize) -> &mut f64 {
        let index = self.index(x, y, z);
        &mut self.data[index]
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn nz(&self) -> usize {
        self.nz
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut *self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x_fastest_layout() {
        let data: Vec<f64> = (0..24).map(|i| i as f64).collect();
        let view = View::new(&data, 4, 3, 2);
        assert_eq!(view.at(1, 0, 0), 1.0);
        assert_eq!(view.at(0, 1, 0), 4.0);
        assert_eq!(view.at(0, 0, 1), 12.0);
        assert_eq!(view.at(3, 2, 1), 23.0);
    }

    #[test]
    fn test_mutable_view() {
        let mut data = vec![0.0; 8];
        let mut view = ViewMut::new(&mut data, 2, 2, 2);
        *view.at_mut(1, 1, 1) = 7.0;
        assert_eq!(view.at(1, 1, 1), 7.0);
        assert_eq!(data[7], 7.0);
    }
}
