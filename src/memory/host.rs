//! Host-resident memory areas.

use std::any::Any;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::{Memory, Platform, check_buffer_len, check_same_shape};
use crate::error::{FvmError, Result};

/// A scalar field stored contiguously in host memory, x fastest.
#[derive(Clone, Debug, PartialEq)]
pub struct HostMemory {
    data: Vec<f64>,
    nx: usize,
    ny: usize,
    nz: usize,
}

impl HostMemory {
    /// Allocate a zero-filled memory area.
    ///
    /// Allocation failure is reported instead of aborting.
    pub fn zeros(nx: usize, ny: usize, nz: usize) -> Result<Self> {
        let requested = nx
            .checked_mul(ny)
            .and_then(|n| n.checked_mul(nz))
            .ok_or_else(|| FvmError::Allocation {
                requested: usize::MAX,
                reason: format!("size {nx} x {ny} x {nz} overflows"),
            })?;

        let mut data = Vec::new();
        data.try_reserve_exact(requested)
            .map_err(|e| FvmError::Allocation {
                requested,
                reason: e.to_string(),
            })?;
        data.resize(requested, 0.0);

        Ok(Self { data, nx, ny, nz })
    }

    /// Wrap existing values.
    pub fn from_vec(data: Vec<f64>, nx: usize, ny: usize, nz: usize) -> Result<Self> {
        check_buffer_len(nx * ny * nz, data.len())?;
        Ok(Self { data, nx, ny, nz })
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Host slice of `other` after checking placement and shape.
    fn operand<'a>(&self, other: &'a dyn Memory) -> Result<&'a [f64]> {
        if !other.is_on_host() {
            return Err(FvmError::PlacementMismatch("Memory not on host".into()));
        }
        check_same_shape(self, other)?;
        other.host_slice()
    }

    fn zip_apply<F>(&mut self, other: &dyn Memory, op: F) -> Result<()>
    where
        F: Fn(&mut f64, f64) + Send + Sync,
    {
        let rhs = self.operand(other)?;

        #[cfg(feature = "parallel")]
        self.data
            .par_iter_mut()
            .zip(rhs.par_iter())
            .for_each(|(a, &b)| op(a, b));

        #[cfg(not(feature = "parallel"))]
        self.data.iter_mut().zip(rhs).for_each(|(a, &b)| op(a, b));

        Ok(())
    }
}

impl Memory for HostMemory {
    fn size_x(&self) -> usize {
        self.nx
    }

    fn size_y(&self) -> usize {
        self.ny
    }

    fn size_z(&self) -> usize {
        self.nz
    }

    fn platform(&self) -> Platform {
        Platform::Cpu
    }

    fn host_slice(&self) -> Result<&[f64]> {
        Ok(&self.data)
    }

    fn host_slice_mut(&mut self) -> Result<&mut [f64]> {
        Ok(&mut self.data)
    }

    fn copy_to_host(&self, buffer: &mut [f64]) -> Result<()> {
        check_buffer_len(self.data.len(), buffer.len())?;
        buffer.copy_from_slice(&self.data);
        Ok(())
    }

    fn copy_from_host(&mut self, buffer: &[f64]) -> Result<()> {
        check_buffer_len(self.data.len(), buffer.len())?;
        self.data.copy_from_slice(buffer);
        Ok(())
    }

    fn add_assign(&mut self, other: &dyn Memory) -> Result<()> {
        self.zip_apply(other, |a, b| *a += b)
    }

    fn sub_assign(&mut self, other: &dyn Memory) -> Result<()> {
        self.zip_apply(other, |a, b| *a -= b)
    }

    fn mul_assign(&mut self, other: &dyn Memory) -> Result<()> {
        self.zip_apply(other, |a, b| *a *= b)
    }

    fn div_assign(&mut self, other: &dyn Memory) -> Result<()> {
        self.zip_apply(other, |a, b| *a /= b)
    }

    fn axpy(&mut self, a: f64, other: &dyn Memory) -> Result<()> {
        self.zip_apply(other, move |x, y| *x += a * y)
    }

    fn add_scalar(&mut self, scalar: f64) {
        self.data.iter_mut().for_each(|v| *v += scalar);
    }

    fn mul_scalar(&mut self, scalar: f64) {
        self.data.iter_mut().for_each(|v| *v *= scalar);
    }

    fn div_scalar(&mut self, scalar: f64) {
        self.data.iter_mut().for_each(|v| *v /= scalar);
    }

    fn make_zero(&mut self) {
        self.data.fill(0.0);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
