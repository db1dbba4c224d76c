//! Accelerator memory backed by burn tensors.
//!
//! Each memory area owns one rank-1 tensor holding the field in the same
//! x-fastest order as [`HostMemory`](super::HostMemory). Dropping the memory
//! area drops the tensor handle, which releases the device buffer.

use std::any::Any;
use std::fmt;

use burn::prelude::*;
use burn::tensor::{ElementConversion, TensorData};

use super::{Memory, Platform, check_buffer_len, check_same_shape};
use crate::error::{FvmError, Result};

/// A scalar field stored on a burn device.
pub struct DeviceMemory<B: Backend> {
    tensor: Tensor<B, 1>,
    device: B::Device,
    nx: usize,
    ny: usize,
    nz: usize,
}

impl<B: Backend> DeviceMemory<B> {
    /// Allocate a zero-filled area on `device`.
    pub fn zeros(nx: usize, ny: usize, nz: usize, device: &B::Device) -> Self {
        Self {
            tensor: Tensor::zeros([nx * ny * nz], device),
            device: device.clone(),
            nx,
            ny,
            nz,
        }
    }

    /// Upload host values to `device`.
    pub fn from_host(data: &[f64], nx: usize, ny: usize, nz: usize, device: &B::Device) -> Result<Self> {
        check_buffer_len(nx * ny * nz, data.len())?;
        Ok(Self {
            tensor: upload::<B>(data, device),
            device: device.clone(),
            nx,
            ny,
            nz,
        })
    }

    pub fn tensor(&self) -> &Tensor<B, 1> {
        &self.tensor
    }

    /// Tensor of `other` after checking placement and shape.
    fn operand(&self, other: &dyn Memory) -> Result<Tensor<B, 1>> {
        check_same_shape(self, other)?;
        other
            .as_any()
            .downcast_ref::<DeviceMemory<B>>()
            .map(|m| m.tensor.clone())
            .ok_or_else(|| {
                FvmError::PlacementMismatch(
                    "operand is not device memory of the same backend".into(),
                )
            })
    }
}

fn upload<B: Backend>(data: &[f64], device: &B::Device) -> Tensor<B, 1> {
    let converted: Vec<B::FloatElem> = data.iter().map(|&x| x.elem()).collect();
    Tensor::from_data(TensorData::new(converted, vec![data.len()]), device)
}

impl<B: Backend> fmt::Debug for DeviceMemory<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceMemory")
            .field("backend", &std::any::type_name::<B>())
            .field("nx", &self.nx)
            .field("ny", &self.ny)
            .field("nz", &self.nz)
            .finish()
    }
}

impl<B: Backend> Memory for DeviceMemory<B> {
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
        Platform::Device
    }

    fn host_slice(&self) -> Result<&[f64]> {
        Err(FvmError::PlacementMismatch("Memory not on host".into()))
    }

    fn host_slice_mut(&mut self) -> Result<&mut [f64]> {
        Err(FvmError::PlacementMismatch("Memory not on host".into()))
    }

    fn copy_to_host(&self, buffer: &mut [f64]) -> Result<()> {
        check_buffer_len(self.size(), buffer.len())?;
        let values = self
            .tensor
            .to_data()
            .to_vec::<B::FloatElem>()
            .map_err(|e| FvmError::Transfer(format!("{e:?}")))?;
        for (out, value) in buffer.iter_mut().zip(values) {
            *out = value.elem();
        }
        Ok(())
    }

    fn copy_from_host(&mut self, buffer: &[f64]) -> Result<()> {
        check_buffer_len(self.size(), buffer.len())?;
        self.tensor = upload::<B>(buffer, &self.device);
        Ok(())
    }

    fn add_assign(&mut self, other: &dyn Memory) -> Result<()> {
        let rhs = self.operand(other)?;
        self.tensor = self.tensor.clone().add(rhs);
        Ok(())
    }

    fn sub_assign(&mut self, other: &dyn Memory) -> Result<()> {
        let rhs = self.operand(other)?;
        self.tensor = self.tensor.clone().sub(rhs);
        Ok(())
    }

    fn mul_assign(&mut self, other: &dyn Memory) -> Result<()> {
        let rhs = self.operand(other)?;
        self.tensor = self.tensor.clone().mul(rhs);
        Ok(())
    }

    fn div_assign(&mut self, other: &dyn Memory) -> Result<()> {
        let rhs = self.operand(other)?;
        self.tensor = self.tensor.clone().div(rhs);
        Ok(())
    }

    fn axpy(&mut self, a: f64, other: &dyn Memory) -> Result<()> {
        let rhs = self.operand(other)?;
        self.tensor = self.tensor.clone().add(rhs.mul_scalar(a));
        Ok(())
    }

    fn add_scalar(&mut self, scalar: f64) {
        self.tensor = self.tensor.clone().add_scalar(scalar);
    }

    fn mul_scalar(&mut self, scalar: f64) {
        self.tensor = self.tensor.clone().mul_scalar(scalar);
    }

    fn make_zero(&mut self) {
        self.tensor = Tensor::zeros([self.size()], &self.device);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
