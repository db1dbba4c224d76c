//! Memory areas holding one scalar field.
//!
//! Every field of a [`Volume`](crate::volume::Volume) lives in its own
//! memory area, a dense 3D array stored x fastest. The [`Memory`] trait hides
//! where the data lives: [`HostMemory`] keeps it in a `Vec<f64>`, while
//! `DeviceMemory` (feature `burn`) keeps it in a burn tensor on a GPU or
//! other accelerator.
//!
//! Memory areas on different placements never mix implicitly. Element-wise
//! operations fail with [`FvmError::PlacementMismatch`] and data crosses
//! between host and device only through [`Memory::copy_to_host`] and
//! [`Memory::copy_from_host`].

#[cfg(feature = "burn")]
mod device;
mod host;
mod view;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{FvmError, Result};
use crate::types::IVec3;

#[cfg(feature = "burn")]
pub use device::DeviceMemory;
pub use host::HostMemory;
pub use view::{View, ViewMut};

// =============================================================================
// Placement
// =============================================================================

/// Where a memory area is stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Host memory, accessible to the CPU kernels
    #[default]
    Cpu,
    /// Accelerator memory managed by a burn backend
    Device,
}

impl Platform {
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Cpu => "cpu",
            Platform::Device => "device",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Named execution platform, as found in configuration files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceConfiguration {
    name: String,
    platform: Platform,
}

impl DeviceConfiguration {
    /// Parse a platform name. `cpu` selects the host; `cuda`, `gpu`, `wgpu`
    /// and `device` select accelerator memory.
    #[track_caller]
    pub fn new(name: &str) -> Result<Self> {
        let platform = match name {
            "cpu" => Platform::Cpu,
            "cuda" | "gpu" | "wgpu" | "device" => Platform::Device,
            _ => return Err(FvmError::unknown_name("platform", name)),
        };
        Ok(Self {
            name: name.to_string(),
            platform,
        })
    }

    pub fn cpu() -> Self {
        Self {
            name: "cpu".to_string(),
            platform: Platform::Cpu,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }
}

// =============================================================================
// Memory Trait
// =============================================================================

/// A dense 3D scalar array on some placement.
///
/// Compound operations against another memory area require the same shape
/// and the same placement. Operations against scalars cannot fail.
pub trait Memory: Send + Sync + fmt::Debug {
    fn size_x(&self) -> usize;
    fn size_y(&self) -> usize;
    fn size_z(&self) -> usize;

    /// Total number of values.
    fn size(&self) -> usize {
        self.size_x() * self.size_y() * self.size_z()
    }

    fn shape(&self) -> IVec3 {
        IVec3::new(self.size_x(), self.size_y(), self.size_z())
    }

    fn platform(&self) -> Platform;

    fn is_on_host(&self) -> bool {
        self.platform() == Platform::Cpu
    }

    /// Borrow the values. Fails if the memory is not on the host.
    fn host_slice(&self) -> Result<&[f64]>;

    /// Mutably borrow the values. Fails if the memory is not on the host.
    fn host_slice_mut(&mut self) -> Result<&mut [f64]>;

    /// Copy all values into `buffer` (which must hold exactly `size()` values).
    fn copy_to_host(&self, buffer: &mut [f64]) -> Result<()>;

    /// Overwrite all values from `buffer`.
    fn copy_from_host(&mut self, buffer: &[f64]) -> Result<()>;

    fn add_assign(&mut self, other: &dyn Memory) -> Result<()>;
    fn sub_assign(&mut self, other: &dyn Memory) -> Result<()>;
    fn mul_assign(&mut self, other: &dyn Memory) -> Result<()>;
    fn div_assign(&mut self, other: &dyn Memory) -> Result<()>;

    /// `self <- self + a * other`
    fn axpy(&mut self, a: f64, other: &dyn Memory) -> Result<()>;

    fn add_scalar(&mut self, scalar: f64);
    fn mul_scalar(&mut self, scalar: f64);

    fn sub_scalar(&mut self, scalar: f64) {
        self.add_scalar(-scalar);
    }

    fn div_scalar(&mut self, scalar: f64) {
        self.mul_scalar(1.0 / scalar);
    }

    /// Set every value to zero.
    fn make_zero(&mut self);

    /// Used by backends to recover their concrete type from `&dyn Memory`.
    fn as_any(&self) -> &dyn Any;

    /// Read-only 3D view of host memory.
    fn view(&self) -> Result<View<'_>> {
        let (nx, ny, nz) = (self.size_x(), self.size_y(), self.size_z());
        Ok(View::new(self.host_slice()?, nx, ny, nz))
    }

    /// Mutable 3D view of host memory.
    fn view_mut(&mut self) -> Result<ViewMut<'_>> {
        let (nx, ny, nz) = (self.size_x(), self.size_y(), self.size_z());
        Ok(ViewMut::new(self.host_slice_mut()?, nx, ny, nz))
    }
}

/// Fail unless both memory areas have identical sizes.
pub(crate) fn check_same_shape(a: &dyn Memory, b: &dyn Memory) -> Result<()> {
    if a.shape() != b.shape() {
        return Err(FvmError::shape_mismatch(
            format!("memory of size {}", a.shape()),
            format!("memory of size {}", b.shape()),
        ));
    }
    Ok(())
}

/// Fail unless `buffer` has exactly `expected` values.
pub(crate) fn check_buffer_len(expected: usize, buffer: usize) -> Result<()> {
    if expected != buffer {
        return Err(FvmError::shape_mismatch(
            format!("buffer of {expected} values"),
            format!("buffer of {buffer} values"),
        ));
    }
    Ok(())
}

// =============================================================================
// Factory
// =============================================================================

type DeviceAllocator = Arc<dyn Fn(usize, usize, usize) -> Result<Box<dyn Memory>> + Send + Sync>;

/// Creates memory areas on one placement.
#[derive(Clone)]
pub struct MemoryFactory {
    platform: Platform,
    device_allocator: Option<DeviceAllocator>,
}

impl MemoryFactory {
    /// Factory for the configured platform.
    ///
    /// Device memory needs a concrete burn backend, so device platforms are
    /// only available through `MemoryFactory::for_device`.
    pub fn new(configuration: &DeviceConfiguration) -> Result<Self> {
        match configuration.platform() {
            Platform::Cpu => Ok(Self::host()),
            Platform::Device => Err(FvmError::PlacementMismatch(format!(
                "platform {} needs a device backend; build the factory with MemoryFactory::for_device",
                configuration.name()
            ))),
        }
    }

    /// Factory producing [`HostMemory`].
    pub fn host() -> Self {
        Self {
            platform: Platform::Cpu,
            device_allocator: None,
        }
    }

    /// Factory producing [`DeviceMemory`] on `device` of backend `B`.
    #[cfg(feature = "burn")]
    pub fn for_device<B: burn::tensor::backend::Backend>(device: B::Device) -> Self {
        let allocator: DeviceAllocator = Arc::new(move |nx, ny, nz| {
            Ok(Box::new(DeviceMemory::<B>::zeros(nx, ny, nz, &device)) as Box<dyn Memory>)
        });
        Self {
            platform: Platform::Device,
            device_allocator: Some(allocator),
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Allocate a zero-initialised memory area of `nx * ny * nz` values.
    pub fn create_scalar_memory(&self, nx: usize, ny: usize, nz: usize) -> Result<Box<dyn Memory>> {
        match (&self.device_allocator, self.platform) {
            (Some(allocate), Platform::Device) => allocate(nx, ny, nz),
            _ => Ok(Box::new(HostMemory::zeros(nx, ny, nz)?)),
        }
    }
}

impl fmt::Debug for MemoryFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryFactory")
            .field("platform", &self.platform)
            .finish()
    }
}

impl Default for MemoryFactory {
    fn default() -> Self {
        Self::host()
    }
}
