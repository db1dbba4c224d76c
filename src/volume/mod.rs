//! Multi-variable cell data.
//!
//! A [`Volume`] is an ordered set of named scalar fields over the same
//! grid. Every field has the interior cells of the grid plus a margin of
//! ghost cells on each active axis, and lives in its own memory area.
//!
//! ```text
//!   total_nx = nx + 2 * ghost.x
//!   | ghost | interior (nx cells) | ghost |
//! ```

mod cells;
mod factory;
mod fields;

use std::collections::HashMap;
use std::fmt;

pub use cells::{CellBox, map_cells};
pub use factory::VolumeFactory;
pub use fields::{check_constraints, fill_conserved, fill_extra, load_state, store_state};

use crate::error::{FvmError, Result};
use crate::memory::{Memory, MemoryFactory, Platform, View, ViewMut};
use crate::types::IVec3;

/// Named scalar fields sharing one shape and placement.
pub struct Volume {
    variable_names: Vec<String>,
    name_to_index: HashMap<String, usize>,
    memory_areas: Vec<Box<dyn Memory>>,
    memory_factory: MemoryFactory,
    interior: IVec3,
    ghost: IVec3,
}

impl Volume {
    /// Allocate zero-initialised fields.
    ///
    /// `ghost_cells` is applied to every axis with more than one interior
    /// cell; inactive axes get no ghost cells.
    pub fn new(
        names: &[&str],
        memory_factory: &MemoryFactory,
        nx: usize,
        ny: usize,
        nz: usize,
        ghost_cells: usize,
    ) -> Result<Self> {
        let interior = IVec3::new(nx, ny, nz);
        if interior.product() == 0 {
            return Err(FvmError::invalid_argument(format!(
                "volume needs at least one interior cell per axis, got {interior}"
            )));
        }
        let ghost = interior.map(|n| if n > 1 { ghost_cells } else { 0 });

        let mut name_to_index = HashMap::with_capacity(names.len());
        for (index, name) in names.iter().enumerate() {
            if name_to_index.insert(name.to_string(), index).is_some() {
                return Err(FvmError::invalid_argument(format!(
                    "variable {name} appears twice"
                )));
            }
        }

        let total = interior + ghost + ghost;
        let memory_areas = names
            .iter()
            .map(|_| memory_factory.create_scalar_memory(total.x, total.y, total.z))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            variable_names: names.iter().map(|n| n.to_string()).collect(),
            name_to_index,
            memory_areas,
            memory_factory: memory_factory.clone(),
            interior,
            ghost,
        })
    }

    /// A zeroed volume with the same variables, shape and placement.
    pub fn like(&self) -> Result<Self> {
        let names: Vec<&str> = self.variable_names.iter().map(String::as_str).collect();
        let ghost_cells = self.ghost.x.max(self.ghost.y).max(self.ghost.z);
        Self::new(
            &names,
            &self.memory_factory,
            self.interior.x,
            self.interior.y,
            self.interior.z,
            ghost_cells,
        )
    }

    // ===== Variables =====

    pub fn number_of_variables(&self) -> usize {
        self.memory_areas.len()
    }

    pub fn variable_names(&self) -> &[String] {
        &self.variable_names
    }

    pub fn index_from_name(&self, name: &str) -> Result<usize> {
        self.name_to_index
            .get(name)
            .copied()
            .ok_or_else(|| FvmError::UnknownVariable(name.to_string()))
    }

    pub fn name(&self, index: usize) -> Result<&str> {
        self.variable_names
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| FvmError::UnknownVariable(format!("#{index}")))
    }

    pub fn scalar_memory_area(&self, index: usize) -> Result<&dyn Memory> {
        self.memory_areas
            .get(index)
            .map(|m| m.as_ref())
            .ok_or_else(|| FvmError::UnknownVariable(format!("#{index}")))
    }

    pub fn scalar_memory_area_mut(&mut self, index: usize) -> Result<&mut dyn Memory> {
        match self.memory_areas.get_mut(index) {
            Some(memory) => Ok(memory.as_mut()),
            None => Err(FvmError::UnknownVariable(format!("#{index}"))),
        }
    }

    pub fn scalar_memory_area_by_name(&self, name: &str) -> Result<&dyn Memory> {
        self.scalar_memory_area(self.index_from_name(name)?)
    }

    pub fn scalar_memory_area_by_name_mut(&mut self, name: &str) -> Result<&mut dyn Memory> {
        let index = self.index_from_name(name)?;
        self.scalar_memory_area_mut(index)
    }

    // ===== Shape =====

    /// Interior cells along x.
    pub fn nx(&self) -> usize {
        self.interior.x
    }

    pub fn ny(&self) -> usize {
        self.interior.y
    }

    pub fn nz(&self) -> usize {
        self.interior.z
    }

    pub fn interior_size(&self) -> IVec3 {
        self.interior
    }

    /// Ghost margin per axis.
    pub fn ghost_cells(&self) -> IVec3 {
        self.ghost
    }

    /// Interior plus ghost cells per axis.
    pub fn total_size(&self) -> IVec3 {
        self.interior + self.ghost + self.ghost
    }

    pub fn total_nx(&self) -> usize {
        self.total_size().x
    }

    pub fn total_ny(&self) -> usize {
        self.total_size().y
    }

    pub fn total_nz(&self) -> usize {
        self.total_size().z
    }

    /// Number of axes with more than one interior cell.
    pub fn active_dimension(&self) -> usize {
        self.interior.active_dimension()
    }

    /// Distance between neighbouring cells along `axis` in the flat layout.
    #[inline]
    pub fn stride(&self, axis: usize) -> usize {
        let total = self.total_size();
        match axis {
            0 => 1,
            1 => total.x,
            _ => total.x * total.y,
        }
    }

    /// Flat index of cell `(x, y, z)` in total coordinates.
    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        let total = self.total_size();
        (z * total.y + y) * total.x + x
    }

    /// The interior cells in total coordinates.
    pub fn interior_box(&self) -> CellBox {
        CellBox::new(self.total_size(), self.ghost, self.ghost + self.interior)
    }

    pub fn platform(&self) -> Platform {
        self.memory_factory.platform()
    }

    pub fn is_on_host(&self) -> bool {
        self.memory_areas.iter().all(|m| m.is_on_host())
    }

    pub fn memory_factory(&self) -> &MemoryFactory {
        &self.memory_factory
    }

    /// Fail unless `other` has the same variable count and shape.
    pub fn check_same_shape(&self, other: &Volume) -> Result<()> {
        if self.number_of_variables() != other.number_of_variables()
            || self.total_size() != other.total_size()
            || self.ghost != other.ghost
        {
            return Err(FvmError::shape_mismatch(
                self.describe_shape(),
                other.describe_shape(),
            ));
        }
        Ok(())
    }

    fn describe_shape(&self) -> String {
        format!(
            "{} variables on {} cells with {} ghost cells",
            self.number_of_variables(),
            self.interior,
            self.ghost
        )
    }

    // ===== Host Access =====

    pub fn view(&self, index: usize) -> Result<View<'_>> {
        self.scalar_memory_area(index)?.view()
    }

    pub fn view_mut(&mut self, index: usize) -> Result<ViewMut<'_>> {
        self.scalar_memory_area_mut(index)?.view_mut()
    }

    /// Host slices of all fields, in variable order.
    pub fn host_fields(&self) -> Result<Vec<&[f64]>> {
        self.memory_areas.iter().map(|m| m.host_slice()).collect()
    }

    /// Mutable host slices of all fields, in variable order.
    pub fn host_fields_mut(&mut self) -> Result<Vec<&mut [f64]>> {
        self.memory_areas
            .iter_mut()
            .map(|m| m.host_slice_mut())
            .collect()
    }

    /// Copy of one field on the host, whatever its placement.
    pub fn copy_to_host(&self, index: usize) -> Result<Vec<f64>> {
        let memory = self.scalar_memory_area(index)?;
        let mut buffer = vec![0.0; memory.size()];
        memory.copy_to_host(&mut buffer)?;
        Ok(buffer)
    }

    /// Copy every field into `other`, crossing host/device if needed.
    pub fn copy_to(&self, other: &mut Volume) -> Result<()> {
        self.check_same_shape(other)?;
        for (source, target) in self.memory_areas.iter().zip(other.memory_areas.iter_mut()) {
            if source.is_on_host() {
                target.copy_from_host(source.host_slice()?)?;
            } else {
                let mut buffer = vec![0.0; source.size()];
                source.copy_to_host(&mut buffer)?;
                target.copy_from_host(&buffer)?;
            }
        }
        Ok(())
    }

    // ===== Arithmetic =====

    fn zip_with(
        &mut self,
        other: &Volume,
        op: impl Fn(&mut dyn Memory, &dyn Memory) -> Result<()>,
    ) -> Result<()> {
        self.check_same_shape(other)?;
        for (a, b) in self.memory_areas.iter_mut().zip(&other.memory_areas) {
            op(a.as_mut(), b.as_ref())?;
        }
        Ok(())
    }

    pub fn add_assign(&mut self, other: &Volume) -> Result<()> {
        self.zip_with(other, |a, b| a.add_assign(b))
    }

    pub fn sub_assign(&mut self, other: &Volume) -> Result<()> {
        self.zip_with(other, |a, b| a.sub_assign(b))
    }

    pub fn mul_assign(&mut self, other: &Volume) -> Result<()> {
        self.zip_with(other, |a, b| a.mul_assign(b))
    }

    pub fn div_assign(&mut self, other: &Volume) -> Result<()> {
        self.zip_with(other, |a, b| a.div_assign(b))
    }

    /// `self <- self + a * other`
    pub fn axpy(&mut self, a: f64, other: &Volume) -> Result<()> {
        self.zip_with(other, |x, y| x.axpy(a, y))
    }

    pub fn add_scalar(&mut self, scalar: f64) {
        self.memory_areas.iter_mut().for_each(|m| m.add_scalar(scalar));
    }

    pub fn sub_scalar(&mut self, scalar: f64) {
        self.memory_areas.iter_mut().for_each(|m| m.sub_scalar(scalar));
    }

    pub fn mul_scalar(&mut self, scalar: f64) {
        self.memory_areas.iter_mut().for_each(|m| m.mul_scalar(scalar));
    }

    pub fn div_scalar(&mut self, scalar: f64) {
        self.memory_areas.iter_mut().for_each(|m| m.div_scalar(scalar));
    }

    pub fn make_zero(&mut self) {
        self.memory_areas.iter_mut().for_each(|m| m.make_zero());
    }

    /// `self <- Σ c_k v_k`
    pub fn linear_combination(&mut self, terms: &[(f64, &Volume)]) -> Result<()> {
        for (_, volume) in terms {
            self.check_same_shape(volume)?;
        }
        self.make_zero();
        for &(coefficient, volume) in terms {
            if coefficient != 0.0 {
                self.axpy(coefficient, volume)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Volume")
            .field("variables", &self.variable_names)
            .field("interior", &self.interior)
            .field("ghost", &self.ghost)
            .field("platform", &self.platform())
            .finish()
    }
}
