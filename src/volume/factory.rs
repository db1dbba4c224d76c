//! Volume creation by equation name.

use super::Volume;
use crate::equations::EquationKind;
use crate::error::Result;
use crate::memory::MemoryFactory;

/// Creates conserved and extra volumes for a named equation.
#[derive(Clone, Debug)]
pub struct VolumeFactory {
    equation: EquationKind,
    memory_factory: MemoryFactory,
}

impl VolumeFactory {
    /// Fails if `equation` is not a known equation name.
    #[track_caller]
    pub fn new(equation: &str, memory_factory: MemoryFactory) -> Result<Self> {
        Ok(Self {
            equation: EquationKind::parse(equation)?,
            memory_factory,
        })
    }

    pub fn equation(&self) -> EquationKind {
        self.equation
    }

    pub fn create_conserved_volume(&self, nx: usize, ny: usize, nz: usize, ghost_cells: usize) -> Result<Volume> {
        Volume::new(
            self.equation.conserved_variable_names(),
            &self.memory_factory,
            nx,
            ny,
            nz,
            ghost_cells,
        )
    }

    pub fn create_extra_volume(&self, nx: usize, ny: usize, nz: usize, ghost_cells: usize) -> Result<Volume> {
        Volume::new(
            self.equation.extra_variable_names(),
            &self.memory_factory,
            nx,
            ny,
            nz,
            ghost_cells,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FvmError;

    #[test]
    fn test_euler_volumes() {
        let factory = VolumeFactory::new("euler3", MemoryFactory::host()).unwrap();
        let conserved = factory.create_conserved_volume(8, 8, 8, 2).unwrap();
        let extra = factory.create_extra_volume(8, 8, 8, 2).unwrap();

        assert_eq!(conserved.number_of_variables(), 5);
        assert_eq!(extra.number_of_variables(), 4);
        assert_eq!(conserved.index_from_name("mz").unwrap(), 3);
        assert_eq!(extra.name(0).unwrap(), "p");
    }

    #[test]
    fn test_unknown_equation() {
        let err = VolumeFactory::new("navierstokes", MemoryFactory::host()).unwrap_err();
        assert!(matches!(err, FvmError::UnknownName { kind: "equation", .. }));
    }
}
