//! Right-hand sides driven by the integrators.

use crate::boundary::Boundary;
use crate::diffusion::DiffusionOperator;
use crate::error::Result;
use crate::grid::Grid;
use crate::numflux::NumericalFlux;
use crate::types::RVec3;
use crate::volume::Volume;

/// The semi-discrete operator `L` in `du/dt = L(u)`.
///
/// Any `FnMut(&Volume, &mut Volume, bool) -> Result<RVec3>` closure is a
/// system. Evaluating twice on an unchanged volume must give the same output.
pub trait System {
    /// Overwrite `output` with `L(conserved)`.
    ///
    /// Returns the largest wave speed per axis when `compute_wave_speeds`
    /// is set.
    fn evaluate(&mut self, conserved: &Volume, output: &mut Volume, compute_wave_speeds: bool) -> Result<RVec3>;

    /// Ghost cells `evaluate` reads.
    fn number_of_ghost_cells(&self) -> usize {
        0
    }

    /// Called on every stage before it is evaluated.
    fn prepare_stage(&mut self, _stage: &mut Volume) -> Result<()> {
        Ok(())
    }
}

impl<F> System for F
where
    F: FnMut(&Volume, &mut Volume, bool) -> Result<RVec3>,
{
    fn evaluate(&mut self, conserved: &Volume, output: &mut Volume, compute_wave_speeds: bool) -> Result<RVec3> {
        self(conserved, output, compute_wave_speeds)
    }
}

/// Flux divergence plus diffusion, with boundary conditions applied to
/// every stage.
pub struct ConservedSystem {
    flux: Box<dyn NumericalFlux>,
    diffusion: Box<dyn DiffusionOperator>,
    boundary: Box<dyn Boundary>,
    grid: Grid,
}

impl ConservedSystem {
    pub fn new(
        flux: Box<dyn NumericalFlux>,
        diffusion: Box<dyn DiffusionOperator>,
        boundary: Box<dyn Boundary>,
        grid: Grid,
    ) -> Self {
        Self {
            flux,
            diffusion,
            boundary,
            grid,
        }
    }

    pub fn flux(&self) -> &dyn NumericalFlux {
        self.flux.as_ref()
    }

    pub fn diffusion(&self) -> &dyn DiffusionOperator {
        self.diffusion.as_ref()
    }

    pub fn boundary(&self) -> &dyn Boundary {
        self.boundary.as_ref()
    }

    /// Fill the ghost cells of `volume`.
    pub fn apply_boundary(&self, volume: &mut Volume) -> Result<()> {
        self.boundary.apply_boundary_conditions(volume, &self.grid)
    }
}

impl System for ConservedSystem {
    fn evaluate(&mut self, conserved: &Volume, output: &mut Volume, compute_wave_speeds: bool) -> Result<RVec3> {
        let wave_speeds = self.flux.compute_flux(conserved, output, compute_wave_speeds)?;
        self.diffusion.apply_diffusion(conserved, output)?;
        Ok(wave_speeds)
    }

    fn number_of_ghost_cells(&self) -> usize {
        self.flux
            .number_of_ghost_cells()
            .max(self.diffusion.number_of_ghost_cells())
    }

    fn prepare_stage(&mut self, stage: &mut Volume) -> Result<()> {
        self.apply_boundary(stage)
    }
}
