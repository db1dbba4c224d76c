//! Dimension-by-dimension flux divergence on the host.

use std::marker::PhantomData;

use tracing::trace;

use super::NumericalFlux;
use super::coupling::FluxCoupling;
use crate::equations::{Equation, StateVector};
use crate::error::{FvmError, Result};
use crate::grid::Grid;
use crate::reconstruction::Reconstruction;
use crate::types::RVec3;
use crate::volume::{Volume, load_state, map_cells};

/// Flux divergence `-Σ_d (F_{i+1/2} - F_{i-1/2}) / Δx_d` with a pluggable
/// face flux and reconstruction.
pub struct NumericalFluxCpu<E: Equation, F: FluxCoupling<E>> {
    equation: E,
    coupling: F,
    reconstruction: Box<dyn Reconstruction>,
    grid: Grid,
    indicator: usize,
    workspace: Option<(Volume, Volume)>,
    _marker: PhantomData<fn() -> E>,
}

impl<E: Equation, F: FluxCoupling<E>> NumericalFluxCpu<E, F> {
    /// Fails if the grid has more active axes than the equation supports.
    pub fn new(equation: E, coupling: F, reconstruction: Box<dyn Reconstruction>, grid: Grid) -> Result<Self> {
        if grid.active_dimension() > equation.max_dimension() {
            return Err(FvmError::invalid_argument(format!(
                "{} supports {} dimensions, grid has {}",
                equation.name(),
                equation.max_dimension(),
                grid.active_dimension()
            )));
        }
        Ok(Self {
            equation,
            coupling,
            reconstruction,
            grid,
            indicator: 0,
            workspace: None,
            _marker: PhantomData,
        })
    }

    /// Variable whose smoothness drives nonlinear reconstructions.
    pub fn with_indicator(mut self, indicator: usize) -> Self {
        self.indicator = indicator;
        self
    }

    pub fn equation(&self) -> &E {
        &self.equation
    }

    /// `coupling/reconstruction`, e.g. `hll/weno2`.
    pub fn label(&self) -> String {
        format!("{}/{}", self.coupling.name(), self.reconstruction.name())
    }

    fn check_input(&self, conserved: &Volume, output: &Volume) -> Result<()> {
        if conserved.number_of_variables() != E::Conserved::N_VARS {
            return Err(FvmError::shape_mismatch(
                format!("{} variables", E::Conserved::N_VARS),
                format!("{} variables", conserved.number_of_variables()),
            ));
        }
        conserved.check_same_shape(output)?;
        if conserved.interior_size() != self.grid.dimensions() {
            return Err(FvmError::shape_mismatch(
                format!("grid of {} cells", self.grid.dimensions()),
                format!("volume of {} cells", conserved.interior_size()),
            ));
        }
        let needed = self.reconstruction.number_of_ghost_cells();
        let ghost = conserved.ghost_cells();
        for axis in 0..3 {
            if conserved.interior_size()[axis] > 1 && ghost[axis] < needed {
                return Err(FvmError::invalid_argument(format!(
                    "{} needs {needed} ghost cells, volume has {}",
                    self.label(),
                    ghost[axis]
                )));
            }
        }
        Ok(())
    }

    /// Reconstruction buffers matching `conserved`, reused between calls.
    fn take_workspace(&mut self, conserved: &Volume) -> Result<(Volume, Volume)> {
        match self.workspace.take() {
            Some((left, right)) if conserved.check_same_shape(&left).is_ok() => Ok((left, right)),
            _ => Ok((conserved.like()?, conserved.like()?)),
        }
    }

    /// Subtract the flux difference along `DIR` from `output`.
    fn sweep<const DIR: usize>(
        &self,
        conserved: &Volume,
        left: &mut Volume,
        right: &mut Volume,
        output: &mut Volume,
    ) -> Result<()> {
        self.reconstruction
            .perform_reconstruction(conserved, DIR, self.indicator, left, right)?;

        let stride = conserved.stride(DIR);
        let ghost = conserved.ghost_cells()[DIR];
        let n = conserved.interior_size()[DIR];
        let inverse_dx = 1.0 / self.grid.cell_lengths()[DIR];

        // Face i+1/2 is stored at the cell on its lower side.
        let face_cells = conserved
            .interior_box()
            .with_range(DIR, ghost - 1, ghost + n)
            .flat_indices();
        let fluxes = {
            let left_fields = left.host_fields()?;
            let right_fields = right.host_fields()?;
            map_cells(&face_cells, |cell| {
                let lower: E::Conserved = load_state(&right_fields, cell);
                let upper: E::Conserved = load_state(&left_fields, cell + stride);
                self.coupling.flux::<DIR>(
                    &self.equation,
                    &self.equation.all_variables(lower),
                    &self.equation.all_variables(upper),
                )
            })
        };

        let mut face_flux = vec![E::Conserved::zero(); conserved.total_size().product()];
        for (&cell, flux) in face_cells.iter().zip(fluxes) {
            face_flux[cell] = flux;
        }

        let mut out = output.host_fields_mut()?;
        for cell in conserved.interior_box().flat_indices() {
            let divergence = (face_flux[cell] - face_flux[cell - stride]) * inverse_dx;
            for (v, field) in out.iter_mut().enumerate() {
                field[cell] -= divergence.component(v);
            }
        }
        Ok(())
    }

    /// Largest characteristic speed along `DIR` over the interior.
    fn max_wave_speed<const DIR: usize>(&self, conserved: &Volume) -> Result<f64> {
        let fields = conserved.host_fields()?;
        let cells = conserved.interior_box().flat_indices();
        let speeds = map_cells(&cells, |cell| {
            let state: E::Conserved = load_state(&fields, cell);
            self.equation.wave_speed::<DIR>(&state, &self.equation.compute_extra(&state))
        });
        Ok(speeds.into_iter().fold(0.0, f64::max))
    }

    fn direction(
        &self,
        direction: usize,
        conserved: &Volume,
        left: &mut Volume,
        right: &mut Volume,
        output: &mut Volume,
        compute_wave_speeds: bool,
    ) -> Result<f64> {
        match direction {
            0 => {
                self.sweep::<0>(conserved, left, right, output)?;
                if compute_wave_speeds { self.max_wave_speed::<0>(conserved) } else { Ok(0.0) }
            }
            1 => {
                self.sweep::<1>(conserved, left, right, output)?;
                if compute_wave_speeds { self.max_wave_speed::<1>(conserved) } else { Ok(0.0) }
            }
            _ => {
                self.sweep::<2>(conserved, left, right, output)?;
                if compute_wave_speeds { self.max_wave_speed::<2>(conserved) } else { Ok(0.0) }
            }
        }
    }
}

impl<E, F> NumericalFlux for NumericalFluxCpu<E, F>
where
    E: Equation,
    F: FluxCoupling<E> + 'static,
{
    fn name(&self) -> String {
        self.label()
    }

    fn number_of_ghost_cells(&self) -> usize {
        self.reconstruction.number_of_ghost_cells()
    }

    fn compute_flux(&mut self, conserved: &Volume, output: &mut Volume, compute_wave_speeds: bool) -> Result<RVec3> {
        self.check_input(conserved, output)?;
        if !conserved.is_on_host() || !output.is_on_host() {
            return Err(FvmError::UnsupportedPlatform(conserved.platform().to_string()));
        }
        output.make_zero();

        let (mut left, mut right) = self.take_workspace(conserved)?;
        let mut wave_speeds = RVec3::splat(0.0);
        for axis in 0..3 {
            if conserved.interior_size()[axis] <= 1 {
                continue;
            }
            let result = self.direction(axis, conserved, &mut left, &mut right, output, compute_wave_speeds);
            match result {
                Ok(speed) => wave_speeds[axis] = speed,
                Err(err) => {
                    self.workspace = Some((left, right));
                    return Err(err);
                }
            }
        }
        self.workspace = Some((left, right));

        trace!(flux = %self.name(), %wave_speeds, "computed flux divergence");
        Ok(wave_speeds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::{Burgers, BurgersPrimitive, Euler1, EulerPrimitive};
    use crate::memory::{MemoryFactory, Platform};
    use crate::numflux::coupling::{Godunov, Rusanov};
    use crate::reconstruction::create_reconstruction;
    use crate::types::IVec3;
    use crate::volume::fill_conserved;

    fn periodic_fill(volume: &mut Volume) {
        let ghost = volume.ghost_cells().x;
        let n = volume.nx();
        for v in 0..volume.number_of_variables() {
            let mut view = volume.view_mut(v).unwrap();
            for l in 0..ghost {
                let a = view.at(l + n, 0, 0);
                *view.at_mut(l, 0, 0) = a;
                let b = view.at(ghost + l, 0, 0);
                *view.at_mut(ghost + n + l, 0, 0) = b;
            }
        }
    }

    #[test]
    fn test_constant_state_has_zero_divergence() {
        let grid = Grid::uniform_1d(0.0, 1.0, 16).unwrap();
        let euler = Euler1::new(1.4);
        let mut flux = NumericalFluxCpu::new(
            euler,
            Rusanov,
            create_reconstruction("eno2", Platform::Cpu).unwrap(),
            grid.clone(),
        )
        .unwrap();

        let mut u = Volume::new(&["rho", "mx", "E"], &MemoryFactory::host(), 16, 1, 1, 2).unwrap();
        fill_conserved(&euler, &mut u, &grid, |_| EulerPrimitive::new(1.0, [0.5], 1.0)).unwrap();
        periodic_fill(&mut u);
        let mut out = u.like().unwrap();
        let speeds = flux.compute_flux(&u, &mut out, true).unwrap();

        let c = (1.4f64).sqrt();
        assert!((speeds.x - (0.5 + c)).abs() < 1e-12);
        assert_eq!(speeds.y, 0.0);
        for v in 0..3 {
            let out = out.view(v).unwrap();
            for x in 2..18 {
                assert!(out.at(x, 0, 0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_divergence_conserves_total() {
        let grid = Grid::uniform_1d(0.0, 1.0, 32).unwrap();
        let mut flux = NumericalFluxCpu::new(
            Burgers,
            Godunov,
            create_reconstruction("none", Platform::Cpu).unwrap(),
            grid.clone(),
        )
        .unwrap();
        let mut u = Volume::new(&["u"], &MemoryFactory::host(), 32, 1, 1, 1).unwrap();
        fill_conserved(&Burgers, &mut u, &grid, |x| {
            BurgersPrimitive::new((2.0 * std::f64::consts::PI * x.x).sin())
        })
        .unwrap();
        periodic_fill(&mut u);
        let mut out = u.like().unwrap();
        flux.compute_flux(&u, &mut out, false).unwrap();

        let out = out.view(0).unwrap();
        let total: f64 = (1..33).map(|x| out.at(x, 0, 0)).sum();
        assert!(total.abs() < 1e-12);
    }

    #[test]
    fn test_first_order_upwind_update() {
        // Step from 1 to 0 at x = 0.5 with periodic ghosts.
        let grid = Grid::uniform_1d(0.0, 1.0, 4).unwrap();
        let mut flux = NumericalFluxCpu::new(
            Burgers,
            Godunov,
            create_reconstruction("none", Platform::Cpu).unwrap(),
            grid.clone(),
        )
        .unwrap();
        let mut u = Volume::new(&["u"], &MemoryFactory::host(), 4, 1, 1, 1).unwrap();
        u.view_mut(0).unwrap().as_mut_slice().copy_from_slice(&[0.0, 1.0, 1.0, 0.0, 0.0, 1.0]);
        let mut out = u.like().unwrap();
        flux.compute_flux(&u, &mut out, false).unwrap();

        let out = out.view(0).unwrap();
        let expected = [-2.0, 0.0, 2.0, 0.0];
        for (i, e) in expected.iter().enumerate() {
            assert!((out.at(i + 1, 0, 0) - e).abs() < 1e-12, "cell {i}");
        }
    }

    #[test]
    fn test_rejects_mismatched_input() {
        let grid = Grid::new(RVec3::splat(0.0), RVec3::new(1.0, 1.0, 0.0), IVec3::new(4, 4, 1)).unwrap();
        let mut flux = NumericalFluxCpu::new(
            Burgers,
            Rusanov,
            create_reconstruction("eno3", Platform::Cpu).unwrap(),
            grid,
        )
        .unwrap();
        let u = Volume::new(&["u"], &MemoryFactory::host(), 4, 4, 1, 2).unwrap();
        let mut out = u.like().unwrap();
        match flux.compute_flux(&u, &mut out, false) {
            Err(FvmError::InvalidArgument(message)) => assert!(message.contains("rusanov/eno3"), "{message}"),
            other => panic!("expected a ghost cell error, got {other:?}"),
        }
        assert_eq!(flux.label(), "rusanov/eno3");
    }

    #[test]
    fn test_dimension_limit() {
        let grid = Grid::new(RVec3::splat(0.0), RVec3::new(1.0, 1.0, 0.0), IVec3::new(4, 4, 1)).unwrap();
        let result = NumericalFluxCpu::new(
            Euler1::new(1.4),
            Rusanov,
            create_reconstruction("none", Platform::Cpu).unwrap(),
            grid,
        );
        assert!(result.is_err());
    }
}
