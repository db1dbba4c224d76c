//! Numerical flux engine.
//!
//! The engine evaluates the semi-discrete right-hand side of a finite
//! volume scheme, one axis at a time:
//!
//! ```text
//! du_i/dt = -Σ_d (F_{i+1/2} - F_{i-1/2}) / Δx_d
//! ```
//!
//! Face fluxes come from a [`FluxCoupling`] applied to reconstructed edge
//! states. The engine also reports the largest wave speed per axis for the
//! CFL condition.

mod coupling;
mod engine;

pub use coupling::{Central, EntropyConservative, FluxCoupling, Godunov, Hll, Rusanov};
pub use engine::NumericalFluxCpu;

use tracing::debug;

use crate::equations::{Burgers, EntropyEquation, Equation, EquationKind, EquationParameters, Euler};
use crate::error::{FvmError, Result};
use crate::grid::Grid;
use crate::memory::Platform;
use crate::reconstruction::create_reconstruction;
use crate::types::RVec3;
use crate::volume::Volume;

/// Semi-discrete spatial operator.
pub trait NumericalFlux: Send + Sync {
    /// `"<flux>/<reconstruction>"`.
    fn name(&self) -> String;

    /// Ghost cells the operator reads on each active axis.
    fn number_of_ghost_cells(&self) -> usize;

    /// Overwrite `output` with the flux divergence of `conserved`.
    ///
    /// Ghost cells of `conserved` must already hold boundary values. Returns
    /// the largest wave speed per axis when `compute_wave_speeds` is set,
    /// zero otherwise.
    fn compute_flux(&mut self, conserved: &Volume, output: &mut Volume, compute_wave_speeds: bool) -> Result<RVec3>;
}

/// Flux names accepted by [`create_numerical_flux`].
pub const FLUX_NAMES: [&str; 5] = ["central", "rusanov", "hll", "godunov", "entropy_conservative"];

/// Create the numerical flux for a named equation, flux and reconstruction.
///
/// `godunov` is only available for Burgers' equation.
#[track_caller]
pub fn create_numerical_flux(
    equation: &str,
    flux: &str,
    reconstruction: &str,
    parameters: &EquationParameters,
    grid: &Grid,
    platform: Platform,
) -> Result<Box<dyn NumericalFlux>> {
    if platform != Platform::Cpu {
        return Err(FvmError::UnsupportedPlatform(platform.to_string()));
    }
    let kind = EquationKind::parse(equation)?;
    let numerical_flux = match kind {
        EquationKind::Euler1 => with_coupling(Euler::<1>::from_parameters(parameters)?, flux, reconstruction, grid)?,
        EquationKind::Euler2 => with_coupling(Euler::<2>::from_parameters(parameters)?, flux, reconstruction, grid)?,
        EquationKind::Euler3 => with_coupling(Euler::<3>::from_parameters(parameters)?, flux, reconstruction, grid)?,
        EquationKind::Burgers if flux == "godunov" => boxed(Burgers, Godunov, reconstruction, grid)?,
        EquationKind::Burgers => with_coupling(Burgers, flux, reconstruction, grid)?,
    };
    debug!(
        equation = kind.name(),
        flux = %numerical_flux.name(),
        ghost_cells = numerical_flux.number_of_ghost_cells(),
        "created numerical flux"
    );
    Ok(numerical_flux)
}

#[track_caller]
fn with_coupling<E: EntropyEquation>(
    equation: E,
    flux: &str,
    reconstruction: &str,
    grid: &Grid,
) -> Result<Box<dyn NumericalFlux>> {
    match flux {
        "central" => boxed(equation, Central, reconstruction, grid),
        "rusanov" => boxed(equation, Rusanov, reconstruction, grid),
        "hll" => boxed(equation, Hll, reconstruction, grid),
        "entropy_conservative" => boxed(equation, EntropyConservative, reconstruction, grid),
        _ => Err(FvmError::unknown_name("flux", flux)),
    }
}

fn boxed<E, F>(equation: E, coupling: F, reconstruction: &str, grid: &Grid) -> Result<Box<dyn NumericalFlux>>
where
    E: Equation,
    F: FluxCoupling<E> + 'static,
{
    let reconstruction = create_reconstruction(reconstruction, Platform::Cpu)?;
    Ok(Box::new(NumericalFluxCpu::new(equation, coupling, reconstruction, grid.clone())?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory() {
        let grid = Grid::uniform_1d(0.0, 1.0, 8).unwrap();
        let parameters = EquationParameters::euler_defaults();

        let flux = create_numerical_flux("euler1", "hll", "weno3", &parameters, &grid, Platform::Cpu).unwrap();
        assert_eq!(flux.name(), "hll/weno3");
        assert_eq!(flux.number_of_ghost_cells(), 3);

        let flux = create_numerical_flux("burgers", "godunov", "none", &parameters, &grid, Platform::Cpu).unwrap();
        assert_eq!(flux.name(), "godunov/none");
    }

    #[test]
    fn test_factory_errors() {
        let grid = Grid::uniform_1d(0.0, 1.0, 8).unwrap();
        let parameters = EquationParameters::euler_defaults();

        assert!(matches!(
            create_numerical_flux("euler1", "godunov", "none", &parameters, &grid, Platform::Cpu),
            Err(FvmError::UnknownName { kind: "flux", .. })
        ));
        assert!(matches!(
            create_numerical_flux("mhd", "hll", "none", &parameters, &grid, Platform::Cpu),
            Err(FvmError::UnknownName { .. })
        ));
        assert!(matches!(
            create_numerical_flux("euler1", "hll", "none", &EquationParameters::new(), &grid, Platform::Cpu),
            Err(FvmError::UnknownParameter(_))
        ));
        assert!(matches!(
            create_numerical_flux("burgers", "hll", "none", &parameters, &grid, Platform::Device),
            Err(FvmError::UnsupportedPlatform(_))
        ));
        for name in FLUX_NAMES {
            assert!(create_numerical_flux("burgers", name, "eno2", &parameters, &grid, Platform::Cpu).is_ok());
        }
    }
}
