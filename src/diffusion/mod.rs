//! Numerical diffusion added on top of the flux divergence.
//!
//! An entropy-conservative flux needs explicit diffusion to be entropy
//! stable. The operator adds its contribution to an already computed
//! right-hand side.

mod tecno;

pub use tecno::TecnoDiffusion;

use tracing::debug;

use crate::equations::{Burgers, EntropyEquation, EquationKind, EquationParameters, Euler};
use crate::error::{FvmError, Result};
use crate::grid::Grid;
use crate::memory::Platform;
use crate::reconstruction::tecno::{TecnoReconstruction, create_tecno_reconstruction};
use crate::volume::Volume;

/// Additive diffusion term of the semi-discrete scheme.
pub trait DiffusionOperator: Send + Sync {
    fn name(&self) -> String;

    /// Ghost cells read on each active axis.
    fn number_of_ghost_cells(&self) -> usize;

    /// Add the diffusion of `conserved` to `output`.
    fn apply_diffusion(&mut self, conserved: &Volume, output: &mut Volume) -> Result<()>;
}

/// Leaves the right-hand side unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDiffusion;

impl DiffusionOperator for NoDiffusion {
    fn name(&self) -> String {
        "none".to_string()
    }

    fn number_of_ghost_cells(&self) -> usize {
        0
    }

    fn apply_diffusion(&mut self, _conserved: &Volume, _output: &mut Volume) -> Result<()> {
        Ok(())
    }
}

/// Create a diffusion operator by name: `none` or `tecnoroe`.
///
/// `reconstruction` names the TECNO reconstruction and is ignored for
/// `none`.
#[track_caller]
pub fn create_diffusion_operator(
    name: &str,
    reconstruction: &str,
    equation: &str,
    parameters: &EquationParameters,
    grid: &Grid,
    platform: Platform,
) -> Result<Box<dyn DiffusionOperator>> {
    if platform != Platform::Cpu {
        return Err(FvmError::UnsupportedPlatform(platform.to_string()));
    }
    let operator: Box<dyn DiffusionOperator> = match name {
        "none" => Box::new(NoDiffusion),
        "tecnoroe" => {
            let reconstruction = create_tecno_reconstruction(reconstruction, platform)?;
            match EquationKind::parse(equation)? {
                EquationKind::Euler1 => tecno(Euler::<1>::from_parameters(parameters)?, reconstruction, grid),
                EquationKind::Euler2 => tecno(Euler::<2>::from_parameters(parameters)?, reconstruction, grid),
                EquationKind::Euler3 => tecno(Euler::<3>::from_parameters(parameters)?, reconstruction, grid),
                EquationKind::Burgers => tecno(Burgers, reconstruction, grid),
            }
        }
        _ => return Err(FvmError::unknown_name("diffusion", name)),
    };
    debug!(diffusion = %operator.name(), "created diffusion operator");
    Ok(operator)
}

fn tecno<E: EntropyEquation>(
    equation: E,
    reconstruction: Box<dyn TecnoReconstruction>,
    grid: &Grid,
) -> Box<dyn DiffusionOperator> {
    Box::new(TecnoDiffusion::new(equation, reconstruction, grid.clone()))
}
