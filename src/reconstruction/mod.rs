//! Cell-edge reconstruction.
//!
//! A reconstruction turns cell averages into point values at the two edges
//! of every cell along one axis:
//!
//! ```text
//!          left_out[i]              right_out[i]
//!              |<------- cell i ------->|
//!        x_{i-1/2}                   x_{i+1/2}
//! ```
//!
//! Values are produced for the interior cells plus one ghost layer on each
//! side along the reconstruction axis, so that every face of the interior
//! has a state on both sides. Transverse ghost cells are left untouched.
//!
//! Nonlinear schemes (ENO, WENO) pick their stencils or weights from a
//! single indicator variable and apply that choice to every variable.

mod eno;
mod none;
pub mod tecno;
mod weno;

pub use eno::Eno;
pub use none::NoReconstruction;
pub use weno::Weno;

use tracing::debug;

use crate::error::{FvmError, Result};
use crate::memory::Platform;
use crate::volume::Volume;

/// Reconstruction of edge values from cell averages.
pub trait Reconstruction: Send + Sync {
    /// Name used by the factory.
    fn name(&self) -> &'static str;

    /// Ghost cells needed on each side of the interior.
    fn number_of_ghost_cells(&self) -> usize;

    /// Reconstruct every variable of `input` along `direction`.
    ///
    /// `indicator` selects the variable whose smoothness drives the
    /// stencil choice.
    fn perform_reconstruction(
        &self,
        input: &Volume,
        direction: usize,
        indicator: usize,
        left_out: &mut Volume,
        right_out: &mut Volume,
    ) -> Result<()>;
}

/// Check the common preconditions of a reconstruction call.
pub(crate) fn check_arguments(
    input: &Volume,
    direction: usize,
    indicator: usize,
    left_out: &Volume,
    right_out: &Volume,
    ghost_cells: usize,
) -> Result<()> {
    if direction >= 3 || input.interior_size()[direction] <= 1 {
        return Err(FvmError::invalid_argument(format!(
            "direction {direction} is not active in a volume of {} cells",
            input.interior_size()
        )));
    }
    if indicator >= input.number_of_variables() {
        return Err(FvmError::invalid_argument(format!(
            "indicator variable {indicator} out of range for {} variables",
            input.number_of_variables()
        )));
    }
    let available = input.ghost_cells()[direction];
    if available < ghost_cells {
        return Err(FvmError::invalid_argument(format!(
            "reconstruction needs {ghost_cells} ghost cells, volume has {available}"
        )));
    }
    input.check_same_shape(left_out)?;
    input.check_same_shape(right_out)?;
    Ok(())
}

/// Cells whose edges are reconstructed: the interior plus one layer along
/// `direction`.
pub(crate) fn reconstruction_cells(input: &Volume, direction: usize) -> Vec<usize> {
    input.interior_box().extend(direction, 1).flat_indices()
}

/// Write per-cell `(left, right)` pairs of variable `variable`.
pub(crate) fn scatter_edges(
    cells: &[usize],
    edges: &[(f64, f64)],
    left: &mut [f64],
    right: &mut [f64],
) {
    for (&cell, &(l, r)) in cells.iter().zip(edges) {
        left[cell] = l;
        right[cell] = r;
    }
}

/// Create a reconstruction by name.
///
/// Known names: `none`, `eno2`, `eno3`, `eno4`, `weno2`, `weno3`.
#[track_caller]
pub fn create_reconstruction(name: &str, platform: Platform) -> Result<Box<dyn Reconstruction>> {
    if platform != Platform::Cpu {
        return Err(FvmError::UnsupportedPlatform(platform.to_string()));
    }
    let reconstruction: Box<dyn Reconstruction> = match name {
        "none" => Box::new(NoReconstruction),
        "eno2" => Box::new(Eno::new(2)?),
        "eno3" => Box::new(Eno::new(3)?),
        "eno4" => Box::new(Eno::new(4)?),
        "weno2" => Box::new(Weno::new(2)?),
        "weno3" => Box::new(Weno::new(3)?),
        _ => return Err(FvmError::unknown_name("reconstruction", name)),
    };
    debug!(
        reconstruction = name,
        ghost_cells = reconstruction.number_of_ghost_cells(),
        "created reconstruction"
    );
    Ok(reconstruction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryFactory;

    fn ramp(nx: usize, ny: usize, ghost: usize) -> Volume {
        let mut volume = Volume::new(&["a", "b"], &MemoryFactory::host(), nx, ny, 1, ghost).unwrap();
        for v in 0..2 {
            let mut view = volume.view_mut(v).unwrap();
            for y in 0..view.ny() {
                for x in 0..view.nx() {
                    *view.at_mut(x, y, 0) = (v + 1) as f64 * x as f64;
                }
            }
        }
        volume
    }

    #[test]
    fn test_factory_names_and_ghost_cells() {
        for (name, ghost) in [("none", 1), ("eno2", 2), ("eno3", 3), ("eno4", 4), ("weno2", 2), ("weno3", 3)] {
            let reconstruction = create_reconstruction(name, Platform::Cpu).unwrap();
            assert_eq!(reconstruction.name(), name);
            assert_eq!(reconstruction.number_of_ghost_cells(), ghost);
        }
        assert!(matches!(
            create_reconstruction("mc", Platform::Cpu),
            Err(FvmError::UnknownName { kind: "reconstruction", .. })
        ));
        assert!(matches!(
            create_reconstruction("none", Platform::Device),
            Err(FvmError::UnsupportedPlatform(_))
        ));
    }

    #[test]
    fn test_linear_data_is_reproduced_by_every_scheme() {
        for name in ["eno2", "eno3", "eno4", "weno2", "weno3"] {
            let reconstruction = create_reconstruction(name, Platform::Cpu).unwrap();
            let input = ramp(12, 1, 4);
            let mut left = input.like().unwrap();
            let mut right = input.like().unwrap();
            reconstruction
                .perform_reconstruction(&input, 0, 0, &mut left, &mut right)
                .unwrap();

            for v in 0..2 {
                let slope = (v + 1) as f64;
                let (l, r) = (left.view(v).unwrap(), right.view(v).unwrap());
                for x in 3..17 {
                    let center = slope * x as f64;
                    assert!((l.at(x, 0, 0) - (center - 0.5 * slope)).abs() < 1e-9, "{name} left at {x}");
                    assert!((r.at(x, 0, 0) - (center + 0.5 * slope)).abs() < 1e-9, "{name} right at {x}");
                }
            }
        }
    }

    #[test]
    fn test_invalid_arguments() {
        let reconstruction = create_reconstruction("eno2", Platform::Cpu).unwrap();
        let input = ramp(8, 1, 2);
        let mut left = input.like().unwrap();
        let mut right = input.like().unwrap();

        // y is inactive
        assert!(reconstruction.perform_reconstruction(&input, 1, 0, &mut left, &mut right).is_err());
        // only two variables
        assert!(reconstruction.perform_reconstruction(&input, 0, 2, &mut left, &mut right).is_err());

        let thin = ramp(8, 1, 1);
        let mut thin_left = thin.like().unwrap();
        let mut thin_right = thin.like().unwrap();
        assert!(reconstruction
            .perform_reconstruction(&thin, 0, 0, &mut thin_left, &mut thin_right)
            .is_err());
    }

    #[test]
    fn test_transverse_ghost_cells_untouched() {
        let reconstruction = create_reconstruction("none", Platform::Cpu).unwrap();
        let mut input = ramp(4, 4, 1);
        input.add_scalar(1.0);
        let mut left = input.like().unwrap();
        let mut right = input.like().unwrap();
        reconstruction.perform_reconstruction(&input, 0, 0, &mut left, &mut right).unwrap();

        let l = left.view(0).unwrap();
        // x ghost layer written, y ghost layer not
        assert_eq!(l.at(0, 1, 0), 1.0);
        assert_eq!(l.at(1, 0, 0), 0.0);
        assert_eq!(l.at(2, 2, 0), 3.0);
    }
}
