//! First-order (piecewise constant) reconstruction.

use super::{Reconstruction, check_arguments, reconstruction_cells};
use crate::error::Result;
use crate::volume::Volume;

/// Both edge values equal the cell average.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoReconstruction;

impl Reconstruction for NoReconstruction {
    fn name(&self) -> &'static str {
        "none"
    }

    fn number_of_ghost_cells(&self) -> usize {
        1
    }

    fn perform_reconstruction(
        &self,
        input: &Volume,
        direction: usize,
        indicator: usize,
        left_out: &mut Volume,
        right_out: &mut Volume,
    ) -> Result<()> {
        check_arguments(input, direction, indicator, left_out, right_out, 1)?;
        let cells = reconstruction_cells(input, direction);

        let fields = input.host_fields()?;
        let mut left = left_out.host_fields_mut()?;
        let mut right = right_out.host_fields_mut()?;

        for ((values, l), r) in fields.iter().zip(left.iter_mut()).zip(right.iter_mut()) {
            for &cell in &cells {
                l[cell] = values[cell];
                r[cell] = values[cell];
            }
        }
        Ok(())
    }
}
