//! Reconstructions for TECNO diffusion.
//!
//! TECNO schemes reconstruct scaled entropy variables that have already been
//! projected onto the characteristic fields of each face. Cell i therefore
//! carries two inputs: `left_input[i]`, projected for face i-1/2, and
//! `right_input[i]`, projected for face i+1/2. The reconstruction produces
//! the value at the left edge of cell i from `left_input` and the value at
//! the right edge from `right_input`.
//!
//! Every component is treated on its own so that the jump across a face
//! keeps the sign of the jump in the underlying data (the sign property of
//! ENO reconstructions).

use tracing::debug;

use super::eno::{choose_shift, left_edge, right_edge};
use super::{reconstruction_cells, scatter_edges};
use crate::error::{FvmError, Result};
use crate::memory::Platform;
use crate::volume::{Volume, map_cells};

/// Reconstruction of face-projected entropy variables.
pub trait TecnoReconstruction: Send + Sync {
    fn name(&self) -> &'static str;

    fn number_of_ghost_cells(&self) -> usize;

    fn perform_reconstruction(
        &self,
        left_input: &Volume,
        right_input: &Volume,
        direction: usize,
        left_out: &mut Volume,
        right_out: &mut Volume,
    ) -> Result<()>;
}

fn check_arguments(
    left_input: &Volume,
    right_input: &Volume,
    direction: usize,
    left_out: &Volume,
    right_out: &Volume,
    ghost_cells: usize,
) -> Result<()> {
    if direction >= 3 || left_input.interior_size()[direction] <= 1 {
        return Err(FvmError::invalid_argument(format!(
            "direction {direction} is not active in a volume of {} cells",
            left_input.interior_size()
        )));
    }
    let available = left_input.ghost_cells()[direction];
    if available < ghost_cells {
        return Err(FvmError::invalid_argument(format!(
            "reconstruction needs {ghost_cells} ghost cells, volume has {available}"
        )));
    }
    left_input.check_same_shape(right_input)?;
    left_input.check_same_shape(left_out)?;
    left_input.check_same_shape(right_out)?;
    Ok(())
}

/// First-order TECNO reconstruction: the projected inputs are the edge values.
#[derive(Clone, Copy, Debug, Default)]
pub struct TecnoNone;

impl TecnoReconstruction for TecnoNone {
    fn name(&self) -> &'static str {
        "tecno_none"
    }

    fn number_of_ghost_cells(&self) -> usize {
        1
    }

    fn perform_reconstruction(
        &self,
        left_input: &Volume,
        right_input: &Volume,
        direction: usize,
        left_out: &mut Volume,
        right_out: &mut Volume,
    ) -> Result<()> {
        check_arguments(left_input, right_input, direction, left_out, right_out, 1)?;
        let cells = reconstruction_cells(left_input, direction);

        let left_fields = left_input.host_fields()?;
        let right_fields = right_input.host_fields()?;
        let mut left = left_out.host_fields_mut()?;
        let mut right = right_out.host_fields_mut()?;

        for v in 0..left_fields.len() {
            for &cell in &cells {
                left[v][cell] = left_fields[v][cell];
                right[v][cell] = right_fields[v][cell];
            }
        }
        Ok(())
    }
}

/// Component-wise ENO reconstruction of order 2 or 3.
#[derive(Clone, Copy, Debug)]
pub struct TecnoEno {
    order: usize,
}

impl TecnoEno {
    pub fn new(order: usize) -> Result<Self> {
        if !(2..=3).contains(&order) {
            return Err(FvmError::invalid_argument(format!(
                "TECNO ENO order must be 2 or 3, got {order}"
            )));
        }
        Ok(Self { order })
    }
}

impl TecnoReconstruction for TecnoEno {
    fn name(&self) -> &'static str {
        match self.order {
            2 => "tecno_eno2",
            _ => "tecno_eno3",
        }
    }

    fn number_of_ghost_cells(&self) -> usize {
        self.order
    }

    fn perform_reconstruction(
        &self,
        left_input: &Volume,
        right_input: &Volume,
        direction: usize,
        left_out: &mut Volume,
        right_out: &mut Volume,
    ) -> Result<()> {
        let order = self.order;
        check_arguments(left_input, right_input, direction, left_out, right_out, order)?;
        let stride = left_input.stride(direction);
        let cells = reconstruction_cells(left_input, direction);

        let left_fields = left_input.host_fields()?;
        let right_fields = right_input.host_fields()?;
        let mut left = left_out.host_fields_mut()?;
        let mut right = right_out.host_fields_mut()?;

        for v in 0..left_fields.len() {
            let (left_values, right_values) = (left_fields[v], right_fields[v]);
            let edges = map_cells(&cells, |cell| {
                let left_shift = choose_shift(left_values, cell, stride, order);
                let right_shift = choose_shift(right_values, cell, stride, order);
                (
                    left_edge(left_values, cell, stride, order, left_shift),
                    right_edge(right_values, cell, stride, order, right_shift),
                )
            });
            scatter_edges(&cells, &edges, &mut left[v][..], &mut right[v][..]);
        }
        Ok(())
    }
}

/// Create a TECNO reconstruction by name: `none`, `eno2` or `eno3`.
#[track_caller]
pub fn create_tecno_reconstruction(name: &str, platform: Platform) -> Result<Box<dyn TecnoReconstruction>> {
    if platform != Platform::Cpu {
        return Err(FvmError::UnsupportedPlatform(platform.to_string()));
    }
    let reconstruction: Box<dyn TecnoReconstruction> = match name {
        "none" => Box::new(TecnoNone),
        "eno2" => Box::new(TecnoEno::new(2)?),
        "eno3" => Box::new(TecnoEno::new(3)?),
        _ => return Err(FvmError::unknown_name("tecno reconstruction", name)),
    };
    debug!(reconstruction = reconstruction.name(), "created tecno reconstruction");
    Ok(reconstruction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryFactory;

    fn volume_from(values: &[f64], ghost: usize) -> Volume {
        let n = values.len() - 2 * ghost;
        let mut volume = Volume::new(&["w"], &MemoryFactory::host(), n, 1, 1, ghost).unwrap();
        volume
            .scalar_memory_area_mut(0)
            .unwrap()
            .copy_from_host(values)
            .unwrap();
        volume
    }

    #[test]
    fn test_sign_property_at_a_step() {
        // Jumps across every face keep the sign of the data jump.
        let values = [0.0, 0.0, 0.0, 0.0, 0.2, 1.0, 1.0, 1.0, 1.0, 1.0];
        let input = volume_from(&values, 3);
        let mut left = input.like().unwrap();
        let mut right = input.like().unwrap();

        let eno = create_tecno_reconstruction("eno3", Platform::Cpu).unwrap();
        eno.perform_reconstruction(&input, &input, 0, &mut left, &mut right).unwrap();

        let (l, r) = (left.view(0).unwrap(), right.view(0).unwrap());
        for i in 2..7 {
            let data_jump = values[i + 1] - values[i];
            let reconstructed_jump = l.at(i + 1, 0, 0) - r.at(i, 0, 0);
            assert!(
                reconstructed_jump * data_jump >= -1e-14,
                "face {i}: data jump {data_jump}, reconstructed {reconstructed_jump}"
            );
        }
    }

    #[test]
    fn test_none_copies_inputs() {
        let left_input = volume_from(&[1.0, 2.0, 3.0, 4.0], 1);
        let right_input = volume_from(&[5.0, 6.0, 7.0, 8.0], 1);
        let mut left = left_input.like().unwrap();
        let mut right = left_input.like().unwrap();

        TecnoNone
            .perform_reconstruction(&left_input, &right_input, 0, &mut left, &mut right)
            .unwrap();
        assert_eq!(left.copy_to_host(0).unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(right.copy_to_host(0).unwrap(), vec![5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn test_unknown_name() {
        assert!(create_tecno_reconstruction("weno2", Platform::Cpu).is_err());
    }
}
