//! Typed access to volumes through an [`Equation`]'s state vectors.

use super::Volume;
use crate::equations::{Equation, StateVector};
use crate::error::{FvmError, Result};
use crate::grid::Grid;
use crate::types::RVec3;

/// Gather the state stored at flat index `index` of `fields`.
#[inline(always)]
pub fn load_state<S: StateVector>(fields: &[&[f64]], index: usize) -> S {
    S::from_fn(|v| fields[v][index])
}

/// Scatter `state` to flat index `index` of `fields`.
#[inline(always)]
pub fn store_state<S: StateVector>(fields: &mut [&mut [f64]], index: usize, state: &S) {
    for (v, field) in fields.iter_mut().enumerate().take(S::N_VARS) {
        field[index] = state.component(v);
    }
}

fn check_variable_count(volume: &Volume, expected: usize) -> Result<()> {
    if volume.number_of_variables() != expected {
        return Err(FvmError::shape_mismatch(
            format!("{expected} variables"),
            format!("{} variables", volume.number_of_variables()),
        ));
    }
    Ok(())
}

/// Host copies of every field of `volume`.
fn host_buffers(volume: &Volume) -> Result<Vec<Vec<f64>>> {
    (0..volume.number_of_variables())
        .map(|v| volume.copy_to_host(v))
        .collect()
}

/// Set the interior cells of `volume` to the conserved state of
/// `initial(x)` at each cell midpoint.
pub fn fill_conserved<E, F>(equation: &E, volume: &mut Volume, grid: &Grid, initial: F) -> Result<()>
where
    E: Equation,
    F: Fn(RVec3) -> E::Primitive,
{
    check_variable_count(volume, E::Conserved::N_VARS)?;
    if volume.interior_size() != grid.dimensions() {
        return Err(FvmError::shape_mismatch(
            format!("grid of {} cells", grid.dimensions()),
            format!("volume of {} cells", volume.interior_size()),
        ));
    }

    let mut buffers = host_buffers(volume)?;
    let ghost = volume.ghost_cells();
    for cell in volume.interior_box().coordinates() {
        let local = cell - ghost;
        let primitive = initial(grid.cell_midpoint(local.x, local.y, local.z));
        let state = equation.compute_conserved(&primitive);
        let index = volume.index(cell.x, cell.y, cell.z);
        for (v, buffer) in buffers.iter_mut().enumerate() {
            buffer[index] = state.component(v);
        }
    }

    for (v, buffer) in buffers.iter().enumerate() {
        volume.scalar_memory_area_mut(v)?.copy_from_host(buffer)?;
    }
    Ok(())
}

/// Evaluate the derived variables of `conserved` into `extra` on interior cells.
pub fn fill_extra<E: Equation>(equation: &E, conserved: &Volume, extra: &mut Volume) -> Result<()> {
    check_variable_count(conserved, E::Conserved::N_VARS)?;
    check_variable_count(extra, equation.extra_variable_names().len())?;
    if conserved.total_size() != extra.total_size() {
        return Err(FvmError::shape_mismatch(
            format!("{} cells", conserved.total_size()),
            format!("{} cells", extra.total_size()),
        ));
    }

    let source = host_buffers(conserved)?;
    let source: Vec<&[f64]> = source.iter().map(Vec::as_slice).collect();
    let mut target = host_buffers(extra)?;

    for index in conserved.interior_box().flat_indices() {
        let state: E::Conserved = load_state(&source, index);
        let derived = equation.compute_extra(&state);
        for (v, buffer) in target.iter_mut().enumerate() {
            buffer[index] = equation.extra_component(&derived, v);
        }
    }

    for (v, buffer) in target.iter().enumerate() {
        extra.scalar_memory_area_mut(v)?.copy_from_host(buffer)?;
    }
    Ok(())
}

/// Whether every interior cell of `volume` is admissible.
pub fn check_constraints<E: Equation>(equation: &E, volume: &Volume) -> Result<bool> {
    check_variable_count(volume, E::Conserved::N_VARS)?;
    let buffers = host_buffers(volume)?;
    let fields: Vec<&[f64]> = buffers.iter().map(Vec::as_slice).collect();

    Ok(volume.interior_box().flat_indices().into_iter().all(|index| {
        let state: E::Conserved = load_state(&fields, index);
        equation.obeys_constraints(&state, &equation.compute_extra(&state))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::{Euler1, EulerPrimitive};
    use crate::memory::MemoryFactory;

    #[test]
    fn test_fill_and_check() {
        let euler = Euler1::new(1.4);
        let grid = Grid::uniform_1d(0.0, 1.0, 8).unwrap();
        let mut volume =
            Volume::new(euler.conserved_variable_names(), &MemoryFactory::host(), 8, 1, 1, 2).unwrap();

        fill_conserved(&euler, &mut volume, &grid, |x| {
            EulerPrimitive::new(1.0 + x.x, [0.5], 1.0)
        })
        .unwrap();

        let rho = volume.view(0).unwrap();
        assert!((rho.at(2, 0, 0) - 1.0625).abs() < 1e-14);
        assert_eq!(rho.at(0, 0, 0), 0.0);
        assert!(check_constraints(&euler, &volume).unwrap());

        let mut extra =
            Volume::new(euler.extra_variable_names(), &MemoryFactory::host(), 8, 1, 1, 2).unwrap();
        fill_extra(&euler, &volume, &mut extra).unwrap();
        assert!((extra.view(0).unwrap().at(5, 0, 0) - 1.0).abs() < 1e-12);
        assert!((extra.view(1).unwrap().at(5, 0, 0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_negative_density_detected() {
        let euler = Euler1::new(1.4);
        let grid = Grid::uniform_1d(0.0, 1.0, 4).unwrap();
        let mut volume =
            Volume::new(euler.conserved_variable_names(), &MemoryFactory::host(), 4, 1, 1, 1).unwrap();
        fill_conserved(&euler, &mut volume, &grid, |x| {
            EulerPrimitive::new(if x.x > 0.5 { -1.0 } else { 1.0 }, [0.0], 1.0)
        })
        .unwrap();
        assert!(!check_constraints(&euler, &volume).unwrap());
    }

    #[test]
    fn test_load_store_roundtrip() {
        let (mut a, mut b, mut c) = (vec![0.0; 3], vec![0.0; 3], vec![0.0; 3]);
        let state = crate::equations::EulerConserved::<1>::new(1.0, [2.0], 3.0);
        {
            let mut fields: Vec<&mut [f64]> = vec![&mut a, &mut b, &mut c];
            store_state(&mut fields, 1, &state);
        }
        assert_eq!((a[1], b[1], c[1]), (1.0, 2.0, 3.0));

        let fields: Vec<&[f64]> = vec![&a, &b, &c];
        let loaded: crate::equations::EulerConserved<1> = load_state(&fields, 1);
        assert_eq!(loaded, state);
    }
}
