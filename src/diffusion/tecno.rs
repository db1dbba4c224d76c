//! TECNO entropy-stable diffusion with Roe characteristics.
//!
//! At every face the operator adds
//!
//! ```text
//! D_{i+1/2} = ½ R |Λ| (w⁺ - w⁻)
//! ```
//!
//! where `R`, `Λ` are the scaled Roe eigenvectors and eigenvalues of the
//! face and `w∓` are reconstructed values of the projected entropy
//! variables `Rᵀ v` on either side. The right-hand side receives
//! `(D_{i+1/2} - D_{i-1/2}) / Δx`.

use tracing::trace;

use super::DiffusionOperator;
use crate::equations::{EntropyEquation, RoeEigensystem, StateVector};
use crate::error::{FvmError, Result};
use crate::grid::Grid;
use crate::reconstruction::tecno::TecnoReconstruction;
use crate::volume::{Volume, load_state, map_cells, store_state};

struct Workspace {
    left_input: Volume,
    right_input: Volume,
    left_out: Volume,
    right_out: Volume,
}

impl Workspace {
    fn like(conserved: &Volume) -> Result<Self> {
        Ok(Self {
            left_input: conserved.like()?,
            right_input: conserved.like()?,
            left_out: conserved.like()?,
            right_out: conserved.like()?,
        })
    }
}

/// TECNO diffusion for an equation with an entropy pair.
pub struct TecnoDiffusion<E: EntropyEquation> {
    equation: E,
    reconstruction: Box<dyn TecnoReconstruction>,
    grid: Grid,
    workspace: Option<Workspace>,
}

impl<E: EntropyEquation> TecnoDiffusion<E> {
    pub fn new(equation: E, reconstruction: Box<dyn TecnoReconstruction>, grid: Grid) -> Self {
        Self {
            equation,
            reconstruction,
            grid,
            workspace: None,
        }
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
        if !conserved.is_on_host() || !output.is_on_host() {
            return Err(FvmError::UnsupportedPlatform(conserved.platform().to_string()));
        }
        Ok(())
    }

    fn take_workspace(&mut self, conserved: &Volume) -> Result<Workspace> {
        match self.workspace.take() {
            Some(workspace) if conserved.check_same_shape(&workspace.left_input).is_ok() => Ok(workspace),
            _ => Workspace::like(conserved),
        }
    }

    fn sweep<const DIR: usize>(&self, conserved: &Volume, workspace: &mut Workspace, output: &mut Volume) -> Result<()> {
        let equation = &self.equation;
        let stride = conserved.stride(DIR);
        let total = conserved.total_size()[DIR];
        let ghost = conserved.ghost_cells()[DIR];
        let n = conserved.interior_size()[DIR];
        let inverse_dx = 1.0 / self.grid.cell_lengths()[DIR];
        let position = |cell: usize| (cell / stride) % total;

        let line_cells = conserved.interior_box().with_range(DIR, 0, total).flat_indices();
        let face_cells = conserved.interior_box().with_range(DIR, 0, total - 1).flat_indices();

        // Face i+1/2 is stored at the cell on its lower side.
        let mut faces: Vec<Option<RoeEigensystem>> = vec![None; conserved.total_size().product()];
        {
            let fields = conserved.host_fields()?;
            let all = |cell: usize| equation.all_variables(load_state(&fields, cell));
            let systems = map_cells(&face_cells, |cell| {
                equation.roe_eigensystem::<DIR>(&all(cell), &all(cell + stride))
            });
            for (&cell, system) in face_cells.iter().zip(systems) {
                faces[cell] = Some(system);
            }

            let projected = map_cells(&line_cells, |cell| {
                let variables = all(cell);
                let v = equation.entropy_variables(&variables.conserved, &variables.extra);
                let lower = if position(cell) > 0 { cell - stride } else { cell };
                let upper = if position(cell) + 1 < total { cell } else { cell - stride };
                let project = |face: usize| faces[face].as_ref().map(|system| system.project(&v));
                (project(lower), project(upper))
            });

            let mut left_input = workspace.left_input.host_fields_mut()?;
            let mut right_input = workspace.right_input.host_fields_mut()?;
            for (&cell, (left, right)) in line_cells.iter().zip(projected) {
                let (Some(left), Some(right)) = (left, right) else {
                    return Err(FvmError::Numerical(format!("missing face eigensystem at cell {cell}")));
                };
                store_state(&mut left_input, cell, &left);
                store_state(&mut right_input, cell, &right);
            }
        }

        self.reconstruction.perform_reconstruction(
            &workspace.left_input,
            &workspace.right_input,
            DIR,
            &mut workspace.left_out,
            &mut workspace.right_out,
        )?;

        let active_faces = conserved
            .interior_box()
            .with_range(DIR, ghost - 1, ghost + n)
            .flat_indices();
        let mut face_diffusion = vec![E::Conserved::zero(); conserved.total_size().product()];
        {
            let left_out = workspace.left_out.host_fields()?;
            let right_out = workspace.right_out.host_fields()?;
            let diffusion = map_cells(&active_faces, |cell| {
                let upper: E::Conserved = load_state(&left_out, cell + stride);
                let lower: E::Conserved = load_state(&right_out, cell);
                faces[cell]
                    .as_ref()
                    .map(|system| system.dissipation(&(upper - lower)))
                    .unwrap_or_default()
            });
            for (&cell, d) in active_faces.iter().zip(diffusion) {
                face_diffusion[cell] = d;
            }
        }

        let mut out = output.host_fields_mut()?;
        for cell in conserved.interior_box().flat_indices() {
            let difference = (face_diffusion[cell] - face_diffusion[cell - stride]) * inverse_dx;
            for (v, field) in out.iter_mut().enumerate() {
                field[cell] += difference.component(v);
            }
        }
        Ok(())
    }
}

impl<E: EntropyEquation> DiffusionOperator for TecnoDiffusion<E> {
    fn name(&self) -> String {
        format!("tecnoroe/{}", self.reconstruction.name())
    }

    fn number_of_ghost_cells(&self) -> usize {
        self.reconstruction.number_of_ghost_cells()
    }

    fn apply_diffusion(&mut self, conserved: &Volume, output: &mut Volume) -> Result<()> {
        self.check_input(conserved, output)?;
        let mut workspace = self.take_workspace(conserved)?;
        let mut result = Ok(());
        for axis in 0..3 {
            if conserved.interior_size()[axis] <= 1 {
                continue;
            }
            result = match axis {
                0 => self.sweep::<0>(conserved, &mut workspace, output),
                1 => self.sweep::<1>(conserved, &mut workspace, output),
                _ => self.sweep::<2>(conserved, &mut workspace, output),
            };
            if result.is_err() {
                break;
            }
        }
        self.workspace = Some(workspace);
        trace!(diffusion = %self.name(), "applied diffusion");
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::{Burgers, Euler1, EulerPrimitive};
    use crate::memory::{MemoryFactory, Platform};
    use crate::reconstruction::tecno::create_tecno_reconstruction;
    use crate::volume::fill_conserved;

    fn periodic_burgers(values: &[f64], ghost: usize) -> Volume {
        let n = values.len();
        let mut data = Vec::with_capacity(n + 2 * ghost);
        data.extend_from_slice(&values[n - ghost..]);
        data.extend_from_slice(values);
        data.extend_from_slice(&values[..ghost]);
        let mut volume = Volume::new(&["u"], &MemoryFactory::host(), n, 1, 1, ghost).unwrap();
        volume.scalar_memory_area_mut(0).unwrap().copy_from_host(&data).unwrap();
        volume
    }

    #[test]
    fn test_diffusion_dissipates_entropy() {
        let values = [0.0, 0.0, 0.1, 1.0, 1.0, 1.0, 0.7, -0.5, -0.5, -0.2, 0.0, 0.0];
        for name in ["none", "eno2", "eno3"] {
            let reconstruction = create_tecno_reconstruction(name, Platform::Cpu).unwrap();
            let ghost = reconstruction.number_of_ghost_cells();
            let grid = Grid::uniform_1d(0.0, 1.0, values.len()).unwrap();
            let mut diffusion = TecnoDiffusion::new(Burgers, reconstruction, grid);

            let u = periodic_burgers(&values, ghost);
            let mut out = u.like().unwrap();
            diffusion.apply_diffusion(&u, &mut out).unwrap();

            // Entropy production Σ v_i D_i with v = u.
            let out = out.copy_to_host(0).unwrap();
            let production: f64 = values.iter().enumerate().map(|(i, v)| v * out[i + ghost]).sum();
            assert!(production <= 1e-12, "{name}: entropy production {production}");

            let total: f64 = out[ghost..ghost + values.len()].iter().sum();
            assert!(total.abs() < 1e-12, "{name}: diffusion is not conservative");
        }
    }

    #[test]
    fn test_stationary_shock_is_damped() {
        let values = [1.0, 1.0, 1.0, 1.0, -1.0, -1.0, -1.0, -1.0];
        let reconstruction = create_tecno_reconstruction("none", Platform::Cpu).unwrap();
        let ghost = reconstruction.number_of_ghost_cells();
        let grid = Grid::uniform_1d(0.0, 1.0, values.len()).unwrap();
        let mut diffusion = TecnoDiffusion::new(Burgers, reconstruction, grid);

        let u = periodic_burgers(&values, ghost);
        let mut out = u.like().unwrap();
        diffusion.apply_diffusion(&u, &mut out).unwrap();

        // D = ½ max(|u_L|, |u_R|) (u_R - u_L) at both jumps, Δx = 1/8
        let out = out.copy_to_host(0).unwrap();
        assert!((out[ghost + 3] + 8.0).abs() < 1e-12, "{:?}", out);
        assert!((out[ghost + 4] - 8.0).abs() < 1e-12, "{:?}", out);
        assert!((out[ghost + 7] - 8.0).abs() < 1e-12, "{:?}", out);
        assert!((out[ghost] + 8.0).abs() < 1e-12, "{:?}", out);
        assert!(out[ghost + 1].abs() < 1e-12);
    }

    #[test]
    fn test_constant_state_has_no_diffusion() {
        let grid = Grid::uniform_1d(0.0, 1.0, 10).unwrap();
        let euler = Euler1::new(1.4);
        let mut u = Volume::new(&["rho", "mx", "E"], &MemoryFactory::host(), 10, 1, 1, 3).unwrap();
        fill_conserved(&euler, &mut u, &grid, |_| EulerPrimitive::new(1.0, [0.3], 2.0)).unwrap();
        // Constant ghost values
        for v in 0..3 {
            let value = u.view(v).unwrap().at(3, 0, 0);
            let mut view = u.view_mut(v).unwrap();
            for x in (0..3).chain(13..16) {
                *view.at_mut(x, 0, 0) = value;
            }
        }

        let reconstruction = create_tecno_reconstruction("eno3", Platform::Cpu).unwrap();
        let mut diffusion = TecnoDiffusion::new(euler, reconstruction, grid);
        let mut out = u.like().unwrap();
        diffusion.apply_diffusion(&u, &mut out).unwrap();
        for v in 0..3 {
            for value in out.copy_to_host(v).unwrap() {
                assert!(value.abs() < 1e-10);
            }
        }
    }
}
