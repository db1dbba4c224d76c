//! Explicit time integration.
//!
//! An [`Integrator`] advances a set of stage volumes by one time step.
//! `stages[0]` holds `u^n`; substep `k` evaluates the [`System`] on
//! `stages[k]` and writes `stages[k + 1]`. After the last substep the final
//! stage holds `u^{n+1}`. The caller swaps it back to the front.
//!
//! The integrators know nothing about the system beyond its signature. The
//! time step comes from the caller, usually through [`compute_cfl_timestep`]
//! on the wave speeds of the first evaluation.

mod runge_kutta;
mod system;

pub use runge_kutta::{ForwardEuler, RungeKutta2, RungeKutta3, RungeKutta4, Tableau};
pub use system::{ConservedSystem, System};

use tracing::debug;

use crate::error::{FvmError, Result};
use crate::types::RVec3;
use crate::volume::Volume;

// =============================================================================
// Integrator Trait
// =============================================================================

/// Explicit multi-stage time integrator.
pub trait Integrator: Send + Sync {
    /// Human-readable name for debugging and logging.
    fn name(&self) -> &'static str;

    /// Order of accuracy of the integrator.
    fn order(&self) -> usize;

    /// Number of system evaluations per step.
    fn number_of_substeps(&self) -> usize;

    /// Whether the integrator is strong stability preserving (SSP).
    fn is_ssp(&self) -> bool;

    /// Write stage `substep + 1` from the earlier stages and the system
    /// output `rhs` of stage `substep`.
    fn blend(&self, substep: usize, previous: &[Volume], rhs: &Volume, dt: f64, output: &mut Volume) -> Result<()>;

    /// Evaluate the system on `stages[substep]` and write `stages[substep + 1]`.
    ///
    /// Returns the wave speeds of the evaluation; they are only computed for
    /// the first substep.
    fn perform_substep(
        &self,
        system: &mut dyn System,
        stages: &mut [Volume],
        rhs: &mut Volume,
        substep: usize,
        dt: f64,
    ) -> Result<RVec3> {
        check_stages(self.name(), self.number_of_substeps(), stages, substep)?;
        let (wave_speeds, _) = advance(self, system, stages, rhs, substep, &mut |_| Ok(dt))?;
        Ok(wave_speeds)
    }

    /// Run every substep. `select_dt` turns the wave speeds of the first
    /// evaluation into the time step, which is returned.
    fn step(
        &self,
        system: &mut dyn System,
        stages: &mut [Volume],
        rhs: &mut Volume,
        select_dt: &mut dyn FnMut(RVec3) -> Result<f64>,
    ) -> Result<f64> {
        check_stages(self.name(), self.number_of_substeps(), stages, 0)?;
        let (_, dt) = advance(self, system, stages, rhs, 0, select_dt)?;
        for substep in 1..self.number_of_substeps() {
            advance(self, system, stages, rhs, substep, &mut |_| Ok(dt))?;
        }
        Ok(dt)
    }
}

/// Prepare and evaluate `stages[substep]`, pick `dt` from its wave speeds
/// and blend `stages[substep + 1]`.
fn advance<I: Integrator + ?Sized>(
    integrator: &I,
    system: &mut dyn System,
    stages: &mut [Volume],
    rhs: &mut Volume,
    substep: usize,
    select_dt: &mut dyn FnMut(RVec3) -> Result<f64>,
) -> Result<(RVec3, f64)> {
    let (previous, next) = stages.split_at_mut(substep + 1);
    system.prepare_stage(&mut previous[substep])?;
    let wave_speeds = system.evaluate(&previous[substep], rhs, substep == 0)?;
    let dt = select_dt(wave_speeds)?;
    integrator.blend(substep, previous, rhs, dt, &mut next[0])?;
    Ok((wave_speeds, dt))
}

fn check_stages(name: &str, substeps: usize, stages: &[Volume], substep: usize) -> Result<()> {
    if stages.len() != substeps + 1 {
        return Err(FvmError::invalid_argument(format!(
            "{name} needs {} stage volumes, got {}",
            substeps + 1,
            stages.len()
        )));
    }
    if substep >= substeps {
        return Err(FvmError::invalid_argument(format!(
            "substep {substep} out of range for {name}"
        )));
    }
    Ok(())
}

/// Create an integrator by name: `forwardeuler`, `rungekutta2`,
/// `rungekutta3` or `rungekutta4`.
#[track_caller]
pub fn create_integrator(name: &str) -> Result<Box<dyn Integrator>> {
    let integrator: Box<dyn Integrator> = match name {
        "forwardeuler" => Box::new(ForwardEuler),
        "rungekutta2" => Box::new(RungeKutta2),
        "rungekutta3" => Box::new(RungeKutta3),
        "rungekutta4" => Box::new(RungeKutta4),
        _ => return Err(FvmError::unknown_name("integrator", name)),
    };
    debug!(
        integrator = integrator.name(),
        substeps = integrator.number_of_substeps(),
        ssp = integrator.is_ssp(),
        "created integrator"
    );
    Ok(integrator)
}

/// CFL time step `dt = cfl / Σ_d (s_d / Δx_d)`.
///
/// Infinite when every wave speed is zero.
pub fn compute_cfl_timestep(wave_speeds: RVec3, cell_lengths: RVec3, cfl: f64) -> Result<f64> {
    let mut rate = 0.0;
    for axis in 0..3 {
        let speed = wave_speeds[axis];
        if !speed.is_finite() {
            return Err(FvmError::Numerical(format!(
                "wave speed {speed} along axis {axis}"
            )));
        }
        rate += speed.abs() / cell_lengths[axis];
    }
    if rate == 0.0 {
        return Ok(f64::INFINITY);
    }
    Ok(cfl / rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryFactory;

    fn scalar() -> Volume {
        Volume::new(&["u"], &MemoryFactory::host(), 1, 1, 1, 0).unwrap()
    }

    fn value(volume: &Volume) -> f64 {
        volume.copy_to_host(0).unwrap()[0]
    }

    #[test]
    fn test_factory() {
        for (name, order) in [("forwardeuler", 1), ("rungekutta2", 2), ("rungekutta3", 3), ("rungekutta4", 4)] {
            let integrator = create_integrator(name).unwrap();
            assert_eq!(integrator.name(), name);
            assert_eq!(integrator.order(), order);
        }
        assert!(matches!(
            create_integrator("rk45"),
            Err(FvmError::UnknownName { kind: "integrator", .. })
        ));
    }

    #[test]
    fn test_single_step_of_exponential_growth() {
        // du/dt = u, one step of size h from u = 1
        let h = 0.1;
        let expected = [
            ("forwardeuler", 1.0 + h),
            ("rungekutta2", 1.0 + h + h * h / 2.0),
            ("rungekutta3", 1.0 + h + h * h / 2.0 + h * h * h / 6.0),
            ("rungekutta4", 1.0 + h + h * h / 2.0 + h * h * h / 6.0 + h * h * h * h / 24.0),
        ];
        for (name, exact) in expected {
            let integrator = create_integrator(name).unwrap();
            let mut stages: Vec<Volume> = (0..=integrator.number_of_substeps()).map(|_| scalar()).collect();
            stages[0].add_scalar(1.0);
            let mut rhs = scalar();

            let mut system = |u: &Volume, out: &mut Volume, _: bool| -> Result<RVec3> {
                out.linear_combination(&[(1.0, u)])?;
                Ok(RVec3::new(1.0, 0.0, 0.0))
            };
            let dt = integrator
                .step(&mut system, &mut stages, &mut rhs, &mut |_| Ok(h))
                .unwrap();
            assert_eq!(dt, h);
            let result = value(stages.last().unwrap());
            assert!((result - exact).abs() < 1e-14, "{name}: {result} vs {exact}");
        }
    }

    #[test]
    fn test_stage_count_checked() {
        let integrator = RungeKutta3;
        let mut stages = vec![scalar(), scalar()];
        let mut rhs = scalar();
        let mut system = |_: &Volume, _: &mut Volume, _: bool| -> Result<RVec3> { Ok(RVec3::splat(0.0)) };
        assert!(integrator.perform_substep(&mut system, &mut stages, &mut rhs, 0, 0.1).is_err());
    }

    #[test]
    fn test_cfl_timestep() {
        let dt = compute_cfl_timestep(RVec3::new(2.0, 1.0, 0.0), RVec3::new(0.1, 0.05, 1.0), 0.5).unwrap();
        assert!((dt - 0.5 / 40.0).abs() < 1e-15);
        assert_eq!(compute_cfl_timestep(RVec3::splat(0.0), RVec3::splat(1.0), 0.9).unwrap(), f64::INFINITY);
        assert!(compute_cfl_timestep(RVec3::new(f64::NAN, 0.0, 0.0), RVec3::splat(1.0), 0.9).is_err());
    }
}
