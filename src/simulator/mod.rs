//! Simulation driver.
//!
//! The [`Simulator`] builds every component from a [`SimulatorParameters`]
//! through the name factories and advances the conserved state to the end
//! time:
//!
//! ```text
//! boundary -> integrator step (CFL dt) -> boundary -> swap stages
//!          -> constraint check -> writers
//! ```

mod parameters;
mod timestep;

pub use parameters::SimulatorParameters;
pub use timestep::TimestepInformation;

use tracing::{debug, info, warn};

use crate::boundary::create_boundary;
use crate::diffusion::create_diffusion_operator;
use crate::equations::{Burgers, Equation, EquationKind, Euler};
use crate::error::{FvmError, Result};
use crate::grid::Grid;
use crate::integrator::{ConservedSystem, Integrator, System, compute_cfl_timestep, create_integrator};
use crate::io::Writer;
use crate::memory::{DeviceConfiguration, MemoryFactory};
use crate::numflux::create_numerical_flux;
use crate::types::RVec3;
use crate::volume::{Volume, VolumeFactory, check_constraints, fill_conserved};

/// Advances a conserved state on a grid from `t = 0` to the end time.
pub struct Simulator {
    parameters: SimulatorParameters,
    grid: Grid,
    equation: EquationKind,
    system: ConservedSystem,
    integrator: Box<dyn Integrator>,
    /// `stages[0]` is the current state
    stages: Vec<Volume>,
    rhs: Volume,
    writers: Vec<Box<dyn Writer>>,
    timestep_information: TimestepInformation,
}

impl Simulator {
    /// Build all components and allocate the stage volumes.
    pub fn new(parameters: SimulatorParameters, grid: Grid) -> Result<Self> {
        if parameters.cfl.is_nan() || parameters.cfl <= 0.0 {
            return Err(FvmError::invalid_argument(format!(
                "CFL number must be positive, got {}",
                parameters.cfl
            )));
        }
        if parameters.end_time.is_nan() || parameters.end_time < 0.0 {
            return Err(FvmError::invalid_argument(format!(
                "end time must be non-negative, got {}",
                parameters.end_time
            )));
        }

        let equation = EquationKind::parse(&parameters.equation)?;
        let configuration = DeviceConfiguration::new(&parameters.platform)?;
        let platform = configuration.platform();
        let memory_factory = MemoryFactory::new(&configuration)?;

        let flux = create_numerical_flux(
            &parameters.equation,
            &parameters.flux,
            &parameters.reconstruction,
            &parameters.equation_parameters,
            &grid,
            platform,
        )?;
        let diffusion = create_diffusion_operator(
            &parameters.diffusion,
            &parameters.diffusion_reconstruction,
            &parameters.equation,
            &parameters.equation_parameters,
            &grid,
            platform,
        )?;
        let boundary = create_boundary(&parameters.boundary, platform)?;
        let integrator = create_integrator(&parameters.integrator)?;
        let system = ConservedSystem::new(flux, diffusion, boundary, grid.clone());

        let ghost_cells = system.number_of_ghost_cells().max(1);
        let n = grid.dimensions();
        let volume_factory = VolumeFactory::new(&parameters.equation, memory_factory)?;
        let stages = (0..=integrator.number_of_substeps())
            .map(|_| volume_factory.create_conserved_volume(n.x, n.y, n.z, ghost_cells))
            .collect::<Result<Vec<_>>>()?;
        let rhs = volume_factory.create_conserved_volume(n.x, n.y, n.z, ghost_cells)?;

        info!(
            equation = equation.name(),
            flux = %system.flux().name(),
            diffusion = %system.diffusion().name(),
            integrator = integrator.name(),
            boundary = system.boundary().name(),
            cells = %n,
            ghost_cells,
            end_time = parameters.end_time,
            "created simulator"
        );

        Ok(Self {
            parameters,
            grid,
            equation,
            system,
            integrator,
            stages,
            rhs,
            writers: Vec::new(),
            timestep_information: TimestepInformation::default(),
        })
    }

    pub fn parameters(&self) -> &SimulatorParameters {
        &self.parameters
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn equation(&self) -> EquationKind {
        self.equation
    }

    /// The current conserved state.
    pub fn current_volume(&self) -> &Volume {
        &self.stages[0]
    }

    /// Mutable access to the state before the first step.
    pub fn initial_data_mut(&mut self) -> &mut Volume {
        &mut self.stages[0]
    }

    /// Fill the interior from primitive values at cell midpoints.
    pub fn set_initial_data<E, F>(&mut self, equation: &E, initial: F) -> Result<()>
    where
        E: Equation,
        F: Fn(RVec3) -> E::Primitive,
    {
        if equation.name() != self.equation.name() {
            return Err(FvmError::invalid_argument(format!(
                "initial data for {} given to a {} simulation",
                equation.name(),
                self.equation.name()
            )));
        }
        fill_conserved(equation, &mut self.stages[0], &self.grid, initial)
    }

    pub fn timestep_information(&self) -> &TimestepInformation {
        &self.timestep_information
    }

    pub fn add_writer(&mut self, writer: Box<dyn Writer>) {
        self.writers.push(writer);
    }

    pub fn is_finished(&self) -> bool {
        self.timestep_information.current_time() >= self.parameters.end_time * (1.0 - 1e-12)
    }

    /// Whether every interior cell of the current state is admissible.
    pub fn obeys_constraints(&self) -> Result<bool> {
        let volume = &self.stages[0];
        let parameters = &self.parameters.equation_parameters;
        match self.equation {
            EquationKind::Euler1 => check_constraints(&Euler::<1>::from_parameters(parameters)?, volume),
            EquationKind::Euler2 => check_constraints(&Euler::<2>::from_parameters(parameters)?, volume),
            EquationKind::Euler3 => check_constraints(&Euler::<3>::from_parameters(parameters)?, volume),
            EquationKind::Burgers => check_constraints(&Burgers, volume),
        }
    }

    /// Advance by one time step and return its size.
    pub fn step(&mut self) -> Result<f64> {
        let current = self.timestep_information;
        let remaining = self.parameters.end_time - current.current_time();
        if self.is_finished() {
            return Err(FvmError::invalid_argument(format!(
                "simulation already reached end time {}",
                self.parameters.end_time
            )));
        }

        let cfl = self.parameters.cfl;
        let cell_lengths = self.grid.cell_lengths();
        let writers = &self.writers;
        let mut select_dt = |wave_speeds: RVec3| -> Result<f64> {
            let dt = compute_cfl_timestep(wave_speeds, cell_lengths, cfl)?.min(remaining);
            let dt = writers
                .iter()
                .fold(dt, |dt, writer| writer.adjust_timestep(dt, &current));
            if dt > 0.0 && dt.is_finite() {
                Ok(dt)
            } else {
                Err(FvmError::Numerical(format!(
                    "invalid time step {dt} from wave speeds {wave_speeds}"
                )))
            }
        };

        let dt = self
            .integrator
            .step(&mut self.system, &mut self.stages, &mut self.rhs, &mut select_dt)?;

        let last = self.stages.len() - 1;
        self.stages.swap(0, last);
        self.system.prepare_stage(&mut self.stages[0])?;
        self.timestep_information.increment_time(dt);

        debug!(
            step = self.timestep_information.number_of_steps_performed(),
            time = self.timestep_information.current_time(),
            dt,
            "completed time step"
        );

        if self.parameters.check_constraints && !self.obeys_constraints()? {
            warn!(
                time = self.timestep_information.current_time(),
                "state left the admissible set"
            );
            return Err(FvmError::Numerical(format!(
                "non-physical state at t = {}",
                self.timestep_information.current_time()
            )));
        }

        self.write_snapshots()?;
        Ok(dt)
    }

    /// Step until the end time. The initial state is written first when no
    /// step has been taken yet.
    pub fn run(&mut self) -> Result<()> {
        if self.timestep_information.number_of_steps_performed() == 0 {
            self.system.prepare_stage(&mut self.stages[0])?;
            self.write_snapshots()?;
        }
        while !self.is_finished() {
            self.step()?;
        }
        info!(
            steps = self.timestep_information.number_of_steps_performed(),
            time = self.timestep_information.current_time(),
            "simulation finished"
        );
        Ok(())
    }

    fn write_snapshots(&mut self) -> Result<()> {
        for writer in &mut self.writers {
            writer.write(&self.stages[0], &self.grid, &self.timestep_information)?;
        }
        Ok(())
    }
}
