//! # fvm-rs
//!
//! Finite-volume solvers for hyperbolic conservation laws on Cartesian grids.
//!
//! This crate provides the building blocks of a high-resolution finite
//! volume scheme:
//! - Equations (Euler in 1-3 dimensions, Burgers) with entropy pairs
//! - Multi-variable cell volumes on host or device memory
//! - Edge reconstruction (ENO, WENO) and TECNO diffusion
//! - Numerical fluxes (central, Rusanov, HLL, Godunov, entropy conservative)
//! - Ghost-cell boundary conditions (periodic, Neumann)
//! - Explicit Runge-Kutta time integration with CFL time steps
//! - A configurable simulator with VTK output
//!
//! Components are created by name through factories, so a simulation can be
//! described entirely by a [`SimulatorParameters`] value.

pub mod boundary;
pub mod diffusion;
pub mod equations;
pub mod error;
pub mod grid;
pub mod integrator;
pub mod io;
pub mod memory;
pub mod numflux;
pub mod reconstruction;
pub mod simulator;
pub mod types;
pub mod volume;

// Re-export main types for convenience
pub use boundary::{Boundary, Neumann, Periodic, create_boundary};
pub use diffusion::{DiffusionOperator, NoDiffusion, TecnoDiffusion, create_diffusion_operator};
pub use equations::{
    AllVariables, Burgers, EntropyEquation, Equation, EquationKind, EquationParameters, Euler, Euler1,
    Euler2, Euler3, StateVector,
};
pub use error::{FvmError, Result};
pub use grid::Grid;
pub use integrator::{
    ConservedSystem, ForwardEuler, Integrator, RungeKutta2, RungeKutta3, RungeKutta4, System,
    compute_cfl_timestep, create_integrator,
};
pub use io::{FixedIntervalWriter, VtkWriter, Writer, output_name};
pub use memory::{DeviceConfiguration, Memory, MemoryFactory, Platform};
pub use numflux::{FluxCoupling, NumericalFlux, NumericalFluxCpu, create_numerical_flux};
pub use reconstruction::{Reconstruction, create_reconstruction};
pub use simulator::{Simulator, SimulatorParameters, TimestepInformation};
pub use types::{IVec3, RVec3, Vec3};
pub use volume::{Volume, VolumeFactory};
