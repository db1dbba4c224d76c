//! Snapshot output.
//!
//! A [`Writer`] receives the conserved volume after every time step and
//! decides itself whether to store it. [`FixedIntervalWriter`] limits an
//! inner writer to fixed simulated-time intervals and shortens time steps
//! so that every snapshot lands exactly on its output time.

mod interval;
mod vtk;

pub use interval::FixedIntervalWriter;
pub use vtk::VtkWriter;

use crate::error::Result;
use crate::grid::Grid;
use crate::simulator::TimestepInformation;
use crate::volume::Volume;

/// Receives simulation snapshots.
pub trait Writer: Send {
    fn write(&mut self, volume: &Volume, grid: &Grid, timestep_information: &TimestepInformation) -> Result<()>;

    /// Shorten `dt` if the writer needs to stop at an earlier time.
    fn adjust_timestep(&self, dt: f64, _timestep_information: &TimestepInformation) -> f64 {
        dt
    }
}

/// Output file name without extension: `"{base}_{snapshot}"`.
///
/// `snapshot` counts the snapshots written so far, not time steps.
pub fn output_name(base: &str, snapshot: usize) -> String {
    format!("{base}_{snapshot}")
}
