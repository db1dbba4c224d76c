//! Output at fixed simulated-time intervals.

use tracing::debug;

use super::Writer;
use crate::error::{FvmError, Result};
use crate::grid::Grid;
use crate::simulator::TimestepInformation;
use crate::volume::Volume;

/// Forwards to an inner writer at `t = 0, Δt, 2Δt, ...` up to `end_time`.
pub struct FixedIntervalWriter {
    writer: Box<dyn Writer>,
    time_interval: f64,
    end_time: f64,
    number_of_saves: usize,
}

impl FixedIntervalWriter {
    pub fn new(writer: Box<dyn Writer>, time_interval: f64, end_time: f64) -> Result<Self> {
        if !(time_interval > 0.0 && time_interval.is_finite()) {
            return Err(FvmError::invalid_argument(format!(
                "output interval must be positive, got {time_interval}"
            )));
        }
        Ok(Self {
            writer,
            time_interval,
            end_time,
            number_of_saves: 0,
        })
    }

    pub fn number_of_saves(&self) -> usize {
        self.number_of_saves
    }

    fn tolerance(&self) -> f64 {
        1e-10 * self.time_interval
    }

    /// `None` once the snapshot at `end_time` has been written.
    fn next_save_time(&self) -> Option<f64> {
        let saves = self.number_of_saves as f64;
        if self.number_of_saves > 0 && (saves - 1.0) * self.time_interval >= self.end_time - self.tolerance() {
            return None;
        }
        Some((saves * self.time_interval).min(self.end_time))
    }
}

impl Writer for FixedIntervalWriter {
    fn write(&mut self, volume: &Volume, grid: &Grid, timestep_information: &TimestepInformation) -> Result<()> {
        let time = timestep_information.current_time();
        if let Some(save_time) = self.next_save_time()
            && time + self.tolerance() >= save_time
        {
            debug!(time, snapshot = self.number_of_saves, "writing snapshot");
            self.writer.write(volume, grid, timestep_information)?;
            self.number_of_saves += 1;
        }
        Ok(())
    }

    fn adjust_timestep(&self, dt: f64, timestep_information: &TimestepInformation) -> f64 {
        match self.next_save_time() {
            Some(save_time) if save_time > timestep_information.current_time() => {
                dt.min(save_time - timestep_information.current_time())
            }
            _ => dt,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::memory::MemoryFactory;

    struct Recorder(Arc<Mutex<Vec<f64>>>);

    impl Writer for Recorder {
        fn write(&mut self, _: &Volume, _: &Grid, info: &TimestepInformation) -> Result<()> {
            self.0.lock().unwrap().push(info.current_time());
            Ok(())
        }
    }

    #[test]
    fn test_writes_at_intervals() {
        let times = Arc::new(Mutex::new(Vec::new()));
        let mut writer = FixedIntervalWriter::new(Box::new(Recorder(times.clone())), 0.25, 1.0).unwrap();
        let grid = Grid::uniform_1d(0.0, 1.0, 4).unwrap();
        let volume = Volume::new(&["u"], &MemoryFactory::host(), 4, 1, 1, 1).unwrap();

        let mut info = TimestepInformation::default();
        writer.write(&volume, &grid, &info).unwrap();
        while info.current_time() < 1.0 - 1e-12 {
            let dt = writer.adjust_timestep(0.1, &info);
            info.increment_time(dt);
            writer.write(&volume, &grid, &info).unwrap();
        }

        let times = times.lock().unwrap();
        assert_eq!(times.len(), 5);
        for (i, t) in times.iter().enumerate() {
            assert!((t - 0.25 * i as f64).abs() < 1e-12);
        }
    }

    #[test]
    fn test_rejects_zero_interval() {
        let times = Arc::new(Mutex::new(Vec::new()));
        assert!(FixedIntervalWriter::new(Box::new(Recorder(times)), 0.0, 1.0).is_err());
    }
}
