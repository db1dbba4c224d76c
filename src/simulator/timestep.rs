//! Simulated time bookkeeping.

/// Current simulated time and number of completed steps.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TimestepInformation {
    current_time: f64,
    number_of_steps_performed: usize,
}

impl TimestepInformation {
    pub fn new(current_time: f64, number_of_steps_performed: usize) -> Self {
        Self {
            current_time,
            number_of_steps_performed,
        }
    }

    /// Advance the time by `dt` and count one step.
    pub fn increment_time(&mut self, dt: f64) {
        self.current_time += dt;
        self.number_of_steps_performed += 1;
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn number_of_steps_performed(&self) -> usize {
        self.number_of_steps_performed
    }
}
