//! Simulation configuration.

use serde::{Deserialize, Serialize};

use crate::equations::EquationParameters;
use crate::error::Result;

/// Names of every component of a simulation plus its time controls.
///
/// Missing fields take their defaults when deserialising.
///
/// # Example
/// ```
/// use fvm_rs::simulator::SimulatorParameters;
///
/// let parameters = SimulatorParameters::from_json_str(
///     r#"{ "equation": "burgers", "flux": "godunov", "end_time": 0.5 }"#,
/// ).unwrap();
/// assert_eq!(parameters.integrator, "forwardeuler");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorParameters {
    /// `euler1`, `euler2`, `euler3` or `burgers`
    pub equation: String,
    /// Face flux
    pub flux: String,
    /// Reconstruction of the conserved variables
    pub reconstruction: String,
    /// `none` or `tecnoroe`
    pub diffusion: String,
    /// Reconstruction used by the diffusion operator
    pub diffusion_reconstruction: String,
    pub integrator: String,
    pub boundary: String,
    /// `cpu` or a device name
    pub platform: String,
    /// CFL number
    pub cfl: f64,
    pub end_time: f64,
    pub equation_parameters: EquationParameters,
    /// Fail the step when a cell leaves the admissible set
    pub check_constraints: bool,
}

impl Default for SimulatorParameters {
    fn default() -> Self {
        Self {
            equation: "euler1".to_string(),
            flux: "hll".to_string(),
            reconstruction: "none".to_string(),
            diffusion: "none".to_string(),
            diffusion_reconstruction: "none".to_string(),
            integrator: "forwardeuler".to_string(),
            boundary: "periodic".to_string(),
            platform: "cpu".to_string(),
            cfl: 0.9,
            end_time: 1.0,
            equation_parameters: EquationParameters::euler_defaults(),
            check_constraints: true,
        }
    }
}

impl SimulatorParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse parameters from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_equation(mut self, equation: &str) -> Self {
        self.equation = equation.to_string();
        self
    }

    pub fn with_flux(mut self, flux: &str) -> Self {
        self.flux = flux.to_string();
        self
    }

    pub fn with_reconstruction(mut self, reconstruction: &str) -> Self {
        self.reconstruction = reconstruction.to_string();
        self
    }

    /// Set the diffusion operator and its reconstruction.
    pub fn with_diffusion(mut self, diffusion: &str, reconstruction: &str) -> Self {
        self.diffusion = diffusion.to_string();
        self.diffusion_reconstruction = reconstruction.to_string();
        self
    }

    pub fn with_integrator(mut self, integrator: &str) -> Self {
        self.integrator = integrator.to_string();
        self
    }

    pub fn with_boundary(mut self, boundary: &str) -> Self {
        self.boundary = boundary.to_string();
        self
    }

    pub fn with_platform(mut self, platform: &str) -> Self {
        self.platform = platform.to_string();
        self
    }

    pub fn with_cfl(mut self, cfl: f64) -> Self {
        self.cfl = cfl;
        self
    }

    pub fn with_end_time(mut self, end_time: f64) -> Self {
        self.end_time = end_time;
        self
    }

    pub fn with_equation_parameters(mut self, parameters: EquationParameters) -> Self {
        self.equation_parameters = parameters;
        self
    }

    pub fn with_constraint_check(mut self, check_constraints: bool) -> Self {
        self.check_constraints = check_constraints;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FvmError;

    #[test]
    fn test_json_round_trip() {
        let parameters = SimulatorParameters::new()
            .with_equation("euler2")
            .with_reconstruction("weno3")
            .with_integrator("rungekutta3")
            .with_cfl(0.45)
            .with_equation_parameters(EquationParameters::new().with("gamma", 1.4).unwrap());
        let json = parameters.to_json_string().unwrap();
        assert!(json.contains("\"gamma\": 1.4"));
        assert_eq!(SimulatorParameters::from_json_str(&json).unwrap(), parameters);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let parameters = SimulatorParameters::from_json_str(r#"{ "cfl": 0.3 }"#).unwrap();
        assert_eq!(parameters.cfl, 0.3);
        assert_eq!(parameters.equation, "euler1");
        assert!(parameters.check_constraints);
        assert!((parameters.equation_parameters.get("gamma").unwrap() - 5.0 / 3.0).abs() < 1e-15);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            SimulatorParameters::from_json_str("{ cfl: }"),
            Err(FvmError::Config(_))
        ));
    }
}
