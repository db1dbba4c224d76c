//! Explicit Runge-Kutta schemes in Shu-Osher form.
//!
//! Substep k writes
//!
//! ```text
//! u^(k+1) = Σ_{j<=k} a_kj u^(j) + b_k dt L(u^(k))
//! ```
//!
//! with `u^(0) = u^n`. The last stage is `u^{n+1}`.

use super::Integrator;
use crate::error::{FvmError, Result};
use crate::volume::Volume;

/// Blending coefficients of one scheme.
#[derive(Clone, Copy, Debug)]
pub struct Tableau {
    /// `a_kj`, one row per substep
    pub stage_weights: &'static [&'static [f64]],
    /// `b_k`
    pub rhs_weights: &'static [f64],
}

impl Tableau {
    fn blend(&self, substep: usize, previous: &[Volume], rhs: &Volume, dt: f64, output: &mut Volume) -> Result<()> {
        let weights = self.stage_weights.get(substep).ok_or_else(|| {
            FvmError::invalid_argument(format!(
                "substep {substep} out of range for {} substeps",
                self.stage_weights.len()
            ))
        })?;
        if previous.len() < weights.len() {
            return Err(FvmError::invalid_argument(format!(
                "substep {substep} needs {} previous stages, got {}",
                weights.len(),
                previous.len()
            )));
        }
        let mut terms: Vec<(f64, &Volume)> = weights.iter().copied().zip(previous).collect();
        terms.push((self.rhs_weights[substep] * dt, rhs));
        output.linear_combination(&terms)
    }
}

macro_rules! runge_kutta {
    ($(#[$doc:meta])* $ty:ident, $name:literal, order = $order:literal, ssp = $ssp:literal, $tableau:expr) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, Default)]
        pub struct $ty;

        impl $ty {
            pub const TABLEAU: Tableau = $tableau;
        }

        impl Integrator for $ty {
            fn name(&self) -> &'static str {
                $name
            }

            fn order(&self) -> usize {
                $order
            }

            fn number_of_substeps(&self) -> usize {
                Self::TABLEAU.rhs_weights.len()
            }

            fn is_ssp(&self) -> bool {
                $ssp
            }

            fn blend(&self, substep: usize, previous: &[Volume], rhs: &Volume, dt: f64, output: &mut Volume) -> Result<()> {
                Self::TABLEAU.blend(substep, previous, rhs, dt, output)
            }
        }
    };
}

runge_kutta!(
    /// Forward Euler: `u1 = u0 + dt L(u0)`.
    ForwardEuler, "forwardeuler", order = 1, ssp = true,
    Tableau {
        stage_weights: &[&[1.0]],
        rhs_weights: &[1.0],
    }
);

runge_kutta!(
    /// Heun's method (SSP-RK2).
    ///
    /// ```text
    /// u1 = u0 + dt L(u0)
    /// u2 = ½ u0 + ½ u1 + ½ dt L(u1)
    /// ```
    RungeKutta2, "rungekutta2", order = 2, ssp = true,
    Tableau {
        stage_weights: &[&[1.0], &[0.5, 0.5]],
        rhs_weights: &[1.0, 0.5],
    }
);

runge_kutta!(
    /// Shu-Osher SSP-RK3.
    ///
    /// ```text
    /// u1 = u0 + dt L(u0)
    /// u2 = ¾ u0 + ¼ u1 + ¼ dt L(u1)
    /// u3 = ⅓ u0 + ⅔ u2 + ⅔ dt L(u2)
    /// ```
    RungeKutta3, "rungekutta3", order = 3, ssp = true,
    Tableau {
        stage_weights: &[&[1.0], &[0.75, 0.25], &[1.0 / 3.0, 0.0, 2.0 / 3.0]],
        rhs_weights: &[1.0, 0.25, 2.0 / 3.0],
    }
);

runge_kutta!(
    /// Classical fourth order Runge-Kutta.
    ///
    /// ```text
    /// u1 = u0 + ½ dt L(u0)
    /// u2 = u0 + ½ dt L(u1)
    /// u3 = u0 + dt L(u2)
    /// u4 = (-u0 + u1 + 2 u2 + u3) / 3 + dt/6 L(u3)
    /// ```
    RungeKutta4, "rungekutta4", order = 4, ssp = false,
    Tableau {
        stage_weights: &[
            &[1.0],
            &[1.0, 0.0],
            &[1.0, 0.0, 0.0],
            &[-1.0 / 3.0, 1.0 / 3.0, 2.0 / 3.0, 1.0 / 3.0],
        ],
        rhs_weights: &[0.5, 0.5, 1.0, 1.0 / 6.0],
    }
);
