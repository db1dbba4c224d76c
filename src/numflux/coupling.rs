//! Two-point numerical flux functions.
//!
//! A coupling evaluates the flux through one face from the reconstructed
//! states on its two sides. Every coupling is consistent:
//! `flux(U, U) = F(U)`.

use super::super::equations::{AllVariables, Burgers, BurgersConserved, EntropyEquation, Equation};

/// Numerical flux at a face normal to axis `DIR`.
pub trait FluxCoupling<E: Equation>: Send + Sync {
    /// Human-readable name for debugging and logging.
    fn name(&self) -> &'static str;

    /// Flux between the state `left` (lower side) and `right` (upper side).
    fn flux<const DIR: usize>(
        &self,
        equation: &E,
        left: &AllVariables<E>,
        right: &AllVariables<E>,
    ) -> E::Conserved;
}

// =============================================================================
// Central
// =============================================================================

/// Arithmetic mean of the physical fluxes.
///
/// Unstable on its own; used together with an explicit diffusion operator.
#[derive(Clone, Copy, Debug, Default)]
pub struct Central;

impl<E: Equation> FluxCoupling<E> for Central {
    fn name(&self) -> &'static str {
        "central"
    }

    #[inline(always)]
    fn flux<const DIR: usize>(&self, equation: &E, left: &AllVariables<E>, right: &AllVariables<E>) -> E::Conserved {
        (equation.point_flux::<DIR>(left) + equation.point_flux::<DIR>(right)) * 0.5
    }
}

// =============================================================================
// Rusanov
// =============================================================================

/// Rusanov (local Lax-Friedrichs) flux.
///
/// F* = ½(F(u_l) + F(u_r)) - ½ s (u_r - u_l), s = max(s_l, s_r)
#[derive(Clone, Copy, Debug, Default)]
pub struct Rusanov;

impl<E: Equation> FluxCoupling<E> for Rusanov {
    fn name(&self) -> &'static str {
        "rusanov"
    }

    #[inline(always)]
    fn flux<const DIR: usize>(&self, equation: &E, left: &AllVariables<E>, right: &AllVariables<E>) -> E::Conserved {
        let speed = equation
            .wave_speed::<DIR>(&left.conserved, &left.extra)
            .max(equation.wave_speed::<DIR>(&right.conserved, &right.extra));
        (equation.point_flux::<DIR>(left) + equation.point_flux::<DIR>(right)) * 0.5
            - (right.conserved - left.conserved) * (0.5 * speed)
    }

}

// =============================================================================
// HLL
// =============================================================================

/// Harten-Lax-van Leer flux with Davis wave speed estimates.
#[derive(Clone, Copy, Debug, Default)]
pub struct Hll;

impl<E: Equation> FluxCoupling<E> for Hll {
    fn name(&self) -> &'static str {
        "hll"
    }

    #[inline(always)]
    fn flux<const DIR: usize>(&self, equation: &E, left: &AllVariables<E>, right: &AllVariables<E>) -> E::Conserved {
        let (left_min, left_max) = equation.wave_speed_bounds::<DIR>(&left.conserved, &left.extra);
        let (right_min, right_max) = equation.wave_speed_bounds::<DIR>(&right.conserved, &right.extra);
        let s_l = left_min.min(right_min);
        let s_r = left_max.max(right_max);

        let f_l = equation.point_flux::<DIR>(left);
        let f_r = equation.point_flux::<DIR>(right);

        if s_l >= 0.0 {
            f_l
        } else if s_r <= 0.0 {
            f_r
        } else {
            (f_l * s_r - f_r * s_l + (right.conserved - left.conserved) * (s_l * s_r)) * (1.0 / (s_r - s_l))
        }
    }

}

// =============================================================================
// Godunov (Burgers)
// =============================================================================

/// Exact Riemann solver flux for Burgers' equation.
#[derive(Clone, Copy, Debug, Default)]
pub struct Godunov;

impl FluxCoupling<Burgers> for Godunov {
    fn name(&self) -> &'static str {
        "godunov"
    }

    #[inline(always)]
    fn flux<const DIR: usize>(
        &self,
        _equation: &Burgers,
        left: &AllVariables<Burgers>,
        right: &AllVariables<Burgers>,
    ) -> BurgersConserved {
        let (ul, ur) = (left.conserved.u, right.conserved.u);
        let f = |u: f64| 0.5 * u * u;
        let flux = if ul <= ur {
            // Rarefaction: minimum of f over [ul, ur]
            if ul <= 0.0 && ur >= 0.0 { 0.0 } else { f(ul).min(f(ur)) }
        } else {
            // Shock: maximum of f over [ur, ul]
            f(ul).max(f(ur))
        };
        BurgersConserved::new(flux)
    }

}

// =============================================================================
// Entropy Conservative
// =============================================================================

/// Tadmor entropy-conservative flux of the equation.
///
/// Conserves entropy exactly for smooth solutions; pair it with TECNO
/// diffusion to obtain an entropy-stable scheme.
#[derive(Clone, Copy, Debug, Default)]
pub struct EntropyConservative;

impl<E: EntropyEquation> FluxCoupling<E> for EntropyConservative {
    fn name(&self) -> &'static str {
        "entropy_conservative"
    }

    #[inline(always)]
    fn flux<const DIR: usize>(&self, equation: &E, left: &AllVariables<E>, right: &AllVariables<E>) -> E::Conserved {
        equation.entropy_conservative_flux::<DIR>(left, right)
    }
}
