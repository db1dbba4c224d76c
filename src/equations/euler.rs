//! Compressible Euler equations for an ideal gas.
//!
//! Conserved variables u = (ρ, m, E) with momentum m = ρu and total energy
//! E. The pressure follows from the ideal-gas law
//!
//! p = (γ - 1)(E - |m|²/(2ρ))
//!
//! and the flux along axis d is
//!
//! F_d(u) = (m_d, u_d m + p e_d, u_d (E + p))

use std::ops::{Add, Mul, Sub};

use faer::Mat;

use super::{AllVariables, EntropyEquation, Equation, EquationParameters, RoeEigensystem, StateVector};
use crate::error::Result;

/// Ratio of specific heats used when no parameter overrides it.
pub const DEFAULT_GAMMA: f64 = 5.0 / 3.0;

const EULER1_NAMES: (&[&str], &[&str]) = (&["rho", "mx", "E"], &["p", "ux"]);
const EULER2_NAMES: (&[&str], &[&str]) = (&["rho", "mx", "my", "E"], &["p", "ux", "uy"]);
const EULER3_NAMES: (&[&str], &[&str]) = (&["rho", "mx", "my", "mz", "E"], &["p", "ux", "uy", "uz"]);

/// Conserved and extra variable names for the `D`-dimensional equations.
pub(crate) fn names<const D: usize>() -> (&'static [&'static str], &'static [&'static str]) {
    match D {
        1 => EULER1_NAMES,
        2 => EULER2_NAMES,
        _ => EULER3_NAMES,
    }
}

// =============================================================================
// Value Types
// =============================================================================

/// Conserved Euler state (ρ, m, E).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EulerConserved<const D: usize> {
    /// Density
    pub rho: f64,
    /// Momentum ρu
    pub m: [f64; D],
    /// Total energy
    pub e: f64,
}

/// Derived Euler quantities (p, u).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EulerExtra<const D: usize> {
    pub p: f64,
    pub u: [f64; D],
}

/// Primitive Euler state (ρ, u, p).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EulerPrimitive<const D: usize> {
    pub rho: f64,
    pub u: [f64; D],
    pub p: f64,
}

impl<const D: usize> EulerConserved<D> {
    #[inline(always)]
    pub fn new(rho: f64, m: [f64; D], e: f64) -> Self {
        Self { rho, m, e }
    }
}

impl<const D: usize> EulerPrimitive<D> {
    #[inline(always)]
    pub fn new(rho: f64, u: [f64; D], p: f64) -> Self {
        Self { rho, u, p }
    }
}

impl<const D: usize> Default for EulerConserved<D> {
    fn default() -> Self {
        Self {
            rho: 0.0,
            m: [0.0; D],
            e: 0.0,
        }
    }
}

impl<const D: usize> Default for EulerExtra<D> {
    fn default() -> Self {
        Self { p: 0.0, u: [0.0; D] }
    }
}

impl<const D: usize> Add for EulerConserved<D> {
    type Output = Self;

    #[inline(always)]
    fn add(self, other: Self) -> Self {
        Self {
            rho: self.rho + other.rho,
            m: std::array::from_fn(|i| self.m[i] + other.m[i]),
            e: self.e + other.e,
        }
    }
}

impl<const D: usize> Sub for EulerConserved<D> {
    type Output = Self;

    #[inline(always)]
    fn sub(self, other: Self) -> Self {
        Self {
            rho: self.rho - other.rho,
            m: std::array::from_fn(|i| self.m[i] - other.m[i]),
            e: self.e - other.e,
        }
    }
}

impl<const D: usize> Mul<f64> for EulerConserved<D> {
    type Output = Self;

    #[inline(always)]
    fn mul(self, scalar: f64) -> Self {
        Self {
            rho: self.rho * scalar,
            m: self.m.map(|m| m * scalar),
            e: self.e * scalar,
        }
    }
}

impl<const D: usize> StateVector for EulerConserved<D> {
    const N_VARS: usize = D + 2;

    #[inline(always)]
    fn component(&self, index: usize) -> f64 {
        match index {
            0 => self.rho,
            i if i <= D => self.m[i - 1],
            _ => self.e,
        }
    }

    #[inline(always)]
    fn component_mut(&mut self, index: usize) -> &mut f64 {
        match index {
            0 => &mut self.rho,
            i if i <= D => &mut self.m[i - 1],
            _ => &mut self.e,
        }
    }

    #[inline(always)]
    fn from_fn(mut f: impl FnMut(usize) -> f64) -> Self {
        Self {
            rho: f(0),
            m: std::array::from_fn(|i| f(i + 1)),
            e: f(D + 1),
        }
    }
}

// =============================================================================
// Equation
// =============================================================================

/// Euler equations in `D` spatial dimensions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Euler<const D: usize> {
    gamma: f64,
}

pub type Euler1 = Euler<1>;
pub type Euler2 = Euler<2>;
pub type Euler3 = Euler<3>;

impl<const D: usize> Euler<D> {
    pub fn new(gamma: f64) -> Self {
        Self { gamma }
    }

    /// Read γ from the `"gamma"` parameter.
    pub fn from_parameters(parameters: &EquationParameters) -> Result<Self> {
        Ok(Self::new(parameters.get("gamma")?))
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    #[inline(always)]
    fn kinetic_energy(rho: f64, m: &[f64; D]) -> f64 {
        0.5 * m.iter().map(|mi| mi * mi).sum::<f64>() / rho
    }

    #[inline(always)]
    fn sound_speed(&self, rho: f64, p: f64) -> f64 {
        (self.gamma * p / rho).sqrt()
    }

    /// Physical entropy s = ln(p ρ^{-γ}).
    #[inline]
    pub fn physical_entropy(&self, rho: f64, p: f64) -> f64 {
        p.ln() - self.gamma * rho.ln()
    }
}

impl<const D: usize> Default for Euler<D> {
    fn default() -> Self {
        Self::new(DEFAULT_GAMMA)
    }
}

impl<const D: usize> Equation for Euler<D> {
    type Conserved = EulerConserved<D>;
    type Extra = EulerExtra<D>;
    type Primitive = EulerPrimitive<D>;

    fn name(&self) -> &'static str {
        match D {
            1 => "euler1",
            2 => "euler2",
            _ => "euler3",
        }
    }

    fn max_dimension(&self) -> usize {
        D
    }

    fn conserved_variable_names(&self) -> &'static [&'static str] {
        names::<D>().0
    }

    fn extra_variable_names(&self) -> &'static [&'static str] {
        names::<D>().1
    }

    #[inline(always)]
    fn compute_extra(&self, u: &EulerConserved<D>) -> EulerExtra<D> {
        let p = (self.gamma - 1.0) * (u.e - Self::kinetic_energy(u.rho, &u.m));
        EulerExtra {
            p,
            u: u.m.map(|m| m / u.rho),
        }
    }

    fn compute_extra_from_primitive(&self, primitive: &EulerPrimitive<D>) -> EulerExtra<D> {
        EulerExtra {
            p: primitive.p,
            u: primitive.u,
        }
    }

    fn compute_conserved(&self, primitive: &EulerPrimitive<D>) -> EulerConserved<D> {
        let m = primitive.u.map(|u| primitive.rho * u);
        let e = primitive.p / (self.gamma - 1.0) + Self::kinetic_energy(primitive.rho, &m);
        EulerConserved::new(primitive.rho, m, e)
    }

    fn compute_primitive(&self, u: &EulerConserved<D>) -> EulerPrimitive<D> {
        let extra = self.compute_extra(u);
        EulerPrimitive::new(u.rho, extra.u, extra.p)
    }

    fn extra_component(&self, extra: &EulerExtra<D>, index: usize) -> f64 {
        match index {
            0 => extra.p,
            i => extra.u[i - 1],
        }
    }

    #[inline(always)]
    fn point_flux<const DIR: usize>(&self, v: &AllVariables<Self>) -> EulerConserved<D> {
        let u = &v.conserved;
        let ud = v.extra.u[DIR];
        let p = v.extra.p;

        let mut m = u.m.map(|mi| ud * mi);
        m[DIR] += p;

        EulerConserved {
            rho: u.m[DIR],
            m,
            e: (u.e + p) * ud,
        }
    }

    #[inline(always)]
    fn wave_speed<const DIR: usize>(&self, u: &EulerConserved<D>, extra: &EulerExtra<D>) -> f64 {
        extra.u[DIR].abs() + self.sound_speed(u.rho, extra.p)
    }

    #[inline(always)]
    fn wave_speed_bounds<const DIR: usize>(
        &self,
        u: &EulerConserved<D>,
        extra: &EulerExtra<D>,
    ) -> (f64, f64) {
        let c = self.sound_speed(u.rho, extra.p);
        (extra.u[DIR] - c, extra.u[DIR] + c)
    }

    fn obeys_constraints(&self, u: &EulerConserved<D>, extra: &EulerExtra<D>) -> bool {
        u.rho.is_finite()
            && u.e.is_finite()
            && u.m.iter().all(|m| m.is_finite())
            && extra.p.is_finite()
            && u.rho > 0.0
            && extra.p >= 0.0
    }
}

// =============================================================================
// Entropy Structure
// =============================================================================

/// Logarithmic mean (a - b) / (ln a - ln b), stable as a → b.
///
/// Uses the series expansion of Ismail and Roe when the relative difference
/// is small.
#[inline]
pub fn log_mean(a: f64, b: f64) -> f64 {
    let zeta = a / b;
    let f = (zeta - 1.0) / (zeta + 1.0);
    let u = f * f;
    let series = if u < 1e-2 {
        1.0 + u / 3.0 + u * u / 5.0 + u * u * u / 7.0
    } else {
        zeta.ln() / (2.0 * f)
    };
    (a + b) / (2.0 * series)
}

impl<const D: usize> EntropyEquation for Euler<D> {
    /// η = -ρ s / (γ - 1)
    fn entropy(&self, u: &EulerConserved<D>, extra: &EulerExtra<D>) -> f64 {
        -u.rho * self.physical_entropy(u.rho, extra.p) / (self.gamma - 1.0)
    }

    fn entropy_variables(&self, u: &EulerConserved<D>, extra: &EulerExtra<D>) -> EulerConserved<D> {
        let gamma = self.gamma;
        let s = self.physical_entropy(u.rho, extra.p);
        let beta = u.rho / (2.0 * extra.p);
        let velocity_sq: f64 = extra.u.iter().map(|v| v * v).sum();

        EulerConserved {
            rho: (gamma - s) / (gamma - 1.0) - beta * velocity_sq,
            m: extra.u.map(|v| 2.0 * beta * v),
            e: -2.0 * beta,
        }
    }

    /// Ismail-Roe flux built from the parameter vector z = √(ρ/p) (1, u, p).
    fn entropy_conservative_flux<const DIR: usize>(
        &self,
        left: &AllVariables<Self>,
        right: &AllVariables<Self>,
    ) -> EulerConserved<D> {
        let gamma = self.gamma;
        let parameter_vector = |v: &AllVariables<Self>| {
            let z1 = (v.conserved.rho / v.extra.p).sqrt();
            (z1, v.extra.u.map(|u| z1 * u), (v.conserved.rho * v.extra.p).sqrt())
        };
        let (z1_l, zu_l, zp_l) = parameter_vector(left);
        let (z1_r, zu_r, zp_r) = parameter_vector(right);

        let z1_mean = 0.5 * (z1_l + z1_r);
        let zp_mean = 0.5 * (zp_l + zp_r);
        let z1_log = log_mean(z1_l, z1_r);
        let zp_log = log_mean(zp_l, zp_r);

        let rho_hat = z1_mean * zp_log;
        let u_hat: [f64; D] = std::array::from_fn(|i| 0.5 * (zu_l[i] + zu_r[i]) / z1_mean);
        let p1_hat = zp_mean / z1_mean;
        let p2_hat = (gamma + 1.0) / (2.0 * gamma) * zp_log / z1_log
            + (gamma - 1.0) / (2.0 * gamma) * zp_mean / z1_mean;
        let velocity_sq: f64 = u_hat.iter().map(|v| v * v).sum();
        let h_hat = gamma * p2_hat / ((gamma - 1.0) * rho_hat) + 0.5 * velocity_sq;

        let mass_flux = rho_hat * u_hat[DIR];
        let mut m = u_hat.map(|u| mass_flux * u);
        m[DIR] += p1_hat;

        EulerConserved {
            rho: mass_flux,
            m,
            e: mass_flux * h_hat,
        }
    }

    /// Roe-averaged eigenvectors scaled so that R Rᵀ = ∂u/∂v.
    ///
    /// Column order: u_d - c, entropy wave, shear waves, u_d + c.
    fn roe_eigensystem<const DIR: usize>(
        &self,
        left: &AllVariables<Self>,
        right: &AllVariables<Self>,
    ) -> RoeEigensystem {
        let gamma = self.gamma;
        let n = D + 2;

        let w_l = left.conserved.rho.sqrt();
        let w_r = right.conserved.rho.sqrt();
        let weight = 1.0 / (w_l + w_r);
        let enthalpy = |v: &AllVariables<Self>| (v.conserved.e + v.extra.p) / v.conserved.rho;

        let u: [f64; D] = std::array::from_fn(|i| (w_l * left.extra.u[i] + w_r * right.extra.u[i]) * weight);
        let h = (w_l * enthalpy(left) + w_r * enthalpy(right)) * weight;
        let velocity_sq: f64 = u.iter().map(|v| v * v).sum();
        let c = ((gamma - 1.0) * (h - 0.5 * velocity_sq)).max(0.0).sqrt();
        let rho = w_l * w_r;
        let p = rho * c * c / gamma;
        let ud = u[DIR];

        let mut r = Mat::<f64>::zeros(n, n);
        let mut eigenvalues = vec![ud; n];
        let mut scaling = vec![p; n];

        // Acoustic waves
        for (col, sign) in [(0, -1.0), (n - 1, 1.0)] {
            r[(0, col)] = 1.0;
            for i in 0..D {
                r[(i + 1, col)] = u[i];
            }
            r[(DIR + 1, col)] += sign * c;
            r[(n - 1, col)] = h + sign * ud * c;
            eigenvalues[col] = ud + sign * c;
            scaling[col] = rho / (2.0 * gamma);
        }

        // Entropy wave
        r[(0, 1)] = 1.0;
        for i in 0..D {
            r[(i + 1, 1)] = u[i];
        }
        r[(n - 1, 1)] = 0.5 * velocity_sq;
        scaling[1] = (gamma - 1.0) * rho / gamma;

        // Shear waves, one per transverse axis
        let mut col = 2;
        for k in (0..D).filter(|&k| k != DIR) {
            r[(k + 1, col)] = 1.0;
            r[(n - 1, col)] = u[k];
            col += 1;
        }

        for (j, s) in scaling.iter().enumerate() {
            let factor = s.sqrt();
            for i in 0..n {
                r[(i, j)] *= factor;
            }
        }

        RoeEigensystem::new(eigenvalues, r)
    }
}
