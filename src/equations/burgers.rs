//! Inviscid Burgers' equation.
//!
//! ∂u/∂t + Σ_d ∂(u²/2)/∂x_d = 0
//!
//! The same flux acts along every axis, so the equation can be solved on
//! grids of any dimension.

use std::ops::{Add, Mul, Sub};

use faer::Mat;

use super::{AllVariables, EntropyEquation, Equation, RoeEigensystem, StateVector};

pub(crate) const CONSERVED_NAMES: &[&str] = &["u"];
pub(crate) const EXTRA_NAMES: &[&str] = &[];

/// Conserved Burgers state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BurgersConserved {
    pub u: f64,
}

/// Burgers has no derived variables.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BurgersExtra;

/// Primitive Burgers state (identical to the conserved one).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BurgersPrimitive {
    pub u: f64,
}

impl BurgersConserved {
    #[inline(always)]
    pub fn new(u: f64) -> Self {
        Self { u }
    }
}

impl BurgersPrimitive {
    #[inline(always)]
    pub fn new(u: f64) -> Self {
        Self { u }
    }
}

impl Add for BurgersConserved {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.u + other.u)
    }
}

impl Sub for BurgersConserved {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.u - other.u)
    }
}

impl Mul<f64> for BurgersConserved {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self {
        Self::new(self.u * scalar)
    }
}

impl StateVector for BurgersConserved {
    const N_VARS: usize = 1;

    #[inline(always)]
    fn component(&self, _index: usize) -> f64 {
        self.u
    }

    #[inline(always)]
    fn component_mut(&mut self, _index: usize) -> &mut f64 {
        &mut self.u
    }

    #[inline(always)]
    fn from_fn(mut f: impl FnMut(usize) -> f64) -> Self {
        Self::new(f(0))
    }
}

/// Burgers' equation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Burgers;

impl Burgers {
    pub fn new() -> Self {
        Self
    }
}

impl Equation for Burgers {
    type Conserved = BurgersConserved;
    type Extra = BurgersExtra;
    type Primitive = BurgersPrimitive;

    fn name(&self) -> &'static str {
        "burgers"
    }

    fn max_dimension(&self) -> usize {
        3
    }

    fn conserved_variable_names(&self) -> &'static [&'static str] {
        CONSERVED_NAMES
    }

    fn extra_variable_names(&self) -> &'static [&'static str] {
        EXTRA_NAMES
    }

    fn compute_extra(&self, _conserved: &BurgersConserved) -> BurgersExtra {
        BurgersExtra
    }

    fn compute_extra_from_primitive(&self, _primitive: &BurgersPrimitive) -> BurgersExtra {
        BurgersExtra
    }

    fn compute_conserved(&self, primitive: &BurgersPrimitive) -> BurgersConserved {
        BurgersConserved::new(primitive.u)
    }

    fn compute_primitive(&self, conserved: &BurgersConserved) -> BurgersPrimitive {
        BurgersPrimitive::new(conserved.u)
    }

    fn extra_component(&self, _extra: &BurgersExtra, _index: usize) -> f64 {
        0.0
    }

    #[inline(always)]
    fn point_flux<const DIR: usize>(&self, variables: &AllVariables<Self>) -> BurgersConserved {
        let u = variables.conserved.u;
        BurgersConserved::new(0.5 * u * u)
    }

    #[inline(always)]
    fn wave_speed<const DIR: usize>(&self, conserved: &BurgersConserved, _extra: &BurgersExtra) -> f64 {
        conserved.u.abs()
    }

    #[inline(always)]
    fn wave_speed_bounds<const DIR: usize>(
        &self,
        conserved: &BurgersConserved,
        _extra: &BurgersExtra,
    ) -> (f64, f64) {
        (conserved.u, conserved.u)
    }

    fn obeys_constraints(&self, conserved: &BurgersConserved, _extra: &BurgersExtra) -> bool {
        conserved.u.is_finite()
    }
}

impl EntropyEquation for Burgers {
    /// η = u²/2
    fn entropy(&self, conserved: &BurgersConserved, _extra: &BurgersExtra) -> f64 {
        0.5 * conserved.u * conserved.u
    }

    fn entropy_variables(&self, conserved: &BurgersConserved, _extra: &BurgersExtra) -> BurgersConserved {
        *conserved
    }

    fn entropy_conservative_flux<const DIR: usize>(
        &self,
        left: &AllVariables<Self>,
        right: &AllVariables<Self>,
    ) -> BurgersConserved {
        let (ul, ur) = (left.conserved.u, right.conserved.u);
        BurgersConserved::new((ul * ul + ul * ur + ur * ur) / 6.0)
    }

    fn roe_eigensystem<const DIR: usize>(
        &self,
        left: &AllVariables<Self>,
        right: &AllVariables<Self>,
    ) -> RoeEigensystem {
        // The Roe speed vanishes at a stationary shock; |λ| is raised to the
        // largest characteristic speed of the two states.
        let (ul, ur) = (left.conserved.u, right.conserved.u);
        let roe_speed = 0.5 * (ul + ur);
        let speed = ul.abs().max(ur.abs()).copysign(roe_speed);
        let mut eigenvectors = Mat::<f64>::zeros(1, 1);
        eigenvectors[(0, 0)] = 1.0;
        RoeEigensystem::new(vec![speed], eigenvectors)
    }
}
