//! Hyperbolic conservation laws.
//!
//! Every equation solved by the finite-volume kernels has the form
//!
//! ∂u/∂t + Σ_d ∂F_d(u)/∂x_d = 0
//!
//! and implements [`Equation`]: conversions between conserved, primitive and
//! "extra" (derived) variables, the physical flux along one axis, a wave
//! speed estimate and an admissibility check. Equations used with the TECNO
//! scheme additionally implement [`EntropyEquation`].
//!
//! Axis arguments are const generics so that the inner loops monomorphise
//! for each sweep direction.

mod burgers;
mod euler;
mod parameters;
mod roe;

use std::fmt::Debug;
use std::ops::{Add, Mul, Sub};

pub use burgers::{Burgers, BurgersConserved, BurgersExtra, BurgersPrimitive};
pub use euler::{Euler, Euler1, Euler2, Euler3, EulerConserved, EulerExtra, EulerPrimitive, log_mean};
pub use parameters::EquationParameters;
pub use roe::RoeEigensystem;

use crate::error::{FvmError, Result};

// =============================================================================
// State Vectors
// =============================================================================

/// Fixed-size vector of conserved quantities.
///
/// Components are numbered in the order of the equation's conserved
/// variable names, which is also the order of the fields in a volume.
pub trait StateVector:
    Copy
    + Debug
    + Default
    + PartialEq
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<f64, Output = Self>
{
    /// Number of components.
    const N_VARS: usize;

    #[inline]
    fn zero() -> Self {
        Self::default()
    }

    fn component(&self, index: usize) -> f64;

    fn component_mut(&mut self, index: usize) -> &mut f64;

    /// Build a state from its components.
    fn from_fn(f: impl FnMut(usize) -> f64) -> Self;

    /// Apply `f` component-wise.
    #[inline]
    fn map(&self, mut f: impl FnMut(f64) -> f64) -> Self {
        Self::from_fn(|i| f(self.component(i)))
    }
}

/// Conserved and derived variables of one cell, evaluated together.
pub struct AllVariables<E: Equation> {
    pub conserved: E::Conserved,
    pub extra: E::Extra,
}

impl<E: Equation> AllVariables<E> {
    pub fn new(conserved: E::Conserved, extra: E::Extra) -> Self {
        Self { conserved, extra }
    }
}

impl<E: Equation> Clone for AllVariables<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: Equation> Copy for AllVariables<E> {}

impl<E: Equation> Debug for AllVariables<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AllVariables")
            .field("conserved", &self.conserved)
            .field("extra", &self.extra)
            .finish()
    }
}

// =============================================================================
// Equation Trait
// =============================================================================

/// A hyperbolic conservation law on up to three spatial dimensions.
///
/// All methods are pure and never fail. Non-physical input is reported by
/// [`Equation::obeys_constraints`], not by errors.
pub trait Equation: Clone + Debug + Send + Sync + 'static {
    type Conserved: StateVector;
    type Extra: Copy + Debug + Default + Send + Sync;
    type Primitive: Copy + Debug + Send + Sync;

    /// Name used by factories and configuration ("euler2", "burgers", ...).
    fn name(&self) -> &'static str;

    /// Largest number of spatial dimensions the equation is defined on.
    fn max_dimension(&self) -> usize;

    fn conserved_variable_names(&self) -> &'static [&'static str];

    fn extra_variable_names(&self) -> &'static [&'static str];

    fn compute_extra(&self, conserved: &Self::Conserved) -> Self::Extra;

    fn compute_extra_from_primitive(&self, primitive: &Self::Primitive) -> Self::Extra;

    fn compute_conserved(&self, primitive: &Self::Primitive) -> Self::Conserved;

    fn compute_primitive(&self, conserved: &Self::Conserved) -> Self::Primitive;

    /// Component `index` of the derived variables, in `extra_variable_names` order.
    fn extra_component(&self, extra: &Self::Extra, index: usize) -> f64;

    /// Conserved state bundled with its derived variables.
    #[inline]
    fn all_variables(&self, conserved: Self::Conserved) -> AllVariables<Self> {
        AllVariables::new(conserved, self.compute_extra(&conserved))
    }

    /// Physical flux F_DIR(u).
    fn point_flux<const DIR: usize>(&self, variables: &AllVariables<Self>) -> Self::Conserved;

    /// Non-negative upper bound on the characteristic speeds along `DIR`.
    fn wave_speed<const DIR: usize>(&self, conserved: &Self::Conserved, extra: &Self::Extra) -> f64;

    /// Signed lower and upper bound on the characteristic speeds along `DIR`.
    fn wave_speed_bounds<const DIR: usize>(
        &self,
        conserved: &Self::Conserved,
        extra: &Self::Extra,
    ) -> (f64, f64) {
        let speed = self.wave_speed::<DIR>(conserved, extra);
        (-speed, speed)
    }

    /// Whether the state lies in the admissible set.
    fn obeys_constraints(&self, conserved: &Self::Conserved, extra: &Self::Extra) -> bool;
}

/// Equations with a convex entropy, needed by entropy-conservative fluxes and
/// TECNO diffusion.
pub trait EntropyEquation: Equation {
    /// Mathematical entropy η(u).
    fn entropy(&self, conserved: &Self::Conserved, extra: &Self::Extra) -> f64;

    /// Entropy variables v = ∂η/∂u.
    fn entropy_variables(&self, conserved: &Self::Conserved, extra: &Self::Extra) -> Self::Conserved;

    /// Two-point flux satisfying Tadmor's entropy conservation condition.
    fn entropy_conservative_flux<const DIR: usize>(
        &self,
        left: &AllVariables<Self>,
        right: &AllVariables<Self>,
    ) -> Self::Conserved;

    /// Roe-averaged eigenvalues and entropy-scaled right eigenvectors at the
    /// face between `left` and `right`.
    fn roe_eigensystem<const DIR: usize>(
        &self,
        left: &AllVariables<Self>,
        right: &AllVariables<Self>,
    ) -> RoeEigensystem;
}

// =============================================================================
// Runtime Equation Selection
// =============================================================================

/// Equations that can be selected by name at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EquationKind {
    Euler1,
    Euler2,
    Euler3,
    Burgers,
}

impl EquationKind {
    /// Parse an equation name.
    #[track_caller]
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "euler1" => Ok(Self::Euler1),
            "euler2" => Ok(Self::Euler2),
            "euler3" => Ok(Self::Euler3),
            "burgers" => Ok(Self::Burgers),
            _ => Err(FvmError::unknown_name("equation", name)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Euler1 => "euler1",
            Self::Euler2 => "euler2",
            Self::Euler3 => "euler3",
            Self::Burgers => "burgers",
        }
    }

    pub fn conserved_variable_names(&self) -> &'static [&'static str] {
        match self {
            Self::Euler1 => euler::names::<1>().0,
            Self::Euler2 => euler::names::<2>().0,
            Self::Euler3 => euler::names::<3>().0,
            Self::Burgers => burgers::CONSERVED_NAMES,
        }
    }

    pub fn extra_variable_names(&self) -> &'static [&'static str] {
        match self {
            Self::Euler1 => euler::names::<1>().1,
            Self::Euler2 => euler::names::<2>().1,
            Self::Euler3 => euler::names::<3>().1,
            Self::Burgers => burgers::EXTRA_NAMES,
        }
    }
}
