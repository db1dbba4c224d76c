//! Roe-averaged characteristic decomposition at a face.

use faer::Mat;

use super::StateVector;

/// Eigenvalues and (entropy-scaled) right eigenvectors of the Roe matrix.
///
/// Column `j` of the eigenvector matrix belongs to eigenvalue `j`.
#[derive(Clone, Debug)]
pub struct RoeEigensystem {
    eigenvalues: Vec<f64>,
    eigenvectors: Mat<f64>,
}

impl RoeEigensystem {
    pub fn new(eigenvalues: Vec<f64>, eigenvectors: Mat<f64>) -> Self {
        debug_assert_eq!(eigenvalues.len(), eigenvectors.ncols());
        Self {
            eigenvalues,
            eigenvectors,
        }
    }

    pub fn eigenvalues(&self) -> &[f64] {
        &self.eigenvalues
    }

    pub fn eigenvectors(&self) -> &Mat<f64> {
        &self.eigenvectors
    }

    /// Characteristic projection Rᵀ v.
    #[inline]
    pub fn project<S: StateVector>(&self, v: &S) -> S {
        let r = &self.eigenvectors;
        S::from_fn(|j| (0..S::N_VARS).map(|i| r[(i, j)] * v.component(i)).sum())
    }

    /// Face dissipation ½ R |Λ| w for a jump `w` in characteristic variables.
    #[inline]
    pub fn dissipation<S: StateVector>(&self, jump: &S) -> S {
        let r = &self.eigenvectors;
        let scaled: Vec<f64> = (0..S::N_VARS)
            .map(|j| self.eigenvalues[j].abs() * jump.component(j))
            .collect();
        S::from_fn(|i| 0.5 * (0..S::N_VARS).map(|j| r[(i, j)] * scaled[j]).sum::<f64>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::BurgersConserved;

    #[test]
    fn test_scalar_projection_and_dissipation() {
        let mut r = Mat::<f64>::zeros(1, 1);
        r[(0, 0)] = 2.0;
        let system = RoeEigensystem::new(vec![-3.0], r);

        let projected = system.project(&BurgersConserved::new(1.5));
        assert_eq!(projected.u, 3.0);

        let dissipation = system.dissipation(&BurgersConserved::new(1.0));
        assert_eq!(dissipation.u, 3.0);
    }
}
