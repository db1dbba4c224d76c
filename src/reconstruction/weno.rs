//! Weighted ENO reconstruction (Jiang-Shu weights).
//!
//! WENO of parameter r blends the r candidate stencils of ENO order r with
//! nonlinear weights
//!
//! α_k = d_k / (ε + β_k)²,  ω_k = α_k / Σ α
//!
//! where β_k are smoothness indicators of the indicator variable. `weno2`
//! is third order for smooth data, `weno3` is fifth order.

use super::{Reconstruction, check_arguments, reconstruction_cells, scatter_edges};
use crate::error::{FvmError, Result};
use crate::volume::{Volume, map_cells};

const EPSILON: f64 = 1e-6;

/// Stencil values v_{i-r+1} ..= v_{i+r-1}; unused trailing slots are zero.
type Stencil = [f64; 5];

/// Nonlinear weights; unused trailing slots are zero.
type Weights = [f64; 3];

#[inline]
fn normalise(alpha: Weights) -> Weights {
    let sum: f64 = alpha.iter().sum();
    alpha.map(|a| a / sum)
}

/// Weights for the right edge of the centre cell, r = 2.
#[inline]
fn weights_2(s: &Stencil) -> Weights {
    let (vm, v0, vp) = (s[0], s[1], s[2]);
    let beta0 = (vp - v0) * (vp - v0);
    let beta1 = (v0 - vm) * (v0 - vm);
    normalise([
        (2.0 / 3.0) / ((EPSILON + beta0) * (EPSILON + beta0)),
        (1.0 / 3.0) / ((EPSILON + beta1) * (EPSILON + beta1)),
        0.0,
    ])
}

#[inline]
fn candidates_2(s: &Stencil) -> Weights {
    let (vm, v0, vp) = (s[0], s[1], s[2]);
    [0.5 * v0 + 0.5 * vp, -0.5 * vm + 1.5 * v0, 0.0]
}

/// Weights for the right edge of the centre cell, r = 3.
#[inline]
fn weights_3(s: &Stencil) -> Weights {
    let (vmm, vm, v0, vp, vpp) = (s[0], s[1], s[2], s[3], s[4]);
    let sq = |x: f64| x * x;
    let beta0 = 13.0 / 12.0 * sq(v0 - 2.0 * vp + vpp) + 0.25 * sq(3.0 * v0 - 4.0 * vp + vpp);
    let beta1 = 13.0 / 12.0 * sq(vm - 2.0 * v0 + vp) + 0.25 * sq(vm - vp);
    let beta2 = 13.0 / 12.0 * sq(vmm - 2.0 * vm + v0) + 0.25 * sq(vmm - 4.0 * vm + 3.0 * v0);
    normalise([
        0.3 / sq(EPSILON + beta0),
        0.6 / sq(EPSILON + beta1),
        0.1 / sq(EPSILON + beta2),
    ])
}

#[inline]
fn candidates_3(s: &Stencil) -> Weights {
    let (vmm, vm, v0, vp, vpp) = (s[0], s[1], s[2], s[3], s[4]);
    [
        v0 / 3.0 + 5.0 / 6.0 * vp - vpp / 6.0,
        -vm / 6.0 + 5.0 / 6.0 * v0 + vp / 3.0,
        vmm / 3.0 - 7.0 / 6.0 * vm + 11.0 / 6.0 * v0,
    ]
}

/// WENO reconstruction with r = 2 or r = 3.
#[derive(Clone, Copy, Debug)]
pub struct Weno {
    order: usize,
}

impl Weno {
    pub fn new(order: usize) -> Result<Self> {
        if !(2..=3).contains(&order) {
            return Err(FvmError::invalid_argument(format!(
                "WENO order must be 2 or 3, got {order}"
            )));
        }
        Ok(Self { order })
    }

    fn width(&self) -> usize {
        2 * self.order - 1
    }

    fn gather(&self, values: &[f64], cell: usize, stride: usize) -> Stencil {
        let first = cell - (self.order - 1) * stride;
        let mut stencil = [0.0; 5];
        for (m, slot) in stencil.iter_mut().enumerate().take(self.width()) {
            *slot = values[first + m * stride];
        }
        stencil
    }

    /// The stencil seen from the left edge: the same cells in reverse order.
    fn mirror(&self, stencil: &Stencil) -> Stencil {
        let mut mirrored = [0.0; 5];
        let width = self.width();
        for m in 0..width {
            mirrored[m] = stencil[width - 1 - m];
        }
        mirrored
    }

    fn weights(&self, stencil: &Stencil) -> Weights {
        match self.order {
            2 => weights_2(stencil),
            _ => weights_3(stencil),
        }
    }

    fn candidates(&self, stencil: &Stencil) -> Weights {
        match self.order {
            2 => candidates_2(stencil),
            _ => candidates_3(stencil),
        }
    }

    #[inline]
    fn blend(&self, weights: &Weights, stencil: &Stencil) -> f64 {
        let candidates = self.candidates(stencil);
        weights.iter().zip(&candidates).map(|(w, q)| w * q).sum()
    }
}

impl Reconstruction for Weno {
    fn name(&self) -> &'static str {
        match self.order {
            2 => "weno2",
            _ => "weno3",
        }
    }

    fn number_of_ghost_cells(&self) -> usize {
        self.order
    }

    fn perform_reconstruction(
        &self,
        input: &Volume,
        direction: usize,
        indicator: usize,
        left_out: &mut Volume,
        right_out: &mut Volume,
    ) -> Result<()> {
        check_arguments(input, direction, indicator, left_out, right_out, self.order)?;
        let stride = input.stride(direction);
        let cells = reconstruction_cells(input, direction);

        let fields = input.host_fields()?;
        let indicator_values = fields[indicator];
        let weights: Vec<(Weights, Weights)> = map_cells(&cells, |cell| {
            let stencil = self.gather(indicator_values, cell, stride);
            (self.weights(&self.mirror(&stencil)), self.weights(&stencil))
        });

        let mut left = left_out.host_fields_mut()?;
        let mut right = right_out.host_fields_mut()?;

        for (v, values) in fields.iter().enumerate() {
            let edges: Vec<(f64, f64)> = cells
                .iter()
                .zip(&weights)
                .map(|(&cell, (left_weights, right_weights))| {
                    let stencil = self.gather(values, cell, stride);
                    (
                        self.blend(left_weights, &self.mirror(&stencil)),
                        self.blend(right_weights, &stencil),
                    )
                })
                .collect();
            scatter_edges(&cells, &edges, &mut left[v][..], &mut right[v][..]);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        let stencil = [0.3, 1.2, -0.4, 2.0, 0.1];
        for order in [2, 3] {
            let weno = Weno::new(order).unwrap();
            let sum: f64 = weno.weights(&stencil).iter().sum();
            assert!((sum - 1.0).abs() < 1e-14);
        }
    }

    #[test]
    fn test_smooth_data_gets_linear_weights() {
        let weno = Weno::new(3).unwrap();
        let stencil = [1.0, 1.0, 1.0, 1.0, 1.0];
        let w = weno.weights(&stencil);
        assert!((w[0] - 0.3).abs() < 1e-12);
        assert!((w[1] - 0.6).abs() < 1e-12);
        assert!((w[2] - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_discontinuity_suppresses_crossing_stencil() {
        // Jump to the right of the centre cell: the right edge must rely on
        // the left-biased stencil only.
        let weno = Weno::new(2).unwrap();
        let stencil = [0.0, 0.0, 1.0, 0.0, 0.0];
        let w = weno.weights(&stencil);
        assert!(w[0] < 1e-10);
        assert!((weno.blend(&w, &stencil) - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_mirror() {
        let weno = Weno::new(2).unwrap();
        assert_eq!(weno.mirror(&[1.0, 2.0, 3.0, 0.0, 0.0]), [3.0, 2.0, 1.0, 0.0, 0.0]);
    }
}
