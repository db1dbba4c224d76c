//! Essentially non-oscillatory (ENO) reconstruction.
//!
//! For order k the stencil of k cells containing cell i is grown one cell at
//! a time, each time towards the side with the smaller undivided
//! difference. The edge values are then fixed linear combinations of the
//! chosen cells (Shu's coefficients c_{r,j}).

use super::{Reconstruction, check_arguments, reconstruction_cells, scatter_edges};
use crate::error::{FvmError, Result};
use crate::volume::{Volume, map_cells};

/// Coefficients c_{r,j} for orders 1 to 4, indexed by `[r + 1][j]`.
///
/// The right edge of cell i with left shift r is Σ_j c_{r,j} v_{i-r+j};
/// the left edge uses c_{r-1,j}.
const COEFFICIENTS_1: [[f64; 4]; 2] = [[1.0, 0.0, 0.0, 0.0], [1.0, 0.0, 0.0, 0.0]];

const COEFFICIENTS_2: [[f64; 4]; 3] = [
    [3.0 / 2.0, -1.0 / 2.0, 0.0, 0.0],
    [1.0 / 2.0, 1.0 / 2.0, 0.0, 0.0],
    [-1.0 / 2.0, 3.0 / 2.0, 0.0, 0.0],
];

const COEFFICIENTS_3: [[f64; 4]; 4] = [
    [11.0 / 6.0, -7.0 / 6.0, 1.0 / 3.0, 0.0],
    [1.0 / 3.0, 5.0 / 6.0, -1.0 / 6.0, 0.0],
    [-1.0 / 6.0, 5.0 / 6.0, 1.0 / 3.0, 0.0],
    [1.0 / 3.0, -7.0 / 6.0, 11.0 / 6.0, 0.0],
];

const COEFFICIENTS_4: [[f64; 4]; 5] = [
    [25.0 / 12.0, -23.0 / 12.0, 13.0 / 12.0, -1.0 / 4.0],
    [1.0 / 4.0, 13.0 / 12.0, -5.0 / 12.0, 1.0 / 12.0],
    [-1.0 / 12.0, 7.0 / 12.0, 7.0 / 12.0, -1.0 / 12.0],
    [1.0 / 12.0, -5.0 / 12.0, 13.0 / 12.0, 1.0 / 4.0],
    [-1.0 / 4.0, 13.0 / 12.0, -23.0 / 12.0, 25.0 / 12.0],
];

pub(crate) fn coefficients(order: usize) -> &'static [[f64; 4]] {
    match order {
        1 => &COEFFICIENTS_1,
        2 => &COEFFICIENTS_2,
        3 => &COEFFICIENTS_3,
        _ => &COEFFICIENTS_4,
    }
}

/// l-th undivided difference of `values` over `start, start + stride, ...`.
#[inline]
fn undivided_difference(values: &[f64], start: usize, stride: usize, l: usize) -> f64 {
    let mut sum = 0.0;
    let mut binomial = 1.0;
    for m in 0..=l {
        let sign = if (l - m) % 2 == 0 { 1.0 } else { -1.0 };
        sum += sign * binomial * values[start + m * stride];
        binomial = binomial * (l - m) as f64 / (m + 1) as f64;
    }
    sum
}

/// Number of stencil cells to the left of `cell` for an order-`order` stencil.
///
/// Ties between the two candidate stencils go to the more centred one, and
/// to the left one when both are equally centred.
pub(crate) fn choose_shift(values: &[f64], cell: usize, stride: usize, order: usize) -> usize {
    let mut shift = 0;
    for l in 1..order {
        let start = cell - shift * stride;
        let left = undivided_difference(values, start - stride, stride, l).abs();
        let right = undivided_difference(values, start, stride, l).abs();

        let grow_left = if left < right {
            true
        } else if left > right {
            false
        } else {
            let half = l as f64 / 2.0;
            (half - shift as f64 - 1.0).abs() <= (half - shift as f64).abs()
        };
        if grow_left {
            shift += 1;
        }
    }
    shift
}

#[inline]
fn combine(values: &[f64], first: usize, stride: usize, weights: &[f64; 4], order: usize) -> f64 {
    (0..order).map(|j| weights[j] * values[first + j * stride]).sum()
}

/// Value at the left edge of `cell` using the stencil with `shift`.
#[inline]
pub(crate) fn left_edge(values: &[f64], cell: usize, stride: usize, order: usize, shift: usize) -> f64 {
    combine(values, cell - shift * stride, stride, &coefficients(order)[shift], order)
}

/// Value at the right edge of `cell` using the stencil with `shift`.
#[inline]
pub(crate) fn right_edge(values: &[f64], cell: usize, stride: usize, order: usize, shift: usize) -> f64 {
    combine(values, cell - shift * stride, stride, &coefficients(order)[shift + 1], order)
}

/// ENO reconstruction of order 2, 3 or 4.
#[derive(Clone, Copy, Debug)]
pub struct Eno {
    order: usize,
}

impl Eno {
    pub fn new(order: usize) -> Result<Self> {
        if !(2..=4).contains(&order) {
            return Err(FvmError::invalid_argument(format!(
                "ENO order must be between 2 and 4, got {order}"
            )));
        }
        Ok(Self { order })
    }

    pub fn order(&self) -> usize {
        self.order
    }
}

impl Reconstruction for Eno {
    fn name(&self) -> &'static str {
        match self.order {
            2 => "eno2",
            3 => "eno3",
            _ => "eno4",
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
        let order = self.order;
        let stride = input.stride(direction);
        let cells = reconstruction_cells(input, direction);

        let fields = input.host_fields()?;
        let indicator_values = fields[indicator];
        let shifts = map_cells(&cells, |cell| choose_shift(indicator_values, cell, stride, order));

        let mut left = left_out.host_fields_mut()?;
        let mut right = right_out.host_fields_mut()?;

        for (v, values) in fields.iter().enumerate() {
            let edges: Vec<(f64, f64)> = cells
                .iter()
                .zip(&shifts)
                .map(|(&cell, &shift)| {
                    (
                        left_edge(values, cell, stride, order, shift),
                        right_edge(values, cell, stride, order, shift),
                    )
                })
                .collect();
            scatter_edges(&cells, &edges, &mut left[v][..], &mut right[v][..]);
        }
        Ok(())
    }
}
