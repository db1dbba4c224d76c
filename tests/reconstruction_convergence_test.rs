//! Convergence of the edge reconstructions on smooth periodic data.
//!
//! Cell averages of `sin(2πx) + 2` are reconstructed at both edges of every
//! cell and compared with the exact point values. The observed order is the
//! slope of a log-log fit over N = 2^5 .. 2^11, in the mean (L1) and the
//! maximum (L∞) edge error.

use std::f64::consts::PI;

use fvm_rs::{Grid, MemoryFactory, Platform, Volume, create_boundary, create_reconstruction};

fn exact(x: f64) -> f64 {
    (2.0 * PI * x).sin() + 2.0
}

fn cell_average(a: f64, b: f64) -> f64 {
    ((2.0 * PI * a).cos() - (2.0 * PI * b).cos()) / (2.0 * PI * (b - a)) + 2.0
}

#[derive(Clone, Copy)]
enum Norm {
    L1,
    Max,
}

/// Edge error of `name` on `n` cells.
fn edge_error(name: &str, n: usize, norm: Norm) -> f64 {
    let reconstruction = create_reconstruction(name, Platform::Cpu).unwrap();
    let ghost = reconstruction.number_of_ghost_cells();
    let grid = Grid::uniform_1d(0.0, 1.0, n).unwrap();
    let h = 1.0 / n as f64;

    let mut input = Volume::new(&["u"], &MemoryFactory::host(), n, 1, 1, ghost).unwrap();
    {
        let mut view = input.view_mut(0).unwrap();
        for i in 0..n {
            *view.at_mut(i + ghost, 0, 0) = cell_average(i as f64 * h, (i + 1) as f64 * h);
        }
    }
    create_boundary("periodic", Platform::Cpu)
        .unwrap()
        .apply_boundary_conditions(&mut input, &grid)
        .unwrap();

    let mut left = input.like().unwrap();
    let mut right = input.like().unwrap();
    reconstruction
        .perform_reconstruction(&input, 0, 0, &mut left, &mut right)
        .unwrap();

    let (left, right) = (left.view(0).unwrap(), right.view(0).unwrap());
    let errors = (0..n).flat_map(|i| {
        let a = i as f64 * h;
        [
            (left.at(i + ghost, 0, 0) - exact(a)).abs(),
            (right.at(i + ghost, 0, 0) - exact(a + h)).abs(),
        ]
    });
    match norm {
        Norm::L1 => errors.sum::<f64>() / n as f64,
        Norm::Max => errors.fold(0.0, f64::max),
    }
}

/// Least-squares slope of log2(error) against log2(N), negated.
fn convergence_rate(name: &str, norm: Norm) -> f64 {
    let points: Vec<(f64, f64)> = (5..=11)
        .map(|k| {
            let n = 1usize << k;
            (k as f64, edge_error(name, n, norm).log2())
        })
        .collect();
    let count = points.len() as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / count;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / count;
    let covariance: f64 = points.iter().map(|(x, y)| (x - mean_x) * (y - mean_y)).sum();
    let variance: f64 = points.iter().map(|(x, _)| (x - mean_x).powi(2)).sum();
    -covariance / variance
}

fn check_orders(cases: &[(&str, f64)]) {
    for &(name, expected) in cases {
        for norm in [Norm::L1, Norm::Max] {
            let rate = convergence_rate(name, norm);
            let label = match norm {
                Norm::L1 => "L1",
                Norm::Max => "Linf",
            };
            println!("{name} ({label}): {rate:.3}");
            assert!(rate >= expected, "{name}: observed {label} order {rate}");
        }
    }
}

#[test]
fn test_none_is_first_order() {
    check_orders(&[("none", 0.99)]);
}

#[test]
fn test_eno_orders() {
    check_orders(&[("eno2", 1.9), ("eno3", 2.9), ("eno4", 3.9)]);
}

#[test]
fn test_weno_orders() {
    check_orders(&[("weno2", 1.9), ("weno3", 2.9)]);
}
