//! Benchmarks for the numerical flux engine.
//!
//! Run with: `cargo bench --bench flux_bench`
//!
//! Compares face fluxes and the TECNO diffusion operator on a 2D Euler
//! Kelvin-Helmholtz setup.

use std::f64::consts::PI;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use fvm_rs::equations::EulerPrimitive;
use fvm_rs::volume::fill_conserved;
use fvm_rs::{
    EquationParameters, Euler2, Grid, IVec3, MemoryFactory, Platform, RVec3, Volume, VolumeFactory,
    create_boundary, create_diffusion_operator, create_numerical_flux,
};

const GAMMA: f64 = 1.4;

/// Shear layer with a perturbed interface, ghost cells already filled.
fn setup_problem(n: usize, ghost_cells: usize) -> (Grid, Volume) {
    let grid = Grid::new(RVec3::splat(0.0), RVec3::new(1.0, 1.0, 0.0), IVec3::new(n, n, 1)).unwrap();
    let factory = VolumeFactory::new("euler2", MemoryFactory::host()).unwrap();
    let mut volume = factory.create_conserved_volume(n, n, 1, ghost_cells).unwrap();
    let euler = Euler2::new(GAMMA);
    fill_conserved(&euler, &mut volume, &grid, |x| {
        let inner = (x.y - 0.5).abs() < 0.25;
        let rho = if inner { 2.0 } else { 1.0 };
        let u = if inner { -0.5 } else { 0.5 };
        EulerPrimitive::new(rho, [u, 0.01 * (4.0 * PI * x.x).sin()], 2.5)
    })
    .unwrap();
    create_boundary("periodic", Platform::Cpu)
        .unwrap()
        .apply_boundary_conditions(&mut volume, &grid)
        .unwrap();
    (grid, volume)
}

fn parameters() -> EquationParameters {
    EquationParameters::new().with("gamma", GAMMA).unwrap()
}

/// Benchmark each face flux with first-order states.
fn bench_flux_couplings(c: &mut Criterion) {
    let mut group = c.benchmark_group("flux_couplings");
    let (grid, volume) = setup_problem(128, 1);
    let mut output = volume.like().unwrap();

    for name in ["central", "rusanov", "hll", "entropy_conservative"] {
        let mut flux =
            create_numerical_flux("euler2", name, "none", &parameters(), &grid, Platform::Cpu).unwrap();
        group.bench_function(name, |b| {
            b.iter(|| flux.compute_flux(black_box(&volume), &mut output, true).unwrap());
        });
    }

    group.finish();
}

/// Benchmark HLL with increasing grid size.
fn bench_flux_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("hll_scaling");
    group.sample_size(20);

    for n in [32, 64, 128, 256] {
        let (grid, volume) = setup_problem(n, 3);
        let mut output = volume.like().unwrap();
        let mut flux =
            create_numerical_flux("euler2", "hll", "weno3", &parameters(), &grid, Platform::Cpu).unwrap();
        group.bench_with_input(BenchmarkId::new("weno3", n * n), &n, |b, _| {
            b.iter(|| flux.compute_flux(black_box(&volume), &mut output, true).unwrap());
        });
    }

    group.finish();
}

/// Benchmark TECNO diffusion for each sign-preserving reconstruction.
fn bench_tecno_diffusion(c: &mut Criterion) {
    let mut group = c.benchmark_group("tecno_diffusion");
    group.sample_size(20);

    for reconstruction in ["none", "eno2", "eno3"] {
        let (grid, volume) = setup_problem(64, 3);
        let mut output = volume.like().unwrap();
        let mut diffusion =
            create_diffusion_operator("tecnoroe", reconstruction, "euler2", &parameters(), &grid, Platform::Cpu)
                .unwrap();
        group.bench_function(reconstruction, |b| {
            b.iter(|| diffusion.apply_diffusion(black_box(&volume), &mut output).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_flux_couplings, bench_flux_scaling, bench_tecno_diffusion);
criterion_main!(benches);
