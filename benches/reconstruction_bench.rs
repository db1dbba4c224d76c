//! Benchmarks for edge reconstruction.
//!
//! Run with: `cargo bench --bench reconstruction_bench`

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use fvm_rs::{MemoryFactory, Platform, Volume, create_reconstruction};

/// Five-variable 2D volume with smooth data plus a jump.
fn setup_volume(n: usize, ghost_cells: usize) -> Volume {
    let names = ["rho", "mx", "my", "E", "s"];
    let mut volume = Volume::new(&names, &MemoryFactory::host(), n, n, 1, ghost_cells).unwrap();
    let total_nx = volume.total_nx();
    let total_ny = volume.total_ny();
    for v in 0..names.len() {
        let mut view = volume.view_mut(v).unwrap();
        for y in 0..total_ny {
            for x in 0..total_nx {
                let step = if x > total_nx / 2 { 1.0 } else { 0.0 };
                *view.at_mut(x, y, 0) = 1.0 + v as f64 + (0.1 * (x + y) as f64).sin() + step;
            }
        }
    }
    volume
}

fn bench_reconstructions(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconstruction");
    group.sample_size(30);

    for name in ["none", "eno2", "eno3", "eno4", "weno2", "weno3"] {
        let reconstruction = create_reconstruction(name, Platform::Cpu).unwrap();
        for n in [64, 256] {
            let input = setup_volume(n, reconstruction.number_of_ghost_cells());
            let mut left = input.like().unwrap();
            let mut right = input.like().unwrap();
            group.bench_with_input(BenchmarkId::new(name, n * n), &n, |b, _| {
                b.iter(|| {
                    reconstruction
                        .perform_reconstruction(black_box(&input), 0, 0, &mut left, &mut right)
                        .unwrap()
                });
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_reconstructions);
criterion_main!(benches);
