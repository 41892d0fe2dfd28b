//! Benchmarks for building and unfolding myriahedra.

use criterion::{criterion_group, criterion_main, Criterion};
use myriahedral::prelude::*;

fn icosahedron(depth: usize) -> MyriahedronOptions {
    MyriahedronOptions::new(BaseGeometry::Icosahedron).with_subdivisions(depth)
}

fn bench_build(c: &mut Criterion) {
    c.bench_function("build_icosahedron_d3", |b| {
        let options = icosahedron(3);
        b.iter(|| Myriahedron::build(&options).unwrap());
    });

    c.bench_function("build_icosahedron_d3_shared", |b| {
        let options = icosahedron(3).with_unfoldable(false);
        b.iter(|| Myriahedron::build(&options).unwrap());
    });

    c.bench_function("build_graticule_16_polyconical", |b| {
        let options = MyriahedronOptions::new(BaseGeometry::Graticule {
            parallels: 16,
            layout: GraticuleLayout::Polyconical,
        })
        .with_subdivisions(1);
        b.iter(|| Myriahedron::build(&options).unwrap());
    });
}

fn bench_unfold(c: &mut Criterion) {
    let mut parallel = Myriahedron::build(&icosahedron(4)).unwrap();
    let mut sequential = Myriahedron::build(&icosahedron(4).sequential()).unwrap();

    c.bench_function("unfold_icosahedron_d4_parallel", |b| {
        b.iter(|| parallel.unfold(0.5).unwrap());
    });

    c.bench_function("unfold_icosahedron_d4_sequential", |b| {
        b.iter(|| sequential.unfold(0.5).unwrap());
    });

    c.bench_function("mesh_data_icosahedron_d4", |b| {
        parallel.unfold(1.0).unwrap();
        b.iter(|| parallel.mesh_data());
    });
}

fn bench_uv(c: &mut Criterion) {
    let mut myria = Myriahedron::build(&icosahedron(4)).unwrap();

    c.bench_function("calculate_uv_icosahedron_d4", |b| {
        b.iter(|| myria.calculate_uv(0.3, 0.1));
    });
}

criterion_group!(benches, bench_build, bench_unfold, bench_uv);
criterion_main!(benches);
