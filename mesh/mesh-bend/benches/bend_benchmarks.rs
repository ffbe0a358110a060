//! Benchmarks for mesh-bend operations.
//!
//! Run with: cargo bench -p mesh-bend
//!
//! To compare against baseline:
//! 1. First run: cargo bench -p mesh-bend -- --save-baseline main
//! 2. After changes: cargo bench -p mesh-bend -- --baseline main

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use mesh_bend::{BendParams, CubicBezierCurve, MeshBender, SplineNode};
use mesh_types::{IndexedMesh, Vertex};
use nalgebra::{Point3, Vector3};
use std::f64::consts::TAU;
use std::rc::Rc;

// =============================================================================
// Test Mesh Generation
// =============================================================================

/// Create a tube along +X with `rings` cross-sections of `segments` vertices.
fn create_tube(rings: u32, segments: u32) -> IndexedMesh {
    let mut mesh = IndexedMesh::new();

    for ring in 0..rings {
        let x = f64::from(ring) / f64::from(rings - 1);
        for seg in 0..segments {
            let angle = TAU * f64::from(seg) / f64::from(segments);
            let normal = Vector3::new(0.0, angle.cos(), angle.sin());
            mesh.vertices.push(Vertex::with_normal(
                Point3::new(x, 0.1 * normal.y, 0.1 * normal.z),
                normal,
            ));
        }
    }

    for ring in 0..rings - 1 {
        for seg in 0..segments {
            let a = ring * segments + seg;
            let b = ring * segments + (seg + 1) % segments;
            let c = a + segments;
            let d = b + segments;
            mesh.faces.push([a, c, b]);
            mesh.faces.push([b, c, d]);
        }
    }

    mesh
}

fn create_curve() -> Rc<CubicBezierCurve> {
    Rc::new(CubicBezierCurve::new(
        SplineNode::new(Point3::origin(), Point3::new(0.0, 0.0, 3.0)),
        SplineNode::new(Point3::new(5.0, 2.0, 5.0), Point3::new(8.0, 2.0, 5.0)).with_roll(45.0),
    ))
}

// =============================================================================
// Bend Benchmarks
// =============================================================================

fn bench_compute(c: &mut Criterion) {
    let mut group = c.benchmark_group("Bend");

    let test_cases = [
        ("tube_16x16", create_tube(16, 16)),
        ("tube_64x32", create_tube(64, 32)),
        ("tube_256x64", create_tube(256, 64)),
    ];

    for (name, mesh) in &test_cases {
        group.throughput(Throughput::Elements(mesh.vertices.len() as u64));
        let source = Rc::new(mesh.clone());

        for (label, params) in [
            ("exact", BendParams::default()),
            ("quantized_32", BendParams::quantized(32)),
        ] {
            let mut bender = MeshBender::with_params(params);
            bender.set_source(Rc::clone(&source)).ok();
            bender.set_curve_sampler(create_curve());

            // Placement is rebuilt once; later computes only re-sample the curve.
            group.bench_function(BenchmarkId::new(label, name), |b| {
                b.iter(|| black_box(bender.compute()));
            });
        }

        group.bench_with_input(BenchmarkId::new("rebuild", name), &source, |b, source| {
            let mut bender = MeshBender::new();
            bender.set_source(Rc::clone(source)).ok();
            bender.set_curve_sampler(create_curve());
            let mut angle = 0.0_f64;
            b.iter(|| {
                angle += 0.01;
                bender.set_rotation(nalgebra::UnitQuaternion::from_axis_angle(
                    &Vector3::x_axis(),
                    angle,
                ));
                black_box(bender.compute())
            });
        });
    }

    group.finish();
}

// =============================================================================
// Criterion Setup
// =============================================================================

criterion_group!(benches, bench_compute);
criterion_main!(benches);
