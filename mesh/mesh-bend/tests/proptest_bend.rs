//! Property-based tests for mesh bending.
//!
//! Run with: cargo test -p mesh-bend -- proptest

use std::cell::RefCell;
use std::rc::Rc;

use mesh_bend::{BendError, BendExtent, ChangeNotifier, CurveSample, CurveSampler, MeshBender, Placement};
use mesh_types::{IndexedMesh, Vertex};
use nalgebra::{Point3, UnitQuaternion, Vector3};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn arb_vertex() -> impl Strategy<Value = Vertex> {
    prop::array::uniform3(-50.0..50.0f64).prop_map(|[x, y, z]| Vertex::from_coords(x, y, z))
}

/// A point cloud with at least two distinct bend-axis coordinates.
fn arb_mesh() -> impl Strategy<Value = IndexedMesh> {
    prop::collection::vec(arb_vertex(), 2..40)
        .prop_map(|mut vertices| {
            vertices[0].position.x = -60.0;
            vertices[1].position.x = 60.0;
            IndexedMesh::from_parts(vertices, Vec::new())
        })
}

fn arb_placement() -> impl Strategy<Value = Placement> {
    (
        prop::array::uniform3(-10.0..10.0f64),
        prop::array::uniform3(-3.0..3.0f64),
        prop::array::uniform3(-2.0..2.0f64),
    )
        .prop_map(|(t, r, s)| {
            Placement::new(
                Vector3::from(t),
                UnitQuaternion::from_euler_angles(r[0], r[1], r[2]),
                Vector3::from(s),
            )
        })
}

/// Straight curve along +Z that records every query.
struct RecordingLine {
    length: f64,
    queries: RefCell<Vec<f64>>,
    changes: ChangeNotifier,
}

impl CurveSampler for RecordingLine {
    fn sample_at_distance(&self, distance: f64) -> CurveSample {
        self.queries.borrow_mut().push(distance);
        CurveSample::new(Point3::new(0.0, 0.0, distance), UnitQuaternion::identity())
    }

    fn length(&self) -> f64 {
        self.length
    }

    fn changes(&self) -> &ChangeNotifier {
        &self.changes
    }
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn proptest_queries_stay_on_curve(
        mesh in arb_mesh(),
        placement in arb_placement(),
        length in 0.5..100.0f64,
    ) {
        let curve = Rc::new(RecordingLine {
            length,
            queries: RefCell::new(Vec::new()),
            changes: ChangeNotifier::new(),
        });
        let vertex_count = mesh.vertices.len();

        let mut bender = MeshBender::new();
        bender.set_source(Rc::new(mesh)).unwrap();
        bender.set_placement(placement);
        bender.set_curve_sampler(curve.clone());

        match bender.compute() {
            Ok(stats) => {
                prop_assert_eq!(stats.vertices_bent, vertex_count);
                prop_assert_eq!(stats.curve_queries + stats.cache_hits, vertex_count);
                for d in curve.queries.borrow().iter() {
                    prop_assert!((0.0..=length).contains(d), "distance {} off curve", d);
                }
            }
            // Rotation can squash the cloud onto a single bend-axis coordinate.
            Err(err) => {
                let degenerate = matches!(err, BendError::DegenerateExtent { .. });
                prop_assert!(degenerate, "unexpected error {:?}", err);
            }
        }
    }

    #[test]
    fn proptest_extent_contains_placed_vertices(
        mesh in arb_mesh(),
        placement in arb_placement(),
    ) {
        let xs: Vec<f64> = mesh
            .vertices
            .iter()
            .map(|v| placement.position_for_extent(&v.position).x)
            .collect();
        let extent = BendExtent::measure(xs.iter().copied()).unwrap();

        prop_assert!(extent.length >= 0.0);
        for x in xs {
            prop_assert!(x >= extent.min_x && x <= extent.max_x() + 1e-9);
        }
    }

    #[test]
    fn proptest_identity_bend_keeps_cross_section_distance(mesh in arb_mesh()) {
        let curve = Rc::new(RecordingLine {
            length: 10.0,
            queries: RefCell::new(Vec::new()),
            changes: ChangeNotifier::new(),
        });
        let source = mesh.clone();

        let mut bender = MeshBender::new();
        bender.set_source(Rc::new(mesh)).unwrap();
        bender.set_curve_sampler(curve);
        bender.compute().unwrap();
        let bent = bender.output().unwrap();

        // On a straight, untwisted curve the offset from the axis is preserved.
        for (src, out) in source.vertices.iter().zip(&bent.vertices) {
            let before = src.position.y.hypot(src.position.z);
            let after = out.position.x.hypot(out.position.y);
            prop_assert!((before - after).abs() < 1e-9);
            prop_assert!((-1e-9..=10.0 + 1e-9).contains(&out.position.z));
        }
    }
}
