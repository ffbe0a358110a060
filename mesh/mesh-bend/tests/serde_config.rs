//! Serialization of bend configuration.
//!
//! Run with: cargo test -p mesh-bend --features serde

#![cfg(feature = "serde")]

use mesh_bend::{BendParams, Placement, SampleCachePolicy, SplineNode};
use nalgebra::{Point3, Vector3};

#[test]
fn deserialized_placement_is_clamped() {
    let mut value = serde_json::to_value(Placement::identity()).unwrap();
    value["scale"][0] = serde_json::json!(4.0);

    let placement: Placement = serde_json::from_value(value).unwrap();
    assert_eq!(placement.scale(), Vector3::new(1.0, 1.0, 1.0));
}

#[test]
fn params_from_json() {
    let params: BendParams = serde_json::from_str(
        r#"{ "sample_cache": { "Quantized": { "steps": 16 } }, "degenerate_extent": "Fail" }"#,
    )
    .unwrap();
    assert_eq!(params, BendParams::quantized(16));
    assert_eq!(params.sample_cache, SampleCachePolicy::Quantized { steps: 16 });
}

#[test]
fn spline_node_survives_json() {
    let node = SplineNode::new(Point3::new(1.0, 2.0, 3.0), Point3::new(1.0, 2.0, 6.0)).with_roll(30.0);
    let json = serde_json::to_string(&node).unwrap();
    let back: SplineNode = serde_json::from_str(&json).unwrap();
    assert_eq!(back, node);
}
