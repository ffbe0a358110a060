//! Bend a straight mesh along a curve.
//!
//! A [`MeshBender`] takes a source mesh modelled along +X, a [`Placement`]
//! applied to it first, and a [`CurveSampler`]. Each vertex is placed at the
//! distance along the curve proportional to its position in the mesh's
//! bend-axis extent, and its cross-section (Y, Z) is laid into the curve's
//! local frame at that point.
//!
//! - [`MeshBender`] - The component: dirty tracking, placement data, bending
//! - [`CurveSampler`] - What a curve must provide, with [`CurveSample`] frames
//! - [`CubicBezierCurve`] - A ready-made sampler between two [`SplineNode`]s
//! - [`ChangeNotifier`] / [`Subscription`] - Curve change notification
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with zero Bevy dependencies.
//!
//! # Coordinate Conventions
//!
//! | Space | Forward | Up | Width |
//! |-------|---------|----|-------|
//! | Source mesh | +X | +Y | +Z |
//! | Curve frame | +Z | +Y | +X |
//!
//! The mesh's +X is turned onto the frame's +Z by a -90° rotation about +Y.
//!
//! # Quick Start
//!
//! ```
//! use mesh_bend::{CubicBezierCurve, MeshBender, SplineNode};
//! use mesh_types::unit_cube;
//! use nalgebra::Point3;
//! use std::rc::Rc;
//!
//! let curve = Rc::new(CubicBezierCurve::new(
//!     SplineNode::new(Point3::origin(), Point3::new(0.0, 0.0, 3.0)),
//!     SplineNode::new(Point3::new(5.0, 0.0, 5.0), Point3::new(8.0, 0.0, 5.0)),
//! ));
//!
//! let mut bender = MeshBender::new();
//! bender.set_source(Rc::new(unit_cube()))?;
//! bender.set_curve_sampler(curve.clone());
//! bender.compute()?;
//!
//! // Moving a node is picked up on the next compute_if_needed.
//! let mut end = curve.end();
//! end.position.x += 1.0;
//! curve.set_end(end);
//! assert!(bender.needs_compute());
//! assert!(bender.compute_if_needed()?.is_some());
//! # Ok::<(), mesh_bend::BendError>(())
//! ```
//!
//! [`MeshBender::shared`] builds a bender that recomputes by itself whenever
//! its curve changes.
//!
//! # Threading
//!
//! Benders and curves share state through `Rc` and `Cell`, so they are
//! neither `Send` nor `Sync`. Keep a bender and its curve on one thread.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod bender;
mod cache;
mod curve;
mod error;
mod notify;
mod params;
mod placement;
mod sample;
mod stats;

pub use bender::{BendExtent, MeshBender};
pub use curve::{BezierConfig, CubicBezierCurve, SplineNode};
pub use error::{BendError, BendResult};
pub use notify::{ChangeNotifier, Subscription};
pub use params::{BendParams, DegenerateExtentPolicy, SampleCachePolicy};
pub use placement::Placement;
pub use sample::{CurveSample, CurveSampler};
pub use stats::BendStats;
