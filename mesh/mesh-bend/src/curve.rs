//! Cubic Bézier curve between two spline nodes.
//!
//! [`CubicBezierCurve`] is a ready-made [`CurveSampler`]. Distances are
//! mapped to curve parameters through an arc-length table, so samples are
//! evenly spaced along the curve even when the control points are not.

use std::cell::RefCell;

use nalgebra::{Point3, UnitQuaternion, Vector2, Vector3};
use tracing::debug;

use crate::notify::ChangeNotifier;
use crate::sample::{CurveSample, CurveSampler};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An end point of a curve segment.
///
/// `direction` is a handle point in world space: the curve leaves a start
/// node towards its handle and arrives at an end node from the mirror image
/// of its handle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SplineNode {
    /// Node position.
    pub position: Point3<f64>,
    /// Tangent handle position.
    pub direction: Point3<f64>,
    /// Up vector at this node.
    pub up: Vector3<f64>,
    /// Cross-section scale at this node.
    pub scale: Vector2<f64>,
    /// Roll at this node, in degrees.
    pub roll: f64,
}

impl SplineNode {
    /// A node with +Y up, unit scale and no roll.
    #[must_use]
    pub fn new(position: Point3<f64>, direction: Point3<f64>) -> Self {
        Self {
            position,
            direction,
            up: Vector3::y(),
            scale: Vector2::new(1.0, 1.0),
            roll: 0.0,
        }
    }

    /// Set the up vector.
    #[must_use]
    pub const fn with_up(mut self, up: Vector3<f64>) -> Self {
        self.up = up;
        self
    }

    /// Set the cross-section scale.
    #[must_use]
    pub const fn with_scale(mut self, scale: Vector2<f64>) -> Self {
        self.scale = scale;
        self
    }

    /// Set the roll in degrees.
    #[must_use]
    pub const fn with_roll(mut self, degrees: f64) -> Self {
        self.roll = degrees;
        self
    }
}

/// Configuration for [`CubicBezierCurve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BezierConfig {
    /// Number of chords used to approximate arc length. Default: 30.
    pub samples_per_curve: usize,
}

impl Default for BezierConfig {
    fn default() -> Self {
        Self {
            samples_per_curve: 30,
        }
    }
}

impl BezierConfig {
    /// Set the number of arc-length chords (at least one).
    #[must_use]
    pub fn with_samples_per_curve(mut self, samples: usize) -> Self {
        self.samples_per_curve = samples.max(1);
        self
    }
}

/// Curve parameter and cumulative distance at one table entry.
#[derive(Debug, Clone, Copy)]
struct ArcPoint {
    t: f64,
    distance: f64,
}

#[derive(Debug)]
struct Geometry {
    start: SplineNode,
    end: SplineNode,
    arc: Vec<ArcPoint>,
    length: f64,
}

impl Geometry {
    fn new(start: SplineNode, end: SplineNode, config: BezierConfig) -> Self {
        let mut geometry = Self {
            start,
            end,
            arc: Vec::new(),
            length: 0.0,
        };
        geometry.rebuild(config);
        geometry
    }

    fn control_points(&self) -> [Point3<f64>; 4] {
        let end = self.end.position;
        [
            self.start.position,
            self.start.direction,
            end + (end - self.end.direction),
            end,
        ]
    }

    fn location(&self, t: f64) -> Point3<f64> {
        let [p0, p1, p2, p3] = self.control_points();
        let omt = 1.0 - t;
        let coords = p0.coords * (omt * omt * omt)
            + p1.coords * (3.0 * omt * omt * t)
            + p2.coords * (3.0 * omt * t * t)
            + p3.coords * (t * t * t);
        Point3::from(coords)
    }

    fn tangent(&self, t: f64) -> Vector3<f64> {
        let [p0, p1, p2, p3] = self.control_points();
        let omt = 1.0 - t;
        let derivative = (p1 - p0) * (3.0 * omt * omt)
            + (p2 - p1) * (6.0 * omt * t)
            + (p3 - p2) * (3.0 * t * t);

        derivative
            .try_normalize(f64::EPSILON)
            .or_else(|| (p3 - p0).try_normalize(f64::EPSILON))
            .unwrap_or_else(Vector3::z)
    }

    #[allow(clippy::cast_precision_loss)]
    fn rebuild(&mut self, config: BezierConfig) {
        let steps = config.samples_per_curve.max(1);
        let mut arc = Vec::with_capacity(steps + 1);
        let mut previous = self.location(0.0);
        let mut distance = 0.0;
        arc.push(ArcPoint { t: 0.0, distance });

        for i in 1..=steps {
            let t = i as f64 / steps as f64;
            let point = self.location(t);
            distance += (point - previous).norm();
            arc.push(ArcPoint { t, distance });
            previous = point;
        }

        self.arc = arc;
        self.length = distance;
    }

    fn time_at_distance(&self, distance: f64) -> f64 {
        if self.length <= 0.0 {
            return 0.0;
        }
        let distance = distance.clamp(0.0, self.length);
        let idx = self.arc.partition_point(|p| p.distance < distance);
        if idx == 0 {
            return 0.0;
        }
        let Some(next) = self.arc.get(idx) else {
            return 1.0;
        };
        let prev = self.arc[idx - 1];
        let span = next.distance - prev.distance;
        if span <= 0.0 {
            return next.t;
        }
        prev.t + (next.t - prev.t) * (distance - prev.distance) / span
    }

    fn sample_at_time(&self, t: f64) -> CurveSample {
        let t = t.clamp(0.0, 1.0);
        let forward = self.tangent(t);
        let up = self
            .start
            .up
            .lerp(&self.end.up, t)
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::y);

        CurveSample {
            location: self.location(t),
            rotation: look_rotation(&forward, &up),
            scale: self.start.scale.lerp(&self.end.scale, t),
            roll: self.start.roll + (self.end.roll - self.start.roll) * t,
        }
    }
}

/// Rotation mapping +Z to `forward` and +Y as close to `up` as possible.
fn look_rotation(forward: &Vector3<f64>, up: &Vector3<f64>) -> UnitQuaternion<f64> {
    let up = if forward.cross(up).norm_squared() > 1e-12 {
        *up
    } else if forward.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    UnitQuaternion::face_towards(forward, &up)
}

/// A cubic Bézier segment sampled by arc length.
///
/// Node edits go through `&self` so the curve can be shared with benders
/// through an `Rc`. Every edit that changes a node rebuilds the arc-length
/// table and fires [`CurveSampler::changes`].
///
/// # Example
///
/// ```
/// use mesh_bend::{CubicBezierCurve, CurveSampler};
/// use nalgebra::Point3;
///
/// let curve = CubicBezierCurve::straight(Point3::origin(), Point3::new(0.0, 0.0, 10.0));
/// assert!((curve.length() - 10.0).abs() < 1e-9);
///
/// let mid = curve.sample_at_distance(5.0);
/// assert!((mid.location.z - 5.0).abs() < 1e-9);
/// ```
#[derive(Debug)]
pub struct CubicBezierCurve {
    config: BezierConfig,
    geometry: RefCell<Geometry>,
    changes: ChangeNotifier,
}

impl CubicBezierCurve {
    /// Create a curve from `start` to `end` with the default config.
    #[must_use]
    pub fn new(start: SplineNode, end: SplineNode) -> Self {
        Self::with_config(start, end, BezierConfig::default())
    }

    /// Create a curve with a custom config.
    #[must_use]
    pub fn with_config(start: SplineNode, end: SplineNode, config: BezierConfig) -> Self {
        Self {
            config,
            geometry: RefCell::new(Geometry::new(start, end, config)),
            changes: ChangeNotifier::new(),
        }
    }

    /// A straight segment with evenly spaced handles, so curve parameter
    /// and distance are proportional.
    #[must_use]
    pub fn straight(from: Point3<f64>, to: Point3<f64>) -> Self {
        let third = (to - from) / 3.0;
        Self::new(
            SplineNode::new(from, from + third),
            SplineNode::new(to, to + third),
        )
    }

    /// Arc-length config.
    #[must_use]
    pub const fn config(&self) -> BezierConfig {
        self.config
    }

    /// Start node.
    #[must_use]
    pub fn start(&self) -> SplineNode {
        self.geometry.borrow().start
    }

    /// End node.
    #[must_use]
    pub fn end(&self) -> SplineNode {
        self.geometry.borrow().end
    }

    /// Replace the start node.
    pub fn set_start(&self, node: SplineNode) {
        let end = self.end();
        self.set_nodes(node, end);
    }

    /// Replace the end node.
    pub fn set_end(&self, node: SplineNode) {
        let start = self.start();
        self.set_nodes(start, node);
    }

    /// Replace both nodes. Listeners are notified once, and only if
    /// something changed.
    pub fn set_nodes(&self, start: SplineNode, end: SplineNode) {
        {
            let mut geometry = self.geometry.borrow_mut();
            if geometry.start == start && geometry.end == end {
                return;
            }
            geometry.start = start;
            geometry.end = end;
            geometry.rebuild(self.config);
            debug!(length = geometry.length, "bezier curve rebuilt");
        }
        self.changes.notify();
    }

    /// Curve parameter at `distance` along the curve.
    #[must_use]
    pub fn time_at_distance(&self, distance: f64) -> f64 {
        self.geometry.borrow().time_at_distance(distance)
    }
}

impl CurveSampler for CubicBezierCurve {
    fn sample_at_distance(&self, distance: f64) -> CurveSample {
        let geometry = self.geometry.borrow();
        let t = geometry.time_at_distance(distance);
        geometry.sample_at_time(t)
    }

    fn length(&self) -> f64 {
        self.geometry.borrow().length
    }

    fn changes(&self) -> &ChangeNotifier {
        &self.changes
    }
}
