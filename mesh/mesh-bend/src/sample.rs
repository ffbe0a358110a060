//! Curve samples and the sampler contract.

use nalgebra::{Point3, UnitQuaternion, Vector2};

use crate::notify::ChangeNotifier;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The local frame of a curve at one distance along it.
///
/// The frame's rotation maps +Z onto the curve's forward direction and +Y
/// onto its up direction. `scale.x` stretches the mesh's width (local Z)
/// and `scale.y` its height (local Y). `roll` is in degrees about the
/// forward axis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CurveSample {
    /// Position on the curve.
    pub location: Point3<f64>,
    /// Orientation of the curve's local frame.
    pub rotation: UnitQuaternion<f64>,
    /// Cross-section scale: `x` for width, `y` for height.
    pub scale: Vector2<f64>,
    /// Twist about the forward axis, in degrees.
    pub roll: f64,
}

impl CurveSample {
    /// A sample at `location` with `rotation`, unit scale and no roll.
    #[must_use]
    pub fn new(location: Point3<f64>, rotation: UnitQuaternion<f64>) -> Self {
        Self {
            location,
            rotation,
            scale: Vector2::new(1.0, 1.0),
            roll: 0.0,
        }
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

impl Default for CurveSample {
    fn default() -> Self {
        Self::new(Point3::origin(), UnitQuaternion::identity())
    }
}

/// A curve that can be sampled by arc-length distance.
///
/// Implementations must fire [`Self::changes`] whenever their geometry
/// changes so that benders laid along them recompute.
///
/// # Example
///
/// ```
/// use mesh_bend::{ChangeNotifier, CurveSample, CurveSampler};
/// use nalgebra::{Point3, UnitQuaternion};
///
/// /// A straight line along +Z.
/// struct Line {
///     length: f64,
///     changes: ChangeNotifier,
/// }
///
/// impl CurveSampler for Line {
///     fn sample_at_distance(&self, distance: f64) -> CurveSample {
///         CurveSample::new(Point3::new(0.0, 0.0, distance), UnitQuaternion::identity())
///     }
///
///     fn length(&self) -> f64 {
///         self.length
///     }
///
///     fn changes(&self) -> &ChangeNotifier {
///         &self.changes
///     }
/// }
///
/// let line = Line { length: 4.0, changes: ChangeNotifier::new() };
/// assert_eq!(line.sample_at_distance(2.0).location.z, 2.0);
/// ```
pub trait CurveSampler {
    /// Sample the curve at `distance` along it, in `[0, length()]`.
    fn sample_at_distance(&self, distance: f64) -> CurveSample;

    /// Total arc length of the curve.
    fn length(&self) -> f64;

    /// Notifier fired whenever the curve's geometry changes.
    fn changes(&self) -> &ChangeNotifier;
}
