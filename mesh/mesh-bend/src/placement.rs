//! Placement of the source mesh before bending.

use nalgebra::{Point3, UnitQuaternion, Vector3};
use tracing::warn;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Translation, rotation and scale applied to the source mesh before it is
/// laid along the curve.
///
/// The bend-axis scale (`scale.x`) is kept in `[-1, 1]` on every assignment
/// path, including deserialization. Its magnitude is the fraction of the
/// mesh's measured extent that maps onto the curve.
///
/// # Example
///
/// ```
/// use mesh_bend::Placement;
/// use nalgebra::Vector3;
///
/// let placement = Placement::identity().with_scale(Vector3::new(2.0, 1.0, 1.0));
/// assert_eq!(placement.scale().x, 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(from = "PlacementRepr")
)]
pub struct Placement {
    translation: Vector3<f64>,
    rotation: UnitQuaternion<f64>,
    scale: Vector3<f64>,
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct PlacementRepr {
    translation: Vector3<f64>,
    rotation: UnitQuaternion<f64>,
    scale: Vector3<f64>,
}

#[cfg(feature = "serde")]
impl From<PlacementRepr> for Placement {
    fn from(repr: PlacementRepr) -> Self {
        Self::new(repr.translation, repr.rotation, repr.scale)
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::identity()
    }
}

/// Clamp the bend-axis component of a scale vector.
fn clamp_bend_scale(mut scale: Vector3<f64>) -> Vector3<f64> {
    if scale.x.abs() > 1.0 {
        let clamped = scale.x.clamp(-1.0, 1.0);
        warn!(requested = scale.x, clamped, "bend-axis scale clamped to [-1, 1]");
        scale.x = clamped;
    }
    scale
}

impl Placement {
    /// No translation, no rotation, unit scale.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            translation: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
            scale: Vector3::repeat(1.0),
        }
    }

    /// Create a placement, clamping `scale.x` into `[-1, 1]`.
    #[must_use]
    pub fn new(
        translation: Vector3<f64>,
        rotation: UnitQuaternion<f64>,
        scale: Vector3<f64>,
    ) -> Self {
        Self {
            translation,
            rotation,
            scale: clamp_bend_scale(scale),
        }
    }

    /// Translation.
    #[must_use]
    pub const fn translation(&self) -> Vector3<f64> {
        self.translation
    }

    /// Rotation.
    #[must_use]
    pub const fn rotation(&self) -> UnitQuaternion<f64> {
        self.rotation
    }

    /// Scale, with `x` already clamped.
    #[must_use]
    pub const fn scale(&self) -> Vector3<f64> {
        self.scale
    }

    /// Builder form of [`Self::set_translation`].
    #[must_use]
    pub fn with_translation(mut self, translation: Vector3<f64>) -> Self {
        self.set_translation(translation);
        self
    }

    /// Builder form of [`Self::set_rotation`].
    #[must_use]
    pub fn with_rotation(mut self, rotation: UnitQuaternion<f64>) -> Self {
        self.set_rotation(rotation);
        self
    }

    /// Builder form of [`Self::set_scale`].
    #[must_use]
    pub fn with_scale(mut self, scale: Vector3<f64>) -> Self {
        self.set_scale(scale);
        self
    }

    /// Set the translation. Returns `true` if the value changed.
    pub fn set_translation(&mut self, translation: Vector3<f64>) -> bool {
        let changed = self.translation != translation;
        self.translation = translation;
        changed
    }

    /// Set the rotation. Returns `true` if the value changed.
    pub fn set_rotation(&mut self, rotation: UnitQuaternion<f64>) -> bool {
        let changed = self.rotation != rotation;
        self.rotation = rotation;
        changed
    }

    /// Set the scale, clamping `x` into `[-1, 1]`. Returns `true` if the
    /// stored (clamped) value changed.
    pub fn set_scale(&mut self, scale: Vector3<f64>) -> bool {
        let scale = clamp_bend_scale(scale);
        let changed = self.scale != scale;
        self.scale = scale;
        changed
    }

    /// Number of scale axes that are negative.
    #[must_use]
    pub fn mirrored_axes(&self) -> usize {
        self.scale.iter().filter(|s| **s < 0.0).count()
    }

    /// Check if the placement mirrors the mesh an odd number of times,
    /// which turns front faces into back faces.
    #[must_use]
    pub fn is_mirrored(&self) -> bool {
        self.mirrored_axes() % 2 == 1
    }

    /// Position used to measure the bend-axis extent: rotated and
    /// translated, but not scaled.
    #[must_use]
    pub fn position_for_extent(&self, position: &Point3<f64>) -> Point3<f64> {
        self.rotation * position + self.translation
    }

    /// Apply rotation, then component-wise scale, then translation.
    ///
    /// Normals get rotation and scale but no translation. Identity stages
    /// are skipped.
    #[must_use]
    pub fn transform(
        &self,
        position: &Point3<f64>,
        normal: &Vector3<f64>,
    ) -> (Point3<f64>, Vector3<f64>) {
        let mut p = *position;
        let mut n = *normal;
        if self.rotation != UnitQuaternion::identity() {
            p = self.rotation * p;
            n = self.rotation * n;
        }
        if self.scale != Vector3::repeat(1.0) {
            p.coords.component_mul_assign(&self.scale);
            n.component_mul_assign(&self.scale);
        }
        if self.translation != Vector3::zeros() {
            p += self.translation;
        }
        (p, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn bend_scale_is_clamped() {
        let p = Placement::new(Vector3::zeros(), UnitQuaternion::identity(), Vector3::new(2.0, 3.0, -4.0));
        assert_eq!(p.scale(), Vector3::new(1.0, 3.0, -4.0));

        let p = Placement::identity().with_scale(Vector3::new(-7.5, 1.0, 1.0));
        assert_eq!(p.scale().x, -1.0);
    }

    #[test]
    fn setters_report_changes() {
        let mut p = Placement::identity();
        assert!(!p.set_translation(Vector3::zeros()));
        assert!(p.set_translation(Vector3::new(0.0, 1.0, 0.0)));
        assert!(!p.set_rotation(UnitQuaternion::identity()));

        // Clamps to the stored value.
        assert!(!p.set_scale(Vector3::new(3.0, 1.0, 1.0)));

        assert!(p.set_scale(Vector3::new(0.5, 1.0, 1.0)));
        assert!(p.set_scale(Vector3::new(3.0, 1.0, 1.0)));
        assert_eq!(p.scale().x, 1.0);
        assert!(!p.set_scale(Vector3::new(5.0, 1.0, 1.0)));
        assert!(!p.set_scale(Vector3::new(1.0, 1.0, 1.0)));
    }

    #[test]
    fn mirror_parity() {
        let cases = [
            (Vector3::new(1.0, 1.0, 1.0), false),
            (Vector3::new(-1.0, 1.0, 1.0), true),
            (Vector3::new(1.0, -1.0, -1.0), false),
            (Vector3::new(-1.0, -1.0, -1.0), true),
        ];
        for (scale, mirrored) in cases {
            assert_eq!(Placement::identity().with_scale(scale).is_mirrored(), mirrored);
        }
    }

    #[test]
    fn transform_order_is_rotate_scale_translate() {
        let p = Placement::new(
            Vector3::new(10.0, 0.0, 0.0),
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2),
            Vector3::new(1.0, 2.0, 1.0),
        );
        // (1,0,0) rotates to (0,1,0), scales to (0,2,0), translates to (10,2,0).
        let (pos, n) = p.transform(&Point3::new(1.0, 0.0, 0.0), &Vector3::x());
        assert_relative_eq!(pos, Point3::new(10.0, 2.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(n, Vector3::new(0.0, 2.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn extent_position_ignores_scale() {
        let p = Placement::identity()
            .with_translation(Vector3::new(1.0, 0.0, 0.0))
            .with_scale(Vector3::new(0.5, 0.5, 0.5));
        let q = p.position_for_extent(&Point3::new(2.0, 2.0, 2.0));
        assert_relative_eq!(q, Point3::new(3.0, 2.0, 2.0));
    }

    #[test]
    fn identity_transform_is_exact() {
        let pos = Point3::new(0.1, -0.2, 0.3);
        let n = Vector3::new(0.0, 0.6, 0.8);
        let (p2, n2) = Placement::identity().transform(&pos, &n);
        assert_eq!(p2, pos);
        assert_eq!(n2, n);
    }
}
