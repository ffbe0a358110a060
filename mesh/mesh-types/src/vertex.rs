//! Vertex types and per-vertex channels.

use nalgebra::{Point3, Vector3, Vector4};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VertexColor {
    /// Red component.
    pub r: u8,
    /// Green component.
    pub g: u8,
    /// Blue component.
    pub b: u8,
    /// Alpha component.
    pub a: u8,
}

impl VertexColor {
    /// Create a color from RGBA components.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::VertexColor;
    ///
    /// let red = VertexColor::new(255, 0, 0, 255);
    /// assert_eq!(red, VertexColor::RED);
    /// ```
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    /// Opaque red.
    pub const RED: Self = Self::new(255, 0, 0, 255);
}

impl Default for VertexColor {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Optional channels carried by a vertex.
///
/// Only `normal` takes part in deformation. The remaining channels are
/// render data that deformers copy through unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VertexAttributes {
    /// Vertex normal. Not required to be unit length.
    pub normal: Option<Vector3<f64>>,

    /// Tangent with handedness in `w`.
    pub tangent: Option<Vector4<f64>>,

    /// Primary texture coordinates (U, V).
    pub uv: Option<(f32, f32)>,

    /// Secondary texture coordinates, usually lightmap UVs.
    pub uv2: Option<(f32, f32)>,

    /// Vertex color.
    pub color: Option<VertexColor>,
}

impl VertexAttributes {
    /// Attributes with no channel set.
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            normal: None,
            tangent: None,
            uv: None,
            uv2: None,
            color: None,
        }
    }

    /// Attributes carrying only a normal.
    #[inline]
    #[must_use]
    pub const fn with_normal(normal: Vector3<f64>) -> Self {
        Self {
            normal: Some(normal),
            tangent: None,
            uv: None,
            uv2: None,
            color: None,
        }
    }

    /// Check if no channel is set.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.normal.is_none()
            && self.tangent.is_none()
            && self.uv.is_none()
            && self.uv2.is_none()
            && self.color.is_none()
    }
}

/// A vertex: position plus optional channels.
///
/// # Example
///
/// ```
/// use mesh_types::{Vertex, Point3, Vector3};
///
/// let v = Vertex::with_normal(Point3::new(1.0, 2.0, 3.0), Vector3::z());
/// assert_eq!(v.normal(), Some(Vector3::z()));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vertex {
    /// 3D position.
    pub position: Point3<f64>,

    /// Optional channels.
    pub attributes: VertexAttributes,
}

impl Vertex {
    /// Create a vertex with only a position.
    #[inline]
    #[must_use]
    pub const fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            attributes: VertexAttributes::empty(),
        }
    }

    /// Create a vertex from raw coordinates.
    #[inline]
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Point3::new is not const in nalgebra
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }

    /// Create a vertex with a position and a normal.
    #[inline]
    #[must_use]
    pub const fn with_normal(position: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self {
            position,
            attributes: VertexAttributes::with_normal(normal),
        }
    }

    /// The normal, if set.
    #[inline]
    #[must_use]
    pub const fn normal(&self) -> Option<Vector3<f64>> {
        self.attributes.normal
    }
}

impl From<Point3<f64>> for Vertex {
    fn from(position: Point3<f64>) -> Self {
        Self::new(position)
    }
}

impl From<[f64; 3]> for Vertex {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::from_coords(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_vertex_has_no_channels() {
        let v = Vertex::from_coords(1.0, 2.0, 3.0);
        assert!(v.attributes.is_empty());
        assert!(v.normal().is_none());
    }

    #[test]
    fn vertex_from_array() {
        let v: Vertex = [1.0, -2.0, 3.0].into();
        assert!((v.position.y + 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn channels_make_attributes_non_empty() {
        let mut attrs = VertexAttributes::empty();
        attrs.uv2 = Some((0.5, 0.5));
        assert!(!attrs.is_empty());
        assert!(!VertexAttributes::with_normal(Vector3::y()).is_empty());
    }

    #[test]
    fn default_color_is_white() {
        assert_eq!(VertexColor::default(), VertexColor::WHITE);
    }
}
