//! Indexed triangle mesh.

use crate::{Aabb, MeshBounds, MeshError, MeshResult, MeshTopology, Triangle, Vertex, VertexColor};
use nalgebra::{Point3, Vector3, Vector4};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An indexed triangle mesh.
///
/// Vertices carry their own channels (normal, tangent, UVs, color); faces
/// reference vertices by index.
///
/// # Winding Order
///
/// Faces use **counter-clockwise (CCW) winding** when viewed from outside.
///
/// # Example
///
/// ```
/// use mesh_types::{IndexedMesh, Vertex, MeshTopology};
///
/// let mut mesh = IndexedMesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndexedMesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,

    /// Triangle faces as indices into `vertices`.
    pub faces: Vec<[u32; 3]>,
}

/// Parallel per-vertex channels and a flat index buffer.
///
/// This is the layout renderers and asset loaders hand around. Every
/// optional channel, when present, must have exactly one entry per position.
#[derive(Debug, Clone, Default)]
pub struct MeshArrays {
    /// Vertex positions.
    pub positions: Vec<Point3<f64>>,
    /// Vertex normals.
    pub normals: Option<Vec<Vector3<f64>>>,
    /// Tangents with handedness in `w`.
    pub tangents: Option<Vec<Vector4<f64>>>,
    /// Primary UVs.
    pub uvs: Option<Vec<(f32, f32)>>,
    /// Secondary UVs.
    pub uv2s: Option<Vec<(f32, f32)>>,
    /// Vertex colors.
    pub colors: Option<Vec<VertexColor>>,
    /// Flat triangle index buffer, three entries per face.
    pub indices: Vec<u32>,
}

/// Fail unless `channel` is absent or has `expected` entries.
fn check_channel<T>(
    attribute: &'static str,
    channel: Option<&[T]>,
    expected: usize,
) -> MeshResult<()> {
    match channel {
        Some(values) if values.len() != expected => Err(MeshError::AttributeLengthMismatch {
            attribute,
            expected,
            actual: values.len(),
        }),
        _ => Ok(()),
    }
}

impl IndexedMesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh from vertices and faces.
    #[inline]
    #[must_use]
    pub const fn from_parts(vertices: Vec<Vertex>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Build a mesh from parallel channel arrays.
    ///
    /// # Errors
    ///
    /// - [`MeshError::AttributeLengthMismatch`] if a channel's length differs
    ///   from the number of positions
    /// - [`MeshError::IndicesNotTriangles`] if the index buffer length is not
    ///   a multiple of three
    /// - [`MeshError::IndexOutOfBounds`] if an index references a missing vertex
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{IndexedMesh, MeshArrays, MeshError, Point3, Vector3};
    ///
    /// let arrays = MeshArrays {
    ///     positions: vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)],
    ///     normals: Some(vec![Vector3::z()]),
    ///     indices: vec![0, 1, 1],
    ///     ..MeshArrays::default()
    /// };
    ///
    /// let err = IndexedMesh::from_attribute_arrays(arrays).unwrap_err();
    /// assert!(matches!(err, MeshError::AttributeLengthMismatch { attribute: "normals", .. }));
    /// ```
    pub fn from_attribute_arrays(arrays: MeshArrays) -> MeshResult<Self> {
        let n = arrays.positions.len();
        check_channel("normals", arrays.normals.as_deref(), n)?;
        check_channel("tangents", arrays.tangents.as_deref(), n)?;
        check_channel("uvs", arrays.uvs.as_deref(), n)?;
        check_channel("uv2s", arrays.uv2s.as_deref(), n)?;
        check_channel("colors", arrays.colors.as_deref(), n)?;
        if arrays.indices.len() % 3 != 0 {
            return Err(MeshError::IndicesNotTriangles {
                len: arrays.indices.len(),
            });
        }

        let vertices = arrays
            .positions
            .iter()
            .enumerate()
            .map(|(i, &position)| {
                let mut v = Vertex::new(position);
                v.attributes.normal = arrays.normals.as_ref().map(|c| c[i]);
                v.attributes.tangent = arrays.tangents.as_ref().map(|c| c[i]);
                v.attributes.uv = arrays.uvs.as_ref().map(|c| c[i]);
                v.attributes.uv2 = arrays.uv2s.as_ref().map(|c| c[i]);
                v.attributes.color = arrays.colors.as_ref().map(|c| c[i]);
                v
            })
            .collect();

        let faces = arrays
            .indices
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();

        let mesh = Self { vertices, faces };
        mesh.check_face_indices()?;
        Ok(mesh)
    }

    /// Check that the mesh is structurally consistent.
    ///
    /// Every face index must be in range, and normals must be present on
    /// all vertices or on none.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::IndexOutOfBounds`] or [`MeshError::PartialNormals`].
    pub fn validate(&self) -> MeshResult<()> {
        self.check_face_indices()?;
        let with_normals = self
            .vertices
            .iter()
            .filter(|v| v.attributes.normal.is_some())
            .count();
        if with_normals != 0 && with_normals != self.vertices.len() {
            return Err(MeshError::PartialNormals {
                with_normals,
                vertex_count: self.vertices.len(),
            });
        }
        Ok(())
    }

    fn check_face_indices(&self) -> MeshResult<()> {
        let vertex_count = self.vertices.len();
        for (face, tri) in self.faces.iter().enumerate() {
            if let Some(&index) = tri.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(MeshError::IndexOutOfBounds {
                    face,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }

    /// Check if every vertex carries a normal (and there is at least one vertex).
    #[must_use]
    pub fn has_normals(&self) -> bool {
        !self.vertices.is_empty() && self.vertices.iter().all(|v| v.attributes.normal.is_some())
    }

    /// Reverse the winding of every face.
    ///
    /// Vertex normals are left alone; only the facing implied by the index
    /// order changes.
    pub fn reverse_winding(&mut self) {
        for face in &mut self.faces {
            face.swap(1, 2);
        }
    }

    /// Signed volume enclosed by the mesh (divergence theorem).
    ///
    /// Positive for a closed mesh whose faces wind CCW seen from outside.
    #[must_use]
    pub fn signed_volume(&self) -> f64 {
        self.triangles()
            .map(|t| t.v0.coords.dot(&t.v1.coords.cross(&t.v2.coords)))
            .sum::<f64>()
            / 6.0
    }
}

impl MeshTopology for IndexedMesh {
    #[inline]
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn vertex(&self, index: usize) -> Option<&Vertex> {
        self.vertices.get(index)
    }

    fn face(&self, index: usize) -> Option<[u32; 3]> {
        self.faces.get(index).copied()
    }

    fn triangle(&self, face_index: usize) -> Option<Triangle> {
        let [i0, i1, i2] = *self.faces.get(face_index)?;
        Some(Triangle {
            v0: self.vertices.get(i0 as usize)?.position,
            v1: self.vertices.get(i1 as usize)?.position,
            v2: self.vertices.get(i2 as usize)?.position,
        })
    }
}

impl MeshBounds for IndexedMesh {
    fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().map(|v| &v.position))
    }
}

/// Unit cube from (0,0,0) to (1,1,1) with outward corner normals.
///
/// Eight shared corners, twelve CCW triangles. Each corner's normal points
/// away from the cube center.
///
/// # Example
///
/// ```
/// use mesh_types::{unit_cube, MeshTopology};
///
/// let cube = unit_cube();
/// assert_eq!(cube.vertex_count(), 8);
/// assert_eq!(cube.face_count(), 12);
/// assert!(cube.has_normals());
/// ```
#[must_use]
pub fn unit_cube() -> IndexedMesh {
    let center = Point3::new(0.5, 0.5, 0.5);
    let corners = [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [1.0, 0.0, 1.0],
        [1.0, 1.0, 1.0],
        [0.0, 1.0, 1.0],
    ];

    let vertices = corners
        .iter()
        .map(|&[x, y, z]| {
            let p = Point3::new(x, y, z);
            Vertex::with_normal(p, (p - center).normalize())
        })
        .collect();

    let faces = vec![
        // -Z
        [0, 2, 1],
        [0, 3, 2],
        // +Z
        [4, 5, 6],
        [4, 6, 7],
        // -Y
        [0, 1, 5],
        [0, 5, 4],
        // +Y
        [3, 7, 6],
        [3, 6, 2],
        // -X
        [0, 4, 7],
        [0, 7, 3],
        // +X
        [1, 2, 6],
        [1, 6, 5],
    ];

    IndexedMesh::from_parts(vertices, faces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn triangle_arrays() -> MeshArrays {
        MeshArrays {
            positions: vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            normals: Some(vec![Vector3::z(); 3]),
            uvs: Some(vec![(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]),
            indices: vec![0, 1, 2],
            ..MeshArrays::default()
        }
    }

    #[test]
    fn arrays_become_vertex_channels() {
        let mesh = IndexedMesh::from_attribute_arrays(triangle_arrays()).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.faces, vec![[0, 1, 2]]);
        assert_eq!(mesh.vertices[1].attributes.uv, Some((1.0, 0.0)));
        assert!(mesh.vertices[2].attributes.tangent.is_none());
        assert!(mesh.has_normals());
    }

    #[test]
    fn short_uv_channel_is_rejected() {
        let mut arrays = triangle_arrays();
        arrays.uvs = Some(vec![(0.0, 0.0)]);
        let err = IndexedMesh::from_attribute_arrays(arrays).unwrap_err();
        assert_eq!(
            err,
            MeshError::AttributeLengthMismatch {
                attribute: "uvs",
                expected: 3,
                actual: 1,
            }
        );
    }

    #[test]
    fn ragged_index_buffer_is_rejected() {
        let mut arrays = triangle_arrays();
        arrays.indices.push(0);
        let err = IndexedMesh::from_attribute_arrays(arrays).unwrap_err();
        assert_eq!(err, MeshError::IndicesNotTriangles { len: 4 });
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut arrays = triangle_arrays();
        arrays.indices = vec![0, 1, 7];
        let err = IndexedMesh::from_attribute_arrays(arrays).unwrap_err();
        assert!(matches!(err, MeshError::IndexOutOfBounds { face: 0, index: 7, .. }));
    }

    #[test]
    fn partial_normals_fail_validation() {
        let mut mesh = unit_cube();
        mesh.vertices[3].attributes.normal = None;
        assert_eq!(
            mesh.validate(),
            Err(MeshError::PartialNormals {
                with_normals: 7,
                vertex_count: 8,
            })
        );
    }

    #[test]
    fn unit_cube_is_closed_and_outward() {
        let cube = unit_cube();
        assert!(cube.validate().is_ok());
        assert_relative_eq!(cube.signed_volume(), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn reverse_winding_turns_cube_inside_out() {
        let mut cube = unit_cube();
        cube.reverse_winding();
        assert_relative_eq!(cube.signed_volume(), -1.0, epsilon = 1e-10);
        assert!(cube.has_normals());
    }

    #[test]
    fn bounds_span_vertices() {
        let mut cube = unit_cube();
        cube.vertices[6].position = Point3::new(1.0, 3.0, 1.0);
        let b = cube.bounds();
        assert_relative_eq!(b.min.x, 0.0);
        assert_relative_eq!(b.max.y, 3.0);
        assert!(IndexedMesh::new().bounds_opt().is_none());
    }

    #[test]
    fn triangle_with_bad_index_is_skipped() {
        let mut mesh = unit_cube();
        mesh.faces.push([0, 1, 42]);
        assert!(mesh.triangle(12).is_none());
        assert_eq!(mesh.triangles().count(), 12);
    }
}
