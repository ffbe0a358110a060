//! Traits for mesh types.

use crate::{Aabb, Triangle, Vertex};

/// Read access to mesh topology.
pub trait MeshTopology {
    /// Number of vertices.
    fn vertex_count(&self) -> usize;

    /// Number of triangles.
    fn face_count(&self) -> usize;

    /// Check if the mesh has no vertices or no faces.
    fn is_empty(&self) -> bool {
        self.vertex_count() == 0 || self.face_count() == 0
    }

    /// Vertex by index, `None` when out of bounds.
    fn vertex(&self, index: usize) -> Option<&Vertex>;

    /// Face by index as three vertex indices.
    fn face(&self, index: usize) -> Option<[u32; 3]>;

    /// Face by index with resolved positions.
    ///
    /// Returns `None` if the face or one of its corners is out of bounds.
    fn triangle(&self, face_index: usize) -> Option<Triangle>;

    /// Iterate over triangles with resolved positions.
    ///
    /// Faces with out-of-range corners are skipped.
    fn triangles(&self) -> impl Iterator<Item = Triangle> {
        (0..self.face_count()).filter_map(|i| self.triangle(i))
    }
}

/// Types that can report a bounding box.
pub trait MeshBounds {
    /// Bounding box of all vertices, empty when there are none.
    fn bounds(&self) -> Aabb;

    /// Bounding box, or `None` when empty.
    fn bounds_opt(&self) -> Option<Aabb> {
        let b = self.bounds();
        if b.is_empty() { None } else { Some(b) }
    }
}
