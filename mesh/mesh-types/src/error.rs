//! Error types for mesh construction and validation.

use thiserror::Error;

/// Result type for mesh construction and validation.
pub type MeshResult<T> = Result<T, MeshError>;

/// Errors raised when mesh data is structurally inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MeshError {
    /// A per-vertex channel does not have one entry per position.
    #[error("{attribute} channel has {actual} entries, expected {expected}")]
    AttributeLengthMismatch {
        /// Name of the offending channel.
        attribute: &'static str,
        /// Number of positions.
        expected: usize,
        /// Number of entries in the channel.
        actual: usize,
    },

    /// The flat index buffer does not describe whole triangles.
    #[error("index buffer length {len} is not a multiple of 3")]
    IndicesNotTriangles {
        /// Length of the index buffer.
        len: usize,
    },

    /// A face references a vertex that does not exist.
    #[error("face {face} references vertex {index} (mesh has {vertex_count} vertices)")]
    IndexOutOfBounds {
        /// Face index.
        face: usize,
        /// The invalid vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// Only some vertices carry a normal.
    #[error("{with_normals} of {vertex_count} vertices have normals")]
    PartialNormals {
        /// Vertices that have a normal.
        with_normals: usize,
        /// Total vertex count.
        vertex_count: usize,
    },
}
