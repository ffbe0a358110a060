//! Core mesh types for CortenForge.
//!
//! This crate provides the foundational types shared by the deformation
//! crates:
//!
//! - [`Vertex`] - A position plus optional normal, tangent, UV and color channels
//! - [`IndexedMesh`] - A triangle mesh with indexed vertices
//! - [`MeshArrays`] - Parallel channel arrays as produced by asset loaders
//! - [`Triangle`] - A concrete triangle with vertex positions
//! - [`Aabb`] - Axis-aligned bounding box
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**.
//!
//! # Coordinate System
//!
//! Coordinates are `f64` and unit-agnostic. Face winding is
//! **counter-clockwise (CCW) when viewed from outside**.
//!
//! # Example
//!
//! ```
//! use mesh_types::{IndexedMesh, MeshArrays, MeshTopology, Point3};
//!
//! let mesh = IndexedMesh::from_attribute_arrays(MeshArrays {
//!     positions: vec![
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(1.0, 0.0, 0.0),
//!         Point3::new(0.5, 1.0, 0.0),
//!     ],
//!     indices: vec![0, 1, 2],
//!     ..MeshArrays::default()
//! })?;
//!
//! assert_eq!(mesh.face_count(), 1);
//! # Ok::<(), mesh_types::MeshError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod bounds;
mod error;
mod mesh;
mod traits;
mod triangle;
mod vertex;

pub use bounds::Aabb;
pub use error::{MeshError, MeshResult};
pub use mesh::{IndexedMesh, MeshArrays, unit_cube};
pub use traits::{MeshBounds, MeshTopology};
pub use triangle::Triangle;
pub use vertex::{Vertex, VertexAttributes, VertexColor};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3, Vector4};
