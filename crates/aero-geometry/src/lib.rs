//! aero-geometry: mesh loading and re-centering into the shared scene frame.
//!
//! Parsing is delegated to `stl_io`; this crate owns the centering policy: the
//! surface is translated so that its axis-aligned bounding-box center sits at
//! the origin. Flow field polylines are mapped into the same frame.

pub mod bounds;
pub mod mesh;
pub mod normalize;

pub use bounds::Aabb;
pub use mesh::NormalizedMesh;
pub use normalize::{normalize_stl, normalize_triangles};

pub type GeometryResult<T> = Result<T, GeometryError>;

#[derive(thiserror::Error, Debug)]
pub enum GeometryError {
    #[error("Malformed mesh: {message}")]
    MalformedMesh { message: String },

    #[error("Mesh contains no triangles")]
    EmptyMesh,

    #[error("Mesh vertex {index} is not finite")]
    NonFiniteVertex { index: usize },
}
