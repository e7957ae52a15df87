//! aero-results: simulation result schema and the grid-to-scene flow field mapping.

pub mod mapper;
pub mod types;

pub use mapper::{MappedStreamlines, grid_to_scene, map_streamlines};
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

/// Every variant means the service answered with something unusable.
#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Result grid resolution is zero")]
    ZeroResolution,

    #[error("Non-finite coordinate in streamline {streamline}, point {point}")]
    NonFiniteCoordinate { streamline: usize, point: usize },
}
