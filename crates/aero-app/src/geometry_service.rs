//! Mesh loading for display, off the caller's thread.

use aero_geometry::{NormalizedMesh, normalize_stl};
use tracing::debug;

use crate::asset::DisplayHandle;
use crate::error::{AppError, AppResult};

/// Parse and center the mesh behind `handle`.
///
/// The bytes are acquired once up front, so releasing the handle while the
/// parse runs does not affect it. Callers should check `handle.is_live()`
/// before showing the returned mesh.
pub async fn load_geometry(handle: &DisplayHandle) -> AppResult<NormalizedMesh> {
    let bytes = handle
        .acquire()
        .ok_or(AppError::HandleInvalidated(handle.id()))?;

    let mesh = tokio::task::spawn_blocking(move || normalize_stl(&bytes))
        .await
        .map_err(|e| AppError::Worker(e.to_string()))??;

    debug!(
        handle = %handle.id(),
        triangles = mesh.triangle_count(),
        "geometry loaded"
    );
    Ok(mesh)
}
