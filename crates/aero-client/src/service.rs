use std::future::Future;
use std::sync::Arc;

use aero_core::SimulationParameters;
use aero_results::SimulationResult;

use crate::ServiceResult;

/// Mesh payload for the upload endpoint.
#[derive(Debug, Clone)]
pub struct MeshUpload {
    pub file_name: String,
    pub bytes: Arc<[u8]>,
}

/// The remote solver, reduced to the two calls a run needs.
///
/// Futures are `Send` so a run can be driven from any runtime worker.
pub trait SimulationService: Send + Sync {
    /// Transfer the mesh. Only success or failure is consumed.
    fn upload(&self, upload: &MeshUpload) -> impl Future<Output = ServiceResult<()>> + Send;

    /// Request a run on the most recently uploaded mesh.
    fn simulate(
        &self,
        params: &SimulationParameters,
    ) -> impl Future<Output = ServiceResult<SimulationResult>> + Send;
}

impl<T: SimulationService> SimulationService for Arc<T> {
    fn upload(&self, upload: &MeshUpload) -> impl Future<Output = ServiceResult<()>> + Send {
        (**self).upload(upload)
    }

    fn simulate(
        &self,
        params: &SimulationParameters,
    ) -> impl Future<Output = ServiceResult<SimulationResult>> + Send {
        (**self).simulate(params)
    }
}
