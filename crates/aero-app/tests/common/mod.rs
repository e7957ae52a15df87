#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use aero_app::SessionState;
use aero_client::{MeshUpload, ServiceError, ServiceResult, SimulationService};
use aero_core::SimulationParameters;
use aero_results::SimulationResult;
use tokio::sync::{oneshot, watch};

type Reply<T> = oneshot::Receiver<ServiceResult<T>>;

/// In-memory service whose replies are released by the test.
///
/// Calls consume scripted replies in order; each reply resolves when the
/// test sends on the matching sender.
#[derive(Default)]
pub struct ScriptedService {
    uploads: Mutex<VecDeque<Reply<()>>>,
    simulations: Mutex<VecDeque<Reply<SimulationResult>>>,
    pub uploaded: Mutex<Vec<String>>,
    pub simulated: Mutex<Vec<SimulationParameters>>,
}

impl ScriptedService {
    pub fn push_upload(&self) -> oneshot::Sender<ServiceResult<()>> {
        let (tx, rx) = oneshot::channel();
        self.uploads.lock().unwrap().push_back(rx);
        tx
    }

    pub fn push_simulation(&self) -> oneshot::Sender<ServiceResult<SimulationResult>> {
        let (tx, rx) = oneshot::channel();
        self.simulations.lock().unwrap().push_back(rx);
        tx
    }

    pub fn simulate_calls(&self) -> Vec<SimulationParameters> {
        self.simulated.lock().unwrap().clone()
    }
}

impl SimulationService for ScriptedService {
    async fn upload(&self, upload: &MeshUpload) -> ServiceResult<()> {
        self.uploaded.lock().unwrap().push(upload.file_name.clone());
        let reply = self.uploads.lock().unwrap().pop_front().expect("unscripted upload");
        reply.await.expect("upload reply dropped")
    }

    async fn simulate(&self, params: &SimulationParameters) -> ServiceResult<SimulationResult> {
        self.simulated.lock().unwrap().push(*params);
        let reply = self
            .simulations
            .lock()
            .unwrap()
            .pop_front()
            .expect("unscripted simulation");
        reply.await.expect("simulation reply dropped")
    }
}

/// A transport-level failure, as produced by an unreachable server.
pub fn network_error(endpoint: &'static str) -> ServiceError {
    let source = reqwest::Client::new()
        .post("http://")
        .build()
        .expect_err("empty host must not build");
    ServiceError::Transport { endpoint, source }
}

pub fn one_streamline(resolution: u32, points: &[[f64; 3]]) -> SimulationResult {
    SimulationResult::new(resolution, vec![points.to_vec()])
}

pub async fn wait_until(
    rx: &mut watch::Receiver<SessionState>,
    pred: impl FnMut(&SessionState) -> bool,
) -> SessionState {
    rx.wait_for(pred).await.expect("session store dropped").clone()
}

/// Encode triangles as a binary STL buffer.
pub fn binary_stl(triangles: &[[[f32; 3]; 3]]) -> Vec<u8> {
    let mut bytes = vec![0u8; 80];
    bytes.extend_from_slice(&(triangles.len() as u32).to_le_bytes());
    for tri in triangles {
        bytes.extend_from_slice(&[0u8; 12]);
        for vertex in tri {
            for c in vertex {
                bytes.extend_from_slice(&c.to_le_bytes());
            }
        }
        bytes.extend_from_slice(&[0u8; 2]);
    }
    bytes
}

/// Two triangles spanning `[lo, hi]` on every axis.
pub fn box_corners_stl(lo: f32, hi: f32) -> Vec<u8> {
    binary_stl(&[
        [[lo, lo, lo], [hi, lo, lo], [lo, hi, hi]],
        [[hi, hi, hi], [lo, hi, lo], [hi, lo, hi]],
    ])
}
