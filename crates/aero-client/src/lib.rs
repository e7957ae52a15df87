//! aero-client: access to the remote simulation service.
//!
//! The orchestrator only sees [`SimulationService`]; [`HttpSimulationService`]
//! is the production implementation talking to the `/upload` and `/simulate`
//! endpoints.

pub mod error;
pub mod http;
pub mod service;

pub use error::{ServiceError, ServiceResult};
pub use http::{DEFAULT_SERVER_URL, HttpSimulationService, SimulateQuery};
pub use service::{MeshUpload, SimulationService};
