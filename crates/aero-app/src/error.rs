//! Error types for the aero-app service layer.

use std::path::PathBuf;

use aero_client::ServiceError;
use aero_core::{CoreError, HandleId, RunToken};
use aero_geometry::GeometryError;
use aero_results::ResultsError;

/// Classification shown next to a failed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NoInputSelected,
    UploadFailed,
    SimulationFailed,
    MalformedMesh,
    InvalidResult,
    InvalidParameters,
    HandleInvalidated,
    Config,
    Internal,
}

impl ErrorKind {
    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::NoInputSelected => "No input selected",
            ErrorKind::UploadFailed => "Upload failed",
            ErrorKind::SimulationFailed => "Simulation failed",
            ErrorKind::MalformedMesh => "Malformed mesh",
            ErrorKind::InvalidResult => "Invalid result",
            ErrorKind::InvalidParameters => "Invalid parameters",
            ErrorKind::HandleInvalidated => "Display handle released",
            ErrorKind::Config => "Configuration error",
            ErrorKind::Internal => "Internal error",
        }
    }
}

/// Application error type that wraps errors from the backend crates and
/// provides a unified error interface for both CLI and GUI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("No input mesh selected")]
    NoInputSelected,

    #[error("Upload failed: {0}")]
    UploadFailed(#[source] ServiceError),

    #[error("Simulation failed: {0}")]
    SimulationFailed(#[source] ServiceError),

    #[error("Malformed mesh: {0}")]
    MalformedMesh(#[from] GeometryError),

    #[error("Invalid simulation result: {0}")]
    InvalidResult(#[from] ResultsError),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(#[from] CoreError),

    #[error("Display handle {0} was released before use")]
    HandleInvalidated(HandleId),

    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write config file: {path}")]
    ConfigWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Service setup failed: {0}")]
    ServiceSetup(#[source] ServiceError),

    #[error("Background task failed: {0}")]
    Worker(String),

    #[error("Run failed: {message}")]
    RunFailed { kind: ErrorKind, message: String },

    #[error("Run {0} finished without publishing a result")]
    RunDiscarded(RunToken),

    #[error("Another run is already in flight")]
    RunInFlight,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::NoInputSelected => ErrorKind::NoInputSelected,
            AppError::UploadFailed(_) => ErrorKind::UploadFailed,
            AppError::SimulationFailed(_) => ErrorKind::SimulationFailed,
            AppError::MalformedMesh(_) => ErrorKind::MalformedMesh,
            AppError::InvalidResult(_) => ErrorKind::InvalidResult,
            AppError::InvalidParameters(_) => ErrorKind::InvalidParameters,
            AppError::HandleInvalidated(_) => ErrorKind::HandleInvalidated,
            AppError::ConfigRead { .. }
            | AppError::ConfigWrite { .. }
            | AppError::ConfigParse { .. }
            | AppError::Config(_)
            | AppError::ServiceSetup(_) => ErrorKind::Config,
            AppError::RunFailed { kind, .. } => *kind,
            AppError::Io { .. }
            | AppError::Worker(_)
            | AppError::RunDiscarded(_)
            | AppError::RunInFlight => ErrorKind::Internal,
        }
    }

    /// Classify a failed `/simulate` call. An answer that could not be
    /// decoded is a bad result, not a failed request.
    pub fn from_simulate(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidResponse(inner) => AppError::InvalidResult(inner),
            other => AppError::SimulationFailed(other),
        }
    }
}

/// Result type for aero-app operations.
pub type AppResult<T> = Result<T, AppError>;
