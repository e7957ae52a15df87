//! Shared application service layer for aerosprint.
//!
//! This crate provides a unified interface for both CLI and GUI frontends:
//! the session store every surface observes, the orchestrator that drives a
//! run against the remote service, mesh loading for display, and client
//! configuration.

pub mod asset;
pub mod config;
pub mod error;
pub mod geometry_service;
pub mod orchestrator;
pub mod session;

// Re-export key types for convenience
pub use asset::{DisplayHandle, InputAsset};
pub use config::{ClientConfig, load_config, save_config};
pub use error::{AppError, AppResult, ErrorKind};
pub use geometry_service::load_geometry;
pub use orchestrator::{Orchestrator, RunOutcome, StartPolicy};
pub use session::{
    CompletedRun, Freshness, RunStatus, RunTicket, SessionState, SessionStore,
};
