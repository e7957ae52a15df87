//! aero-core: stable foundation for aerosprint.
//!
//! Contains:
//! - ids (monotonic run tokens and display handle ids)
//! - numeric (Real + finiteness checks)
//! - params (simulation parameters, edits and control bounds)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod params;

pub use error::{CoreError, CoreResult};
pub use ids::*;
pub use numeric::*;
pub use params::*;
