//! Result data types.

use serde::{Deserialize, Serialize};

use crate::{ResultsError, ResultsResult};

/// Grid-index coordinate, nominally inside `[0, resolution_used]^3`.
pub type GridPoint = [f64; 3];

/// Ordered path of one seeded particle through the flow field.
pub type Streamline = Vec<GridPoint>;

/// Parsed body of a `/simulate` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Grid size the service actually used.
    #[serde(rename = "resolution")]
    pub resolution_used: u32,
    pub streamlines: Vec<Streamline>,
    /// Unrecognized fields, kept as received.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SimulationResult {
    pub fn new(resolution_used: u32, streamlines: Vec<Streamline>) -> Self {
        Self {
            resolution_used,
            streamlines,
            extra: serde_json::Map::new(),
        }
    }

    /// Decode and check a response body.
    pub fn from_json_slice(body: &[u8]) -> ResultsResult<Self> {
        let result: Self = serde_json::from_slice(body)?;
        result.validate()?;
        Ok(result)
    }

    pub fn validate(&self) -> ResultsResult<()> {
        if self.resolution_used == 0 {
            return Err(ResultsError::ZeroResolution);
        }
        for (streamline, path) in self.streamlines.iter().enumerate() {
            if let Some(point) = path
                .iter()
                .position(|p| !p.iter().all(|c| c.is_finite()))
            {
                return Err(ResultsError::NonFiniteCoordinate { streamline, point });
            }
        }
        Ok(())
    }

    pub fn point_count(&self) -> usize {
        self.streamlines.iter().map(Vec::len).sum()
    }

    /// Status string reported by the service, when present.
    pub fn service_status(&self) -> Option<&str> {
        self.extra.get("status").and_then(|v| v.as_str())
    }
}
