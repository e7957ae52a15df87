//! Client configuration file.

use std::path::Path;
use std::time::Duration;

use aero_client::{DEFAULT_SERVER_URL, HttpSimulationService};
use aero_core::SimulationParameters;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the simulation service.
    pub server_url: String,
    /// Parameters a new session starts with.
    pub parameters: SimulationParameters,
    /// Per-request timeout; none waits indefinitely.
    pub request_timeout_s: Option<f64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            parameters: SimulationParameters::default(),
            request_timeout_s: None,
        }
    }
}

impl ClientConfig {
    pub fn validate(&self) -> AppResult<()> {
        self.parameters.validate()?;
        self.request_timeout()?;
        if self.server_url.trim().is_empty() {
            return Err(AppError::Config("server_url is empty".to_string()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> AppResult<Option<Duration>> {
        match self.request_timeout_s {
            None => Ok(None),
            Some(secs) if secs > 0.0 => Duration::try_from_secs_f64(secs)
                .map(Some)
                .map_err(|e| AppError::Config(format!("request_timeout_s: {e}"))),
            Some(secs) => Err(AppError::Config(format!(
                "request_timeout_s must be positive, got {secs}"
            ))),
        }
    }

    /// Build the HTTP service this configuration points at.
    pub fn connect(&self) -> AppResult<HttpSimulationService> {
        self.validate()?;
        HttpSimulationService::new(&self.server_url, self.request_timeout()?)
            .map_err(AppError::ServiceSetup)
    }
}

pub fn load_config(path: &Path) -> AppResult<ClientConfig> {
    let content = std::fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let config: ClientConfig =
        serde_yaml::from_str(&content).map_err(|source| AppError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
    config.validate()?;
    Ok(config)
}

pub fn save_config(path: &Path, config: &ClientConfig) -> AppResult<()> {
    config.validate()?;
    let content = serde_yaml::to_string(config)
        .map_err(|e| AppError::Config(format!("serialization failed: {e}")))?;
    std::fs::write(path, content).map_err(|source| AppError::ConfigWrite {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_falls_back_to_defaults() {
        let config: ClientConfig =
            serde_yaml::from_str("server_url: http://solver:9000\nparameters:\n  resolution: 96\n")
                .unwrap();
        assert_eq!(config.server_url, "http://solver:9000");
        assert_eq!(config.parameters.resolution, 96);
        assert_eq!(config.parameters.wind_speed, 10.0);
        assert_eq!(config.request_timeout_s, None);
    }

    #[test]
    fn non_positive_timeout_is_rejected() {
        let config = ClientConfig {
            request_timeout_s: Some(0.0),
            ..ClientConfig::default()
        };
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn connect_rejects_bad_url() {
        let config = ClientConfig {
            server_url: "::not-a-url".to_string(),
            ..ClientConfig::default()
        };
        assert!(matches!(config.connect(), Err(AppError::ServiceSetup(_))));
    }

    #[test]
    fn save_then_load_preserves_config() {
        let dir = std::env::temp_dir().join(format!("aerosprint-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("client.yaml");

        let config = ClientConfig {
            server_url: "http://10.0.0.2:8000".to_string(),
            parameters: SimulationParameters {
                resolution: 128,
                wind_speed: 42.5,
            },
            request_timeout_s: Some(30.0),
        };
        save_config(&path, &config).unwrap();
        assert_eq!(load_config(&path).unwrap(), config);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_config(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.yaml"));
    }
}
