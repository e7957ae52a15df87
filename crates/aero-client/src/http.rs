//! `reqwest` implementation of [`SimulationService`].

use std::time::Duration;

use aero_core::SimulationParameters;
use aero_results::SimulationResult;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::Serialize;
use tracing::debug;

use crate::{MeshUpload, ServiceError, ServiceResult, SimulationService};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

/// Query string of a `/simulate` request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulateQuery {
    pub resolution: u32,
    pub wind_speed: f64,
}

impl From<&SimulationParameters> for SimulateQuery {
    fn from(params: &SimulationParameters) -> Self {
        Self {
            resolution: params.resolution,
            wind_speed: params.wind_speed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpSimulationService {
    client: Client,
    upload_url: Url,
    simulate_url: Url,
}

impl HttpSimulationService {
    pub fn new(server_url: &str, timeout: Option<Duration>) -> ServiceResult<Self> {
        let base = server_url.trim_end_matches('/');
        let parse = |path: &str| {
            Url::parse(&format!("{}/{}", base, path)).map_err(|e| ServiceError::InvalidUrl {
                url: server_url.to_string(),
                message: e.to_string(),
            })
        };
        let upload_url = parse("upload")?;
        let simulate_url = parse("simulate")?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ServiceError::ClientSetup)?;

        Ok(Self {
            client,
            upload_url,
            simulate_url,
        })
    }

    pub fn upload_request(&self, upload: &MeshUpload) -> RequestBuilder {
        let part = Part::bytes(upload.bytes.to_vec()).file_name(upload.file_name.clone());
        let form = Form::new().part("file", part);
        self.client.post(self.upload_url.clone()).multipart(form)
    }

    pub fn simulate_request(&self, params: &SimulationParameters) -> RequestBuilder {
        self.client
            .post(self.simulate_url.clone())
            .query(&SimulateQuery::from(params))
    }
}

async fn ensure_success(response: Response, endpoint: &'static str) -> ServiceResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ServiceError::Status {
        endpoint,
        status: status.as_u16(),
        body,
    })
}

fn transport(endpoint: &'static str) -> impl FnOnce(reqwest::Error) -> ServiceError {
    move |source| ServiceError::Transport { endpoint, source }
}

impl SimulationService for HttpSimulationService {
    async fn upload(&self, upload: &MeshUpload) -> ServiceResult<()> {
        debug!(file = %upload.file_name, bytes = upload.bytes.len(), "uploading mesh");
        let response = self
            .upload_request(upload)
            .send()
            .await
            .map_err(transport("upload"))?;
        ensure_success(response, "upload").await?;
        Ok(())
    }

    async fn simulate(&self, params: &SimulationParameters) -> ServiceResult<SimulationResult> {
        debug!(
            resolution = params.resolution,
            wind_speed = params.wind_speed,
            "requesting simulation"
        );
        let response = self
            .simulate_request(params)
            .send()
            .await
            .map_err(transport("simulate"))?;
        let response = ensure_success(response, "simulate").await?;
        let body = response.bytes().await.map_err(transport("simulate"))?;
        Ok(SimulationResult::from_json_slice(&body)?)
    }
}
