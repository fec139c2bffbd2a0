//! Ollama HTTP client implementing [`ModelEndpoint`].
//!
//! Talks to the two routes the pipeline needs:
//! - `GET {host}/api/tags` for the connectivity probe and the model list
//! - `POST {host}/api/generate` for a single non-streaming generation
//!
//! Every response is decoded into a typed struct; a missing field is an
//! [`EndpointError::InvalidResponse`], never a silent default. No call is retried.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::{debug, error, info};

use crate::contract::{EndpointError, GenerationRequest, GenerationResult, ModelEndpoint};

/// Host used when nothing else is configured.
pub const DEFAULT_HOST: &str = "http://localhost:11434";

/// Timeout for the tags probe and model listing.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for a generation call. Local models are slow; this is deliberately generous.
pub const GENERATE_TIMEOUT: Duration = Duration::from_secs(300);

/// Body of `GET /api/tags`.
#[derive(Debug, Deserialize)]
pub struct TagsResponse {
    #[serde(default)]
    pub models: Vec<ModelTag>,
}

/// One entry of the tags listing. Other fields the server sends are ignored.
#[derive(Debug, Deserialize)]
pub struct ModelTag {
    pub name: String,
}

impl ModelTag {
    /// Name without its tag suffix: `llama2:13b` becomes `llama2`.
    pub fn base_name(&self) -> &str {
        self.name.split(':').next().unwrap_or(&self.name)
    }
}

/// Body of a successful `POST /api/generate` with streaming disabled.
#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
}

pub struct OllamaClient {
    host: String,
    http: Client,
}

impl OllamaClient {
    pub fn new(host: &str) -> Self {
        let host = host.trim_end_matches('/').to_string();
        info!(host = %host, "Initialized Ollama client");
        Self {
            host,
            http: Client::new(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn url(&self, route: &str) -> String {
        format!("{}{}", self.host, route)
    }

    async fn fetch_tags(&self) -> Result<TagsResponse, EndpointError> {
        let response = self
            .http
            .get(self.url("/api/tags"))
            .timeout(PROBE_TIMEOUT)
            .send()
            .await?;
        let response = ensure_success(response).await?;
        response
            .json::<TagsResponse>()
            .await
            .map_err(|e| EndpointError::InvalidResponse(format!("tags listing: {e}")))
    }
}

async fn ensure_success(response: Response) -> Result<Response, EndpointError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(EndpointError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl ModelEndpoint for OllamaClient {
    async fn check_connectivity(&self) -> Result<(), EndpointError> {
        let url = self.url("/api/tags");
        debug!(url = %url, "Probing endpoint");
        let response = self
            .http
            .get(&url)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, host = %self.host, "Cannot reach endpoint");
                EndpointError::from(e)
            })?;
        ensure_success(response).await.map_err(|e| {
            error!(error = %e, host = %self.host, "Endpoint probe returned failure status");
            e
        })?;
        info!(host = %self.host, "Endpoint reachable");
        Ok(())
    }

    async fn list_models(&self) -> Result<Vec<String>, EndpointError> {
        let tags = self.fetch_tags().await?;
        let models: Vec<String> = tags
            .models
            .iter()
            .map(|m| m.base_name().to_string())
            .collect();
        info!(count = models.len(), "Listed models");
        Ok(models)
    }

    async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        info!(
            model = %request.model,
            prompt_chars = request.prompt.chars().count(),
            "Sending generation request"
        );
        let response = self
            .http
            .post(self.url("/api/generate"))
            .timeout(GENERATE_TIMEOUT)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, model = %request.model, "Generation request failed");
                EndpointError::from(e)
            })?;

        let response = ensure_success(response).await.map_err(|e| {
            error!(error = %e, model = %request.model, "Generation returned failure status");
            e
        })?;

        let body: GenerateResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Generation response missing or malformed 'response' field");
            EndpointError::InvalidResponse(format!("generate: {e}"))
        })?;

        if body.response.is_empty() {
            error!(model = %request.model, "Generation produced no text");
            return Err(EndpointError::EmptyResponse);
        }
        info!(
            model = %request.model,
            chars = body.response.chars().count(),
            "Generation complete"
        );
        Ok(body.response)
    }
}
