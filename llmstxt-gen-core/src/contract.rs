//! # contract: data model and endpoint interface for the generation pipeline
//!
//! This module holds the plain data types that flow through the pipeline
//! ([`ProjectAnalysis`], [`GenerationRequest`]) and the single trait the
//! pipeline needs from the outside world: [`ModelEndpoint`], the interface to
//! a locally hosted model server.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall` so consumers can generate deterministic mocks
//!   (`MockModelEndpoint`) for unit/integration tests. Mocks are exported behind the
//!   `test-export-mocks` feature so downstream crates can use them in their own tests.
//!
//! ## Adding New Endpoint Kinds
//! - Implement [`ModelEndpoint`] for the new backend.
//! - Convert every transport or decoding failure into an [`EndpointError`]; nothing
//!   backend-specific should leak through the trait.

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;
use serde::Serialize;

/// Sampling temperature sent with every generation request.
pub const GENERATION_TEMPERATURE: f64 = 0.7;

/// Ecosystem classification of a project, derived from marker files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProjectType {
    Node,
    Python,
    Rust,
    Swift,
    Go,
    DocumentationSite,
    Unknown,
}

impl ProjectType {
    /// Human-readable label, as embedded in prompts and console output.
    pub fn label(&self) -> &'static str {
        match self {
            ProjectType::Node => "Node.js",
            ProjectType::Python => "Python",
            ProjectType::Rust => "Rust",
            ProjectType::Swift => "Swift",
            ProjectType::Go => "Go",
            ProjectType::DocumentationSite => "Documentation Site",
            ProjectType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of scanning a project tree. Built once per run by [`crate::analyze::analyze`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectAnalysis {
    pub project_type: ProjectType,
    /// Absolute path of the analysed project root.
    pub root_path: PathBuf,
    /// Relative documentation paths (`/`-separated), sorted, unique, at most 50.
    pub doc_files: Vec<String>,
    /// Leading characters of the first readable readme, or empty.
    pub readme_excerpt: String,
    /// Always `doc_files.len()`; the pre-cap total is not kept.
    pub file_count: usize,
}

/// Body of a single, non-streaming generation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
    pub temperature: f64,
}

impl GenerationRequest {
    /// Builds a request for `model`. When `context` is given it is placed before the
    /// prompt, separated by a blank line.
    pub fn new(model: &str, prompt: &str, context: Option<&str>) -> Self {
        let prompt = match context {
            Some(context) => format!("{context}\n\n{prompt}"),
            None => prompt.to_string(),
        };
        Self {
            model: model.to_string(),
            prompt,
            stream: false,
            temperature: GENERATION_TEMPERATURE,
        }
    }
}

/// Outcome of a generation call: non-empty text, or the reason there is none.
pub type GenerationResult = Result<String, EndpointError>;

/// Failure talking to a model endpoint.
#[derive(Debug)]
pub enum EndpointError {
    /// Connection refused, DNS failure, timeout and the like.
    Transport(reqwest::Error),
    /// The endpoint answered with a non-success status.
    Status { status: u16, body: String },
    /// The response body did not have the expected shape.
    InvalidResponse(String),
    /// The endpoint answered successfully but produced no text.
    EmptyResponse,
}

impl fmt::Display for EndpointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointError::Transport(e) if e.is_timeout() => write!(f, "request timed out: {e}"),
            EndpointError::Transport(e) => write!(f, "transport error: {e}"),
            EndpointError::Status { status, body } => {
                write!(f, "endpoint returned HTTP {status}: {body}")
            }
            EndpointError::InvalidResponse(msg) => write!(f, "invalid response: {msg}"),
            EndpointError::EmptyResponse => f.write_str("endpoint returned an empty response"),
        }
    }
}

impl std::error::Error for EndpointError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EndpointError::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for EndpointError {
    fn from(e: reqwest::Error) -> Self {
        EndpointError::Transport(e)
    }
}

/// Interface to a local model-serving endpoint.
///
/// Implemented by [`crate::endpoint::OllamaClient`] and by test mocks.
/// The trait is `Send` + `Sync` and intended for async/await usage.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ModelEndpoint: Send + Sync {
    /// Probe the model-listing route. `Ok` means the endpoint is reachable and healthy.
    async fn check_connectivity(&self) -> Result<(), EndpointError>;

    /// List available models by base name (tag suffix after `:` removed), in server order.
    async fn list_models(&self) -> Result<Vec<String>, EndpointError>;

    /// Run one blocking, non-streaming generation.
    async fn generate(&self, request: &GenerationRequest) -> GenerationResult;
}
