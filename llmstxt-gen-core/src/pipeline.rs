//! High-level pipeline: orchestrates connectivity → model selection → analysis → prompt → generation.
//!
//! This module provides the top-level sequencing for one llms.txt generation run:
//!   - Probes the model endpoint and enumerates its models
//!   - Picks the requested model, or a default one
//!   - Analyzes the project tree and builds the prompt
//!   - Runs a single generation and hands the text back to the caller
//!
//! # Responsibilities
//! - Fail-fast orchestration: the first fatal condition ends the run with a [`PipelineError`]
//! - Reports progress and failure details through the caller's [`OutputSink`]
//! - Does not write any file: persisting the result is the caller's job
//!
//! # Error Handling
//! Endpoint errors never escape raw. A listing failure is treated as "no models";
//! a generation failure is reported to the sink and surfaces as
//! [`PipelineError::EmptyGeneration`].
//!
//! # Navigation
//! - Main entrypoint: [`run_pipeline`]
//! - Supporting types: [`PipelineOptions`], [`PipelineOutput`], [`PipelineError`].

use std::fmt;
use std::path::PathBuf;

use tracing::{debug, error, info, warn};

use crate::analyze::analyze;
use crate::contract::{EndpointError, GenerationRequest, ModelEndpoint, ProjectAnalysis};
use crate::prompt::build_prompt;
use crate::sink::{Level, OutputSink};

/// Model picked when none is requested and it is available.
pub const PREFERRED_DEFAULT_MODEL: &str = "llama2";

/// Inputs for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub project: PathBuf,
    /// Requested model; `None` selects a default from the endpoint's list.
    pub model: Option<String>,
    /// Echo the constructed prompt to the sink.
    pub verbose: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            project: PathBuf::from("."),
            model: None,
            verbose: false,
        }
    }
}

/// Everything a successful run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub model: String,
    pub analysis: ProjectAnalysis,
    /// Generated llms.txt text. Never empty.
    pub content: String,
}

/// Fatal pipeline outcomes.
#[derive(Debug)]
pub enum PipelineError {
    EndpointUnreachable(EndpointError),
    NoModels,
    UnknownModel {
        requested: String,
        available: Vec<String>,
    },
    EmptyGeneration,
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::EndpointUnreachable(e) => {
                write!(f, "cannot connect to the model endpoint: {e}")
            }
            PipelineError::NoModels => f.write_str("no models available on the endpoint"),
            PipelineError::UnknownModel {
                requested,
                available,
            } => write!(
                f,
                "model '{requested}' not found (available: {})",
                available.join(", ")
            ),
            PipelineError::EmptyGeneration => f.write_str("generation produced no content"),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::EndpointUnreachable(e) => Some(e),
            _ => None,
        }
    }
}

/// Pick the model to use from the endpoint's list.
///
/// A requested model must be listed. Without a request, `llama2` wins if listed,
/// otherwise the first entry. `available` must not be empty.
pub fn select_model(requested: Option<&str>, available: &[String]) -> Result<String, PipelineError> {
    match requested {
        Some(name) if available.iter().any(|m| m == name) => Ok(name.to_string()),
        Some(name) => Err(PipelineError::UnknownModel {
            requested: name.to_string(),
            available: available.to_vec(),
        }),
        None => available
            .iter()
            .find(|m| *m == PREFERRED_DEFAULT_MODEL)
            .or_else(|| available.first())
            .cloned()
            .ok_or(PipelineError::NoModels),
    }
}

/// Run one generation pipeline and return the generated text.
pub async fn run_pipeline<E, S>(
    options: &PipelineOptions,
    endpoint: &E,
    sink: &S,
) -> Result<PipelineOutput, PipelineError>
where
    E: ModelEndpoint + ?Sized,
    S: OutputSink + ?Sized,
{
    info!(project = %options.project.display(), "[PIPELINE] Starting llms.txt generation");

    // --- Step 1: Connectivity ---
    sink.emit("Checking model endpoint connection...", Level::Step);
    if let Err(e) = endpoint.check_connectivity().await {
        error!(error = %e, "[PIPELINE][ERROR] Endpoint unreachable");
        sink.emit(&format!("Error: {e}"), Level::Error);
        return Err(PipelineError::EndpointUnreachable(e));
    }
    sink.emit("Connected to model endpoint", Level::Success);

    // --- Step 2: Model enumeration ---
    sink.emit("Available models:", Level::Step);
    let models = match endpoint.list_models().await {
        Ok(models) => models,
        Err(e) => {
            warn!(error = %e, "[PIPELINE] Model listing failed; treating as no models");
            sink.emit(&format!("Could not list models: {e}"), Level::Warning);
            Vec::new()
        }
    };
    if models.is_empty() {
        error!("[PIPELINE][ERROR] No models available");
        return Err(PipelineError::NoModels);
    }
    for model in &models {
        sink.emit(&format!("  • {model}"), Level::Detail);
    }

    // --- Step 3: Model selection ---
    let model = select_model(options.model.as_deref(), &models).map_err(|e| {
        error!(error = %e, "[PIPELINE][ERROR] Model selection failed");
        e
    })?;
    if options.model.is_none() {
        sink.emit(&format!("Using default model: {model}"), Level::Detail);
    }
    info!(model = %model, "[PIPELINE] Model selected");

    // --- Step 4: Analysis ---
    sink.emit("Analyzing project...", Level::Step);
    let analysis = analyze(&options.project);
    sink.emit(
        &format!("  Project type: {}", analysis.project_type),
        Level::Detail,
    );
    sink.emit(
        &format!("  Documentation files: {}", analysis.file_count),
        Level::Detail,
    );
    match serde_json::to_string_pretty(&analysis) {
        Ok(json) => debug!(json = %json, "[PIPELINE][DEBUG] Project analysis"),
        Err(e) => debug!(error = ?e, "[PIPELINE][DEBUG] Failed to serialize analysis as JSON"),
    }

    // --- Step 5: Prompt ---
    sink.emit(&format!("Generating llms.txt with {model}..."), Level::Step);
    let prompt = build_prompt(&analysis);
    if options.verbose {
        sink.emit("Prompt sent to model:", Level::Detail);
        sink.emit(&prompt, Level::Detail);
    }

    // --- Step 6: Generation ---
    let request = GenerationRequest::new(&model, &prompt, None);
    let content = match endpoint.generate(&request).await {
        Ok(content) if !content.is_empty() => content,
        Ok(_) => {
            error!(model = %model, "[PIPELINE][ERROR] Generation returned empty text");
            return Err(PipelineError::EmptyGeneration);
        }
        Err(e) => {
            error!(model = %model, error = %e, "[PIPELINE][ERROR] Generation failed");
            sink.emit(&format!("Generation failed: {e}"), Level::Error);
            return Err(PipelineError::EmptyGeneration);
        }
    };

    info!(
        model = %model,
        chars = content.chars().count(),
        "[PIPELINE] Generation succeeded"
    );
    Ok(PipelineOutput {
        model,
        analysis,
        content,
    })
}
