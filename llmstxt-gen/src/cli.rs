//! # llmstxt-gen CLI Interface (Module)
//!
//! This module implements the command-line surface of llmstxt-gen: option parsing,
//! settings resolution, the console sink and persistence of the generated file.
//!
//! All decision logic (analysis, prompt shaping, model selection) lives in the
//! [`llmstxt-gen-core`] crate. This module is strictly CLI glue and orchestration.
//!
//! ## How To Use
//! - For command-line users: run the installed `llmstxt-gen` binary with `--help`.
//! - For programmatic/integration use: call [`run`] (console output) or
//!   [`run_with_sink`] (caller-supplied sink) with a constructed [`Cli`].
//!
//! [`llmstxt-gen-core`]: ../../llmstxt_gen_core/

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use llmstxt_gen_core::endpoint::OllamaClient;
use llmstxt_gen_core::pipeline::{run_pipeline, PipelineError, PipelineOptions};
use llmstxt_gen_core::sink::{Level, OutputSink};

use crate::console::{preview, ConsoleSink};
use crate::load_config::{load_config, Settings};
use crate::output::write_output;

/// CLI for llmstxt-gen: generate an llms.txt for a project with a local Ollama model.
#[derive(Parser, Debug, Clone, Default)]
#[clap(
    name = "llmstxt-gen",
    version,
    about = "Generate llms.txt files using Ollama LLM models"
)]
pub struct Cli {
    /// Path to project directory [default: .]
    #[clap(short, long, value_name = "PATH")]
    pub project: Option<PathBuf>,

    /// Output file path [default: ./llms.txt]
    #[clap(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Ollama model to use (auto-detects if not specified)
    #[clap(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Ollama API host [default: http://localhost:11434]
    #[clap(short = 'H', long, env = "OLLAMA_HOST", value_name = "URL")]
    pub host: Option<String>,

    /// Show detailed output, including the prompt sent to the model
    #[clap(short, long)]
    pub verbose: bool,

    /// YAML file with defaults for host, model, output and project
    #[clap(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// What a successful run wrote.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub output_path: PathBuf,
    pub model: String,
    /// Size of the generated content, in characters.
    pub chars: usize,
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<RunReport> {
    run_with_sink(cli, &ConsoleSink).await
}

/// Same as [`run`], reporting to `sink` instead of the console.
pub async fn run_with_sink<S>(cli: Cli, sink: &S) -> Result<RunReport>
where
    S: OutputSink + ?Sized,
{
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    let file_config = match &cli.config {
        Some(path) => Some(load_config(path)?),
        None => None,
    };
    let settings = Settings::resolve(&cli, file_config);
    tracing::info!(?settings, "Settings resolved");

    sink.emit("llms.txt Generator", Level::Step);
    sink.emit("Powered by Ollama LLM", Level::Detail);

    let client = OllamaClient::new(&settings.host);
    let options = PipelineOptions {
        project: settings.project.clone(),
        model: settings.model.clone(),
        verbose: settings.verbose,
    };

    let output = match run_pipeline(&options, &client, sink).await {
        Ok(output) => output,
        Err(e) => {
            report_failure(&e, &settings, sink);
            tracing::error!(error = %e, "Generation pipeline failed");
            return Err(anyhow::Error::new(e));
        }
    };

    let output_path = write_output(&settings.output, &output.content)?;
    sink.emit(
        &format!("Saving to: {}", output_path.display()),
        Level::Step,
    );
    let chars = output.content.chars().count();
    report_success(&output.content, &output_path, chars, sink);

    tracing::info!(
        path = %output_path.display(),
        model = %output.model,
        chars,
        "llms.txt written"
    );
    Ok(RunReport {
        output_path,
        model: output.model,
        chars,
    })
}

fn report_failure<S: OutputSink + ?Sized>(error: &PipelineError, settings: &Settings, sink: &S) {
    match error {
        PipelineError::EndpointUnreachable(_) => {
            sink.emit(
                &format!("Error: Cannot connect to Ollama at {}", settings.host),
                Level::Error,
            );
            sink.emit("Make sure Ollama is running:", Level::Detail);
            sink.emit("  $ ollama serve", Level::Detail);
        }
        PipelineError::NoModels => {
            sink.emit("No models found. Install one:", Level::Error);
            sink.emit("  $ ollama pull llama2", Level::Detail);
        }
        PipelineError::UnknownModel {
            requested,
            available,
        } => {
            sink.emit(&format!("Model '{requested}' not found"), Level::Error);
            sink.emit(&format!("Available: {}", available.join(", ")), Level::Error);
        }
        PipelineError::EmptyGeneration => {
            sink.emit("Generation failed", Level::Error);
        }
    }
}

fn report_success<S: OutputSink + ?Sized>(
    content: &str,
    output_path: &std::path::Path,
    chars: usize,
    sink: &S,
) {
    sink.emit("Success! Generated llms.txt", Level::Success);
    sink.emit("Generated Content (Preview):", Level::Step);
    sink.emit(&preview(content), Level::Detail);
    sink.emit(&format!("File: {}", output_path.display()), Level::Detail);
    sink.emit(&format!("Size: {chars} characters"), Level::Detail);
    sink.emit("Next steps:", Level::Step);
    sink.emit("  1. Review the generated file", Level::Detail);
    sink.emit("  2. Edit it where the model guessed wrong", Level::Detail);
    sink.emit("  3. Commit it: git add llms.txt", Level::Detail);
}
