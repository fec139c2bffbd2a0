/// `load_config` module: loads an optional YAML defaults file and merges it with CLI options
/// into the effective [`Settings`] for a run.
///
/// # Responsibilities
/// - Parse the user-supplied YAML file into a strongly-typed [`FileConfig`]
/// - Reject unknown keys so typos surface instead of being ignored
/// - Apply precedence: CLI flag > environment (handled by clap) > config file > default
///
/// # Errors
/// All errors in this module use `anyhow::Error` for context-rich diagnostics, and are surfaced
/// at the CLI boundary.
use anyhow::Result;
use llmstxt_gen_core::endpoint::DEFAULT_HOST;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::cli::Cli;

/// Default output file, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "llms.txt";

/// Contents of a `--config` YAML file. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub host: Option<String>,
    pub model: Option<String>,
    pub output: Option<PathBuf>,
    pub project: Option<PathBuf>,
}

/// Effective settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub project: PathBuf,
    pub output: PathBuf,
    pub model: Option<String>,
    pub host: String,
    pub verbose: bool,
}

impl Settings {
    pub fn resolve(cli: &Cli, file: Option<FileConfig>) -> Self {
        let file = file.unwrap_or_default();
        let host = cli
            .host
            .clone()
            .or(file.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        Settings {
            project: cli
                .project
                .clone()
                .or(file.project)
                .unwrap_or_else(|| PathBuf::from(".")),
            output: cli
                .output
                .clone()
                .or(file.output)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            model: cli.model.clone().or(file.model),
            host: normalize_host(&host),
            verbose: cli.verbose,
        }
    }
}

/// Ollama's own `OLLAMA_HOST` is often a bare `host:port`; give it a scheme.
pub fn normalize_host(host: &str) -> String {
    let host = host.trim();
    if host.contains("://") {
        host.to_string()
    } else {
        format!("http://{host}")
    }
}

/// Loads a YAML defaults file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<FileConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    // An empty file means "no overrides".
    if config_content.trim().is_empty() {
        return Ok(FileConfig::default());
    }

    match serde_yaml::from_str::<FileConfig>(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            Ok(conf)
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            Err(anyhow::anyhow!("Failed to parse config YAML: {e}"))
        }
    }
}
