#![doc = "llmstxt-gen-core: core logic library for llmstxt-gen."]

//! This crate contains the analysis-to-prompt pipeline behind `llmstxt-gen`:
//! project classification and documentation discovery, prompt construction,
//! the Ollama generation contract and the driver that sequences them.
//!
//! # Usage
//! Build an [`endpoint::OllamaClient`], pick an [`sink::OutputSink`] and call
//! [`pipeline::run_pipeline`]. Writing the result to disk is left to the caller.

pub mod analyze;
pub mod contract;
pub mod endpoint;
pub mod pipeline;
pub mod prompt;
pub mod sink;
