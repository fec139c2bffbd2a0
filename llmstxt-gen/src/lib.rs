pub mod cli;
pub mod console;
pub mod load_config;
pub mod output;

pub use cli::{run, run_with_sink, Cli, RunReport};
