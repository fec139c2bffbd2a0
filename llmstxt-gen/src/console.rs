//! Plain-text console sink for the CLI.

use llmstxt_gen_core::sink::{Level, OutputSink};

/// Characters of generated content shown in the success preview.
pub const PREVIEW_CHARS: usize = 500;

/// Prints pipeline messages: progress to stdout, warnings and errors to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl OutputSink for ConsoleSink {
    fn emit(&self, message: &str, level: Level) {
        match level {
            Level::Step => println!("\n{message}"),
            Level::Detail => println!("{message}"),
            Level::Success => println!("✓ {message}"),
            Level::Warning => eprintln!("! {message}"),
            Level::Error => eprintln!("❌ {message}"),
        }
    }
}

/// First [`PREVIEW_CHARS`] characters of `content`, with `...` appended when cut.
pub fn preview(content: &str) -> String {
    if content.chars().count() > PREVIEW_CHARS {
        let mut head: String = content.chars().take(PREVIEW_CHARS).collect();
        head.push_str("...");
        head
    } else {
        content.to_string()
    }
}
