//! User-facing message channel for the pipeline.
//!
//! The pipeline reports progress and failures through an [`OutputSink`] handed in
//! by the caller instead of printing to a global console. The CLI supplies a console
//! implementation; tests use [`RecordingSink`].

use std::sync::Mutex;

/// Severity/style of a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// A pipeline step is starting.
    Step,
    /// Secondary detail (model names, counts, the echoed prompt).
    Detail,
    Success,
    Warning,
    Error,
}

pub trait OutputSink: Send + Sync {
    fn emit(&self, message: &str, level: Level);
}

/// Keeps every emitted message in memory, in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<(Level, String)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far.
    pub fn messages(&self) -> Vec<(Level, String)> {
        match self.messages.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// True if any message at `level` contains `needle`.
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.messages()
            .iter()
            .any(|(l, m)| *l == level && m.contains(needle))
    }

    /// True if any message, whatever its level, contains `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.messages().iter().any(|(_, m)| m.contains(needle))
    }
}

impl OutputSink for RecordingSink {
    fn emit(&self, message: &str, level: Level) {
        let mut guard = match self.messages.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push((level, message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_keeps_order_and_level() {
        let sink = RecordingSink::new();
        sink.emit("first", Level::Step);
        sink.emit("second", Level::Error);
        assert_eq!(
            sink.messages(),
            vec![
                (Level::Step, "first".to_string()),
                (Level::Error, "second".to_string())
            ]
        );
        assert!(sink.contains(Level::Error, "sec"));
        assert!(!sink.contains(Level::Step, "sec"));
        assert!(sink.mentions("sec"));
    }
}
