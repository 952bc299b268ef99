//! Injectable output sinks
//!
//! Every display path goes through [`OutputSink`], so behavior stays
//! observable in tests without capturing process output. Nothing in this
//! workspace writes to the console directly.

use parking_lot::Mutex;
use std::sync::Arc;

/// Line-oriented output seam
pub trait OutputSink: Send {
    /// Emit one line
    fn write_line(&mut self, line: &str);
}

/// Sink that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl OutputSink for NullSink {
    fn write_line(&mut self, _line: &str) {}
}

/// Clonable sink capturing lines in memory
///
/// Clones share one buffer, so a test keeps a handle and gives another to
/// the code under test.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    /// Create an empty sink
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines captured so far
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Drop captured lines
    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

impl OutputSink for MemorySink {
    fn write_line(&mut self, line: &str) {
        self.lines.lock().push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_clones_share_buffer() {
        let sink = MemorySink::new();
        let mut writer = sink.clone();

        writer.write_line("first");
        writer.write_line("second");
        assert_eq!(sink.lines(), vec!["first".to_string(), "second".to_string()]);

        sink.clear();
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn null_sink_discards() {
        let mut sink = NullSink;
        sink.write_line("gone");
    }
}
