//! Diagnostic sinks handed to record handlers.

use std::cell::RefCell;

/// Receives free-form diagnostic lines from handlers.
pub trait DiagnosticSink {
    fn trace(&self, message: &str);
}

/// Forwards diagnostics to the `log` facade.
#[derive(Debug, Clone)]
pub struct LogSink {
    target: String,
}

impl LogSink {
    pub fn new(target: impl Into<String>) -> Self {
        Self { target: target.into() }
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new("assetrules")
    }
}

impl DiagnosticSink for LogSink {
    fn trace(&self, message: &str) {
        if message.starts_with("ERROR") {
            log::error!(target: self.target.as_str(), "{message}");
        } else {
            log::debug!(target: self.target.as_str(), "{message}");
        }
    }
}

/// Keeps every line in memory, in order.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: RefCell<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.borrow().iter().any(|line| line.contains(needle))
    }

    pub fn take(&self) -> Vec<String> {
        self.lines.borrow_mut().drain(..).collect()
    }
}

impl DiagnosticSink for MemorySink {
    fn trace(&self, message: &str) {
        self.lines.borrow_mut().push(message.to_string());
    }
}

/// Sends each line to two sinks.
pub struct Tee<'a> {
    pub first: &'a dyn DiagnosticSink,
    pub second: &'a dyn DiagnosticSink,
}

impl DiagnosticSink for Tee<'_> {
    fn trace(&self, message: &str) {
        self.first.trace(message);
        self.second.trace(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_records_in_order() {
        let sink = MemorySink::new();
        sink.trace("one");
        sink.trace("two");
        assert_eq!(sink.lines(), vec!["one", "two"]);
        assert!(sink.contains("tw"));
        assert_eq!(sink.take().len(), 2);
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn tee_forwards_to_both() {
        let left = MemorySink::new();
        let right = MemorySink::new();
        Tee {
            first: &left,
            second: &right,
        }
        .trace("hello");
        assert_eq!(left.lines(), right.lines());
    }
}
