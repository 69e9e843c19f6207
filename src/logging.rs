//! Warning sinks for recoverable extraction problems.
//!
//! Parsers never log through global state of their own; they hold an
//! `Arc<dyn Logger>` chosen at construction. [`LogFacade`] is the default
//! and forwards to the `log` crate, which stays silent until the
//! application installs a backend.

use crate::error::Error;
use std::sync::{Arc, Mutex};

/// Receives recoverable errors that were turned into empty contributions.
pub trait Logger: Send + Sync {
    /// Record one warning.
    fn warn(&self, err: &Error);
}

/// Forwards warnings to `log::warn!` under the `oxmltext` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFacade;

impl Logger for LogFacade {
    fn warn(&self, err: &Error) {
        log::warn!(target: "oxmltext", "{err}");
    }
}

/// Drops every warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn warn(&self, _err: &Error) {}
}

/// Keeps warnings in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryLogger {
    entries: Arc<Mutex<Vec<String>>>,
}

impl MemoryLogger {
    /// Create an empty logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages recorded so far.
    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of messages recorded so far.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Logger for MemoryLogger {
    fn warn(&self, err: &Error) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(err.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_logger_shares_entries() {
        let logger = MemoryLogger::new();
        let handle: Arc<dyn Logger> = Arc::new(logger.clone());
        handle.warn(&Error::PartNotFound("word/comments.xml".into()));

        assert_eq!(logger.len(), 1);
        assert_eq!(logger.entries()[0], "Part not found: word/comments.xml");
    }

    #[test]
    fn test_null_logger() {
        NullLogger.warn(&Error::UnknownFormat);
        LogFacade.warn(&Error::UnknownFormat);
    }
}
