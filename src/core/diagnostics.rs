// diagnostic log - where failures go instead of the user's face

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// Oldest entries are dropped past this many.
pub const MAX_ENTRIES: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Ok,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

/// Append-only log shared between the form handler and whoever displays it.
///
/// Every entry is also forwarded to `tracing`, so the one-shot CLI gets it on
/// stderr while the terminal ui renders the list in its log panel.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<LogEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            LogLevel::Error => tracing::error!("{message}"),
            LogLevel::Warn => tracing::warn!("{message}"),
            LogLevel::Ok | LogLevel::Info => tracing::info!("{message}"),
        }
        let mut entries = self.lock();
        if entries.len() == MAX_ENTRIES {
            entries.pop_front();
        }
        entries.push_back(LogEntry { level, message });
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn count(&self, level: LogLevel) -> usize {
        self.lock().iter().filter(|e| e.level == level).count()
    }
}
