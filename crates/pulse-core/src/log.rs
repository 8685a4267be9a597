//! Bounded, append-only activity log consumed by the presentation layer.

use std::collections::VecDeque;
use std::sync::Mutex;

use pulse_types::log::{LogEntry, Severity};

pub const DEFAULT_LOG_CAPACITY: usize = 100;

/// Ring buffer of log entries. `record` always succeeds; once the fixed
/// capacity is exceeded the oldest entry is evicted.
pub struct ActivityLog {
    entries: Mutex<VecDeque<LogEntry>>,
    capacity: usize,
}

impl ActivityLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity: capacity.max(1),
        }
    }

    pub fn record(&self, severity: Severity, message: impl Into<String>) {
        let mut entries = self.entries.lock().unwrap();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(LogEntry::new(severity, message));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.record(Severity::Info, message);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.record(Severity::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.record(Severity::Error, message);
    }

    /// Snapshot of the whole buffer, most recent entry first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().unwrap().iter().rev().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_past_capacity() {
        let log = ActivityLog::new(100);
        for i in 0..105 {
            log.info(format!("entry {i}"));
        }
        let entries = log.entries();
        assert_eq!(entries.len(), 100);
        // Most recent first; the five oldest were evicted
        assert_eq!(entries[0].message, "entry 104");
        assert_eq!(entries[99].message, "entry 5");
    }

    #[test]
    fn reads_are_most_recent_first() {
        let log = ActivityLog::new(10);
        log.info("first");
        log.error("second");
        let entries = log.entries();
        assert_eq!(entries[0].message, "second");
        assert_eq!(entries[0].severity, Severity::Error);
        assert_eq!(entries[1].message, "first");
    }
}
