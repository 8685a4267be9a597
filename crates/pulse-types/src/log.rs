use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity tag for activity log entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Self::Info),
            "success" => Ok(Self::Success),
            "error" => Ok(Self::Error),
            _ => Err(format!("unknown severity: {s}")),
        }
    }
}

/// One entry in the user-visible activity log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub at: DateTime<Utc>,
    pub severity: Severity,
    pub message: String,
}

impl LogEntry {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            at: Utc::now(),
            severity,
            message: message.into(),
        }
    }

    /// Wall-clock portion of the timestamp, for compact display.
    pub fn time(&self) -> String {
        self.at.format("%H:%M:%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_roundtrip() {
        for severity in [Severity::Info, Severity::Success, Severity::Error] {
            let parsed: Severity = severity.to_string().parse().unwrap();
            assert_eq!(severity, parsed);
        }
    }
}
