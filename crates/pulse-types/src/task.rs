use serde::{Deserialize, Serialize};

/// Platform-observed status of a remote task. The set is open-ended; values
/// outside the known four are preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    Unknown,
    Processing,
    Completed,
    Failed,
    Other(String),
}

impl From<String> for TaskStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "unknown" => Self::Unknown,
            "processing" => Self::Processing,
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            _ => Self::Other(s),
        }
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        status.to_string()
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Processing => write!(f, "processing"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

/// Remote task record addressed by its correlation UUID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSnapshot {
    pub uuid: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Client-reported status of the simulated task. Reflects what this client
/// has told the platform via start/complete/fail, not what the platform
/// observes; the two may diverge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LocalTaskStatus {
    Idle,
    Processing,
    Completed,
    Failed,
}

impl std::fmt::Display for LocalTaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Processing => write!(f, "processing"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for LocalTaskStatus {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(Self::Idle),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(anyhow::anyhow!("unknown local task status: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_status_preserves_remote_defined_values() {
        let status = TaskStatus::from("queued".to_string());
        assert_eq!(status, TaskStatus::Other("queued".into()));
        assert_eq!(status.to_string(), "queued");
    }

    #[test]
    fn local_status_roundtrip() {
        for status in [
            LocalTaskStatus::Idle,
            LocalTaskStatus::Processing,
            LocalTaskStatus::Completed,
            LocalTaskStatus::Failed,
        ] {
            let parsed: LocalTaskStatus = status.to_string().parse().unwrap();
            assert_eq!(status, parsed);
        }
    }
}
