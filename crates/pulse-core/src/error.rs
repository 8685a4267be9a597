//! Error taxonomy — structured gateway failures, local validation failures,
//! and the classifier every call site funnels through before logging.

use thiserror::Error;

/// Failure raised by a Remote Gateway call.
///
/// The HTTP layer decodes the platform's error envelope into the structured
/// variants before anything downstream sees the failure; classification
/// never inspects message text.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("permission required: {capability}")]
    PermissionDenied { capability: String },

    #[error("provider error ({code}): {message}")]
    Provider { code: String, message: String },

    #[error("platform error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("stream error: {0}")]
    Stream(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed platform response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failure raised by an orchestration operation. Local validation variants
/// short-circuit before any remote call is made.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid JSON payload: {0}")]
    MalformedInput(#[source] serde_json::Error),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// The fixed set of failure kinds the activity log distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    PermissionDenied(String),
    Provider { code: String, message: String },
    Generic(String),
}

/// Map a gateway failure to its log kind by structural inspection of the
/// error's variant — never by matching on message strings.
pub fn classify(err: &GatewayError) -> FailureKind {
    match err {
        GatewayError::PermissionDenied { capability } => {
            FailureKind::PermissionDenied(capability.clone())
        }
        GatewayError::Provider { code, message } => FailureKind::Provider {
            code: code.clone(),
            message: message.clone(),
        },
        other => FailureKind::Generic(other.to_string()),
    }
}

impl FailureKind {
    /// The log line for a failed operation. Only the prefix varies by kind.
    pub fn log_line(&self, op: &str) -> String {
        match self {
            Self::PermissionDenied(capability) => {
                format!("{op} failed: permission required: {capability}")
            }
            Self::Provider { code, message } => {
                format!("{op} failed: provider {code}: {message}")
            }
            Self::Generic(message) => format!("{op} failed: {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_failures_never_classify_as_generic() {
        let err = GatewayError::PermissionDenied {
            capability: "llm.chat".into(),
        };
        assert_eq!(
            classify(&err),
            FailureKind::PermissionDenied("llm.chat".into())
        );
    }

    #[test]
    fn provider_failures_keep_code_and_message() {
        let err = GatewayError::Provider {
            code: "E_UPSTREAM".into(),
            message: "model unavailable".into(),
        };
        assert_eq!(
            classify(&err),
            FailureKind::Provider {
                code: "E_UPSTREAM".into(),
                message: "model unavailable".into(),
            }
        );
    }

    #[test]
    fn everything_else_is_generic() {
        let err = GatewayError::Api {
            status: 500,
            message: "boom".into(),
        };
        assert!(matches!(classify(&err), FailureKind::Generic(_)));
    }
}
