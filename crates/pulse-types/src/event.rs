use serde::{Deserialize, Serialize};

use crate::log::Severity;
use crate::stream::AudioChunk;

/// Events published by the orchestration layer for the presentation layer.
///
/// Streaming operations emit one event per delta or chunk so the UI can
/// consume each piece the moment it arrives; `Notice` carries the direct
/// notification attached to interactively-invoked operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    /// Incremental text from a streaming chat reply.
    ChatDelta { content: String },
    /// A streaming chat reply finished; `text` is the assembled buffer.
    ChatDone { text: String },
    /// One decoded audio chunk from a streaming speech synthesis.
    SpeechChunk { chunk: AudioChunk },
    /// A streaming speech synthesis finished.
    SpeechDone { bytes: usize, mime_type: String },
    /// Direct user-facing notification for an interactive operation.
    Notice { severity: Severity, message: String },
    /// A state store collection or scalar changed; re-read snapshots.
    StateChanged,
}
