use serde::{Deserialize, Serialize};

/// One chunk of a streamed speech synthesis response. Chunks arrive in
/// index order; `total` is advisory and may stay unknown until the
/// terminal chunk declares the true count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioChunk {
    pub index: usize,
    pub total: Option<usize>,
    pub data: Vec<u8>,
    pub mime_type: String,
}

/// A complete synthesized speech response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechAudio {
    pub data: Vec<u8>,
    pub mime_type: String,
}
