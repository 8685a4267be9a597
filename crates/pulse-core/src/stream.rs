//! Streaming aggregation — folds an ordered chunk sequence into both an
//! incremental "as-delivered" view and a final assembled artifact.
//!
//! The gateway guarantees in-order delivery within one stream, so the
//! aggregators never re-sort; they concatenate in arrival order.

use futures_util::StreamExt;
use tokio::sync::mpsc::Sender;

use pulse_types::stream::AudioChunk;

use crate::error::GatewayResult;
use crate::remote::{AudioStream, TextStream};

/// Fold over text deltas with an observable intermediate buffer after
/// every step.
#[derive(Debug, Default)]
pub struct TextAggregator {
    buffer: String,
}

impl TextAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one delta. Returns false for an empty delta — nothing was
    /// folded and no intermediate update should be emitted.
    pub fn push(&mut self, delta: &str) -> bool {
        if delta.is_empty() {
            return false;
        }
        self.buffer.push_str(delta);
        true
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn into_text(self) -> String {
        self.buffer
    }
}

/// Fold over audio chunks in arrival order. Each chunk is independently
/// consumable the moment it arrives; the declared total is advisory and
/// may only become accurate on the terminal chunk.
#[derive(Debug, Default)]
pub struct AudioAggregator {
    data: Vec<u8>,
    chunks: usize,
    declared_total: Option<usize>,
    mime_type: Option<String>,
}

impl AudioAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &AudioChunk) {
        self.data.extend_from_slice(&chunk.data);
        self.chunks += 1;
        if chunk.total.is_some() {
            self.declared_total = chunk.total;
        }
        if self.mime_type.is_none() {
            self.mime_type = Some(chunk.mime_type.clone());
        }
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks
    }

    pub fn declared_total(&self) -> Option<usize> {
        self.declared_total
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

/// Drive a text stream through the aggregator, forwarding every non-empty
/// delta to `sink` as it arrives. A closed sink means the consumer
/// abandoned the stream: stop pulling and return the partial buffer —
/// normal cancellation, not a fault. Stream item errors propagate.
pub async fn pump_text(mut stream: TextStream, sink: Sender<String>) -> GatewayResult<String> {
    let mut aggregator = TextAggregator::new();
    while let Some(item) = stream.next().await {
        let delta = item?;
        if !aggregator.push(&delta) {
            continue;
        }
        if sink.send(delta).await.is_err() {
            break;
        }
    }
    Ok(aggregator.into_text())
}

/// Audio counterpart of [`pump_text`]: every chunk goes to `sink` the
/// moment it arrives and into the assembled buffer.
pub async fn pump_audio(
    mut stream: AudioStream,
    sink: Sender<AudioChunk>,
) -> GatewayResult<Vec<u8>> {
    let mut aggregator = AudioAggregator::new();
    while let Some(item) = stream.next().await {
        let chunk = item?;
        aggregator.push(&chunk);
        if sink.send(chunk).await.is_err() {
            break;
        }
    }
    Ok(aggregator.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatewayError;
    use tokio::sync::mpsc;

    fn chunk(index: usize, total: Option<usize>, len: usize) -> AudioChunk {
        AudioChunk {
            index,
            total,
            data: vec![index as u8; len],
            mime_type: "audio/mpeg".to_string(),
        }
    }

    #[test]
    fn text_fold_is_observable_after_every_delta() {
        let mut aggregator = TextAggregator::new();
        let mut seen = Vec::new();
        for delta in ["Hel", "lo", "", " world"] {
            if aggregator.push(delta) {
                seen.push(aggregator.as_str().to_string());
            }
        }
        // The empty delta folds nothing and emits nothing
        assert_eq!(seen, ["Hel", "Hello", "Hello world"]);
        assert_eq!(aggregator.into_text(), "Hello world");
    }

    #[test]
    fn audio_fold_ignores_declared_total() {
        let mut aggregator = AudioAggregator::new();
        for (i, len) in [10, 20, 5].into_iter().enumerate() {
            aggregator.push(&chunk(i, Some(2), len));
            // every chunk is visible before the stream finishes
            assert_eq!(aggregator.chunk_count(), i + 1);
        }
        assert_eq!(aggregator.declared_total(), Some(2));
        assert_eq!(aggregator.into_bytes().len(), 35);
    }

    #[test]
    fn audio_total_stays_unknown_until_declared() {
        let mut aggregator = AudioAggregator::new();
        aggregator.push(&chunk(0, None, 4));
        assert_eq!(aggregator.declared_total(), None);
        aggregator.push(&chunk(1, Some(2), 4));
        assert_eq!(aggregator.declared_total(), Some(2));
    }

    fn text_stream(deltas: &[&str]) -> TextStream {
        let items: Vec<Result<String, GatewayError>> =
            deltas.iter().map(|s| Ok(s.to_string())).collect();
        Box::pin(futures_util::stream::iter(items))
    }

    #[tokio::test]
    async fn pump_text_forwards_and_assembles() {
        let stream = text_stream(&["Hel", "lo", "", " world"]);
        let (tx, mut rx) = mpsc::channel(16);

        let text = pump_text(stream, tx).await.unwrap();
        assert_eq!(text, "Hello world");

        let mut forwarded = Vec::new();
        while let Ok(delta) = rx.try_recv() {
            forwarded.push(delta);
        }
        assert_eq!(forwarded, ["Hel", "lo", " world"]);
    }

    #[tokio::test]
    async fn pump_text_stops_cleanly_when_consumer_abandons() {
        let stream = text_stream(&["Hel", "lo", " world"]);
        let (tx, rx) = mpsc::channel(1);
        drop(rx);

        // No error for the unread remainder; the partial fold comes back
        let text = pump_text(stream, tx).await.unwrap();
        assert_eq!(text, "Hel");
    }

    #[tokio::test]
    async fn pump_text_propagates_stream_errors() {
        let items: Vec<Result<String, GatewayError>> = vec![
            Ok("a".to_string()),
            Err(GatewayError::Stream("upstream closed".into())),
        ];
        let stream: TextStream = Box::pin(futures_util::stream::iter(items));
        let (tx, _rx) = mpsc::channel(16);

        assert!(pump_text(stream, tx).await.is_err());
    }

    #[tokio::test]
    async fn pump_audio_assembles_in_arrival_order() {
        let chunks: Vec<Result<AudioChunk, GatewayError>> = vec![
            Ok(chunk(0, None, 10)),
            Ok(chunk(1, None, 20)),
            Ok(chunk(2, Some(3), 5)),
        ];
        let stream: AudioStream = Box::pin(futures_util::stream::iter(chunks));
        let (tx, mut rx) = mpsc::channel(16);

        let bytes = pump_audio(stream, tx).await.unwrap();
        assert_eq!(bytes.len(), 35);

        let first = rx.try_recv().unwrap();
        assert_eq!(first.index, 0);
        assert_eq!(first.data.len(), 10);
    }
}
