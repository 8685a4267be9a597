//! Speech — synthesis (whole-buffer and streamed) and transcription.

use tokio::sync::mpsc;

use pulse_types::event::SessionEvent;
use pulse_types::log::Severity;
use pulse_types::stream::SpeechAudio;

use crate::error::{ClientError, ClientResult};
use crate::remote::{ListenRequest, SpeakRequest};
use crate::stream::pump_audio;
use crate::Orchestrator;

impl Orchestrator {
    /// Synthesize speech in one round trip.
    pub async fn speak(&self, text: &str) -> ClientResult<SpeechAudio> {
        match self.run_speak(text).await {
            Ok(audio) => Ok(audio),
            Err(err) => {
                self.report_failure("speak", &err);
                Err(err)
            }
        }
    }

    async fn run_speak(&self, text: &str) -> ClientResult<SpeechAudio> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ClientError::Validation("text is empty".to_string()));
        }

        let mut request = SpeakRequest::text_only(text);
        request.provider = self.state.selection().tts_provider;

        let audio = self.gateway.speak(request).await?;
        self.log.success(format!(
            "Synthesized {} bytes ({})",
            audio.data.len(),
            audio.mime_type
        ));
        Ok(audio)
    }

    /// Streaming synthesis. Each decoded chunk is published as a
    /// `SpeechChunk` event the moment it arrives (ready for immediate
    /// playback); the assembled buffer comes back at the end.
    pub async fn speak_stream(&self, text: &str) -> ClientResult<Vec<u8>> {
        match self.run_speak_stream(text).await {
            Ok(bytes) => Ok(bytes),
            Err(err) => {
                self.report_failure("speak stream", &err);
                Err(err)
            }
        }
    }

    async fn run_speak_stream(&self, text: &str) -> ClientResult<Vec<u8>> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ClientError::Validation("text is empty".to_string()));
        }

        let mut request = SpeakRequest::text_only(text);
        request.provider = self.state.selection().tts_provider;
        let stream = self.gateway.speak_stream(request).await?;

        let (tx, mut rx) = mpsc::channel::<pulse_types::stream::AudioChunk>(32);
        let events = self.events.clone();
        let forward = tokio::spawn(async move {
            let mut mime_type: Option<String> = None;
            while let Some(chunk) = rx.recv().await {
                if mime_type.is_none() {
                    mime_type = Some(chunk.mime_type.clone());
                }
                events.send(SessionEvent::SpeechChunk { chunk });
            }
            mime_type
        });

        let result = pump_audio(stream, tx).await;
        let mime_type = forward
            .await
            .ok()
            .flatten()
            .unwrap_or_else(|| "audio/mpeg".to_string());

        let bytes = result?;
        self.events.send(SessionEvent::SpeechDone {
            bytes: bytes.len(),
            mime_type,
        });
        self.log
            .success(format!("Speech stream finished ({} bytes)", bytes.len()));
        Ok(bytes)
    }

    /// Ask the platform to listen on the microphone and transcribe.
    /// The transcript is returned for the caller to place where it wants
    /// (the TUI drops it into the chat input draft).
    pub async fn listen(&self) -> ClientResult<String> {
        match self.run_listen().await {
            Ok(text) => {
                self.notify(Severity::Success, "Transcription ready");
                Ok(text)
            }
            Err(err) => {
                self.report_failure("listen", &err);
                Err(err)
            }
        }
    }

    async fn run_listen(&self) -> ClientResult<String> {
        let request = ListenRequest {
            provider: self.state.selection().stt_provider,
            ..Default::default()
        };
        let transcript = self.gateway.listen(request).await?;
        let preview: String = transcript.text.chars().take(80).collect();
        self.log.success(format!("Transcribed: \"{preview}\""));
        Ok(transcript.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockGateway;
    use pulse_types::config::PulseConfig;
    use pulse_types::stream::AudioChunk;
    use std::sync::Arc;

    fn orchestrator() -> (Arc<MockGateway>, Orchestrator) {
        let gateway = Arc::new(MockGateway::new());
        let orchestrator = Orchestrator::with_gateway(PulseConfig::default(), gateway.clone());
        (gateway, orchestrator)
    }

    fn chunk(index: usize, total: Option<usize>, len: usize) -> AudioChunk {
        AudioChunk {
            index,
            total,
            data: vec![0xAB; len],
            mime_type: "audio/mpeg".to_string(),
        }
    }

    #[tokio::test]
    async fn speak_stream_assembles_all_chunks() {
        let (gateway, orchestrator) = orchestrator();
        *gateway.audio_chunks.lock().unwrap() = vec![
            chunk(0, None, 10),
            chunk(1, None, 20),
            chunk(2, Some(3), 5),
        ];
        let mut events = orchestrator.subscribe_events();

        let bytes = orchestrator.speak_stream("say this").await.unwrap();
        assert_eq!(bytes.len(), 35);

        // chunks were individually delivered before the final buffer
        let mut chunk_events = 0;
        let mut done_bytes = None;
        while let Ok(event) = events.try_recv() {
            match event {
                SessionEvent::SpeechChunk { .. } => chunk_events += 1,
                SessionEvent::SpeechDone { bytes, .. } => done_bytes = Some(bytes),
                _ => {}
            }
        }
        assert_eq!(chunk_events, 3);
        assert_eq!(done_bytes, Some(35));
    }

    #[tokio::test]
    async fn empty_text_is_rejected_locally() {
        let (_gateway, orchestrator) = orchestrator();
        let err = orchestrator.speak_stream("").await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[tokio::test]
    async fn listen_returns_the_transcript() {
        let (_gateway, orchestrator) = orchestrator();
        let text = orchestrator.listen().await.unwrap();
        assert_eq!(text, "hello from the microphone");
    }
}
