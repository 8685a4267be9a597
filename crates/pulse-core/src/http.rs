//! HTTP implementation of the Remote Gateway — reqwest against the
//! platform's JSON API, with SSE framing for the two streaming operations.

use std::collections::VecDeque;
use std::pin::Pin;

use async_trait::async_trait;
use base64::Engine;
use futures_util::{Stream, StreamExt};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use pulse_types::activity::Activity;
use pulse_types::config::PlatformConfig;
use pulse_types::provider::{ModelKey, ProviderCatalog};
use pulse_types::registry::{AgentInfo, Thread, Workspace};
use pulse_types::stream::{AudioChunk, SpeechAudio};
use pulse_types::task::TaskSnapshot;

use crate::error::{GatewayError, GatewayResult};
use crate::remote::{
    AudioStream, ChatReply, ChatRequest, Embedding, IngestRequest, ListenRequest, PingInfo,
    RemoteGateway, SearchHit, SearchRequest, SpeakRequest, TextStream, Transcript,
    TriggerReceipt, TriggerRequest,
};

/// Error envelope the platform attaches to non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    capability: Option<String>,
}

pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpGateway {
    pub fn new(config: &PlatformConfig) -> Self {
        // Env var takes priority over the config value
        let api_key = std::env::var("PULSE_API_KEY")
            .ok()
            .or_else(|| config.api_key.clone());
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    #[allow(dead_code)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    /// Send a request and decode the platform's error envelope into a
    /// structured [`GatewayError`] on non-2xx status.
    async fn send(&self, builder: reqwest::RequestBuilder) -> GatewayResult<reqwest::Response> {
        let response = self.authed(builder).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let status = status.as_u16();
        let body = response.text().await.unwrap_or_default();
        if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&body) {
            if let Some(capability) = envelope.capability {
                return Err(GatewayError::PermissionDenied { capability });
            }
            if let Some(code) = envelope.code {
                return Err(GatewayError::Provider {
                    code,
                    message: envelope.error.unwrap_or_default(),
                });
            }
            if let Some(message) = envelope.error {
                return Err(GatewayError::Api { status, message });
            }
        }
        Err(GatewayError::Api {
            status,
            message: body,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> GatewayResult<T> {
        let response = self.send(self.client.get(self.url(path))).await?;
        Ok(response.json().await?)
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> GatewayResult<T> {
        let response = self
            .send(self.client.post(self.url(path)).json(body))
            .await?;
        Ok(response.json().await?)
    }
}

// ─── SSE framing ──────────────────────────────────────────────────────────────

/// Extract the `data:` payload from one SSE frame. `event:` lines are
/// ignored — the payload itself says what it is.
fn data_line(frame: &str) -> Option<&str> {
    frame
        .lines()
        .find_map(|line| line.strip_prefix("data: ").or_else(|| line.strip_prefix("data:")))
        .map(str::trim)
}

/// Turn an SSE response body into a stream of raw `data:` payloads.
/// Frames are separated by blank lines; a `[DONE]` payload ends the stream.
fn sse_data_frames(
    response: reqwest::Response,
) -> Pin<Box<dyn Stream<Item = Result<String, GatewayError>> + Send>> {
    let inner = response.bytes_stream().boxed();
    let state = (inner, String::new(), VecDeque::new(), false);

    Box::pin(futures_util::stream::unfold(
        state,
        |(mut inner, mut buffer, mut pending, mut done)| async move {
            loop {
                if let Some(item) = pending.pop_front() {
                    return Some((item, (inner, buffer, pending, done)));
                }
                if done {
                    return None;
                }
                match inner.next().await {
                    Some(Ok(chunk)) => {
                        buffer.push_str(&String::from_utf8_lossy(&chunk));
                        while let Some(pos) = buffer.find("\n\n") {
                            let frame = buffer[..pos].to_string();
                            buffer.drain(..pos + 2);
                            if let Some(data) = data_line(&frame) {
                                if data == "[DONE]" {
                                    done = true;
                                    break;
                                }
                                pending.push_back(Ok(data.to_string()));
                            }
                        }
                    }
                    Some(Err(e)) => {
                        pending.push_back(Err(GatewayError::Transport(e)));
                        done = true;
                    }
                    None => done = true,
                }
            }
        },
    ))
}

#[derive(Debug, Deserialize)]
struct TextDeltaFrame {
    #[serde(default)]
    delta: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AudioFrame {
    #[serde(default)]
    index: Option<usize>,
    #[serde(default)]
    total: Option<i64>,
    /// Base64-encoded chunk payload; absent on the terminal "done" frame.
    #[serde(default)]
    audio: Option<String>,
    #[serde(default, rename = "mimeType")]
    mime_type: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

fn decode_text_frame(data: &str) -> Option<Result<String, GatewayError>> {
    match serde_json::from_str::<TextDeltaFrame>(data) {
        Ok(frame) => {
            if let Some(message) = frame.error {
                return Some(Err(GatewayError::Stream(message)));
            }
            frame.delta.map(Ok)
        }
        Err(e) => Some(Err(GatewayError::Decode(e))),
    }
}

fn decode_audio_frame(data: &str) -> Option<Result<AudioChunk, GatewayError>> {
    match serde_json::from_str::<AudioFrame>(data) {
        Ok(frame) => {
            if let Some(message) = frame.error {
                return Some(Err(GatewayError::Stream(message)));
            }
            let encoded = frame.audio?;
            match base64::engine::general_purpose::STANDARD.decode(encoded) {
                Ok(data) => Some(Ok(AudioChunk {
                    index: frame.index.unwrap_or(0),
                    total: frame.total.and_then(|t| usize::try_from(t).ok()),
                    data,
                    mime_type: frame.mime_type.unwrap_or_else(|| "audio/mpeg".to_string()),
                })),
                Err(_) => Some(Err(GatewayError::Stream(
                    "audio chunk is not valid base64".to_string(),
                ))),
            }
        }
        Err(e) => Some(Err(GatewayError::Decode(e))),
    }
}

// ─── Response envelopes ───────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ActivitiesEnvelope {
    activities: Vec<Activity>,
}

#[derive(Deserialize)]
struct ActivityEnvelope {
    activity: Activity,
}

#[derive(Deserialize)]
struct AgentsEnvelope {
    agents: Vec<AgentInfo>,
}

#[derive(Deserialize)]
struct WorkspacesEnvelope {
    workspaces: Vec<Workspace>,
}

#[derive(Deserialize)]
struct ThreadsEnvelope {
    threads: Vec<Thread>,
}

#[derive(Deserialize)]
struct TaskEnvelope {
    task: TaskSnapshot,
}

#[derive(Deserialize)]
struct ProvidersEnvelope {
    providers: Vec<String>,
}

#[derive(Deserialize)]
struct VectorWorkspacesEnvelope {
    workspaces: Vec<String>,
}

#[derive(Deserialize)]
struct SearchEnvelope {
    results: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct ListenEnvelope {
    success: bool,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct DataDirEnvelope {
    path: String,
}

// ─── RemoteGateway impl ───────────────────────────────────────────────────────

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn list_activities(&self, limit: usize) -> GatewayResult<Vec<Activity>> {
        let response = self
            .send(
                self.client
                    .get(self.url("/activities"))
                    .query(&[("limit", limit)]),
            )
            .await?;
        let envelope: ActivitiesEnvelope = response.json().await?;
        Ok(envelope.activities)
    }

    async fn insert_activity(&self, raw_data: serde_json::Value) -> GatewayResult<Activity> {
        let body = serde_json::json!({ "raw_data": raw_data });
        let envelope: ActivityEnvelope = self.post_json("/activities", &body).await?;
        Ok(envelope.activity)
    }

    async fn update_activity(&self, id: &str, patch: serde_json::Value) -> GatewayResult<()> {
        self.send(
            self.client
                .patch(self.url(&format!("/activities/{id}")))
                .json(&patch),
        )
        .await?;
        Ok(())
    }

    async fn delete_activity(&self, id: &str) -> GatewayResult<()> {
        self.send(self.client.delete(self.url(&format!("/activities/{id}"))))
            .await?;
        Ok(())
    }

    async fn get_agents(&self) -> GatewayResult<Vec<AgentInfo>> {
        let envelope: AgentsEnvelope = self.get_json("/agents").await?;
        Ok(envelope.agents)
    }

    async fn get_workspaces(&self) -> GatewayResult<Vec<Workspace>> {
        let envelope: WorkspacesEnvelope = self.get_json("/workspaces").await?;
        Ok(envelope.workspaces)
    }

    async fn get_threads(&self, workspace_slug: &str) -> GatewayResult<Vec<Thread>> {
        let envelope: ThreadsEnvelope = self
            .get_json(&format!("/workspaces/{workspace_slug}/threads"))
            .await?;
        Ok(envelope.threads)
    }

    async fn trigger_agent(&self, request: TriggerRequest) -> GatewayResult<TriggerReceipt> {
        self.post_json("/webhook/trigger", &request).await
    }

    async fn get_task(&self, id: &str) -> GatewayResult<TaskSnapshot> {
        let envelope: TaskEnvelope = self.get_json(&format!("/tasks/{id}")).await?;
        Ok(envelope.task)
    }

    async fn start_task(&self, id: &str) -> GatewayResult<()> {
        self.send(self.client.post(self.url(&format!("/tasks/{id}/start"))))
            .await?;
        Ok(())
    }

    async fn complete_task(&self, id: &str, result: serde_json::Value) -> GatewayResult<()> {
        let body = serde_json::json!({ "result": result });
        self.send(
            self.client
                .post(self.url(&format!("/tasks/{id}/complete")))
                .json(&body),
        )
        .await?;
        Ok(())
    }

    async fn fail_task(&self, id: &str, reason: &str) -> GatewayResult<()> {
        let body = serde_json::json!({ "reason": reason });
        self.send(
            self.client
                .post(self.url(&format!("/tasks/{id}/fail")))
                .json(&body),
        )
        .await?;
        Ok(())
    }

    async fn chat_providers(&self) -> GatewayResult<ProviderCatalog> {
        self.get_json("/llm/providers/chat").await
    }

    async fn embed_providers(&self) -> GatewayResult<ProviderCatalog> {
        self.get_json("/llm/providers/embed").await
    }

    async fn chat(&self, request: ChatRequest) -> GatewayResult<ChatReply> {
        self.post_json("/llm/chat", &request).await
    }

    async fn chat_stream(&self, request: ChatRequest) -> GatewayResult<TextStream> {
        let response = self
            .send(self.client.post(self.url("/llm/chat/stream")).json(&request))
            .await?;
        info!("chat stream opened");
        let deltas = sse_data_frames(response).filter_map(|frame| async move {
            match frame {
                Ok(data) => decode_text_frame(&data),
                Err(e) => Some(Err(e)),
            }
        });
        Ok(Box::pin(deltas))
    }

    async fn embed(&self, text: &str, model: Option<&ModelKey>) -> GatewayResult<Embedding> {
        let body = serde_json::json!({
            "input": text,
            "model": model.map(|k| k.model.clone()),
            "provider": model.map(|k| k.provider.clone()),
        });
        self.post_json("/llm/embed", &body).await
    }

    async fn list_vector_workspaces(&self) -> GatewayResult<Vec<String>> {
        let envelope: VectorWorkspacesEnvelope = self.get_json("/llm/vectors/workspaces").await?;
        Ok(envelope.workspaces)
    }

    async fn embed_and_store(&self, request: IngestRequest) -> GatewayResult<()> {
        self.send(
            self.client
                .post(self.url("/llm/embed-and-store"))
                .json(&request),
        )
        .await?;
        Ok(())
    }

    async fn search(&self, request: SearchRequest) -> GatewayResult<Vec<SearchHit>> {
        let envelope: SearchEnvelope = self.post_json("/llm/search", &request).await?;
        Ok(envelope.results)
    }

    async fn delete_vectors(
        &self,
        delete_all: bool,
        workspace_id: Option<&str>,
    ) -> GatewayResult<()> {
        let body = serde_json::json!({
            "deleteAll": delete_all,
            "workspaceId": workspace_id,
        });
        self.send(self.client.post(self.url("/llm/vectors/delete")).json(&body))
            .await?;
        Ok(())
    }

    async fn tts_providers(&self) -> GatewayResult<Vec<String>> {
        let envelope: ProvidersEnvelope = self.get_json("/tts/providers").await?;
        Ok(envelope.providers)
    }

    async fn speak(&self, request: SpeakRequest) -> GatewayResult<SpeechAudio> {
        let response = self
            .send(self.client.post(self.url("/tts/speak")).json(&request))
            .await?;
        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("audio/mpeg")
            .to_string();
        let data = response.bytes().await?.to_vec();
        info!("tts returned {} bytes ({mime_type})", data.len());
        Ok(SpeechAudio { data, mime_type })
    }

    async fn speak_stream(&self, request: SpeakRequest) -> GatewayResult<AudioStream> {
        let response = self
            .send(
                self.client
                    .post(self.url("/tts/speak/stream"))
                    .json(&request),
            )
            .await?;
        info!("tts stream opened");
        let chunks = sse_data_frames(response).filter_map(|frame| async move {
            match frame {
                Ok(data) => decode_audio_frame(&data),
                Err(e) => Some(Err(e)),
            }
        });
        Ok(Box::pin(chunks))
    }

    async fn stt_providers(&self) -> GatewayResult<Vec<String>> {
        let envelope: ProvidersEnvelope = self.get_json("/stt/providers").await?;
        Ok(envelope.providers)
    }

    async fn listen(&self, request: ListenRequest) -> GatewayResult<Transcript> {
        let envelope: ListenEnvelope = self.post_json("/stt/listen", &request).await?;
        if envelope.success {
            Ok(Transcript {
                text: envelope.text.unwrap_or_default(),
            })
        } else {
            Err(GatewayError::Provider {
                code: "stt".to_string(),
                message: envelope
                    .error
                    .unwrap_or_else(|| "transcription failed".to_string()),
            })
        }
    }

    async fn ping(&self) -> GatewayResult<PingInfo> {
        self.get_json("/ping").await
    }

    async fn app_data_dir(&self) -> GatewayResult<String> {
        let envelope: DataDirEnvelope = self.get_json("/app/data-dir").await?;
        Ok(envelope.path)
    }
}
