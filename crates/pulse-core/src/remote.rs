//! The Remote Gateway boundary — everything the orchestration layer asks of
//! the platform, as one object-safe async trait plus its request/response
//! types. The production implementation is [`crate::http::HttpGateway`].

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;
use serde::{Deserialize, Serialize};

use pulse_types::activity::Activity;
use pulse_types::chat::ChatMessage;
use pulse_types::provider::{ModelKey, ProviderCatalog};
use pulse_types::registry::{AgentInfo, Thread, Workspace};
use pulse_types::stream::{AudioChunk, SpeechAudio};
use pulse_types::task::TaskSnapshot;

use crate::error::{GatewayError, GatewayResult};

/// Ordered text deltas from a streaming chat reply. In-order delivery within
/// one stream is guaranteed by the gateway.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, GatewayError>> + Send>>;

/// Ordered audio chunks from a streaming speech synthesis.
pub type AudioStream = Pin<Box<dyn Stream<Item = Result<AudioChunk, GatewayError>> + Send>>;

/// Outgoing agent trigger. In manual runs the context fields stay `None`
/// and the platform records the item for review instead of executing.
#[derive(Debug, Clone, Serialize)]
pub struct TriggerRequest {
    pub raw_data: serde_json::Value,
    pub auto_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_slug: Option<String>,
    pub prompt: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TriggerReceipt {
    pub task_uuid: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<String>,
}

impl ChatRequest {
    pub fn new(messages: Vec<ChatMessage>, model: Option<&ModelKey>) -> Self {
        Self {
            messages,
            model: model.map(|k| k.model.clone()),
            provider: model.map(|k| k.provider.clone()),
            response_format: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Embedding {
    pub dimensions: usize,
    pub vectors: Vec<Vec<f32>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestRequest {
    pub texts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    pub query: String,
    pub top_k: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub score: f32,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpeakRequest {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<u32>,
}

impl SpeakRequest {
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice: None,
            speed: None,
            provider: None,
            language: None,
            quality: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ListenRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Transcript {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PingInfo {
    pub app_id: String,
    pub mode: String,
}

/// Stateless operations against the platform. Every method may fail with a
/// [`GatewayError`]; callers classify and log, they never let a failure from
/// one operation abort another.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    // Activities
    async fn list_activities(&self, limit: usize) -> GatewayResult<Vec<Activity>>;
    async fn insert_activity(&self, raw_data: serde_json::Value) -> GatewayResult<Activity>;
    async fn update_activity(&self, id: &str, patch: serde_json::Value) -> GatewayResult<()>;
    async fn delete_activity(&self, id: &str) -> GatewayResult<()>;

    // Registry
    async fn get_agents(&self) -> GatewayResult<Vec<AgentInfo>>;
    async fn get_workspaces(&self) -> GatewayResult<Vec<Workspace>>;
    async fn get_threads(&self, workspace_slug: &str) -> GatewayResult<Vec<Thread>>;

    // Trigger + tasks
    async fn trigger_agent(&self, request: TriggerRequest) -> GatewayResult<TriggerReceipt>;
    async fn get_task(&self, id: &str) -> GatewayResult<TaskSnapshot>;
    async fn start_task(&self, id: &str) -> GatewayResult<()>;
    async fn complete_task(&self, id: &str, result: serde_json::Value) -> GatewayResult<()>;
    async fn fail_task(&self, id: &str, reason: &str) -> GatewayResult<()>;

    // LLM
    async fn chat_providers(&self) -> GatewayResult<ProviderCatalog>;
    async fn embed_providers(&self) -> GatewayResult<ProviderCatalog>;
    async fn chat(&self, request: ChatRequest) -> GatewayResult<ChatReply>;
    async fn chat_stream(&self, request: ChatRequest) -> GatewayResult<TextStream>;
    async fn embed(&self, text: &str, model: Option<&ModelKey>) -> GatewayResult<Embedding>;

    // Vectors
    async fn list_vector_workspaces(&self) -> GatewayResult<Vec<String>>;
    async fn embed_and_store(&self, request: IngestRequest) -> GatewayResult<()>;
    async fn search(&self, request: SearchRequest) -> GatewayResult<Vec<SearchHit>>;
    async fn delete_vectors(&self, delete_all: bool, workspace_id: Option<&str>)
        -> GatewayResult<()>;

    // Speech
    async fn tts_providers(&self) -> GatewayResult<Vec<String>>;
    async fn speak(&self, request: SpeakRequest) -> GatewayResult<SpeechAudio>;
    async fn speak_stream(&self, request: SpeakRequest) -> GatewayResult<AudioStream>;
    async fn stt_providers(&self) -> GatewayResult<Vec<String>>;
    async fn listen(&self, request: ListenRequest) -> GatewayResult<Transcript>;

    // Diagnostics
    async fn ping(&self) -> GatewayResult<PingInfo>;
    async fn app_data_dir(&self) -> GatewayResult<String>;
}
