use std::sync::Arc;

use tracing::warn;

use pulse_core::remote::{PingInfo, SearchHit};
use pulse_core::state::TaskState;
use pulse_core::{Orchestrator, TriggerMode};
use pulse_types::activity::Activity;
use pulse_types::chat::{ChatMessage, Role};
use pulse_types::event::SessionEvent;
use pulse_types::log::{LogEntry, Severity};
use pulse_types::registry::{AgentInfo, Thread, Workspace};
use pulse_types::task::TaskSnapshot;

/// Which top-level screen is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Activities,
    Trigger,
    Chat,
    Voice,
    Vectors,
    Logs,
}

impl Screen {
    pub const ALL: [Screen; 6] = [
        Screen::Activities,
        Screen::Trigger,
        Screen::Chat,
        Screen::Voice,
        Screen::Vectors,
        Screen::Logs,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Activities => "Activities",
            Self::Trigger => "Trigger",
            Self::Chat => "Chat",
            Self::Voice => "Voice",
            Self::Vectors => "Vectors",
            Self::Logs => "Logs",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Self::Activities => Self::Trigger,
            Self::Trigger => Self::Chat,
            Self::Chat => Self::Voice,
            Self::Voice => Self::Vectors,
            Self::Vectors => Self::Logs,
            Self::Logs => Self::Activities,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Self::Activities => Self::Logs,
            Self::Trigger => Self::Activities,
            Self::Chat => Self::Trigger,
            Self::Voice => Self::Chat,
            Self::Vectors => Self::Voice,
            Self::Logs => Self::Vectors,
        }
    }
}

/// Which text field is capturing keystrokes, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Editing {
    None,
    Payload,
    Prompt,
    TaskId,
    Speech,
    Ingest,
    Query,
}

/// Main application state. All business logic lives in the orchestrator;
/// this struct is snapshots, cursors and input buffers.
pub struct App {
    pub orchestrator: Arc<Orchestrator>,
    pub should_quit: bool,

    pub screen: Screen,
    pub show_help: bool,
    pub editing: Editing,

    // State snapshots, re-read after every action
    pub activities: Vec<Activity>,
    pub agents: Vec<AgentInfo>,
    pub workspaces: Vec<Workspace>,
    pub threads: Vec<Thread>,
    pub vector_workspaces: Vec<String>,
    pub search_hits: Vec<SearchHit>,
    pub transcript: Vec<ChatMessage>,
    pub log_entries: Vec<LogEntry>,
    pub task: TaskState,
    pub ping: Option<PingInfo>,

    // Status footer (last notice)
    pub status_line: String,
    pub status_severity: Severity,

    // Activities screen
    pub activity_cursor: usize,
    pub payload_input: String,

    // Trigger screen
    pub auto_run: bool,
    pub prompt_input: String,
    pub task_id_input: String,
    pub remote_task: Option<TaskSnapshot>,

    // Chat screen
    pub chat_input: String,
    pub streaming_text: String,
    pub is_streaming: bool,
    pub chat_scroll: usize,

    // Voice screen
    pub speech_input: String,
    pub speech_chunks: usize,
    pub speech_bytes: usize,

    // Vectors screen
    pub ingest_input: String,
    pub query_input: String,

    // Logs screen
    pub logs_scroll: usize,
}

impl App {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        let mut app = Self {
            orchestrator,
            should_quit: false,
            screen: Screen::Activities,
            show_help: false,
            editing: Editing::None,
            activities: Vec::new(),
            agents: Vec::new(),
            workspaces: Vec::new(),
            threads: Vec::new(),
            vector_workspaces: Vec::new(),
            search_hits: Vec::new(),
            transcript: Vec::new(),
            log_entries: Vec::new(),
            task: TaskState::default(),
            ping: None,
            status_line: String::new(),
            status_severity: Severity::Info,
            activity_cursor: 0,
            payload_input: r#"{"type": "task", "message": "hello"}"#.to_string(),
            auto_run: true,
            prompt_input: "Please look into this activity.".to_string(),
            task_id_input: String::new(),
            remote_task: None,
            chat_input: String::new(),
            streaming_text: String::new(),
            is_streaming: false,
            chat_scroll: 0,
            speech_input: String::new(),
            speech_chunks: 0,
            speech_bytes: 0,
            ingest_input: String::new(),
            query_input: String::new(),
            logs_scroll: 0,
        };
        app.sync_from_state();
        app
    }

    /// Re-read every snapshot the screens render from.
    pub fn sync_from_state(&mut self) {
        let state = self.orchestrator.state();
        self.activities = state.activities();
        self.agents = state.agents();
        self.workspaces = state.workspaces();
        self.threads = state.threads();
        self.vector_workspaces = state.vector_workspaces();
        self.search_hits = state.search_hits();
        self.transcript = state.chat_transcript();
        self.task = state.task();
        self.ping = state.status();
        self.log_entries = self.orchestrator.log_entries();

        if self.activity_cursor >= self.activities.len() {
            self.activity_cursor = self.activities.len().saturating_sub(1);
        }
    }

    pub fn handle_session_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::ChatDelta { content } => {
                self.is_streaming = true;
                self.streaming_text.push_str(&content);
            }
            SessionEvent::ChatDone { .. } => {
                self.is_streaming = false;
                self.streaming_text.clear();
                self.sync_from_state();
            }
            SessionEvent::SpeechChunk { chunk } => {
                self.speech_chunks += 1;
                self.speech_bytes += chunk.data.len();
            }
            SessionEvent::SpeechDone { bytes, .. } => {
                self.speech_bytes = bytes;
                self.sync_from_state();
            }
            SessionEvent::Notice { severity, message } => {
                if severity == Severity::Error {
                    self.is_streaming = false;
                }
                self.status_severity = severity;
                self.status_line = message;
                self.sync_from_state();
            }
            SessionEvent::StateChanged => self.sync_from_state(),
        }
    }

    pub fn selected_activity(&self) -> Option<&Activity> {
        self.activities.get(self.activity_cursor)
    }

    fn flash(&mut self, severity: Severity, message: impl Into<String>) {
        self.status_severity = severity;
        self.status_line = message.into();
    }

    // ─── Selection cycling ────────────────────────────────────────────────────

    pub fn cycle_agent(&mut self) {
        if self.agents.is_empty() {
            self.flash(Severity::Error, "No agents loaded — press R to refresh");
            return;
        }
        let current = self.orchestrator.state().selection().agent;
        let next = next_index(current.as_deref(), self.agents.iter().map(|a| a.slug.as_str()));
        self.orchestrator
            .select_agent(Some(self.agents[next].slug.clone()));
    }

    pub async fn cycle_workspace(&mut self) {
        if self.workspaces.is_empty() {
            self.flash(Severity::Error, "No workspaces loaded — press R to refresh");
            return;
        }
        let current = self.orchestrator.state().selection().workspace;
        let next = next_index(
            current.as_deref(),
            self.workspaces.iter().map(|w| w.slug.as_str()),
        );
        let slug = self.workspaces[next].slug.clone();
        self.orchestrator.select_workspace(Some(slug.clone()));
        self.orchestrator.refresh_threads(&slug).await;
        self.sync_from_state();
    }

    pub fn cycle_thread(&mut self) {
        if self.threads.is_empty() {
            return;
        }
        let current = self.orchestrator.state().selection().thread;
        let next = next_index(current.as_deref(), self.threads.iter().map(|t| t.slug.as_str()));
        self.orchestrator
            .select_thread(Some(self.threads[next].slug.clone()));
    }

    pub fn cycle_chat_model(&mut self) {
        let keys = self.orchestrator.state().chat_catalog().model_keys();
        if keys.is_empty() {
            self.flash(Severity::Error, "No chat models loaded — press R to refresh");
            return;
        }
        let current = self
            .orchestrator
            .state()
            .selection()
            .chat_model
            .map(|k| k.to_string());
        let next = next_index(current.as_deref(), keys.iter().map(String::as_str));
        if self.orchestrator.select_chat_model(&keys[next]).is_ok() {
            self.flash(Severity::Info, format!("Chat model: {}", keys[next]));
        }
    }

    pub fn cycle_embed_model(&mut self) {
        let keys = self.orchestrator.state().embed_catalog().model_keys();
        if keys.is_empty() {
            self.flash(Severity::Error, "No embedding models loaded — press R to refresh");
            return;
        }
        let current = self
            .orchestrator
            .state()
            .selection()
            .embed_model
            .map(|k| k.to_string());
        let next = next_index(current.as_deref(), keys.iter().map(String::as_str));
        if self.orchestrator.select_embed_model(&keys[next]).is_ok() {
            self.flash(Severity::Info, format!("Embedding model: {}", keys[next]));
        }
    }

    pub fn cycle_tts_provider(&mut self) {
        let providers = self.orchestrator.state().tts_providers();
        if providers.is_empty() {
            return;
        }
        let current = self.orchestrator.state().selection().tts_provider;
        let next = next_index(current.as_deref(), providers.iter().map(String::as_str));
        self.orchestrator
            .select_tts_provider(Some(providers[next].clone()));
    }

    pub fn cycle_stt_provider(&mut self) {
        let providers = self.orchestrator.state().stt_providers();
        if providers.is_empty() {
            return;
        }
        let current = self.orchestrator.state().selection().stt_provider;
        let next = next_index(current.as_deref(), providers.iter().map(String::as_str));
        self.orchestrator
            .select_stt_provider(Some(providers[next].clone()));
    }

    // ─── Actions ──────────────────────────────────────────────────────────────

    pub async fn refresh_everything(&mut self) {
        self.orchestrator.initial_load().await;
        self.orchestrator.refresh_providers().await;
        self.sync_from_state();
    }

    pub async fn refresh_activities(&mut self) {
        self.orchestrator.refresh_activities().await;
        self.sync_from_state();
    }

    pub async fn insert_activity(&mut self) {
        let _ = self.orchestrator.insert_activity(&self.payload_input).await;
        self.sync_from_state();
    }

    pub async fn mark_selected_completed(&mut self) {
        let Some(id) = self.selected_activity().map(|a| a.id.clone()) else {
            return;
        };
        let _ = self
            .orchestrator
            .update_activity_status(&id, "completed")
            .await;
        self.sync_from_state();
    }

    pub async fn delete_selected(&mut self) {
        let Some(id) = self.selected_activity().map(|a| a.id.clone()) else {
            return;
        };
        let _ = self.orchestrator.delete_activity(&id).await;
        self.sync_from_state();
    }

    /// Trigger the configured agent against the selected activity's payload.
    pub async fn trigger_selected(&mut self) {
        let Some(activity) = self.selected_activity() else {
            self.flash(Severity::Error, "Select an activity on the Activities tab first");
            return;
        };
        let payload = activity.raw_data.to_string();
        let mode = if self.auto_run {
            TriggerMode::Auto
        } else {
            TriggerMode::Manual
        };
        let prompt = self.prompt_input.clone();
        if let Err(e) = self.orchestrator.trigger(mode, &payload, &prompt).await {
            warn!("trigger failed: {e}");
        }
        self.sync_from_state();
    }

    // ─── Simulated task lifecycle ─────────────────────────────────────────────

    fn effective_task_id(&self) -> String {
        if !self.task_id_input.trim().is_empty() {
            return self.task_id_input.trim().to_string();
        }
        self.task
            .tracked
            .clone()
            .or_else(|| self.task.last_triggered.clone())
            .unwrap_or_default()
    }

    pub async fn start_sim_task(&mut self) {
        let id = self.effective_task_id();
        let _ = self.orchestrator.start_task(&id).await;
        self.sync_from_state();
    }

    pub async fn complete_sim_task(&mut self) {
        let _ = self.orchestrator.complete_task().await;
        self.sync_from_state();
    }

    pub async fn fail_sim_task(&mut self) {
        let _ = self.orchestrator.fail_task("aborted by operator").await;
        self.sync_from_state();
    }

    pub async fn query_sim_task(&mut self) {
        let id = self.effective_task_id();
        if id.is_empty() {
            self.flash(Severity::Error, "No task id to query");
            return;
        }
        self.remote_task = self.orchestrator.query_task(&id).await.ok();
        self.sync_from_state();
    }

    // ─── Chat ─────────────────────────────────────────────────────────────────

    /// Kick off a streaming chat turn in the background; deltas arrive as
    /// events and the transcript is re-read when the stream finishes.
    pub fn send_chat(&mut self) {
        let text = self.chat_input.trim().to_string();
        if text.is_empty() {
            return;
        }
        self.chat_input.clear();
        self.transcript.push(ChatMessage::user(text.clone()));
        self.is_streaming = true;
        self.streaming_text.clear();
        self.chat_scroll = 0;

        let orchestrator = Arc::clone(&self.orchestrator);
        tokio::spawn(async move {
            let _ = orchestrator.chat_stream(&text).await;
        });
    }

    pub fn clear_chat(&mut self) {
        self.orchestrator.clear_chat();
        self.streaming_text.clear();
        self.is_streaming = false;
        self.sync_from_state();
    }

    pub fn last_assistant_reply(&self) -> Option<&str> {
        self.transcript
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
            .map(|m| m.content.as_str())
    }

    // ─── Voice ────────────────────────────────────────────────────────────────

    pub fn speak_streaming(&mut self) {
        let text = self.speech_input.trim().to_string();
        if text.is_empty() {
            self.flash(Severity::Error, "Type some text to synthesize first");
            return;
        }
        self.speech_chunks = 0;
        self.speech_bytes = 0;

        let orchestrator = Arc::clone(&self.orchestrator);
        tokio::spawn(async move {
            let _ = orchestrator.speak_stream(&text).await;
        });
    }

    pub async fn speak_once(&mut self) {
        let text = self.speech_input.clone();
        if let Ok(audio) = self.orchestrator.speak(&text).await {
            self.speech_chunks = 1;
            self.speech_bytes = audio.data.len();
            self.flash(
                Severity::Success,
                format!("Synthesized {} bytes ({})", audio.data.len(), audio.mime_type),
            );
        }
        self.sync_from_state();
    }

    /// Pull the latest assistant reply into the speech input.
    pub fn use_last_reply_for_speech(&mut self) {
        match self.last_assistant_reply().map(String::from) {
            Some(reply) => self.speech_input = reply,
            None => self.flash(Severity::Error, "No assistant reply to speak yet"),
        }
    }

    /// Listen on the microphone; a successful transcript lands in the chat
    /// input draft.
    pub async fn listen_mic(&mut self) {
        if let Ok(text) = self.orchestrator.listen().await {
            if !self.chat_input.is_empty() {
                self.chat_input.push(' ');
            }
            self.chat_input.push_str(&text);
        }
        self.sync_from_state();
    }

    // ─── Vectors ──────────────────────────────────────────────────────────────

    pub async fn ingest_now(&mut self) {
        let block = self.ingest_input.clone();
        if self.orchestrator.ingest_texts(&block, None).await.is_ok() {
            self.ingest_input.clear();
        }
        self.sync_from_state();
    }

    pub async fn search_now(&mut self) {
        let query = self.query_input.clone();
        let _ = self.orchestrator.search(&query, None).await;
        self.sync_from_state();
    }

    /// Embed the query text without storing it, to inspect the vector shape.
    pub async fn embed_query(&mut self) {
        let text = self.query_input.clone();
        if let Ok(embedding) = self.orchestrator.embed(&text).await {
            self.flash(
                Severity::Success,
                format!(
                    "Embedded: {} vector(s), {} dimensions",
                    embedding.vectors.len(),
                    embedding.dimensions
                ),
            );
        }
        self.sync_from_state();
    }

    pub async fn clear_vectors_now(&mut self) {
        let _ = self.orchestrator.clear_vectors(None).await;
        self.sync_from_state();
    }
}

/// Position of the entry after `current` in `slugs`, wrapping; 0 when
/// nothing is selected yet.
fn next_index<'a>(current: Option<&str>, slugs: impl Iterator<Item = &'a str>) -> usize {
    let slugs: Vec<&str> = slugs.collect();
    match current.and_then(|c| slugs.iter().position(|s| *s == c)) {
        Some(i) => (i + 1) % slugs.len(),
        None => 0,
    }
}
