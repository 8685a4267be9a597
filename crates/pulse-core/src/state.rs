//! Session state store — the client's current view of remote entities plus
//! in-progress workflow scalars.
//!
//! Every collection write replaces the whole collection (refresh = full
//! re-list; the remote list is the source of truth). Each entity kind sits
//! behind its own lock, so concurrent refreshes of different kinds never
//! contend; two refreshes of the same kind resolve last-write-wins.

use std::sync::RwLock;

use pulse_types::activity::Activity;
use pulse_types::chat::ChatMessage;
use pulse_types::provider::{ModelKey, ProviderCatalog};
use pulse_types::registry::{AgentInfo, Thread, Workspace};
use pulse_types::task::LocalTaskStatus;

use crate::remote::{PingInfo, SearchHit};

/// Current selections made in the UI. `thread` may hold the synthetic
/// create-new sentinel; the trigger workflow strips it before calling out.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub agent: Option<String>,
    pub workspace: Option<String>,
    pub thread: Option<String>,
    pub chat_model: Option<ModelKey>,
    pub embed_model: Option<ModelKey>,
    pub tts_provider: Option<String>,
    pub stt_provider: Option<String>,
}

/// Task correlation scalars. `local_status` is mutated only by the task
/// lifecycle tracker and only after the matching remote call succeeded.
#[derive(Debug, Clone)]
pub struct TaskState {
    /// Correlation id returned by the most recent trigger.
    pub last_triggered: Option<String>,
    /// Task currently adopted by the lifecycle tracker.
    pub tracked: Option<String>,
    pub local_status: LocalTaskStatus,
}

impl Default for TaskState {
    fn default() -> Self {
        Self {
            last_triggered: None,
            tracked: None,
            local_status: LocalTaskStatus::Idle,
        }
    }
}

#[derive(Default)]
pub struct SessionState {
    activities: RwLock<Vec<Activity>>,
    agents: RwLock<Vec<AgentInfo>>,
    workspaces: RwLock<Vec<Workspace>>,
    threads: RwLock<Vec<Thread>>,
    vector_workspaces: RwLock<Vec<String>>,
    chat_catalog: RwLock<ProviderCatalog>,
    embed_catalog: RwLock<ProviderCatalog>,
    tts_providers: RwLock<Vec<String>>,
    stt_providers: RwLock<Vec<String>>,
    search_hits: RwLock<Vec<SearchHit>>,
    chat_transcript: RwLock<Vec<ChatMessage>>,
    selection: RwLock<Selection>,
    task: RwLock<TaskState>,
    status: RwLock<Option<PingInfo>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activities(&self) -> Vec<Activity> {
        self.activities.read().unwrap().clone()
    }

    pub fn set_activities(&self, value: Vec<Activity>) {
        *self.activities.write().unwrap() = value;
    }

    pub fn agents(&self) -> Vec<AgentInfo> {
        self.agents.read().unwrap().clone()
    }

    pub fn set_agents(&self, value: Vec<AgentInfo>) {
        *self.agents.write().unwrap() = value;
    }

    pub fn workspaces(&self) -> Vec<Workspace> {
        self.workspaces.read().unwrap().clone()
    }

    pub fn set_workspaces(&self, value: Vec<Workspace>) {
        *self.workspaces.write().unwrap() = value;
    }

    pub fn threads(&self) -> Vec<Thread> {
        self.threads.read().unwrap().clone()
    }

    pub fn set_threads(&self, value: Vec<Thread>) {
        *self.threads.write().unwrap() = value;
    }

    pub fn vector_workspaces(&self) -> Vec<String> {
        self.vector_workspaces.read().unwrap().clone()
    }

    pub fn set_vector_workspaces(&self, value: Vec<String>) {
        *self.vector_workspaces.write().unwrap() = value;
    }

    pub fn chat_catalog(&self) -> ProviderCatalog {
        self.chat_catalog.read().unwrap().clone()
    }

    pub fn set_chat_catalog(&self, value: ProviderCatalog) {
        *self.chat_catalog.write().unwrap() = value;
    }

    pub fn embed_catalog(&self) -> ProviderCatalog {
        self.embed_catalog.read().unwrap().clone()
    }

    pub fn set_embed_catalog(&self, value: ProviderCatalog) {
        *self.embed_catalog.write().unwrap() = value;
    }

    pub fn tts_providers(&self) -> Vec<String> {
        self.tts_providers.read().unwrap().clone()
    }

    pub fn set_tts_providers(&self, value: Vec<String>) {
        *self.tts_providers.write().unwrap() = value;
    }

    pub fn stt_providers(&self) -> Vec<String> {
        self.stt_providers.read().unwrap().clone()
    }

    pub fn set_stt_providers(&self, value: Vec<String>) {
        *self.stt_providers.write().unwrap() = value;
    }

    pub fn search_hits(&self) -> Vec<SearchHit> {
        self.search_hits.read().unwrap().clone()
    }

    pub fn set_search_hits(&self, value: Vec<SearchHit>) {
        *self.search_hits.write().unwrap() = value;
    }

    pub fn chat_transcript(&self) -> Vec<ChatMessage> {
        self.chat_transcript.read().unwrap().clone()
    }

    pub fn push_chat(&self, message: ChatMessage) {
        self.chat_transcript.write().unwrap().push(message);
    }

    pub fn clear_chat(&self) {
        self.chat_transcript.write().unwrap().clear();
    }

    pub fn selection(&self) -> Selection {
        self.selection.read().unwrap().clone()
    }

    pub fn update_selection(&self, f: impl FnOnce(&mut Selection)) {
        f(&mut self.selection.write().unwrap());
    }

    pub fn task(&self) -> TaskState {
        self.task.read().unwrap().clone()
    }

    pub fn update_task(&self, f: impl FnOnce(&mut TaskState)) {
        f(&mut self.task.write().unwrap());
    }

    pub fn status(&self) -> Option<PingInfo> {
        self.status.read().unwrap().clone()
    }

    pub fn set_status(&self, status: Option<PingInfo>) {
        *self.status.write().unwrap() = status;
    }
}
