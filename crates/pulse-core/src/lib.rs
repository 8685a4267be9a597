pub mod activities;
pub mod config;
pub mod error;
pub mod events;
pub mod http;
pub mod llm;
pub mod log;
pub mod refresh;
pub mod remote;
pub mod state;
pub mod stream;
pub mod task;
pub mod trigger;
pub mod voice;

#[cfg(test)]
pub(crate) mod testing;

pub use events::EventBus;
pub use trigger::TriggerMode;

use std::sync::Arc;

use tokio::sync::broadcast;

use pulse_types::config::PulseConfig;
use pulse_types::event::SessionEvent;
use pulse_types::log::{LogEntry, Severity};
use pulse_types::provider::ModelKey;
use pulse_types::task::TaskSnapshot;

use error::{classify, ClientError, ClientResult, GatewayError};
use http::HttpGateway;
use log::ActivityLog;
use remote::RemoteGateway;
use state::SessionState;
use task::TaskTracker;

/// The session orchestrator — owns the client's view of the platform and
/// the full action surface the presentation layer calls into.
///
/// Constructed once at startup; the TUI holds an `Arc<Orchestrator>`, reads
/// state snapshots each frame, and receives stream deltas and notices over
/// the event bus. No failure raised by any action terminates the process;
/// everything is classified, logged, and recoverable.
pub struct Orchestrator {
    gateway: Arc<dyn RemoteGateway>,
    state: Arc<SessionState>,
    log: Arc<ActivityLog>,
    events: EventBus,
    tracker: TaskTracker,
    config: PulseConfig,
}

impl Orchestrator {
    /// Build against the HTTP gateway described by the config.
    pub fn new(config: PulseConfig) -> Self {
        let gateway = Arc::new(HttpGateway::new(&config.platform));
        Self::with_gateway(config, gateway)
    }

    /// Build against any gateway implementation.
    pub fn with_gateway(config: PulseConfig, gateway: Arc<dyn RemoteGateway>) -> Self {
        let state = Arc::new(SessionState::new());
        let log = Arc::new(ActivityLog::new(config.client.log_capacity));
        let tracker = TaskTracker::new(Arc::clone(&gateway), Arc::clone(&state), Arc::clone(&log));
        Self {
            gateway,
            state,
            log,
            events: EventBus::new(),
            tracker,
            config,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn config(&self) -> &PulseConfig {
        &self.config
    }

    /// Activity log snapshot, most recent entry first.
    pub fn log_entries(&self) -> Vec<LogEntry> {
        self.log.entries()
    }

    /// Subscribe to stream deltas, audio chunks and notices.
    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    // ─── Selections ───────────────────────────────────────────────────────────

    pub fn select_agent(&self, slug: Option<String>) {
        self.state.update_selection(|s| s.agent = slug);
    }

    /// Changing workspace invalidates the thread selection; callers refresh
    /// the thread list afterwards.
    pub fn select_workspace(&self, slug: Option<String>) {
        self.state.update_selection(|s| {
            s.workspace = slug;
            s.thread = None;
        });
    }

    pub fn select_thread(&self, slug: Option<String>) {
        self.state.update_selection(|s| s.thread = slug);
    }

    pub fn select_chat_model(&self, key: &str) -> ClientResult<()> {
        let parsed: ModelKey = key
            .parse()
            .map_err(|e: anyhow::Error| ClientError::Validation(e.to_string()))?;
        self.state.update_selection(|s| s.chat_model = Some(parsed));
        Ok(())
    }

    pub fn select_embed_model(&self, key: &str) -> ClientResult<()> {
        let parsed: ModelKey = key
            .parse()
            .map_err(|e: anyhow::Error| ClientError::Validation(e.to_string()))?;
        self.state.update_selection(|s| s.embed_model = Some(parsed));
        Ok(())
    }

    pub fn select_tts_provider(&self, name: Option<String>) {
        self.state.update_selection(|s| s.tts_provider = name);
    }

    pub fn select_stt_provider(&self, name: Option<String>) {
        self.state.update_selection(|s| s.stt_provider = name);
    }

    // ─── Task lifecycle ───────────────────────────────────────────────────────

    pub async fn start_task(&self, task_id: &str) -> ClientResult<()> {
        self.tracker.start(task_id).await
    }

    pub async fn complete_task(&self) -> ClientResult<()> {
        self.tracker.complete().await
    }

    pub async fn fail_task(&self, reason: &str) -> ClientResult<()> {
        self.tracker.fail(reason).await
    }

    pub async fn query_task(&self, task_id: &str) -> ClientResult<TaskSnapshot> {
        self.tracker.query(task_id).await
    }

    // ─── Diagnostics ──────────────────────────────────────────────────────────

    /// One-shot ping; unlike [`refresh_status`](Self::refresh_status) the
    /// result is returned instead of stored.
    pub async fn query_ping(&self) -> ClientResult<remote::PingInfo> {
        match self.gateway.ping().await {
            Ok(info) => Ok(info),
            Err(e) => {
                self.log_gateway_failure("ping", &e);
                Err(e.into())
            }
        }
    }

    pub async fn app_data_dir(&self) -> ClientResult<String> {
        match self.gateway.app_data_dir().await {
            Ok(path) => Ok(path),
            Err(e) => {
                self.log_gateway_failure("app data dir", &e);
                Err(e.into())
            }
        }
    }

    // ─── Shared failure plumbing ──────────────────────────────────────────────

    pub(crate) fn notify(&self, severity: Severity, message: impl Into<String>) {
        self.events.send(SessionEvent::Notice {
            severity,
            message: message.into(),
        });
    }

    /// Exactly one log entry per failure, plus the direct notification the
    /// interactively-invoked operations carry.
    pub(crate) fn report_failure(&self, op: &str, err: &ClientError) {
        let line = match err {
            ClientError::Gateway(e) => classify(e).log_line(op),
            other => format!("{op} failed: {other}"),
        };
        self.log.error(line.clone());
        self.notify(Severity::Error, line);
    }

    /// Log-only variant for background refreshes.
    pub(crate) fn log_gateway_failure(&self, op: &str, err: &GatewayError) {
        self.log.error(classify(err).log_line(op));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockGateway;

    fn orchestrator() -> (Arc<MockGateway>, Orchestrator) {
        let gateway = Arc::new(MockGateway::new());
        let orchestrator = Orchestrator::with_gateway(PulseConfig::default(), gateway.clone());
        (gateway, orchestrator)
    }

    #[tokio::test]
    async fn insert_then_refresh_shows_display_type() {
        let (_gateway, orchestrator) = orchestrator();

        orchestrator
            .insert_activity(r#"{"type": "task", "message": "hello"}"#)
            .await
            .unwrap();

        // insert re-lists, so the new activity is already in the snapshot
        let activities = orchestrator.state().activities();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].display_type, "task");
        assert_eq!(activities[0].display_time, "2026-08-06 12:00:00");
    }

    #[tokio::test]
    async fn model_key_selection_rejects_wrong_arity() {
        let (_gateway, orchestrator) = orchestrator();

        assert!(orchestrator.select_chat_model("openai/gpt-4o").is_ok());
        let err = orchestrator.select_chat_model("gpt-4o").unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        // the earlier selection survives the failed parse
        let selection = orchestrator.state().selection();
        assert_eq!(selection.chat_model.unwrap().to_string(), "openai/gpt-4o");
    }

    #[tokio::test]
    async fn failures_never_escape_the_log_and_notice_contract() {
        let (gateway, orchestrator) = orchestrator();
        gateway.fail_op("insert_activity");

        let before = orchestrator.log_entries().len();
        assert!(orchestrator.insert_activity("{}").await.is_err());
        let entries = orchestrator.log_entries();
        assert_eq!(entries.len(), before + 1);
        assert_eq!(entries[0].severity, Severity::Error);
    }
}
