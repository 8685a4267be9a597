//! Trigger workflow — two-mode agent triggering correlated with a task id.
//!
//! Auto mode executes an agent immediately and requires agent + workspace
//! selections; manual mode degrades to creating a reviewable record and
//! never sends any context fields. A thread selection equal to the
//! synthetic create-new option is omitted so the platform opens a fresh
//! thread. The returned correlation id is stored; the simulated-task status
//! is untouched — only explicit start/complete/fail calls move it.

use pulse_types::log::Severity;
use pulse_types::registry::NEW_THREAD_SLUG;

use crate::error::{ClientError, ClientResult};
use crate::remote::TriggerRequest;
use crate::Orchestrator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerMode {
    /// Execute the agent immediately.
    Auto,
    /// Record the item for manual review.
    Manual,
}

impl std::fmt::Display for TriggerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

impl TriggerMode {
    fn default_prompt(&self) -> &'static str {
        match self {
            Self::Auto => "Process this item",
            Self::Manual => "Review this item",
        }
    }
}

impl Orchestrator {
    /// Trigger an agent against a JSON payload. Returns the task
    /// correlation id on success.
    pub async fn trigger(
        &self,
        mode: TriggerMode,
        payload_json: &str,
        prompt: &str,
    ) -> ClientResult<String> {
        match self.run_trigger(mode, payload_json, prompt).await {
            Ok(task_uuid) => {
                self.log.success(format!("Triggered ({mode}): task {task_uuid}"));
                self.notify(Severity::Success, "Agent triggered");
                Ok(task_uuid)
            }
            Err(err) => {
                self.report_failure("trigger", &err);
                Err(err)
            }
        }
    }

    async fn run_trigger(
        &self,
        mode: TriggerMode,
        payload_json: &str,
        prompt: &str,
    ) -> ClientResult<String> {
        let raw_data: serde_json::Value =
            serde_json::from_str(payload_json).map_err(ClientError::MalformedInput)?;

        let prompt = if prompt.trim().is_empty() {
            mode.default_prompt().to_string()
        } else {
            prompt.trim().to_string()
        };

        let request = match mode {
            TriggerMode::Auto => {
                let selection = self.state.selection();
                let agent = selection.agent.ok_or_else(|| {
                    ClientError::Validation("select an agent before triggering".to_string())
                })?;
                let workspace = selection.workspace.ok_or_else(|| {
                    ClientError::Validation("select a workspace before triggering".to_string())
                })?;
                // The create-new sentinel is not a real thread; omitting the
                // field tells the platform to open one.
                let thread = selection.thread.filter(|t| t.as_str() != NEW_THREAD_SLUG);
                TriggerRequest {
                    raw_data,
                    auto_run: true,
                    agent_name: Some(agent),
                    workspace_slug: Some(workspace),
                    thread_slug: thread,
                    prompt,
                }
            }
            TriggerMode::Manual => TriggerRequest {
                raw_data,
                auto_run: false,
                agent_name: None,
                workspace_slug: None,
                thread_slug: None,
                prompt,
            },
        };

        let receipt = self.gateway.trigger_agent(request).await?;
        self.state
            .update_task(|t| t.last_triggered = Some(receipt.task_uuid.clone()));
        Ok(receipt.task_uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockGateway;
    use pulse_types::config::PulseConfig;
    use pulse_types::task::LocalTaskStatus;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    const PAYLOAD: &str = r#"{"type": "task", "message": "hello"}"#;

    fn orchestrator() -> (Arc<MockGateway>, Orchestrator) {
        let gateway = Arc::new(MockGateway::new());
        let orchestrator = Orchestrator::with_gateway(PulseConfig::default(), gateway.clone());
        (gateway, orchestrator)
    }

    #[tokio::test]
    async fn auto_without_agent_fails_before_any_remote_call() {
        let (gateway, orchestrator) = orchestrator();
        orchestrator.select_workspace(Some("acme".into()));

        let err = orchestrator
            .trigger(TriggerMode::Auto, PAYLOAD, "")
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(gateway.trigger_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn malformed_payload_fails_before_any_remote_call() {
        let (gateway, orchestrator) = orchestrator();

        let err = orchestrator
            .trigger(TriggerMode::Auto, "{oops", "")
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::MalformedInput(_)));
        assert_eq!(gateway.trigger_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn manual_never_sends_context_fields() {
        let (gateway, orchestrator) = orchestrator();
        // locally selected context must not leak into a manual trigger
        orchestrator.select_agent(Some("triage".into()));
        orchestrator.select_workspace(Some("acme".into()));
        orchestrator.select_thread(Some("general".into()));

        orchestrator
            .trigger(TriggerMode::Manual, PAYLOAD, "")
            .await
            .unwrap();

        let request = gateway.last_trigger.lock().unwrap().clone().unwrap();
        assert!(!request.auto_run);
        assert!(request.agent_name.is_none());
        assert!(request.workspace_slug.is_none());
        assert!(request.thread_slug.is_none());
        assert_eq!(request.prompt, "Review this item");
    }

    #[tokio::test]
    async fn auto_omits_the_create_new_sentinel() {
        let (gateway, orchestrator) = orchestrator();
        orchestrator.select_agent(Some("triage".into()));
        orchestrator.select_workspace(Some("acme".into()));
        orchestrator.select_thread(Some(pulse_types::registry::NEW_THREAD_SLUG.into()));

        orchestrator
            .trigger(TriggerMode::Auto, PAYLOAD, "look into this")
            .await
            .unwrap();

        let request = gateway.last_trigger.lock().unwrap().clone().unwrap();
        assert!(request.auto_run);
        assert_eq!(request.agent_name.as_deref(), Some("triage"));
        assert_eq!(request.workspace_slug.as_deref(), Some("acme"));
        assert!(request.thread_slug.is_none());
        assert_eq!(request.prompt, "look into this");
    }

    #[tokio::test]
    async fn auto_sends_a_real_thread_selection() {
        let (gateway, orchestrator) = orchestrator();
        orchestrator.select_agent(Some("triage".into()));
        orchestrator.select_workspace(Some("acme".into()));
        orchestrator.select_thread(Some("general".into()));

        orchestrator
            .trigger(TriggerMode::Auto, PAYLOAD, "")
            .await
            .unwrap();

        let request = gateway.last_trigger.lock().unwrap().clone().unwrap();
        assert_eq!(request.thread_slug.as_deref(), Some("general"));
    }

    #[tokio::test]
    async fn success_stores_the_correlation_id_without_touching_task_status() {
        let (_gateway, orchestrator) = orchestrator();
        orchestrator.select_agent(Some("triage".into()));
        orchestrator.select_workspace(Some("acme".into()));

        let task_uuid = orchestrator
            .trigger(TriggerMode::Auto, PAYLOAD, "")
            .await
            .unwrap();

        let task = orchestrator.state().task();
        assert_eq!(task.last_triggered.as_deref(), Some(task_uuid.as_str()));
        assert_eq!(task.local_status, LocalTaskStatus::Idle);
        assert!(task.tracked.is_none());
    }
}
