//! Refresh coordinator — best-effort fetches against the platform, merged
//! into the session state as whole-collection replaces.
//!
//! Each refresh is independent: on failure the error is classified and
//! logged and the store keeps its previous value (stale but consistent,
//! never partially overwritten). The initial-load set runs concurrently and
//! one member failing does not block or roll back the others.

use pulse_types::activity::Activity;
use pulse_types::event::SessionEvent;
use pulse_types::registry::Thread;

use crate::Orchestrator;

impl Orchestrator {
    pub async fn refresh_activities(&self) {
        let limit = self.config.client.activity_limit;
        match self.gateway.list_activities(limit).await {
            Ok(list) => {
                let activities: Vec<Activity> =
                    list.into_iter().map(Activity::with_display_fields).collect();
                let count = activities.len();
                self.state.set_activities(activities);
                self.events.send(SessionEvent::StateChanged);
                self.log.info(format!("Activities refreshed ({count})"));
            }
            Err(e) => self.log_gateway_failure("refresh activities", &e),
        }
    }

    pub async fn refresh_agents(&self) {
        match self.gateway.get_agents().await {
            Ok(agents) => {
                self.log.info(format!("Fetched {} agents", agents.len()));
                self.state.set_agents(agents);
                self.events.send(SessionEvent::StateChanged);
            }
            Err(e) => self.log_gateway_failure("refresh agents", &e),
        }
    }

    pub async fn refresh_workspaces(&self) {
        match self.gateway.get_workspaces().await {
            Ok(workspaces) => {
                self.log
                    .info(format!("Fetched {} workspaces", workspaces.len()));
                self.state.set_workspaces(workspaces);
                self.events.send(SessionEvent::StateChanged);
            }
            Err(e) => self.log_gateway_failure("refresh workspaces", &e),
        }
    }

    /// Replace the thread list for one workspace. The synthetic "create new
    /// thread" option always sits at the head, ahead of any real thread.
    pub async fn refresh_threads(&self, workspace_slug: &str) {
        if workspace_slug.is_empty() {
            self.state.set_threads(vec![Thread::new_thread_option()]);
            self.events.send(SessionEvent::StateChanged);
            return;
        }

        match self.gateway.get_threads(workspace_slug).await {
            Ok(list) => {
                let mut threads = vec![Thread::new_thread_option()];
                let count = list.len();
                threads.extend(list);
                self.state.set_threads(threads);
                self.events.send(SessionEvent::StateChanged);
                self.log
                    .info(format!("Fetched {count} threads for {workspace_slug}"));
            }
            Err(e) => self.log_gateway_failure("refresh threads", &e),
        }
    }

    pub async fn refresh_vector_workspaces(&self) {
        match self.gateway.list_vector_workspaces().await {
            Ok(workspaces) => {
                self.state.set_vector_workspaces(workspaces);
                self.events.send(SessionEvent::StateChanged);
            }
            Err(e) => self.log_gateway_failure("refresh vector workspaces", &e),
        }
    }

    /// Refresh every provider catalog (chat, embedding, TTS, STT)
    /// concurrently, each isolated from the others.
    pub async fn refresh_providers(&self) {
        tokio::join!(
            async {
                match self.gateway.chat_providers().await {
                    Ok(catalog) => self.state.set_chat_catalog(catalog),
                    Err(e) => self.log_gateway_failure("refresh chat providers", &e),
                }
            },
            async {
                match self.gateway.embed_providers().await {
                    Ok(catalog) => self.state.set_embed_catalog(catalog),
                    Err(e) => self.log_gateway_failure("refresh embed providers", &e),
                }
            },
            async {
                match self.gateway.tts_providers().await {
                    Ok(providers) => self.state.set_tts_providers(providers),
                    Err(e) => self.log_gateway_failure("refresh tts providers", &e),
                }
            },
            async {
                match self.gateway.stt_providers().await {
                    Ok(providers) => self.state.set_stt_providers(providers),
                    Err(e) => self.log_gateway_failure("refresh stt providers", &e),
                }
            },
        );
        self.events.send(SessionEvent::StateChanged);
    }

    pub async fn refresh_status(&self) {
        match self.gateway.ping().await {
            Ok(info) => {
                self.log
                    .info(format!("Connected to {} ({})", info.app_id, info.mode));
                self.state.set_status(Some(info));
                self.events.send(SessionEvent::StateChanged);
            }
            Err(e) => self.log_gateway_failure("refresh status", &e),
        }
    }

    /// The startup set, issued concurrently. Each member applies its own
    /// result; a failing member leaves only its own collection stale.
    pub async fn initial_load(&self) {
        tokio::join!(
            self.refresh_activities(),
            self.refresh_agents(),
            self.refresh_workspaces(),
            self.refresh_vector_workspaces(),
            self.refresh_status(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockGateway;
    use crate::Orchestrator;
    use pulse_types::config::PulseConfig;
    use pulse_types::log::Severity;
    use pulse_types::registry::{AgentInfo, NEW_THREAD_SLUG};
    use std::sync::Arc;

    fn orchestrator() -> (Arc<MockGateway>, Orchestrator) {
        let gateway = Arc::new(MockGateway::new());
        let orchestrator = Orchestrator::with_gateway(PulseConfig::default(), gateway.clone());
        (gateway, orchestrator)
    }

    fn activity(id: &str) -> pulse_types::activity::Activity {
        pulse_types::activity::Activity {
            id: id.to_string(),
            status: "pending".to_string(),
            raw_data: serde_json::json!({"type": "task"}),
            created_at: "2026-08-06T09:00:00.000Z".to_string(),
            display_type: String::new(),
            display_time: String::new(),
        }
    }

    #[tokio::test]
    async fn failing_fetch_keeps_previous_collection() {
        let (gateway, orchestrator) = orchestrator();
        gateway.activities.lock().unwrap().push(activity("a1"));
        orchestrator.refresh_activities().await;
        assert_eq!(orchestrator.state().activities().len(), 1);

        // remote grows, but the fetch now fails — snapshot must not change
        gateway.activities.lock().unwrap().push(activity("a2"));
        gateway.fail_op("list_activities");
        orchestrator.refresh_activities().await;

        let activities = orchestrator.state().activities();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].id, "a1");
        assert_eq!(orchestrator.log_entries()[0].severity, Severity::Error);
    }

    #[tokio::test]
    async fn thread_refresh_injects_create_new_head() {
        let (gateway, orchestrator) = orchestrator();
        gateway.threads.lock().unwrap().push(pulse_types::registry::Thread {
            slug: "general".to_string(),
            name: "General".to_string(),
        });

        orchestrator.refresh_threads("acme").await;

        let threads = orchestrator.state().threads();
        assert_eq!(threads.len(), 2);
        assert_eq!(threads[0].slug, NEW_THREAD_SLUG);
        assert_eq!(threads[1].slug, "general");
    }

    #[tokio::test]
    async fn empty_workspace_resets_to_synthetic_option_only() {
        let (_gateway, orchestrator) = orchestrator();
        orchestrator.refresh_threads("").await;
        let threads = orchestrator.state().threads();
        assert_eq!(threads.len(), 1);
        assert!(threads[0].is_new_thread_option());
    }

    #[tokio::test]
    async fn initial_load_isolates_failures() {
        let (gateway, orchestrator) = orchestrator();
        gateway.activities.lock().unwrap().push(activity("a1"));
        gateway.agents.lock().unwrap().push(AgentInfo {
            slug: "triage".to_string(),
            name: "Triage".to_string(),
        });
        gateway.fail_op("get_agents");

        orchestrator.initial_load().await;

        // agents failed; everything else landed
        assert!(orchestrator.state().agents().is_empty());
        assert_eq!(orchestrator.state().activities().len(), 1);
        assert_eq!(
            orchestrator.state().vector_workspaces(),
            vec!["default".to_string()]
        );
        assert!(orchestrator.state().status().is_some());
    }
}
