//! Activity CRUD — every mutation re-lists afterwards; the remote list is
//! the source of truth, there is no local patching.

use pulse_types::log::Severity;

use crate::error::{ClientError, ClientResult};
use crate::Orchestrator;

impl Orchestrator {
    /// Parse a user-typed JSON payload and insert it as a new activity.
    /// Bad JSON never reaches the gateway.
    pub async fn insert_activity(&self, payload_json: &str) -> ClientResult<()> {
        match self.run_insert_activity(payload_json).await {
            Ok(id) => {
                self.notify(Severity::Success, format!("Activity {id} created"));
                Ok(())
            }
            Err(err) => {
                self.report_failure("insert activity", &err);
                Err(err)
            }
        }
    }

    async fn run_insert_activity(&self, payload_json: &str) -> ClientResult<String> {
        let raw_data: serde_json::Value =
            serde_json::from_str(payload_json).map_err(ClientError::MalformedInput)?;
        let activity = self.gateway.insert_activity(raw_data).await?;
        self.log.success(format!("Created activity: {}", activity.id));
        self.refresh_activities().await;
        Ok(activity.id)
    }

    /// Update one activity's status (e.g. mark it completed), then re-list.
    pub async fn update_activity_status(&self, id: &str, status: &str) -> ClientResult<()> {
        let patch = serde_json::json!({ "status": status });
        match self.gateway.update_activity(id, patch).await {
            Ok(()) => {
                self.log.success(format!("Updated status to {status} for {id}"));
                self.notify(Severity::Success, format!("Activity marked {status}"));
                self.refresh_activities().await;
                Ok(())
            }
            Err(e) => {
                let err = ClientError::from(e);
                self.report_failure("update activity", &err);
                Err(err)
            }
        }
    }

    pub async fn delete_activity(&self, id: &str) -> ClientResult<()> {
        match self.gateway.delete_activity(id).await {
            Ok(()) => {
                self.log.success(format!("Deleted activity {id}"));
                self.notify(Severity::Success, "Activity deleted");
                self.refresh_activities().await;
                Ok(())
            }
            Err(e) => {
                let err = ClientError::from(e);
                self.report_failure("delete activity", &err);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockGateway;
    use pulse_types::config::PulseConfig;
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    fn orchestrator() -> (Arc<MockGateway>, Orchestrator) {
        let gateway = Arc::new(MockGateway::new());
        let orchestrator = Orchestrator::with_gateway(PulseConfig::default(), gateway.clone());
        (gateway, orchestrator)
    }

    #[tokio::test]
    async fn malformed_payload_never_reaches_the_gateway() {
        let (gateway, orchestrator) = orchestrator();

        let err = orchestrator.insert_activity("{not json").await.unwrap_err();
        assert!(matches!(err, ClientError::MalformedInput(_)));
        assert!(gateway.activities.lock().unwrap().is_empty());
        assert_eq!(gateway.list_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn status_update_re_lists() {
        let (gateway, orchestrator) = orchestrator();
        orchestrator
            .insert_activity(r#"{"type": "task"}"#)
            .await
            .unwrap();
        let id = orchestrator.state().activities()[0].id.clone();

        orchestrator
            .update_activity_status(&id, "completed")
            .await
            .unwrap();

        assert_eq!(orchestrator.state().activities()[0].status, "completed");
        // one list per mutation
        assert_eq!(gateway.list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn delete_removes_from_snapshot() {
        let (_gateway, orchestrator) = orchestrator();
        orchestrator
            .insert_activity(r#"{"type": "task"}"#)
            .await
            .unwrap();
        let id = orchestrator.state().activities()[0].id.clone();

        orchestrator.delete_activity(&id).await.unwrap();
        assert!(orchestrator.state().activities().is_empty());
    }
}
