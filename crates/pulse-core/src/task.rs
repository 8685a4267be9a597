//! Task lifecycle tracker — the client's own report of task progress.
//!
//! The local state machine reflects client-reported intent (what this
//! session has told the platform via start/complete/fail). The platform's
//! own view is reachable through `query` and is allowed to diverge; the two
//! are never reconciled. A transition happens only after the matching
//! remote call succeeded.

use std::sync::Arc;

use tracing::info;

use pulse_types::task::{LocalTaskStatus, TaskSnapshot};

use crate::error::{classify, ClientError, ClientResult};
use crate::log::ActivityLog;
use crate::remote::RemoteGateway;
use crate::state::SessionState;

pub struct TaskTracker {
    gateway: Arc<dyn RemoteGateway>,
    state: Arc<SessionState>,
    log: Arc<ActivityLog>,
}

impl TaskTracker {
    pub fn new(
        gateway: Arc<dyn RemoteGateway>,
        state: Arc<SessionState>,
        log: Arc<ActivityLog>,
    ) -> Self {
        Self {
            gateway,
            state,
            log,
        }
    }

    /// idle → processing. Adopts `task_id` as the tracked task once the
    /// remote start call succeeds.
    pub async fn start(&self, task_id: &str) -> ClientResult<()> {
        let task_id = task_id.trim();
        if task_id.is_empty() {
            return Err(ClientError::Validation("task id is required".to_string()));
        }

        match self.gateway.start_task(task_id).await {
            Ok(()) => {
                self.state.update_task(|t| {
                    t.tracked = Some(task_id.to_string());
                    t.local_status = LocalTaskStatus::Processing;
                });
                self.log.success(format!("Task {task_id} started"));
                Ok(())
            }
            Err(e) => {
                self.log.error(classify(&e).log_line("start task"));
                Err(e.into())
            }
        }
    }

    /// processing → completed, reported with a fixed success payload.
    /// A no-op when no task is tracked: no remote call, no state change.
    pub async fn complete(&self) -> ClientResult<()> {
        let Some(task_id) = self.state.task().tracked else {
            self.log.info("Complete ignored: no task tracked");
            return Ok(());
        };

        let result = serde_json::json!({ "success": true });
        match self.gateway.complete_task(&task_id, result).await {
            Ok(()) => {
                self.state
                    .update_task(|t| t.local_status = LocalTaskStatus::Completed);
                self.log.success(format!("Task {task_id} completed"));
                Ok(())
            }
            Err(e) => {
                self.log.error(classify(&e).log_line("complete task"));
                Err(e.into())
            }
        }
    }

    /// → failed with the given reason. A no-op when no task is tracked.
    pub async fn fail(&self, reason: &str) -> ClientResult<()> {
        let Some(task_id) = self.state.task().tracked else {
            self.log.info("Fail ignored: no task tracked");
            return Ok(());
        };

        match self.gateway.fail_task(&task_id, reason).await {
            Ok(()) => {
                self.state
                    .update_task(|t| t.local_status = LocalTaskStatus::Failed);
                self.log.error(format!("Task {task_id} failed: {reason}"));
                Ok(())
            }
            Err(e) => {
                self.log.error(classify(&e).log_line("fail task"));
                Err(e.into())
            }
        }
    }

    /// Pure read of the platform-observed task status. Never mutates the
    /// local state machine, even when the remote status disagrees with it.
    pub async fn query(&self, task_id: &str) -> ClientResult<TaskSnapshot> {
        match self.gateway.get_task(task_id).await {
            Ok(snapshot) => {
                info!("task {} is {}", snapshot.uuid, snapshot.status);
                self.log
                    .info(format!("Task {}: {}", snapshot.uuid, snapshot.status));
                Ok(snapshot)
            }
            Err(e) => {
                self.log.error(classify(&e).log_line("query task"));
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockGateway;
    use pulse_types::task::TaskStatus;
    use std::sync::atomic::Ordering;

    fn tracker() -> (Arc<MockGateway>, TaskTracker) {
        let gateway = Arc::new(MockGateway::new());
        let state = Arc::new(SessionState::new());
        let log = Arc::new(ActivityLog::default());
        let tracker = TaskTracker::new(gateway.clone(), state, log);
        (gateway, tracker)
    }

    #[tokio::test]
    async fn complete_while_idle_is_a_no_op() {
        let (gateway, tracker) = tracker();

        tracker.complete().await.unwrap();

        assert_eq!(gateway.complete_calls.load(Ordering::SeqCst), 0);
        assert_eq!(tracker.state.task().local_status, LocalTaskStatus::Idle);
        assert!(tracker.state.task().tracked.is_none());
    }

    #[tokio::test]
    async fn start_then_fail_ends_failed() {
        let (gateway, tracker) = tracker();

        tracker.start("abc").await.unwrap();
        assert_eq!(
            tracker.state.task().local_status,
            LocalTaskStatus::Processing
        );

        tracker.fail("x").await.unwrap();
        assert_eq!(tracker.state.task().local_status, LocalTaskStatus::Failed);
        assert_eq!(gateway.start_calls.load(Ordering::SeqCst), 1);
        assert_eq!(gateway.fail_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn start_requires_non_empty_id() {
        let (gateway, tracker) = tracker();

        let err = tracker.start("  ").await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(gateway.start_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn query_never_mutates_local_state() {
        let (gateway, tracker) = tracker();
        tracker.start("abc").await.unwrap();

        // Remote says completed; the local machine still says processing
        gateway.set_task_snapshot(TaskSnapshot {
            uuid: "abc".into(),
            status: TaskStatus::Completed,
            source: None,
            created_at: None,
        });

        let snapshot = tracker.query("abc").await.unwrap();
        assert_eq!(snapshot.status, TaskStatus::Completed);
        assert_eq!(
            tracker.state.task().local_status,
            LocalTaskStatus::Processing
        );
    }

    #[tokio::test]
    async fn failed_remote_call_leaves_state_unchanged() {
        let (gateway, tracker) = tracker();
        tracker.start("abc").await.unwrap();

        gateway.fail_op("complete_task");
        assert!(tracker.complete().await.is_err());
        assert_eq!(
            tracker.state.task().local_status,
            LocalTaskStatus::Processing
        );
    }
}
