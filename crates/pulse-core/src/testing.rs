//! In-memory gateway used by the unit tests: fixture-backed responses plus
//! per-operation call counters and injectable failures.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use pulse_types::activity::Activity;
use pulse_types::provider::{ModelKey, ProviderCatalog, ProviderEntry};
use pulse_types::registry::{AgentInfo, Thread, Workspace};
use pulse_types::stream::{AudioChunk, SpeechAudio};
use pulse_types::task::{TaskSnapshot, TaskStatus};

use crate::error::{GatewayError, GatewayResult};
use crate::remote::{
    AudioStream, ChatReply, ChatRequest, Embedding, IngestRequest, ListenRequest, PingInfo,
    RemoteGateway, SearchHit, SearchRequest, SpeakRequest, TextStream, Transcript,
    TriggerReceipt, TriggerRequest,
};

pub struct MockGateway {
    pub activities: Mutex<Vec<Activity>>,
    pub agents: Mutex<Vec<AgentInfo>>,
    pub workspaces: Mutex<Vec<Workspace>>,
    pub threads: Mutex<Vec<Thread>>,
    pub chat_deltas: Mutex<Vec<String>>,
    pub audio_chunks: Mutex<Vec<AudioChunk>>,
    task_snapshot: Mutex<Option<TaskSnapshot>>,
    pub last_trigger: Mutex<Option<TriggerRequest>>,

    pub list_calls: AtomicUsize,
    pub trigger_calls: AtomicUsize,
    pub start_calls: AtomicUsize,
    pub complete_calls: AtomicUsize,
    pub fail_calls: AtomicUsize,
    pub get_task_calls: AtomicUsize,

    next_id: AtomicUsize,
    failing_ops: Mutex<HashSet<&'static str>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            activities: Mutex::new(Vec::new()),
            agents: Mutex::new(Vec::new()),
            workspaces: Mutex::new(Vec::new()),
            threads: Mutex::new(Vec::new()),
            chat_deltas: Mutex::new(Vec::new()),
            audio_chunks: Mutex::new(Vec::new()),
            task_snapshot: Mutex::new(None),
            last_trigger: Mutex::new(None),
            list_calls: AtomicUsize::new(0),
            trigger_calls: AtomicUsize::new(0),
            start_calls: AtomicUsize::new(0),
            complete_calls: AtomicUsize::new(0),
            fail_calls: AtomicUsize::new(0),
            get_task_calls: AtomicUsize::new(0),
            next_id: AtomicUsize::new(1),
            failing_ops: Mutex::new(HashSet::new()),
        }
    }

    /// Make the named operation fail until cleared.
    pub fn fail_op(&self, op: &'static str) {
        self.failing_ops.lock().unwrap().insert(op);
    }

    pub fn set_task_snapshot(&self, snapshot: TaskSnapshot) {
        *self.task_snapshot.lock().unwrap() = Some(snapshot);
    }

    fn check(&self, op: &str) -> GatewayResult<()> {
        if self.failing_ops.lock().unwrap().contains(op) {
            return Err(GatewayError::Api {
                status: 500,
                message: format!("mock failure in {op}"),
            });
        }
        Ok(())
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteGateway for MockGateway {
    async fn list_activities(&self, _limit: usize) -> GatewayResult<Vec<Activity>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check("list_activities")?;
        Ok(self.activities.lock().unwrap().clone())
    }

    async fn insert_activity(&self, raw_data: serde_json::Value) -> GatewayResult<Activity> {
        self.check("insert_activity")?;
        let id = format!("act-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let activity = Activity {
            id,
            status: "pending".to_string(),
            raw_data,
            created_at: "2026-08-06T12:00:00.000Z".to_string(),
            display_type: String::new(),
            display_time: String::new(),
        };
        self.activities.lock().unwrap().push(activity.clone());
        Ok(activity)
    }

    async fn update_activity(&self, id: &str, patch: serde_json::Value) -> GatewayResult<()> {
        self.check("update_activity")?;
        let mut activities = self.activities.lock().unwrap();
        if let Some(activity) = activities.iter_mut().find(|a| a.id == id) {
            if let Some(status) = patch.get("status").and_then(|s| s.as_str()) {
                activity.status = status.to_string();
            }
        }
        Ok(())
    }

    async fn delete_activity(&self, id: &str) -> GatewayResult<()> {
        self.check("delete_activity")?;
        self.activities.lock().unwrap().retain(|a| a.id != id);
        Ok(())
    }

    async fn get_agents(&self) -> GatewayResult<Vec<AgentInfo>> {
        self.check("get_agents")?;
        Ok(self.agents.lock().unwrap().clone())
    }

    async fn get_workspaces(&self) -> GatewayResult<Vec<Workspace>> {
        self.check("get_workspaces")?;
        Ok(self.workspaces.lock().unwrap().clone())
    }

    async fn get_threads(&self, _workspace_slug: &str) -> GatewayResult<Vec<Thread>> {
        self.check("get_threads")?;
        Ok(self.threads.lock().unwrap().clone())
    }

    async fn trigger_agent(&self, request: TriggerRequest) -> GatewayResult<TriggerReceipt> {
        self.trigger_calls.fetch_add(1, Ordering::SeqCst);
        self.check("trigger_agent")?;
        *self.last_trigger.lock().unwrap() = Some(request);
        Ok(TriggerReceipt {
            task_uuid: "11111111-2222-3333-4444-555555555555".to_string(),
        })
    }

    async fn get_task(&self, id: &str) -> GatewayResult<TaskSnapshot> {
        self.get_task_calls.fetch_add(1, Ordering::SeqCst);
        self.check("get_task")?;
        Ok(self
            .task_snapshot
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(TaskSnapshot {
                uuid: id.to_string(),
                status: TaskStatus::Unknown,
                source: None,
                created_at: None,
            }))
    }

    async fn start_task(&self, _id: &str) -> GatewayResult<()> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        self.check("start_task")
    }

    async fn complete_task(&self, _id: &str, _result: serde_json::Value) -> GatewayResult<()> {
        self.complete_calls.fetch_add(1, Ordering::SeqCst);
        self.check("complete_task")
    }

    async fn fail_task(&self, _id: &str, _reason: &str) -> GatewayResult<()> {
        self.fail_calls.fetch_add(1, Ordering::SeqCst);
        self.check("fail_task")
    }

    async fn chat_providers(&self) -> GatewayResult<ProviderCatalog> {
        self.check("chat_providers")?;
        Ok(ProviderCatalog {
            providers: vec![ProviderEntry {
                name: "openai".to_string(),
                models: vec!["gpt-4o".to_string()],
            }],
        })
    }

    async fn embed_providers(&self) -> GatewayResult<ProviderCatalog> {
        self.check("embed_providers")?;
        Ok(ProviderCatalog::default())
    }

    async fn chat(&self, _request: ChatRequest) -> GatewayResult<ChatReply> {
        self.check("chat")?;
        Ok(ChatReply {
            text: self.chat_deltas.lock().unwrap().concat(),
        })
    }

    async fn chat_stream(&self, _request: ChatRequest) -> GatewayResult<TextStream> {
        self.check("chat_stream")?;
        let items: Vec<Result<String, GatewayError>> = self
            .chat_deltas
            .lock()
            .unwrap()
            .iter()
            .cloned()
            .map(Ok)
            .collect();
        Ok(Box::pin(futures_util::stream::iter(items)))
    }

    async fn embed(&self, _text: &str, _model: Option<&ModelKey>) -> GatewayResult<Embedding> {
        self.check("embed")?;
        Ok(Embedding {
            dimensions: 3,
            vectors: vec![vec![0.1, 0.2, 0.3]],
        })
    }

    async fn list_vector_workspaces(&self) -> GatewayResult<Vec<String>> {
        self.check("list_vector_workspaces")?;
        Ok(vec!["default".to_string()])
    }

    async fn embed_and_store(&self, _request: IngestRequest) -> GatewayResult<()> {
        self.check("embed_and_store")
    }

    async fn search(&self, _request: SearchRequest) -> GatewayResult<Vec<SearchHit>> {
        self.check("search")?;
        Ok(vec![SearchHit {
            id: "hit-1".to_string(),
            score: 0.9,
            metadata: serde_json::json!({}),
        }])
    }

    async fn delete_vectors(
        &self,
        _delete_all: bool,
        _workspace_id: Option<&str>,
    ) -> GatewayResult<()> {
        self.check("delete_vectors")
    }

    async fn tts_providers(&self) -> GatewayResult<Vec<String>> {
        self.check("tts_providers")?;
        Ok(vec!["native".to_string()])
    }

    async fn speak(&self, _request: SpeakRequest) -> GatewayResult<SpeechAudio> {
        self.check("speak")?;
        Ok(SpeechAudio {
            data: vec![0; 8],
            mime_type: "audio/mpeg".to_string(),
        })
    }

    async fn speak_stream(&self, _request: SpeakRequest) -> GatewayResult<AudioStream> {
        self.check("speak_stream")?;
        let items: Vec<Result<AudioChunk, GatewayError>> = self
            .audio_chunks
            .lock()
            .unwrap()
            .iter()
            .cloned()
            .map(Ok)
            .collect();
        Ok(Box::pin(futures_util::stream::iter(items)))
    }

    async fn stt_providers(&self) -> GatewayResult<Vec<String>> {
        self.check("stt_providers")?;
        Ok(vec!["native".to_string()])
    }

    async fn listen(&self, _request: ListenRequest) -> GatewayResult<Transcript> {
        self.check("listen")?;
        Ok(Transcript {
            text: "hello from the microphone".to_string(),
        })
    }

    async fn ping(&self) -> GatewayResult<PingInfo> {
        self.check("ping")?;
        Ok(PingInfo {
            app_id: "test-app".to_string(),
            mode: "dev".to_string(),
        })
    }

    async fn app_data_dir(&self) -> GatewayResult<String> {
        self.check("app_data_dir")?;
        Ok("/tmp/pulse".to_string())
    }
}
