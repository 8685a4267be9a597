//! Chat, embeddings and vector store operations.
//!
//! Streaming chat publishes every delta on the event bus the moment it
//! arrives and appends the assembled reply to the in-memory transcript.

use tokio::sync::mpsc;
use uuid::Uuid;

use pulse_types::chat::ChatMessage;
use pulse_types::event::SessionEvent;
use pulse_types::log::Severity;

use crate::error::{ClientError, ClientResult};
use crate::remote::{ChatRequest, Embedding, IngestRequest, SearchHit, SearchRequest};
use crate::stream::pump_text;
use crate::Orchestrator;

impl Orchestrator {
    /// Send one user message and wait for the complete reply.
    pub async fn chat(&self, user_text: &str) -> ClientResult<String> {
        match self.run_chat(user_text).await {
            Ok(text) => Ok(text),
            Err(err) => {
                self.report_failure("chat", &err);
                Err(err)
            }
        }
    }

    async fn run_chat(&self, user_text: &str) -> ClientResult<String> {
        let user_text = user_text.trim();
        if user_text.is_empty() {
            return Err(ClientError::Validation("message is empty".to_string()));
        }

        self.state.push_chat(ChatMessage::user(user_text));
        let selection = self.state.selection();
        let request = ChatRequest::new(self.state.chat_transcript(), selection.chat_model.as_ref());

        let reply = self.gateway.chat(request).await?;
        self.state.push_chat(ChatMessage::assistant(reply.text.clone()));
        self.events.send(SessionEvent::ChatDone {
            text: reply.text.clone(),
        });
        self.log
            .success(format!("Chat reply ({} chars)", reply.text.len()));
        Ok(reply.text)
    }

    /// Streaming variant of [`chat`](Self::chat). Returns the assembled
    /// reply; intermediate deltas arrive as `ChatDelta` events. If every
    /// event subscriber goes away mid-stream the pump stops pulling —
    /// a normal cancellation, not a fault.
    pub async fn chat_stream(&self, user_text: &str) -> ClientResult<String> {
        match self.run_chat_stream(user_text).await {
            Ok(text) => Ok(text),
            Err(err) => {
                self.report_failure("chat stream", &err);
                Err(err)
            }
        }
    }

    async fn run_chat_stream(&self, user_text: &str) -> ClientResult<String> {
        let user_text = user_text.trim();
        if user_text.is_empty() {
            return Err(ClientError::Validation("message is empty".to_string()));
        }

        self.state.push_chat(ChatMessage::user(user_text));
        let selection = self.state.selection();
        let request = ChatRequest::new(self.state.chat_transcript(), selection.chat_model.as_ref());
        let stream = self.gateway.chat_stream(request).await?;

        let (tx, mut rx) = mpsc::channel(64);
        let events = self.events.clone();
        let forward = tokio::spawn(async move {
            while let Some(content) = rx.recv().await {
                events.send(SessionEvent::ChatDelta { content });
            }
        });

        let result = pump_text(stream, tx).await;
        let _ = forward.await;

        let text = result?;
        self.state.push_chat(ChatMessage::assistant(text.clone()));
        self.events.send(SessionEvent::ChatDone { text: text.clone() });
        self.log.success(format!("Chat reply ({} chars)", text.len()));
        Ok(text)
    }

    /// Drop the in-memory conversation.
    pub fn clear_chat(&self) {
        self.state.clear_chat();
        self.log.info("Chat transcript cleared");
    }

    pub async fn embed(&self, text: &str) -> ClientResult<Embedding> {
        match self.run_embed(text).await {
            Ok(embedding) => Ok(embedding),
            Err(err) => {
                self.report_failure("embed", &err);
                Err(err)
            }
        }
    }

    async fn run_embed(&self, text: &str) -> ClientResult<Embedding> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ClientError::Validation("text is empty".to_string()));
        }
        let selection = self.state.selection();
        let embedding = self
            .gateway
            .embed(text, selection.embed_model.as_ref())
            .await?;
        self.log.success(format!(
            "Embedded text: {} vector(s), {} dimensions",
            embedding.vectors.len(),
            embedding.dimensions
        ));
        Ok(embedding)
    }

    /// Split a pasted block into non-empty lines and store them as one
    /// document. A fresh document id is generated when none is supplied.
    pub async fn ingest_texts(
        &self,
        block: &str,
        workspace_id: Option<String>,
    ) -> ClientResult<usize> {
        match self.run_ingest(block, workspace_id).await {
            Ok(count) => {
                self.notify(Severity::Success, format!("Stored {count} text(s)"));
                Ok(count)
            }
            Err(err) => {
                self.report_failure("vector ingest", &err);
                Err(err)
            }
        }
    }

    async fn run_ingest(&self, block: &str, workspace_id: Option<String>) -> ClientResult<usize> {
        let texts: Vec<String> = block
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();
        if texts.is_empty() {
            return Err(ClientError::Validation("nothing to ingest".to_string()));
        }

        let count = texts.len();
        let selection = self.state.selection();
        let request = IngestRequest {
            texts,
            document_id: Some(format!("doc-{}", Uuid::new_v4())),
            workspace_id,
            model: selection.embed_model.as_ref().map(|k| k.model.clone()),
            provider: selection.embed_model.as_ref().map(|k| k.provider.clone()),
        };
        self.gateway.embed_and_store(request).await?;
        self.log.success(format!("Stored {count} text(s) in vector store"));
        self.refresh_vector_workspaces().await;
        Ok(count)
    }

    /// Semantic search; the hit list lands in the session state for the
    /// presentation layer to render.
    pub async fn search(
        &self,
        query: &str,
        workspace_id: Option<String>,
    ) -> ClientResult<Vec<SearchHit>> {
        match self.run_search(query, workspace_id).await {
            Ok(hits) => {
                self.notify(Severity::Success, format!("{} result(s)", hits.len()));
                Ok(hits)
            }
            Err(err) => {
                self.report_failure("search", &err);
                Err(err)
            }
        }
    }

    async fn run_search(
        &self,
        query: &str,
        workspace_id: Option<String>,
    ) -> ClientResult<Vec<SearchHit>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ClientError::Validation("query is empty".to_string()));
        }

        let selection = self.state.selection();
        let request = SearchRequest {
            query: query.to_string(),
            top_k: self.config.client.default_top_k,
            workspace_id,
            document_id: None,
            model: selection.embed_model.as_ref().map(|k| k.model.clone()),
            provider: selection.embed_model.as_ref().map(|k| k.provider.clone()),
        };
        let hits = self.gateway.search(request).await?;
        self.log.success(format!("Search returned {} hit(s)", hits.len()));
        self.state.set_search_hits(hits.clone());
        self.events.send(SessionEvent::StateChanged);
        Ok(hits)
    }

    /// Delete everything in one vector workspace (or the default one).
    pub async fn clear_vectors(&self, workspace_id: Option<String>) -> ClientResult<()> {
        match self
            .gateway
            .delete_vectors(true, workspace_id.as_deref())
            .await
        {
            Ok(()) => {
                self.log.success("Vector store cleared");
                self.notify(Severity::Success, "Vector store cleared");
                self.refresh_vector_workspaces().await;
                Ok(())
            }
            Err(e) => {
                let err = ClientError::from(e);
                self.report_failure("clear vectors", &err);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockGateway;
    use pulse_types::chat::Role;
    use pulse_types::config::PulseConfig;
    use std::sync::Arc;

    fn orchestrator() -> (Arc<MockGateway>, Orchestrator) {
        let gateway = Arc::new(MockGateway::new());
        let orchestrator = Orchestrator::with_gateway(PulseConfig::default(), gateway.clone());
        (gateway, orchestrator)
    }

    #[tokio::test]
    async fn chat_stream_assembles_and_extends_transcript() {
        let (gateway, orchestrator) = orchestrator();
        *gateway.chat_deltas.lock().unwrap() = vec![
            "Hel".to_string(),
            "lo".to_string(),
            String::new(),
            " world".to_string(),
        ];
        let mut events = orchestrator.subscribe_events();

        let text = orchestrator.chat_stream("hi").await.unwrap();
        assert_eq!(text, "Hello world");

        let transcript = orchestrator.state().chat_transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].role, Role::User);
        assert_eq!(transcript[1].role, Role::Assistant);
        assert_eq!(transcript[1].content, "Hello world");

        // the empty delta produced no event
        let mut deltas = Vec::new();
        while let Ok(event) = events.try_recv() {
            if let pulse_types::event::SessionEvent::ChatDelta { content } = event {
                deltas.push(content);
            }
        }
        assert_eq!(deltas, ["Hel", "lo", " world"]);
    }

    #[tokio::test]
    async fn empty_message_is_rejected_locally() {
        let (_gateway, orchestrator) = orchestrator();
        let err = orchestrator.chat_stream("   ").await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert!(orchestrator.state().chat_transcript().is_empty());
    }

    #[tokio::test]
    async fn ingest_splits_lines_and_skips_blanks() {
        let (_gateway, orchestrator) = orchestrator();
        let count = orchestrator
            .ingest_texts("first fact\n\n  second fact  \n", None)
            .await
            .unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn search_updates_the_hit_snapshot() {
        let (_gateway, orchestrator) = orchestrator();
        let hits = orchestrator.search("what is pulse", None).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(orchestrator.state().search_hits().len(), 1);
    }
}
