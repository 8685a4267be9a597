use serde::{Deserialize, Serialize};

/// A remote-configured agent that can be triggered against an activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentInfo {
    pub slug: String,
    pub name: String,
}

/// A platform workspace. Threads are scoped to one workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workspace {
    pub slug: String,
    pub name: String,
}

/// A conversation thread inside a workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    pub slug: String,
    pub name: String,
}

/// Sentinel slug for the synthetic "create a new thread" option injected at
/// the head of every thread list. Selecting it means: omit the thread from
/// the trigger call and let the platform create one.
pub const NEW_THREAD_SLUG: &str = "create_new";

impl Thread {
    pub fn new_thread_option() -> Self {
        Self {
            slug: NEW_THREAD_SLUG.to_string(),
            name: "+ Create New Thread".to_string(),
        }
    }

    pub fn is_new_thread_option(&self) -> bool {
        self.slug == NEW_THREAD_SLUG
    }
}
