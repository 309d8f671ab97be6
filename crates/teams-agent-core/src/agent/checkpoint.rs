//! Thread state checkpointing
//!
//! The agent saves the thread state after every step so a run suspended by
//! interrupts can be resumed later, and so the next user message sees the
//! whole conversation.

use std::collections::HashMap;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::types::{AgentMessage, ToolCall};

/// Why a tool call was suspended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterruptKind {
    Authorization,
    Approval,
}

/// An interrupt raised for one call of the pending batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaisedInterrupt {
    pub call_id: String,
    pub tool_name: String,
    pub kind: InterruptKind,
}

/// Outcome recorded for a call from a resume decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CallResolution {
    /// The user approved the call
    Approved,
    /// The call will not run; the text is returned to the model instead
    Denied(String),
}

/// Tool calls of the last AI message that have not run yet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PendingToolBatch {
    pub calls: Vec<ToolCall>,
    /// Interrupts awaiting decisions, in the order they were emitted
    pub raised: Vec<RaisedInterrupt>,
    pub resolutions: HashMap<String, CallResolution>,
}

impl PendingToolBatch {
    pub fn new(calls: Vec<ToolCall>) -> Self {
        Self {
            calls,
            ..Default::default()
        }
    }
}

/// Everything persisted for one conversation thread
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThreadState {
    pub messages: Vec<AgentMessage>,
    pub pending: Option<PendingToolBatch>,
    /// Model calls made since the last user message; resumes keep counting
    #[serde(default)]
    pub model_steps: usize,
}

/// Storage for thread state keyed by thread id
pub trait Checkpointer: Send + Sync {
    fn get(&self, thread_id: &str) -> Option<ThreadState>;

    fn put(&self, thread_id: &str, state: ThreadState);
}

/// In-memory checkpointer; state lives for the process lifetime
#[derive(Debug, Default)]
pub struct MemorySaver {
    threads: Mutex<HashMap<String, ThreadState>>,
}

impl MemorySaver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Checkpointer for MemorySaver {
    fn get(&self, thread_id: &str) -> Option<ThreadState> {
        self.threads.lock().get(thread_id).cloned()
    }

    fn put(&self, thread_id: &str, state: ThreadState) {
        self.threads.lock().insert(thread_id.to_string(), state);
    }
}
