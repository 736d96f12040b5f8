// src/pipeline/session.rs

//! Mutable state of one agent run.

use crate::pipeline::cooldown::SleepState;
use crate::pipeline::ledger::ClaimLedger;
use crate::pipeline::queue::TaskQueue;

/// All state that lives for one run and is dropped on restart.
#[derive(Debug, Default)]
pub struct SessionState {
    /// Latest full message text seen on the channel
    pub last_seen_text: Option<String>,
    /// Most recently attempted code
    pub last_claimed_code: Option<String>,
    pub ledger: ClaimLedger,
    pub queue: TaskQueue,
    pub sleep: SleepState,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `text` differs from the last seen message.
    pub fn is_new_text(&self, text: &str) -> bool {
        self.last_seen_text.as_deref() != Some(text)
    }
}
