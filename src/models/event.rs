// src/models/event.rs

//! Status events emitted by the poll loop and the claim executor.

use std::time::Duration;

use chrono::{DateTime, Local};

/// Everything the core reports to a [`crate::notify::Notifier`].
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The latest channel message changed and contains codes
    CodesFound { codes: Vec<String> },
    /// Fetching the channel failed; retried on the next tick
    FetchFailed { detail: String },
    ClaimStarted { code: String },
    ClaimSucceeded {
        code: String,
        amount: String,
        token: String,
        new_total: f64,
    },
    ClaimRejected { code: String, reason: String },
    ClaimTransportError { code: String, detail: String },
    CooldownStarted {
        hours: i64,
        minutes: i64,
        wait: Duration,
        until: DateTime<Local>,
    },
    CooldownEnded,
    /// Processing halted; the operator must restart or exit
    Fatal { reason: String },
}
