//! Claim pipeline.
//!
//! - `extract`: pull claim codes out of message text
//! - `ledger`: per-token claimed totals
//! - `cooldown`: rate-limit message parsing and the sleep gate
//! - `executor`: redeem one code and classify the result
//! - `poll`: timer-driven fetch/diff/drain cycle and restart supervision

pub mod cooldown;
pub mod executor;
pub mod extract;
pub mod ledger;
pub mod poll;
pub mod queue;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use cooldown::{Cooldown, CooldownGate, SleepState};
pub use executor::ClaimExecutor;
pub use extract::extract_codes;
pub use ledger::ClaimLedger;
pub use poll::{CycleReport, PollLoop, Recovery, SessionEnd, TickOutcome, supervise};
pub use queue::{ClaimTask, TaskQueue};
pub use session::SessionState;
