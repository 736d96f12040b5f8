// src/models/mod.rs

//! Domain models for the grabber.
//!
//! Configuration, claim endpoint shapes and status events.

mod claim;
mod config;
mod event;

// Re-export all public types
pub use claim::{ClaimOutcome, ClaimReply, ClaimResponse, GrabData};
pub use config::{ChannelConfig, Config, HttpConfig, PollerConfig};
pub use event::Event;
