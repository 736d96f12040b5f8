// src/lib.rs

//! Red packet grabber library.
//!
//! Watches a public channel for eight-character claim codes and redeems each
//! one, strictly one at a time, honouring the cooldowns the claim endpoint
//! announces.

pub mod error;
pub mod models;
pub mod notify;
pub mod pipeline;
pub mod services;
pub mod utils;
