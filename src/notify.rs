// src/notify.rs

//! Status reporting.
//!
//! The core only emits [`Event`]s; formatting them is the notifier's job.

use chrono::Local;

use crate::models::Event;

/// Receiver of status events.
pub trait Notifier: Send + Sync {
    fn notify(&self, event: &Event);
}

/// Renders events as console log lines through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl LogNotifier {
    /// Render an event as a single line.
    pub fn render(event: &Event) -> String {
        match event {
            Event::CodesFound { codes } => format!("New code found: {}", codes.join(", ")),
            Event::FetchFailed { detail } => format!("Error fetching channel: {detail}"),
            Event::ClaimStarted { code } => format!("Trying to claim code \"{code}\"..."),
            Event::ClaimSucceeded {
                amount,
                token,
                new_total,
                ..
            } => format!("Claim success [{amount} {token}], total {token} claimed: {new_total:.8}"),
            Event::ClaimRejected { reason, .. } => format!("Claim fail [{reason}]"),
            Event::ClaimTransportError { detail, .. } => format!("Claim error: {detail}"),
            Event::CooldownStarted {
                hours,
                minutes,
                until,
                ..
            } => format!(
                "Sleeping for {hours} hour(s) and {minutes} minute(s), until {}",
                until.format("%H:%M:%S")
            ),
            Event::CooldownEnded => "Awake again, resuming claims".to_string(),
            Event::Fatal { reason } => format!("Fatal: {reason}"),
        }
    }
}

impl Notifier for LogNotifier {
    fn notify(&self, event: &Event) {
        let line = Self::render(event);
        match event {
            Event::CodesFound { .. } => {
                let stamp = format!(" {} ", Local::now().format("%H:%M:%S"));
                log::info!("{stamp:─^60}");
                log::info!("{line}");
            }
            Event::FetchFailed { .. }
            | Event::ClaimRejected { .. }
            | Event::ClaimTransportError { .. } => log::warn!("{line}"),
            Event::Fatal { .. } => log::error!("{line}"),
            _ => log::info!("{line}"),
        }
    }
}
