// src/pipeline/cooldown.rs

//! Cooldown gate.
//!
//! When the claim endpoint reports that the attempt budget is exhausted, its
//! message names how long to wait, e.g.
//! `"... Please try again in 1 hour(s) 30 minute(s)."`. The gate turns that
//! text into a wait and suspends claim processing for it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::Local;

use crate::error::{AppError, Result};
use crate::models::Event;
use crate::notify::Notifier;

/// Failure message that signals an exhausted attempt budget.
pub const RATE_LIMIT_PHRASE: &str =
    "You have exceeded the maximum attempts for your Red Packet code.";

const WAIT_MARKER: &str = "Please try again in";
const HOURS_UNIT: &str = "hour(s)";
const MINUTES_UNIT: &str = "minute(s)";

/// Whether a rejection message means "back off".
pub fn is_rate_limited(message: &str) -> bool {
    message.contains(RATE_LIMIT_PHRASE)
}

/// Process-wide "sleeping" flag, true only while a cooldown is served.
#[derive(Debug, Default, Clone)]
pub struct SleepState(Arc<AtomicBool>);

impl SleepState {
    pub fn is_sleeping(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn set(&self, sleeping: bool) {
        self.0.store(sleeping, Ordering::SeqCst);
    }
}

/// A wait read from a rate-limit message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cooldown {
    pub hours: i64,
    pub minutes: i64,
    /// Announced duration plus the safety margin
    pub wait: Duration,
}

/// Leading signed integer of the trimmed text, 0 if there is none.
fn leading_number(text: &str) -> i64 {
    let text = text.trim();
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    let end = text.len() - digits.len()
        + digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());
    text[..end].parse().unwrap_or(0)
}

/// Reads cooldown messages and serves the waits they announce.
#[derive(Debug, Clone)]
pub struct CooldownGate {
    margin: Duration,
}

impl CooldownGate {
    pub fn new(margin: Duration) -> Self {
        Self { margin }
    }

    pub fn margin(&self) -> Duration {
        self.margin
    }

    /// Parse the wait out of a rate-limit message.
    ///
    /// Minutes are only read after an `hour(s)` component. A message without
    /// the marker phrase, or one whose total is not positive, is a fatal
    /// [`AppError::Cooldown`].
    pub fn compute_wait(&self, message: &str) -> Result<Cooldown> {
        let Some((_, rest)) = message.split_once(WAIT_MARKER) else {
            return Err(AppError::cooldown(format!(
                "no valid time portion found in {message:?}"
            )));
        };
        let rest = rest.trim();

        let (hours, minutes) = match rest.split_once(HOURS_UNIT) {
            Some((hours_part, tail)) => {
                let minutes = tail
                    .split_once(MINUTES_UNIT)
                    .map_or(0, |(minutes_part, _)| leading_number(minutes_part));
                (leading_number(hours_part), minutes)
            }
            None => (0, 0),
        };

        let total_secs = hours
            .saturating_mul(3600)
            .saturating_add(minutes.saturating_mul(60));
        let Ok(total_secs) = u64::try_from(total_secs) else {
            return Err(AppError::cooldown(format!(
                "negative wait in {message:?}"
            )));
        };
        if total_secs == 0 {
            return Err(AppError::cooldown(format!(
                "no valid time found in {message:?}"
            )));
        }

        Ok(Cooldown {
            hours,
            minutes,
            wait: Duration::from_secs(total_secs).saturating_add(self.margin),
        })
    }

    /// Sleep through `cooldown`, holding `sleep` true for the duration.
    pub async fn wait(&self, cooldown: Cooldown, sleep: &SleepState, notifier: &dyn Notifier) {
        let until = chrono::Duration::from_std(cooldown.wait)
            .ok()
            .and_then(|wait| Local::now().checked_add_signed(wait))
            .unwrap_or_else(Local::now);

        sleep.set(true);
        notifier.notify(&Event::CooldownStarted {
            hours: cooldown.hours,
            minutes: cooldown.minutes,
            wait: cooldown.wait,
            until,
        });

        tokio::time::sleep(cooldown.wait).await;

        sleep.set(false);
        notifier.notify(&Event::CooldownEnded);
    }
}

impl Default for CooldownGate {
    fn default() -> Self {
        Self::new(Duration::from_secs(60))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::RecordingNotifier;

    const LIMIT_MESSAGE: &str = "You have exceeded the maximum attempts for your Red Packet code. Please try again in 1 hour(s) 30 minute(s).";

    #[test]
    fn parses_hours_and_minutes() {
        let cooldown = CooldownGate::default().compute_wait(LIMIT_MESSAGE).unwrap();
        assert_eq!(cooldown.hours, 1);
        assert_eq!(cooldown.minutes, 30);
        assert_eq!(cooldown.wait, Duration::from_secs(5460));
    }

    #[test]
    fn zero_wait_is_fatal() {
        let err = CooldownGate::default()
            .compute_wait("Please try again in 0 hour(s) 0 minute(s).")
            .unwrap_err();
        assert!(matches!(err, AppError::Cooldown(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn missing_marker_is_fatal() {
        let err = CooldownGate::default()
            .compute_wait("You have exceeded the maximum attempts for your Red Packet code.")
            .unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn hours_only() {
        let cooldown = CooldownGate::default()
            .compute_wait("Please try again in 2 hour(s).")
            .unwrap();
        assert_eq!(cooldown.wait, Duration::from_secs(2 * 3600 + 60));
    }

    #[test]
    fn minutes_without_hours_is_fatal() {
        let err = CooldownGate::default()
            .compute_wait("You have exceeded the maximum attempts for your Red Packet code. Please try again in 30 minute(s).")
            .unwrap_err();
        assert!(matches!(err, AppError::Cooldown(_)));
    }

    #[test]
    fn negative_total_is_fatal() {
        let err = CooldownGate::default()
            .compute_wait("Please try again in -1 hour(s) 5 minute(s)")
            .unwrap_err();
        assert!(matches!(err, AppError::Cooldown(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn negative_component_counts_towards_total() {
        let cooldown = CooldownGate::new(Duration::ZERO)
            .compute_wait("Please try again in -1 hour(s) 90 minute(s)")
            .unwrap();
        assert_eq!((cooldown.hours, cooldown.minutes), (-1, 90));
        assert_eq!(cooldown.wait, Duration::from_secs(1800));
    }

    #[test]
    fn non_numeric_hours_default_to_zero() {
        let cooldown = CooldownGate::default()
            .compute_wait("Please try again in some hour(s) 5 minute(s)")
            .unwrap();
        assert_eq!((cooldown.hours, cooldown.minutes), (0, 5));
    }

    #[test]
    fn margin_is_configurable() {
        let cooldown = CooldownGate::new(Duration::ZERO)
            .compute_wait("Please try again in 0 hour(s) 1 minute(s)")
            .unwrap();
        assert_eq!(cooldown.wait, Duration::from_secs(60));
    }

    #[test]
    fn recognises_rate_limit_phrase() {
        assert!(is_rate_limited(LIMIT_MESSAGE));
        assert!(!is_rate_limited("This Red Packet has expired."));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_holds_sleep_flag_for_full_duration() {
        let gate = CooldownGate::default();
        let cooldown = gate.compute_wait(LIMIT_MESSAGE).unwrap();
        let sleep = SleepState::default();
        let notifier = RecordingNotifier::default();

        let start = tokio::time::Instant::now();
        let observer = sleep.clone();
        let probe = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(5000)).await;
            observer.is_sleeping()
        });

        gate.wait(cooldown, &sleep, &notifier).await;

        assert!(probe.await.unwrap());
        assert!(start.elapsed() >= Duration::from_secs(5460));
        assert!(!sleep.is_sleeping());
        let events = notifier.events();
        assert!(matches!(events[0], Event::CooldownStarted { hours: 1, minutes: 30, .. }));
        assert_eq!(events[1], Event::CooldownEnded);
    }
}
