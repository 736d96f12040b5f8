// src/pipeline/testing.rs

//! In-process stand-ins for the network collaborators.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ClaimReply, Event};
use crate::notify::Notifier;
use crate::pipeline::cooldown::SleepState;
use crate::services::{ClaimApi, PageFetcher};

/// Collects every event it receives.
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<Event>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: &Event) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Scripted claim endpoint that records calls and overlap.
#[derive(Default)]
pub struct FakeClaimApi {
    replies: Mutex<VecDeque<Result<ClaimReply>>>,
    calls: Mutex<Vec<String>>,
    latency: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    watched_sleep: Mutex<Option<SleepState>>,
    called_while_sleeping: AtomicBool,
}

impl FakeClaimApi {
    /// Queue the reply for the next call. Unscripted calls succeed with 1 USDT.
    pub fn then(self, reply: Result<ClaimReply>) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Flag any call made while `sleep` is set.
    pub fn watch_sleep(&self, sleep: SleepState) {
        *self.watched_sleep.lock().unwrap() = Some(sleep);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn called_while_sleeping(&self) -> bool {
        self.called_while_sleeping.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClaimApi for FakeClaimApi {
    async fn redeem(&self, code: &str) -> Result<ClaimReply> {
        self.calls.lock().unwrap().push(code.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let sleeping = self
            .watched_sleep
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(SleepState::is_sleeping);
        if sleeping {
            self.called_while_sleeping.store(true, Ordering::SeqCst);
        }

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ClaimReply::success("1", "USDT")))
    }
}

/// Scripted page source; repeats the last text once the script runs out.
#[derive(Default)]
pub struct FakeFetcher {
    script: Mutex<VecDeque<Result<String>>>,
    last: Mutex<String>,
    fetches: AtomicUsize,
}

impl FakeFetcher {
    pub fn then(self, page: Result<String>) -> Self {
        self.script.lock().unwrap().push_back(page);
        self
    }

    pub fn text(self, text: &str) -> Self {
        self.then(Ok(text.to_string()))
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch_latest(&self) -> Result<String> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Ok(text)) => {
                *self.last.lock().unwrap() = text.clone();
                Ok(text)
            }
            Some(Err(e)) => Err(e),
            None => Ok(self.last.lock().unwrap().clone()),
        }
    }
}
