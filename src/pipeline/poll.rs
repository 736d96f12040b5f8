// src/pipeline/poll.rs

//! Poll loop: fetch, diff, extract, drain.
//!
//! Each cycle runs `Fetching → Diffing → Draining` while holding the session
//! lock. A tick that finds the lock taken does nothing, so at most one drain
//! (and therefore at most one claim or cooldown wait) is in progress at a time.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;

use crate::error::{AppError, Result};
use crate::models::{ClaimOutcome, Config, Event, PollerConfig};
use crate::notify::Notifier;
use crate::pipeline::cooldown::{CooldownGate, SleepState};
use crate::pipeline::executor::ClaimExecutor;
use crate::pipeline::extract::extract_codes;
use crate::pipeline::session::SessionState;
use crate::services::{ChannelFetcher, ClaimApi, GiftClaimClient, PageFetcher};
use crate::utils::http;

/// What a single tick did.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Another cycle still holds the session
    Busy,
    /// The page could not be fetched; nothing changed
    FetchFailed,
    /// Same text as last time, or no text at all
    Unchanged,
    /// New text without any codes
    NoCodes,
    /// Codes were found and every one of them was processed
    Drained(CycleReport),
}

/// Codes handled in one drain, in order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CycleReport {
    pub codes: Vec<String>,
    pub outcomes: Vec<(String, ClaimOutcome)>,
}

impl CycleReport {
    /// Number of claims that reached the endpoint.
    pub fn attempts(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| outcome.was_attempted())
            .count()
    }
}

/// Timer-driven watcher that owns the session state.
pub struct PollLoop {
    fetcher: Arc<dyn PageFetcher>,
    executor: ClaimExecutor,
    notifier: Arc<dyn Notifier>,
    session: Mutex<SessionState>,
    sleep: SleepState,
    interval: Duration,
}

impl PollLoop {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        claims: Arc<dyn ClaimApi>,
        notifier: Arc<dyn Notifier>,
        settings: &PollerConfig,
    ) -> Self {
        let gate = CooldownGate::new(Duration::from_secs(settings.cooldown_margin_secs));
        let session = SessionState::new();
        let sleep = session.sleep.clone();

        Self {
            fetcher,
            executor: ClaimExecutor::new(claims, gate, Arc::clone(&notifier)),
            notifier,
            session: Mutex::new(session),
            sleep,
            interval: Duration::from_millis(settings.interval_ms.max(1)),
        }
    }

    /// Wire the HTTP fetcher and claim client described by `config`.
    pub fn from_config(config: &Config, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let client = http::create_async_client(&config.http)?;
        let fetcher = ChannelFetcher::new(config, client.clone())?;
        log::info!("Watching {}", fetcher.url());
        let claims = GiftClaimClient::new(config, client)?;

        Ok(Self::new(
            Arc::new(fetcher),
            Arc::new(claims),
            notifier,
            &config.poller,
        ))
    }

    /// Handle on the process-wide sleeping flag.
    pub fn sleep_state(&self) -> SleepState {
        self.sleep.clone()
    }

    /// Tick until a fatal error occurs, then report and return it.
    pub async fn run(&self) -> AppError {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        log::info!("Polling every {:?}", self.interval);
        loop {
            ticker.tick().await;
            if let Err(e) = self.tick().await {
                self.notifier.notify(&Event::Fatal {
                    reason: e.to_string(),
                });
                return e;
            }
        }
    }

    /// Run one cycle unless another one is still in progress.
    ///
    /// Only fatal errors are returned as `Err`.
    pub async fn tick(&self) -> Result<TickOutcome> {
        let Ok(mut session) = self.session.try_lock() else {
            log::debug!("Previous cycle still running, skipping tick");
            return Ok(TickOutcome::Busy);
        };
        self.run_cycle(&mut session).await
    }

    async fn run_cycle(&self, session: &mut SessionState) -> Result<TickOutcome> {
        // Fetching
        let text = match self.fetcher.fetch_latest().await {
            Ok(text) => text,
            Err(e) => {
                self.notifier.notify(&Event::FetchFailed {
                    detail: e.to_string(),
                });
                return Ok(TickOutcome::FetchFailed);
            }
        };

        // Diffing
        if text.is_empty() || !session.is_new_text(&text) {
            return Ok(TickOutcome::Unchanged);
        }
        let codes = extract_codes(&text);
        session.last_seen_text = Some(text);
        if codes.is_empty() {
            return Ok(TickOutcome::NoCodes);
        }

        // Draining
        self.notifier.notify(&Event::CodesFound {
            codes: codes.clone(),
        });
        session.queue.extend_codes(codes.iter().cloned());

        let mut report = CycleReport {
            codes,
            outcomes: Vec::new(),
        };
        while let Some(task) = session.queue.pop() {
            match self.executor.claim(session, &task.code).await {
                Ok(outcome) => report.outcomes.push((task.code, outcome)),
                Err(e) => {
                    session.queue.clear();
                    return Err(e);
                }
            }
        }
        Ok(TickOutcome::Drained(report))
    }

    /// Snapshot of the ledger totals, waiting for any running cycle.
    pub async fn totals(&self) -> Vec<(String, f64)> {
        self.session.lock().await.ledger.totals()
    }
}

/// What to do once a session has stopped on a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    Restart,
    Exit,
}

/// How a session ended.
#[derive(Debug)]
pub struct SessionEnd {
    pub error: AppError,
    pub totals: Vec<(String, f64)>,
}

/// Run sessions until `decide` chooses to exit.
///
/// Every session gets a loop from `build`, so nothing carries over a restart.
/// An error from `build` or `decide` ends supervision.
pub async fn supervise<B, D, F>(mut build: B, mut decide: D) -> Result<()>
where
    B: FnMut() -> Result<PollLoop>,
    D: FnMut(SessionEnd) -> F,
    F: Future<Output = Result<Recovery>>,
{
    loop {
        let agent = build()?;
        let error = agent.run().await;
        let totals = agent.totals().await;

        match decide(SessionEnd { error, totals }).await? {
            Recovery::Restart => log::info!("Restarting..."),
            Recovery::Exit => {
                log::info!("Exiting...");
                return Ok(());
            }
        }
    }
}
