// src/pipeline/executor.rs

//! Claim executor: one code in, one classified outcome out.

use std::sync::Arc;

use crate::error::Result;
use crate::models::{ClaimOutcome, ClaimReply, Event};
use crate::notify::Notifier;
use crate::pipeline::cooldown::{CooldownGate, is_rate_limited};
use crate::pipeline::ledger::ClaimLedger;
use crate::pipeline::session::SessionState;
use crate::services::ClaimApi;

/// Redeems codes against the claim endpoint and keeps the session in step.
pub struct ClaimExecutor {
    api: Arc<dyn ClaimApi>,
    gate: CooldownGate,
    notifier: Arc<dyn Notifier>,
}

impl ClaimExecutor {
    pub fn new(api: Arc<dyn ClaimApi>, gate: CooldownGate, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            gate,
            notifier,
        }
    }

    /// Attempt to claim `code`.
    ///
    /// Only fatal errors are returned as `Err`; transport trouble and
    /// rejections are outcomes.
    pub async fn claim(&self, session: &mut SessionState, code: &str) -> Result<ClaimOutcome> {
        if session.last_claimed_code.as_deref() == Some(code) {
            log::debug!("Skipping {code}: same as the previous attempt");
            return Ok(ClaimOutcome::Skipped);
        }
        session.last_claimed_code = Some(code.to_string());

        self.notifier.notify(&Event::ClaimStarted {
            code: code.to_string(),
        });

        let reply = match self.api.redeem(code).await {
            Ok(reply) => reply,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                let detail = e.to_string();
                self.notifier.notify(&Event::ClaimTransportError {
                    code: code.to_string(),
                    detail: detail.clone(),
                });
                return Ok(ClaimOutcome::TransportError { detail });
            }
        };

        match reply {
            ClaimReply::Success { amount, token } => {
                let claimed = ClaimLedger::parse_amount(&amount);
                let new_total = session.ledger.add(&token, claimed);
                self.notifier.notify(&Event::ClaimSucceeded {
                    code: code.to_string(),
                    amount: amount.clone(),
                    token: token.clone(),
                    new_total,
                });
                Ok(ClaimOutcome::Claimed {
                    amount: claimed,
                    token,
                    new_total,
                })
            }
            ClaimReply::Failure { message } => {
                self.notifier.notify(&Event::ClaimRejected {
                    code: code.to_string(),
                    reason: message.clone(),
                });
                if !is_rate_limited(&message) {
                    return Ok(ClaimOutcome::Rejected { reason: message });
                }

                let cooldown = self.gate.compute_wait(&message)?;
                self.gate
                    .wait(cooldown, &session.sleep, self.notifier.as_ref())
                    .await;
                Ok(ClaimOutcome::RateLimited {
                    waited: cooldown.wait,
                })
            }
        }
    }
}
