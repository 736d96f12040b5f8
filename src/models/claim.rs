// src/models/claim.rs

//! Claim endpoint wire shapes and claim outcomes.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{AppError, Result};

/// Raw body returned by the redeem endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ClaimResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<GrabData>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Payload of a successful grab.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrabData {
    pub grab_amount_str: String,
    pub currency: String,
}

/// Decoded reply: the endpoint either paid out or explained why not.
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimReply {
    Success { amount: String, token: String },
    Failure { message: String },
}

impl ClaimReply {
    pub fn success(amount: impl Into<String>, token: impl Into<String>) -> Self {
        Self::Success {
            amount: amount.into(),
            token: token.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }
}

impl TryFrom<ClaimResponse> for ClaimReply {
    type Error = AppError;

    fn try_from(response: ClaimResponse) -> Result<Self> {
        if !response.success {
            return Ok(Self::Failure {
                message: response.message.unwrap_or_default(),
            });
        }
        match response.data {
            Some(data) => Ok(Self::Success {
                amount: data.grab_amount_str,
                token: data.currency,
            }),
            None => Err(AppError::Decode("success without grab data".into())),
        }
    }
}

/// Result of handing one code to the claim executor.
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimOutcome {
    /// Same code as the previous attempt; nothing was sent
    Skipped,
    Claimed {
        amount: f64,
        token: String,
        new_total: f64,
    },
    /// The service asked us to back off and the wait has been served
    RateLimited { waited: Duration },
    Rejected { reason: String },
    TransportError { detail: String },
}

impl ClaimOutcome {
    /// Whether a request reached the claim endpoint.
    pub fn was_attempted(&self) -> bool {
        !matches!(self, Self::Skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_success_body() {
        let body = r#"{"success":true,"data":{"grabAmountStr":"0.125","currency":"USDT"}}"#;
        let response: ClaimResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            ClaimReply::try_from(response).unwrap(),
            ClaimReply::success("0.125", "USDT")
        );
    }

    #[test]
    fn decodes_failure_body() {
        let body = r#"{"success":false,"message":"This Red Packet has been fully claimed.","data":null}"#;
        let response: ClaimResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            ClaimReply::try_from(response).unwrap(),
            ClaimReply::failure("This Red Packet has been fully claimed.")
        );
    }

    #[test]
    fn failure_without_message_is_empty_reason() {
        let response: ClaimResponse = serde_json::from_str(r#"{"success":false}"#).unwrap();
        assert_eq!(
            ClaimReply::try_from(response).unwrap(),
            ClaimReply::failure("")
        );
    }

    #[test]
    fn success_without_data_is_decode_error() {
        let response: ClaimResponse = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(matches!(
            ClaimReply::try_from(response),
            Err(AppError::Decode(_))
        ));
    }
}
