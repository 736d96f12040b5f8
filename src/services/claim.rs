// src/services/claim.rs

//! Red packet redeem endpoint client.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::HeaderMap;
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::{ClaimReply, ClaimResponse, Config};
use crate::services::ClaimApi;
use crate::utils::http::{credential_headers, header_map, merge_headers};

/// Browser-like headers sent with every claim.
const FIXED_HEADERS: &[(&str, &str)] = &[
    ("accept", "*/*"),
    ("accept-language", "en-US,en;q=0.6"),
    ("bnc-location", "BINANCE"),
    ("bnc-uuid", "30edea55-3710-4f28-b107-113db49a1d7b"),
    ("content-type", "application/json"),
    ("origin", "https://www.binance.com"),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-fetch-dest", "empty"),
    ("sec-fetch-mode", "cors"),
    ("sec-fetch-site", "same-origin"),
];

const REFERER_BASE: &str = "https://www.binance.com/en/gift/query-and-receive?code=";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GrabRequest<'a> {
    grab_code: &'a str,
}

/// Posts codes to the redeem endpoint with the configured credentials.
pub struct GiftClaimClient {
    client: Client,
    url: String,
    credentials: HeaderMap,
}

impl GiftClaimClient {
    /// Build a client; invalid credential headers are rejected here.
    pub fn new(config: &Config, client: Client) -> Result<Self> {
        Ok(Self {
            client,
            url: config.http.claim_url.clone(),
            credentials: credential_headers(&config.credentials)?,
        })
    }

    /// Fixed headers for `code`, extended with the credentials.
    ///
    /// A credential with the same name as a fixed header replaces it.
    pub fn request_headers(&self, code: &str) -> Result<HeaderMap> {
        let referer = format!("{REFERER_BASE}{code}");
        let fixed = header_map(
            FIXED_HEADERS
                .iter()
                .copied()
                .chain(std::iter::once(("referer", referer.as_str()))),
        )?;
        Ok(merge_headers(fixed, &self.credentials))
    }
}

#[async_trait]
impl ClaimApi for GiftClaimClient {
    async fn redeem(&self, code: &str) -> Result<ClaimReply> {
        let response = self
            .client
            .post(&self.url)
            .headers(self.request_headers(code)?)
            .json(&GrabRequest { grab_code: code })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::from_status(status.as_u16()));
        }

        let body = response.text().await?;
        let decoded: ClaimResponse = serde_json::from_str(&body)
            .map_err(|e| AppError::Decode(format!("{e}: {body}")))?;
        ClaimReply::try_from(decoded)
    }
}
