// src/services/channel.rs

//! Public channel preview fetcher.
//!
//! Reads `{base}/s/{channel}` and returns the text of the newest message.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::Config;
use crate::services::PageFetcher;

/// CSS selector of a message body on the preview page.
const MESSAGE_SELECTOR: &str = ".tgme_widget_message_text";

/// Fetches the latest message of a public channel.
pub struct ChannelFetcher {
    client: Client,
    url: Url,
}

impl ChannelFetcher {
    /// Create a fetcher for the channel named in `config`.
    pub fn new(config: &Config, client: Client) -> Result<Self> {
        let url = Self::preview_url(&config.http.channel_base_url, &config.channel.channel_id)?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    fn preview_url(base: &str, channel_id: &str) -> Result<Url> {
        let base = Url::parse(base)?;
        Ok(base.join(&format!("s/{}", channel_id.trim().trim_start_matches('@')))?)
    }

    fn parse_selector(s: &str) -> Result<Selector> {
        Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
    }

    /// Trimmed text of the last message element in `html`.
    pub fn latest_message(html: &str) -> Result<String> {
        let document = Html::parse_document(html);
        let selector = Self::parse_selector(MESSAGE_SELECTOR)?;
        Ok(document
            .select(&selector)
            .last()
            .map(|element| element.text().collect::<String>().trim().to_string())
            .unwrap_or_default())
    }
}

#[async_trait]
impl PageFetcher for ChannelFetcher {
    async fn fetch_latest(&self) -> Result<String> {
        log::debug!("Fetching {}", self.url);
        let response = self.client.get(self.url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::from_status(status.as_u16()));
        }
        let html = response.text().await?;
        Self::latest_message(&html)
    }
}
