// src/utils/http.rs

//! HTTP client utilities.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::{AppError, Result};
use crate::models::HttpConfig;

/// Create the shared asynchronous HTTP client.
///
/// The timeout bounds every fetch and claim request.
pub fn create_async_client(config: &HttpConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Convert string pairs into a header map.
pub fn header_map<'a, I>(pairs: I) -> Result<HeaderMap>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut headers = HeaderMap::new();
    for (name, value) in pairs {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| AppError::validation(format!("invalid header name '{name}': {e}")))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| AppError::validation(format!("invalid value for header '{name}': {e}")))?;
        headers.insert(header_name, header_value);
    }
    Ok(headers)
}

/// Credential headers from the config file.
pub fn credential_headers(credentials: &BTreeMap<String, String>) -> Result<HeaderMap> {
    header_map(
        credentials
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str())),
    )
}

/// Start from `base` and let `overrides` replace any header of the same name.
pub fn merge_headers(base: HeaderMap, overrides: &HeaderMap) -> HeaderMap {
    let mut merged = base;
    for name in overrides.keys() {
        merged.remove(name);
        for value in overrides.get_all(name) {
            merged.append(name.clone(), value.clone());
        }
    }
    merged
}
