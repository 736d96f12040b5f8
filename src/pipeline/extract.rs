// src/pipeline/extract.rs

//! Claim code extraction from free text.

use std::sync::OnceLock;

use regex::Regex;

/// Eight uppercase letters or digits standing as a whole word.
const CODE_PATTERN: &str = r"\b[A-Z0-9]{8}\b";

fn code_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(CODE_PATTERN).expect("code pattern is a valid regex"))
}

/// Extract all claim codes from `text`, left to right.
pub fn extract_codes(text: &str) -> Vec<String> {
    code_regex()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}
