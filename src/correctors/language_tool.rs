/*!
 * Thin client for a LanguageTool HTTP server.
 *
 * Talks to the `/v2/check` endpoint of a locally running instance. The
 * grammar pass is strictly best-effort: timeouts and transport errors are
 * surfaced to the caller, which downgrades to typo-only correction.
 */

use std::time::Duration;

use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;

use crate::errors::CorrectorError;

/// Default local LanguageTool endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8010";

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct CheckResponse {
    matches: Vec<GrammarMatch>,
}

#[derive(Debug, Deserialize)]
struct GrammarMatch {
    offset: usize,
    length: usize,
    replacements: Vec<Replacement>,
}

#[derive(Debug, Deserialize)]
struct Replacement {
    value: String,
}

/// Client for one LanguageTool server
pub struct LanguageToolClient {
    client: Client,
    endpoint: String,
    language: String,
    timeout_secs: u64,
}

impl LanguageToolClient {
    pub fn new(endpoint: &str, language: &str, timeout_secs: u64) -> Result<Self, CorrectorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .build()
            .map_err(|e| CorrectorError::Unavailable(format!("HTTP client build failed: {}", e)))?;

        Ok(LanguageToolClient {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            language: language.to_string(),
            timeout_secs,
        })
    }

    /// Run one grammar check and apply the server's first suggestion per match
    pub async fn check(&self, text: &str) -> Result<String, CorrectorError> {
        let url = format!("{}/v2/check", self.endpoint);
        let params = [("text", text), ("language", self.language.as_str())];

        let request = self.client.post(&url).form(&params).send();
        let response = tokio::time::timeout(Duration::from_secs(self.timeout_secs), request)
            .await
            .map_err(|_| CorrectorError::Timeout(self.timeout_secs))?
            .map_err(|e| CorrectorError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CorrectorError::RequestFailed(format!(
                "Server returned status {}",
                response.status()
            )));
        }

        let parsed: CheckResponse = response
            .json()
            .await
            .map_err(|e| CorrectorError::ParseError(format!("Invalid check response: {}", e)))?;

        debug!("LanguageTool returned {} match(es)", parsed.matches.len());
        Ok(apply_matches(text, parsed.matches))
    }
}

/// Apply replacements right to left so earlier offsets stay valid.
///
/// Offsets from the server are in characters, not bytes.
fn apply_matches(text: &str, mut matches: Vec<GrammarMatch>) -> String {
    matches.sort_by(|a, b| b.offset.cmp(&a.offset));

    let mut chars: Vec<char> = text.chars().collect();
    for m in matches {
        let Some(replacement) = m.replacements.first() else {
            continue;
        };
        if m.offset + m.length > chars.len() {
            warn!(
                "Skipping grammar match out of bounds: offset {} length {}",
                m.offset, m.length
            );
            continue;
        }
        chars.splice(m.offset..m.offset + m.length, replacement.value.chars());
    }
    chars.into_iter().collect()
}
