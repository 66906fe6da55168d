//! Payloads exchanged with the remote article extraction service.
//!
//! The service turns a published article URL into Markdown. Only a complete
//! document string ever leaves this module; partial or failed responses
//! become an [`ExtractError`].

use crate::error::ExtractError;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ExtractionRequest {
    pub url: String,
}

impl ExtractionRequest {
    pub fn new(url: &str) -> Result<Self, ExtractError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ExtractError::InvalidUrl("URL is empty".into()));
        }
        let rest = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .ok_or_else(|| ExtractError::InvalidUrl(format!("`{url}` is not an http(s) URL")))?;
        if rest.is_empty() || rest.starts_with('/') || rest.contains(char::is_whitespace) {
            return Err(ExtractError::InvalidUrl(format!("`{url}` has no host")));
        }
        Ok(Self {
            url: url.to_string(),
        })
    }

    pub fn to_json(&self) -> String {
        serde_json::json!({ "url": self.url }).to_string()
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize)]
pub struct ExtractionResponse {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub markdown: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// Error detail as reported by the service.
    #[serde(default)]
    pub detail: Option<String>,
}

impl ExtractionResponse {
    /// Prefers `markdown`, then `content`. Blank values count as missing.
    pub fn into_document(self) -> Result<String, ExtractError> {
        let document = [self.markdown, self.content]
            .into_iter()
            .flatten()
            .find(|text| !text.trim().is_empty());
        match document {
            Some(text) => {
                tracing::debug!(len = text.len(), title = ?self.title, "extracted article");
                Ok(text)
            }
            None => {
                let reason = self
                    .message
                    .or(self.detail)
                    .unwrap_or_else(|| "response carried no markdown".to_string());
                Err(ExtractError::Empty(reason))
            }
        }
    }
}

pub fn document_from_response(json: &str) -> Result<String, ExtractError> {
    let response: ExtractionResponse = serde_json::from_str(json)?;
    response.into_document()
}
