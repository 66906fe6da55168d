//! Error types for the fallible edges of the core: loading data and talking
//! to collaborators. Rendering itself never fails.

use crate::style::StyleCategory;

/// Errors raised while loading or validating a style catalog.
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    #[error("style catalog JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("style catalog has no `{0}` category")]
    MissingCategory(StyleCategory),

    #[error("style catalog category `{0}` has no templates")]
    EmptyCategory(StyleCategory),
}

/// Errors raised while loading render configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Validation(String),
}

/// Errors raised at the remote article extraction boundary.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("invalid article URL: {0}")]
    InvalidUrl(String),

    #[error("malformed extraction response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("extraction returned no document: {0}")]
    Empty(String),
}

/// Errors raised by a persisted state backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to encode `{key}`: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage backend error: {0}")]
    Backend(String),
}
