//! Error types shared across the Palisade crates
//!
//! A provider failure is never allowed to surface to the caller of the
//! decision path: the aggregator maps any `Err` to "no opinion" and keeps
//! going. The types here exist so that mapping is explicit instead of a
//! catch-all.

use thiserror::Error;

/// Result alias for provider calls.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Failure reported by a region provider during a check or lookup.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The backing plugin/service rejected or failed the query.
    #[error("provider backend failure: {0}")]
    Backend(String),

    /// The backing plugin/service is not in a state to answer at all.
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

impl ProviderError {
    /// Shorthand for a backend failure with a formatted message.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}
