//! Literature-index providers.
//!
//! The orchestrator only sees [`PaperProvider`]; [`arxiv::ArxivClient`] is
//! the concrete implementation talking to the arXiv export API.

pub mod arxiv;
pub mod atom;

use thiserror::Error;

use crate::paper::FetchedPaper;
use crate::query::SearchRequest;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// Connection, timeout or other transport failure.
    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),

    /// The provider understood the request and rejected it.
    #[error("Provider rejected query: {0}")]
    Api(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ProviderError {
    /// Whether a retry could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Network(_) => true,
            ProviderError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Source of paper records for a normalized request.
///
/// Implementations honour the request's provider query, sort key, sort
/// direction and result cap, and return records in provider order.
pub trait PaperProvider {
    fn fetch(&self, request: &SearchRequest) -> ProviderResult<Vec<FetchedPaper>>;

    /// Human-readable name, for logs.
    fn name(&self) -> &str;
}

impl<P: PaperProvider + ?Sized> PaperProvider for &P {
    fn fetch(&self, request: &SearchRequest) -> ProviderResult<Vec<FetchedPaper>> {
        (**self).fetch(request)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<P: PaperProvider + ?Sized> PaperProvider for Box<P> {
    fn fetch(&self, request: &SearchRequest) -> ProviderResult<Vec<FetchedPaper>> {
        (**self).fetch(request)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16) -> ProviderError {
        ProviderError::Status { status: code, body: String::new() }
    }

    #[test]
    fn transient_errors() {
        assert!(ProviderError::Network("timed out".into()).is_transient());
        assert!(status(429).is_transient());
        assert!(status(500).is_transient());
        assert!(status(503).is_transient());
    }

    #[test]
    fn permanent_errors() {
        assert!(!status(400).is_transient());
        assert!(!status(404).is_transient());
        assert!(!status(499).is_transient());
        assert!(!ProviderError::Parse("bad xml".into()).is_transient());
        assert!(!ProviderError::Api("malformed query".into()).is_transient());
        assert!(!ProviderError::Config("no client".into()).is_transient());
    }
}
