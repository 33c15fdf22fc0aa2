//! Collaborator error types.

use thiserror::Error;

/// Failures talking to an external collaborator (generative backend, image
/// analysis, web search). Pipeline stages convert every variant into their
/// degraded record; none of these abort a lookup.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service returned a non-success status code.
    #[error("{service} API error ({status}): {message}")]
    Api {
        service: &'static str,
        status: u16,
        message: String,
    },

    /// The service returned 429 Too Many Requests.
    #[error("{service} rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        service: &'static str,
        retry_after_secs: u64,
    },

    /// The response body did not have the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// The response carried no usable content.
    #[error("{0} returned an empty response")]
    EmptyResponse(&'static str),

    /// The collaborator has no credentials configured.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
}
