//! Shared HTTP response handling for collaborator clients.
//!
//! Maps 429 to [`CollaboratorError::RateLimited`] (reading `Retry-After`,
//! 60 s when absent) and any other non-success status to
//! [`CollaboratorError::Api`] carrying the body text.

use crate::error::CollaboratorError;

pub async fn ensure_success(
    service: &'static str,
    resp: reqwest::Response,
) -> Result<reqwest::Response, CollaboratorError> {
    let status = resp.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(CollaboratorError::RateLimited {
            service,
            retry_after_secs: retry_after_secs(&resp),
        });
    }
    if !status.is_success() {
        return Err(CollaboratorError::Api {
            service,
            status: status.as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

fn retry_after_secs(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(60)
}
