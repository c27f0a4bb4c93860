use reqwest::StatusCode;
use thiserror::Error;

/// Errors from the fetch step.
///
/// Extraction never fails; these cover the HTTP client and transport
/// only, and map to exit code 2 in the CLI.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not construct http client: {0}")]
    BuildClient(#[source] reqwest::Error),
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("dictionary server returned HTTP {0}")]
    BadStatus(StatusCode),
}
