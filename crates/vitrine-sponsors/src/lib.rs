//! GitHub sponsorship passthrough.
//!
//! Forwards a credentialed GraphQL query to GitHub's sponsorship API and
//! reshapes the result to `{totalCount, sponsors}`. Upstream failures map to
//! a fixed error taxonomy; originating errors are logged, never leaked.

mod client;
mod types;

pub use client::{SponsorsClient, SponsorsConfig};
pub use types::{Sponsor, SponsorsResponse};

#[derive(Debug, thiserror::Error)]
pub enum SponsorsError {
    /// No GitHub token available. Surfaced as a server error.
    #[error("GitHub API configuration missing")]
    MissingToken,
    /// The upstream response carried a GraphQL `errors` field.
    #[error("GitHub API authentication failed")]
    AuthFailed,
    /// Any other transport, status, or shape failure.
    #[error("Failed to fetch sponsors data")]
    Upstream,
}

impl SponsorsError {
    /// HTTP status a serving shim should attach to this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::AuthFailed => 401,
            Self::MissingToken | Self::Upstream => 500,
        }
    }
}
