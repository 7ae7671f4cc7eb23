//! One-shot REST presence lookup, the non-streaming variant of the widget.

use serde::Deserialize;
use tracing::debug;

use crate::types::PresenceData;
use crate::PresenceError;

/// Default Lanyard-compatible REST base.
pub const DEFAULT_API_BASE: &str = "https://api.lanyard.rest/v1";

/// REST response envelope: `{success, data}` on hits, `{success, error}` on
/// misses.
#[derive(Debug, Deserialize)]
struct RestEnvelope {
    success: bool,
    #[serde(default)]
    data: Option<PresenceData>,
    #[serde(default)]
    error: Option<RestErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RestErrorBody {
    #[serde(default)]
    message: String,
}

/// Client for single presence snapshot fetches.
pub struct RestClient {
    api_base: String,
    http: reqwest::Client,
}

impl Default for RestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RestClient {
    pub fn new() -> Self {
        Self::with_api_base(DEFAULT_API_BASE)
    }

    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            http: reqwest::Client::builder()
                .connect_timeout(std::time::Duration::from_secs(10))
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("failed to build HTTP client"),
        }
    }

    /// Fetch the current presence snapshot for one user id.
    pub async fn fetch(&self, user_id: &str) -> Result<PresenceData, PresenceError> {
        if user_id.is_empty() {
            return Err(PresenceError::MissingTarget);
        }

        let url = format!("{}/users/{}", self.api_base, user_id);
        debug!(%url, "Fetching presence snapshot");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| PresenceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let text = text.chars().take(200).collect::<String>();
            return Err(PresenceError::Upstream(format!("HTTP {status}: {text}")));
        }

        let envelope: RestEnvelope = response
            .json()
            .await
            .map_err(|e| PresenceError::Parse(e.to_string()))?;

        match envelope {
            RestEnvelope {
                success: true,
                data: Some(data),
                ..
            } => Ok(data),
            RestEnvelope { error, .. } => Err(PresenceError::Upstream(
                error.map(|e| e.message).unwrap_or_else(|| "presence lookup unsuccessful".into()),
            )),
        }
    }
}
