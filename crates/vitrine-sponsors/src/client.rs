//! GitHub GraphQL client for the sponsorship passthrough.

use tracing::error;

use crate::types::{GraphQlResponse, Sponsor, SponsorsResponse};
use crate::SponsorsError;

pub(crate) const GITHUB_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// Fixed sponsorship query: first 100, oldest first, public sponsors only.
pub(crate) const SPONSORS_QUERY: &str = r#"
{
    viewer {
        sponsorshipsAsMaintainer(first: 100, activeOnly: false, orderBy: {field: CREATED_AT, direction: ASC}, includePrivate: false) {
            totalCount
            pageInfo {
                endCursor
            }
            nodes {
                sponsorEntity {
                    ... on User {
                        name
                        login
                        avatarUrl
                        url
                    }
                    ... on Organization {
                        name
                        login
                        avatarUrl
                        url
                    }
                }
                createdAt
                privacyLevel
                isActive
            }
        }
    }
}"#;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Credential for the GitHub GraphQL API.
#[derive(Clone)]
pub struct SponsorsConfig {
    pub token: String,
}

impl std::fmt::Debug for SponsorsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SponsorsConfig")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl SponsorsConfig {
    /// Fails fast when the token is absent, before any network activity.
    pub fn new(token: impl Into<String>) -> Result<Self, SponsorsError> {
        let token = token.into();
        if token.is_empty() {
            error!("GitHub token not configured");
            return Err(SponsorsError::MissingToken);
        }
        Ok(Self { token })
    }

    /// Read the token from `GITHUB_TOKEN`.
    pub fn from_env() -> Result<Self, SponsorsError> {
        Self::new(std::env::var("GITHUB_TOKEN").unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Sponsorship passthrough client.
pub struct SponsorsClient {
    config: SponsorsConfig,
    http: reqwest::Client,
}

impl SponsorsClient {
    pub fn new(config: SponsorsConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::builder()
                .connect_timeout(std::time::Duration::from_secs(10))
                .timeout(std::time::Duration::from_secs(30))
                .user_agent("vitrine-sponsors")
                .build()
                .expect("failed to build HTTP client"),
        }
    }

    /// Fetch and reshape the sponsor list.
    ///
    /// The caller only ever sees the fixed error taxonomy; upstream details
    /// are logged, not leaked.
    pub async fn fetch_sponsors(&self) -> Result<SponsorsResponse, SponsorsError> {
        let body = serde_json::json!({ "query": SPONSORS_QUERY });

        let response = self
            .http
            .post(GITHUB_GRAPHQL_URL)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .header("Authorization", format!("bearer {}", self.config.token))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to reach GitHub GraphQL API");
                SponsorsError::Upstream
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(%status, "GitHub GraphQL API returned an error status");
            return Err(SponsorsError::Upstream);
        }

        let json: serde_json::Value = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to read GitHub GraphQL response");
            SponsorsError::Upstream
        })?;

        parse_sponsors(json)
    }
}

/// Reshape a raw GraphQL response into the passthrough payload.
///
/// A response carrying an `errors` field yields an auth failure and no
/// partial data.
pub(crate) fn parse_sponsors(json: serde_json::Value) -> Result<SponsorsResponse, SponsorsError> {
    let parsed: GraphQlResponse = serde_json::from_value(json).map_err(|e| {
        error!(error = %e, "Unexpected GitHub GraphQL response shape");
        SponsorsError::Upstream
    })?;

    if let Some(errors) = parsed.errors {
        error!(errors = %errors, "GraphQL errors from GitHub");
        return Err(SponsorsError::AuthFailed);
    }

    let connection = parsed
        .data
        .ok_or_else(|| {
            error!("GitHub GraphQL response missing data");
            SponsorsError::Upstream
        })?
        .viewer
        .sponsorships_as_maintainer;

    let sponsors = connection
        .nodes
        .into_iter()
        .filter_map(|node| {
            let entity = node.sponsor_entity?;
            Some(Sponsor {
                name: entity.name,
                login: entity.login,
                avatar_url: entity.avatar_url,
                url: entity.url,
                created_at: node.created_at,
                is_active: node.is_active,
            })
        })
        .collect();

    Ok(SponsorsResponse {
        total_count: connection.total_count,
        sponsors,
    })
}
