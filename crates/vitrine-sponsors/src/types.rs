//! GitHub sponsorship GraphQL response shapes and the reshaped records.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Reshaped output
// ---------------------------------------------------------------------------

/// One sponsor record as served to the website.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sponsor {
    /// Display name; null for accounts that never set one.
    pub name: Option<String>,
    pub login: String,
    pub avatar_url: String,
    pub url: String,
    pub created_at: String,
    pub is_active: bool,
}

/// Reshaped passthrough payload: `{totalCount, sponsors}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorsResponse {
    pub total_count: u64,
    pub sponsors: Vec<Sponsor>,
}

// ---------------------------------------------------------------------------
// Upstream GraphQL shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse {
    #[serde(default)]
    pub errors: Option<serde_json::Value>,
    #[serde(default)]
    pub data: Option<GraphQlData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlData {
    pub viewer: Viewer,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Viewer {
    pub sponsorships_as_maintainer: SponsorshipConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SponsorshipConnection {
    pub total_count: u64,
    pub nodes: Vec<SponsorshipNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SponsorshipNode {
    /// Empty for entity types the query's fragments do not cover.
    #[serde(default)]
    pub sponsor_entity: Option<SponsorEntity>,
    pub created_at: String,
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SponsorEntity {
    pub name: Option<String>,
    pub login: String,
    pub avatar_url: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sponsor_serializes_camel_case_with_exactly_six_fields() {
        let sponsor = Sponsor {
            name: Some("Ada".to_string()),
            login: "ada".to_string(),
            avatar_url: "https://avatars.githubusercontent.com/u/1".to_string(),
            url: "https://github.com/ada".to_string(),
            created_at: "2023-01-01T00:00:00Z".to_string(),
            is_active: true,
        };

        let value = serde_json::to_value(&sponsor).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 6);
        for key in ["name", "login", "avatarUrl", "url", "createdAt", "isActive"] {
            assert!(obj.contains_key(key), "missing key {key}");
        }
    }

    #[test]
    fn response_total_count_is_camel_case() {
        let response = SponsorsResponse {
            total_count: 2,
            sponsors: vec![],
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["totalCount"], 2);
    }
}
