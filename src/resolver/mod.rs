use crate::error::ResolveError;
use async_trait::async_trait;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::fmt;

/// Public Odesli endpoint. Overridable for on-prem mirrors and tests.
pub const DEFAULT_API_BASE: &str = "https://api.song.link/v1-alpha.1";

const DEFAULT_USER_COUNTRY: &str = "RU";

/// Cross-platform link resolution boundary. One call per matched URL,
/// no retries; any failure abandons the event upstream.
#[async_trait]
pub trait Resolver: Send + Sync {
    async fn resolve(&self, url: &str) -> Result<ResolveResponse, ResolveError>;
}

// ── Response model ────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResolveResponse {
    #[serde(rename = "entityUniqueId", default)]
    pub entity_unique_id: Option<String>,

    #[serde(rename = "entitiesByUniqueId", default)]
    pub entities_by_unique_id: HashMap<String, ResolvedEntity>,

    /// Platform entries in the order the API returned them. The reply
    /// keyboard preserves this order, so a plain `HashMap` won't do.
    /// `None` when the key is absent entirely — that is a malformed
    /// response, unlike a present-but-empty map.
    #[serde(
        rename = "linksByPlatform",
        default,
        deserialize_with = "ordered_platform_links"
    )]
    pub links_by_platform: Option<Vec<(String, PlatformLink)>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResolvedEntity {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "artistName", default)]
    pub artist_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlatformLink {
    pub url: String,
}

fn ordered_platform_links<'de, D>(
    deserializer: D,
) -> Result<Option<Vec<(String, PlatformLink)>>, D::Error>
where
    D: Deserializer<'de>,
{
    struct PairsVisitor;

    impl<'de> Visitor<'de> for PairsVisitor {
        type Value = Vec<(String, PlatformLink)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of platform keys to links")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry()? {
                pairs.push(entry);
            }
            Ok(pairs)
        }
    }

    deserializer.deserialize_map(PairsVisitor).map(Some)
}

// ── Odesli HTTP adapter ───────────────────────────────────────────

pub struct OdesliResolver {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    user_country: String,
}

impl OdesliResolver {
    pub fn new(api_key: Option<String>, user_country: Option<String>) -> Self {
        Self::with_base_url(DEFAULT_API_BASE, api_key, user_country)
    }

    pub fn with_base_url(
        base_url: &str,
        api_key: Option<String>,
        user_country: Option<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            user_country: user_country.unwrap_or_else(|| DEFAULT_USER_COUNTRY.to_string()),
        }
    }
}

#[async_trait]
impl Resolver for OdesliResolver {
    async fn resolve(&self, url: &str) -> Result<ResolveResponse, ResolveError> {
        let mut params = vec![
            ("url", url.to_string()),
            ("userCountry", self.user_country.clone()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("key", key.clone()));
        }

        let response = self
            .client
            .get(format!("{}/links", self.base_url))
            .query(&params)
            .send()
            .await
            .map_err(|e| ResolveError::Request {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<ResolveResponse>()
            .await
            .map_err(|e| ResolveError::MalformedResponse(e.to_string()))
    }
}
