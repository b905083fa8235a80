//! Knowledge lookup: one GET against a resolved entity URL.
//!
//! `KnowledgeProvider` is an enum over concrete fetch backends; the
//! interpretation of what came back (status, required fields, localized
//! values) lives in [`lookup`] so every backend shares it.
//!
//! Outcomes:
//! - `Ok(Some(facts))`: the entity has everything needed for an answer.
//! - `Ok(None)`: non-200 status or the `capital`/`politicalLeader` key absent.
//!   A normal miss, not an error.
//! - `Err(_)`: transport failure or a payload that cannot be read.

pub mod entity;
pub mod providers;

use thiserror::Error;
use tracing::{debug, info};

pub use entity::{CountryFacts, Entity};

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("unknown knowledge provider: {0}")]
    UnknownProvider(String),
    #[error("failed to build HTTP client: {0}")]
    Client(String),
    #[error("knowledge request failed: {0}")]
    Transport(String),
    #[error("malformed entity payload: {0}")]
    MalformedBody(String),
}

// ── Fetch result ──────────────────────────────────────────────────────────────

/// Raw answer from the knowledge service, before interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedEntity {
    pub status: u16,
    pub body: String,
}

/// Per-request caller credentials forwarded to the knowledge service.
#[derive(Debug, Clone, Copy, Default)]
pub struct LookupAuth<'a> {
    /// Sent as `Authorization: Bearer <token>`.
    pub access_token: Option<&'a str>,
    /// Sent as `Accept-Language`.
    pub locale: Option<&'a str>,
}

// ── Provider enum ─────────────────────────────────────────────────────────────

/// All available knowledge backends.
///
/// Enum dispatch keeps `async fn fetch` free of trait objects.
#[derive(Debug, Clone)]
pub enum KnowledgeProvider {
    Http(providers::http::HttpProvider),
    Dummy(providers::dummy::DummyProvider),
}

impl KnowledgeProvider {
    pub fn name(&self) -> &'static str {
        match self {
            KnowledgeProvider::Http(_) => "http",
            KnowledgeProvider::Dummy(_) => "dummy",
        }
    }

    /// Issue the single GET for `entity_url`.
    pub async fn fetch(
        &self,
        entity_url: &str,
        auth: LookupAuth<'_>,
    ) -> Result<FetchedEntity, KnowledgeError> {
        match self {
            KnowledgeProvider::Http(p) => p.fetch(entity_url, auth).await,
            KnowledgeProvider::Dummy(p) => p.fetch(entity_url, auth).await,
        }
    }
}

/// Fetch `entity_url` and extract the facts the skill speaks about.
pub async fn lookup(
    provider: &KnowledgeProvider,
    entity_url: &str,
    auth: LookupAuth<'_>,
) -> Result<Option<CountryFacts>, KnowledgeError> {
    let fetched = provider.fetch(entity_url, auth).await?;
    interpret(entity_url, fetched)
}

fn interpret(entity_url: &str, fetched: FetchedEntity) -> Result<Option<CountryFacts>, KnowledgeError> {
    if fetched.status != 200 {
        info!(entity = %entity_url, status = fetched.status, "entity lookup returned no data");
        return Ok(None);
    }

    let payload: serde_json::Value = serde_json::from_str(&fetched.body)
        .map_err(|e| KnowledgeError::MalformedBody(format!("{entity_url}: {e}")))?;
    debug!(entity = %entity_url, body = %fetched.body, "entity fetched");

    // Key presence decides between a miss and an answer; a present key with
    // an unusable value (`null`, wrong shape) is a malformed payload.
    let has_facts = payload.get("capital").is_some() && payload.get("politicalLeader").is_some();
    if !has_facts {
        info!(entity = %entity_url, "entity lacks capital or political leader");
        return Ok(None);
    }

    let entity: Entity = serde_json::from_value(payload)
        .map_err(|e| KnowledgeError::MalformedBody(format!("{entity_url}: {e}")))?;
    entity
        .country_facts()
        .map(Some)
        .map_err(|field| KnowledgeError::MalformedBody(format!("{entity_url}: missing {field}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::providers::dummy::DummyProvider;

    const GERMANY: &str = r#"{
        "name": [{"@value": "Germany"}],
        "capital": [{"name": [{"@value": "Berlin"}]}],
        "politicalLeader": [{"name": [{"@value": "Frank-Walter Steinmeier"}]}]
    }"#;

    const URL: &str = "https://kg.example/Q183";

    fn provider_with(status: u16, body: &str) -> KnowledgeProvider {
        KnowledgeProvider::Dummy(DummyProvider::new().with_entity(URL, status, body))
    }

    #[tokio::test]
    async fn full_entity_yields_facts() {
        let p = provider_with(200, GERMANY);
        let facts = lookup(&p, URL, LookupAuth::default()).await.unwrap().unwrap();
        assert_eq!(facts.country, "Germany");
        assert_eq!(facts.capital, "Berlin");
        assert_eq!(facts.political_leader, "Frank-Walter Steinmeier");
    }

    #[tokio::test]
    async fn non_200_is_a_miss() {
        for status in [201, 204, 403, 404, 500] {
            let p = provider_with(status, GERMANY);
            assert!(lookup(&p, URL, LookupAuth::default()).await.unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn unknown_entity_is_a_miss() {
        let p = KnowledgeProvider::Dummy(DummyProvider::new());
        assert!(lookup(&p, URL, LookupAuth::default()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_capital_is_a_miss() {
        let body = r#"{"name":[{"@value":"Atlantis"}],"politicalLeader":[{"name":[{"@value":"Poseidon"}]}]}"#;
        let p = provider_with(200, body);
        assert!(lookup(&p, URL, LookupAuth::default()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_leader_is_a_miss() {
        let body = r#"{"name":[{"@value":"Atlantis"}],"capital":[{"name":[{"@value":"Poseidonia"}]}]}"#;
        let p = provider_with(200, body);
        assert!(lookup(&p, URL, LookupAuth::default()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn non_json_body_is_an_error() {
        let p = provider_with(200, "<html>oops</html>");
        let err = lookup(&p, URL, LookupAuth::default()).await.unwrap_err();
        assert!(matches!(err, KnowledgeError::MalformedBody(_)));
    }

    #[tokio::test]
    async fn empty_capital_list_is_an_error() {
        let body = r#"{"name":[{"@value":"X"}],"capital":[],"politicalLeader":[{"name":[{"@value":"Y"}]}]}"#;
        let p = provider_with(200, body);
        let err = lookup(&p, URL, LookupAuth::default()).await.unwrap_err();
        assert!(err.to_string().contains("capital"));
    }

    #[tokio::test]
    async fn null_capital_is_an_error() {
        let body = r#"{"name":[{"@value":"X"}],"capital":null,"politicalLeader":[{"name":[{"@value":"Y"}]}]}"#;
        let p = provider_with(200, body);
        let err = lookup(&p, URL, LookupAuth::default()).await.unwrap_err();
        assert!(err.to_string().contains("capital"));
    }

    #[tokio::test]
    async fn misshapen_leader_is_an_error() {
        let body = r#"{"name":[{"@value":"X"}],"capital":[{"name":[{"@value":"C"}]}],"politicalLeader":"Y"}"#;
        let p = provider_with(200, body);
        let err = lookup(&p, URL, LookupAuth::default()).await.unwrap_err();
        assert!(matches!(err, KnowledgeError::MalformedBody(_)));
    }

    #[tokio::test]
    async fn non_object_payload_is_a_miss() {
        let p = provider_with(200, "[1, 2, 3]");
        assert!(lookup(&p, URL, LookupAuth::default()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_country_name_is_an_error() {
        let body = r#"{"capital":[{"name":[{"@value":"B"}]}],"politicalLeader":[{"name":[{"@value":"P"}]}]}"#;
        let p = provider_with(200, body);
        let err = lookup(&p, URL, LookupAuth::default()).await.unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn provider_names() {
        assert_eq!(KnowledgeProvider::Dummy(DummyProvider::new()).name(), "dummy");
    }
}
