//! HTTP knowledge provider: GET on the entity URL itself.
//!
//! The entity id handed out by entity resolution is already a fetchable
//! URL, so there is no base URL to configure. The caller's access token
//! and locale are forwarded on every request.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::ACCEPT_LANGUAGE;
use tracing::{debug, error};

use crate::knowledge::{FetchedEntity, KnowledgeError, LookupAuth};

/// Constructed once at startup, then cheaply cloned because
/// `reqwest::Client` is an `Arc` internally.
#[derive(Debug, Clone)]
pub struct HttpProvider {
    client: Client,
}

impl HttpProvider {
    /// `timeout_seconds = None` leaves timing to the outer invocation.
    pub fn new(timeout_seconds: Option<u64>) -> Result<Self, KnowledgeError> {
        let mut builder = Client::builder();
        if let Some(secs) = timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| KnowledgeError::Client(e.to_string()))?;
        Ok(Self { client })
    }

    /// One round-trip, no retry. Any HTTP status is returned as data;
    /// only transport failures are errors.
    pub async fn fetch(
        &self,
        entity_url: &str,
        auth: LookupAuth<'_>,
    ) -> Result<FetchedEntity, KnowledgeError> {
        let mut req = self.client.get(entity_url);
        if let Some(token) = auth.access_token {
            req = req.bearer_auth(token);
        } else {
            debug!(entity = %entity_url, "no api access token on request");
        }
        if let Some(locale) = auth.locale {
            req = req.header(ACCEPT_LANGUAGE, locale);
        }

        debug!(entity = %entity_url, locale = ?auth.locale, "sending entity request");

        let response = req.send().await.map_err(|e| {
            error!(entity = %entity_url, error = %e, timeout = e.is_timeout(), "entity request failed (transport)");
            KnowledgeError::Transport(e.to_string())
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            error!(entity = %entity_url, status, error = %e, "failed to read entity body");
            KnowledgeError::Transport(format!("failed to read response body: {e}"))
        })?;

        debug!(entity = %entity_url, status, body_len = body.len(), "received entity response");
        Ok(FetchedEntity { status, body })
    }
}
