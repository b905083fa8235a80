//! Dummy knowledge provider: canned answers from memory.
//! Unknown entity URLs answer 404, so the skill runs offline without
//! ever reaching a real knowledge service.

use std::collections::HashMap;
use std::sync::Arc;

use crate::knowledge::{FetchedEntity, KnowledgeError, LookupAuth};

#[derive(Debug, Clone, Default)]
pub struct DummyProvider {
    entities: Arc<HashMap<String, FetchedEntity>>,
}

impl DummyProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a canned `(status, body)` for `entity_url`.
    pub fn with_entity(mut self, entity_url: &str, status: u16, body: &str) -> Self {
        Arc::make_mut(&mut self.entities).insert(
            entity_url.to_string(),
            FetchedEntity { status, body: body.to_string() },
        );
        self
    }

    pub async fn fetch(
        &self,
        entity_url: &str,
        _auth: LookupAuth<'_>,
    ) -> Result<FetchedEntity, KnowledgeError> {
        Ok(self.entities.get(entity_url).cloned().unwrap_or(FetchedEntity {
            status: 404,
            body: String::new(),
        }))
    }
}
