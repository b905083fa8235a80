//! Skill: the ordered handler list and the dispatch over it.
//!
//! [`Skill::new`] composes the handler list once at startup; the result is
//! immutable and shared by every request. Dispatch walks the list in order
//! and the first handler whose `can_handle` accepts the request wins, so
//! [`RequestHandler::IntentReflector`] sits last.
//!
//! Every error raised while handling goes through [`exception::handle`];
//! [`Skill::invoke`] only fails when the request is rejected before
//! dispatch (skill id verification).

pub mod exception;
pub mod handlers;
pub mod resolver;

use thiserror::Error;
use tracing::{debug, info};

use crate::config::{Config, ResolutionConfig};
use crate::envelope::{RequestEnvelope, Response, ResponseEnvelope};
use crate::knowledge::{self, KnowledgeError, KnowledgeProvider};

pub use handlers::RequestHandler;

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SkillError {
    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),
    #[error("no handler accepts request type {request_type}")]
    NoHandler { request_type: String },
    #[error("malformed request: {0}")]
    MalformedRequest(String),
    #[error("skill id verification failed: expected {expected}, got {actual:?}")]
    SkillIdMismatch { expected: String, actual: Option<String> },
}

// ── Handler input ─────────────────────────────────────────────────────────────

/// Everything a handler may read for one request.
pub struct HandlerInput<'a> {
    pub envelope: &'a RequestEnvelope,
    pub knowledge: &'a KnowledgeProvider,
    pub resolution: &'a ResolutionConfig,
}

// ── Skill ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Skill {
    name: String,
    skill_id: Option<String>,
    handlers: Vec<RequestHandler>,
    knowledge: KnowledgeProvider,
    resolution: ResolutionConfig,
}

impl Skill {
    /// Registration order is priority order.
    pub fn new(config: &Config, knowledge: KnowledgeProvider) -> Self {
        Self {
            name: config.skill_name.clone(),
            skill_id: config.skill_id.clone(),
            handlers: vec![
                RequestHandler::Launch,
                RequestHandler::CountryKnowledge,
                RequestHandler::Help,
                RequestHandler::CancelOrStop,
                RequestHandler::SessionEnded,
                RequestHandler::IntentReflector,
            ],
            knowledge,
            resolution: config.resolution.clone(),
        }
    }

    /// Build the configured knowledge provider, then the skill.
    pub fn from_config(config: &Config) -> Result<Self, KnowledgeError> {
        let knowledge = knowledge::providers::build(&config.knowledge)?;
        Ok(Self::new(config, knowledge))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(RequestHandler::name).collect()
    }

    pub fn knowledge_provider(&self) -> &str {
        self.knowledge.name()
    }

    /// Handle one request end to end.
    pub async fn invoke(&self, envelope: &RequestEnvelope) -> Result<ResponseEnvelope, SkillError> {
        self.verify_skill_id(envelope)?;

        info!(
            request_id = %envelope.request_id(),
            request_type = %envelope.request_type(),
            intent = ?envelope.intent_name(),
            "request received"
        );

        let input = HandlerInput {
            envelope,
            knowledge: &self.knowledge,
            resolution: &self.resolution,
        };

        let response = match self.dispatch(&input).await {
            Ok(response) => response,
            Err(e) => exception::handle(envelope, &e),
        };

        Ok(response.into_envelope(envelope.session_attributes()))
    }

    async fn dispatch(&self, input: &HandlerInput<'_>) -> Result<Response, SkillError> {
        let handler = self
            .handlers
            .iter()
            .find(|h| h.can_handle(input))
            .ok_or_else(|| SkillError::NoHandler {
                request_type: input.envelope.request_type().to_string(),
            })?;

        debug!(handler = handler.name(), "dispatching");
        handler.handle(input).await
    }

    fn verify_skill_id(&self, envelope: &RequestEnvelope) -> Result<(), SkillError> {
        let Some(expected) = &self.skill_id else {
            return Ok(());
        };
        match envelope.application_id() {
            Some(actual) if actual == expected => Ok(()),
            actual => Err(SkillError::SkillIdMismatch {
                expected: expected.clone(),
                actual: actual.map(str::to_string),
            }),
        }
    }
}
