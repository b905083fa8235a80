//! Request handlers.
//!
//! Each variant answers two questions: can it handle this request, and what
//! does it say. Handlers read the request and the shared knowledge provider
//! only; none of them keeps state between requests.

use tracing::{debug, info};

use crate::envelope::request::{LAUNCH_REQUEST, SESSION_ENDED_REQUEST};
use crate::envelope::{RequestKind, Response, ResponseBuilder};
use crate::knowledge::{self, LookupAuth};
use crate::skill::{HandlerInput, SkillError, resolver};

pub const COUNTRY_KNOWLEDGE_INTENT: &str = "CountryKnowledgeIntent";
pub const HELP_INTENT: &str = "AMAZON.HelpIntent";
pub const CANCEL_INTENT: &str = "AMAZON.CancelIntent";
pub const STOP_INTENT: &str = "AMAZON.StopIntent";

pub const WELCOME: &str = "Welcome, ask me about a country.";
pub const HELP: &str = "You can ask me about any country! How can I help?";
pub const GOODBYE: &str = "Goodbye!";
pub const NOT_SURE: &str = "Sorry, I'm not sure about that.";
pub const NOT_SURE_REPROMPT: &str = "Ask me about another country";
pub const ANOTHER_COUNTRY_REPROMPT: &str = "Ask me about another country.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestHandler {
    Launch,
    CountryKnowledge,
    Help,
    CancelOrStop,
    SessionEnded,
    /// Echoes any intent back. Must stay last in the handler list.
    IntentReflector,
}

impl RequestHandler {
    pub fn name(&self) -> &'static str {
        match self {
            RequestHandler::Launch => "launch",
            RequestHandler::CountryKnowledge => "country_knowledge",
            RequestHandler::Help => "help",
            RequestHandler::CancelOrStop => "cancel_or_stop",
            RequestHandler::SessionEnded => "session_ended",
            RequestHandler::IntentReflector => "intent_reflector",
        }
    }

    pub fn can_handle(&self, input: &HandlerInput<'_>) -> bool {
        let env = input.envelope;
        match self {
            RequestHandler::Launch => env.is_request_type(LAUNCH_REQUEST),
            RequestHandler::CountryKnowledge => env.is_intent_name(COUNTRY_KNOWLEDGE_INTENT),
            RequestHandler::Help => env.is_intent_name(HELP_INTENT),
            RequestHandler::CancelOrStop => {
                env.is_intent_name(CANCEL_INTENT) || env.is_intent_name(STOP_INTENT)
            }
            RequestHandler::SessionEnded => env.is_request_type(SESSION_ENDED_REQUEST),
            RequestHandler::IntentReflector => env.request.kind() == RequestKind::Intent,
        }
    }

    pub async fn handle(&self, input: &HandlerInput<'_>) -> Result<Response, SkillError> {
        match self {
            RequestHandler::Launch => Ok(ResponseBuilder::new().speak(WELCOME).ask(WELCOME).build()),
            RequestHandler::CountryKnowledge => country_knowledge(input).await,
            RequestHandler::Help => Ok(ResponseBuilder::new().speak(HELP).ask(HELP).build()),
            RequestHandler::CancelOrStop => Ok(ResponseBuilder::new()
                .speak(GOODBYE)
                .set_should_end_session(true)
                .build()),
            RequestHandler::SessionEnded => {
                info!(
                    reason = ?input.envelope.request.reason,
                    error = ?input.envelope.request.error,
                    "session ended"
                );
                Ok(Response::default())
            }
            RequestHandler::IntentReflector => intent_reflector(input),
        }
    }
}

/// Resolve the country slot, look the entity up, and speak its facts.
async fn country_knowledge(input: &HandlerInput<'_>) -> Result<Response, SkillError> {
    let env = input.envelope;
    let slot = env.slot(&input.resolution.slot);

    if let Some(resolutions) = resolver::slot_resolutions(slot, &input.resolution.authority)?
        && let Some(first) = resolutions.first()
    {
        let value = first.values.first().ok_or_else(|| {
            SkillError::MalformedRequest("matched resolution carries no values".into())
        })?;
        let entity_url = value.id().ok_or_else(|| {
            SkillError::MalformedRequest("matched resolution value carries no id".into())
        })?;

        let auth = LookupAuth {
            access_token: env.api_access_token(),
            locale: env.locale(),
        };
        debug!(entity = %entity_url, "slot resolved");

        if let Some(facts) = knowledge::lookup(input.knowledge, entity_url, auth).await? {
            return Ok(ResponseBuilder::new()
                .speak(facts.to_speech())
                .ask(ANOTHER_COUNTRY_REPROMPT)
                .build());
        }
    } else {
        debug!(
            slot = %input.resolution.slot,
            value = ?slot.and_then(|s| s.value.as_deref()),
            "slot not resolved"
        );
    }

    Ok(ResponseBuilder::new().speak(NOT_SURE).ask(NOT_SURE_REPROMPT).build())
}

fn intent_reflector(input: &HandlerInput<'_>) -> Result<Response, SkillError> {
    let intent_name = input
        .envelope
        .intent_name()
        .ok_or_else(|| SkillError::MalformedRequest("intent request without intent".into()))?;

    Ok(ResponseBuilder::new()
        .speak(format!("You just triggered {intent_name}."))
        .set_should_end_session(false)
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::envelope::RequestEnvelope;
    use crate::knowledge::KnowledgeProvider;
    use crate::knowledge::providers::dummy::DummyProvider;
    use serde_json::json;

    fn intent(name: &str) -> RequestEnvelope {
        serde_json::from_value(json!({
            "request": { "type": "IntentRequest", "intent": { "name": name } }
        }))
        .unwrap()
    }

    fn request(request_type: &str) -> RequestEnvelope {
        serde_json::from_value(json!({ "request": { "type": request_type } })).unwrap()
    }

    async fn run(handler: RequestHandler, env: &RequestEnvelope) -> Response {
        let config = Config::test_default();
        let knowledge = KnowledgeProvider::Dummy(DummyProvider::new());
        let input = HandlerInput {
            envelope: env,
            knowledge: &knowledge,
            resolution: &config.resolution,
        };
        assert!(handler.can_handle(&input), "{} should accept request", handler.name());
        handler.handle(&input).await.unwrap()
    }

    #[tokio::test]
    async fn launch_welcomes_and_reprompts_with_same_text() {
        let r = run(RequestHandler::Launch, &request("LaunchRequest")).await;
        assert_eq!(r.speech.as_deref(), Some(WELCOME));
        assert_eq!(r.reprompt.as_deref(), Some(WELCOME));
        assert_eq!(r.should_end_session, Some(false));
    }

    #[tokio::test]
    async fn help_keeps_session_open() {
        let r = run(RequestHandler::Help, &intent(HELP_INTENT)).await;
        assert_eq!(r.speech.as_deref(), Some(HELP));
        assert_eq!(r.reprompt.as_deref(), Some(HELP));
        assert_eq!(r.should_end_session, Some(false));
    }

    #[tokio::test]
    async fn cancel_and_stop_close_session() {
        for name in [CANCEL_INTENT, STOP_INTENT] {
            let r = run(RequestHandler::CancelOrStop, &intent(name)).await;
            assert_eq!(r.speech.as_deref(), Some(GOODBYE));
            assert_eq!(r.reprompt, None);
            assert_eq!(r.should_end_session, Some(true));
        }
    }

    #[tokio::test]
    async fn session_ended_says_nothing() {
        let r = run(RequestHandler::SessionEnded, &request("SessionEndedRequest")).await;
        assert_eq!(r, Response::default());
    }

    #[tokio::test]
    async fn reflector_echoes_intent_name() {
        let r = run(RequestHandler::IntentReflector, &intent("OrderPizzaIntent")).await;
        assert_eq!(r.speech.as_deref(), Some("You just triggered OrderPizzaIntent."));
        assert_eq!(r.reprompt, None);
        assert_eq!(r.should_end_session, Some(false));
    }

    #[tokio::test]
    async fn country_without_slot_falls_back() {
        let r = run(RequestHandler::CountryKnowledge, &intent(COUNTRY_KNOWLEDGE_INTENT)).await;
        assert_eq!(r.speech.as_deref(), Some(NOT_SURE));
        assert_eq!(r.reprompt.as_deref(), Some(NOT_SURE_REPROMPT));
        assert_eq!(r.should_end_session, Some(false));
    }

    #[test]
    fn predicates_reject_other_requests() {
        let config = Config::test_default();
        let knowledge = KnowledgeProvider::Dummy(DummyProvider::new());
        let launch = request("LaunchRequest");
        let input = HandlerInput {
            envelope: &launch,
            knowledge: &knowledge,
            resolution: &config.resolution,
        };
        assert!(!RequestHandler::Help.can_handle(&input));
        assert!(!RequestHandler::IntentReflector.can_handle(&input));
        assert!(!RequestHandler::SessionEnded.can_handle(&input));
        assert!(!RequestHandler::CountryKnowledge.can_handle(&input));
    }
}
