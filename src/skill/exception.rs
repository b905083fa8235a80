//! Catch-all exception handler.

use tracing::error;

use crate::envelope::{RequestEnvelope, Response, ResponseBuilder};
use crate::skill::SkillError;

pub const APOLOGY: &str = "Sorry, I had trouble doing what you asked. Please try again.";

/// Log `err` in full and turn it into the fixed apology. Never fails.
pub fn handle(envelope: &RequestEnvelope, err: &SkillError) -> Response {
    error!(
        request_id = %envelope.request_id(),
        request_type = %envelope.request_type(),
        intent = ?envelope.intent_name(),
        error = %err,
        detail = ?err,
        "request handling failed"
    );

    ResponseBuilder::new().speak(APOLOGY).ask(APOLOGY).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::KnowledgeError;

    #[test]
    fn apology_keeps_session_open() {
        let env: RequestEnvelope =
            serde_json::from_value(serde_json::json!({ "request": { "type": "LaunchRequest" } })).unwrap();
        let err = SkillError::Knowledge(KnowledgeError::Transport("connection refused".into()));
        let r = handle(&env, &err);
        assert_eq!(r.speech.as_deref(), Some(APOLOGY));
        assert_eq!(r.reprompt.as_deref(), Some(APOLOGY));
        assert_eq!(r.should_end_session, Some(false));
    }
}
