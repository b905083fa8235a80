//! Outbound response envelope and the builder handlers use to fill it.

use serde::Serialize;
use serde_json::{Map, Value};

pub const RESPONSE_VERSION: &str = "1.0";

/// What a handler decided to say.
///
/// `should_end_session` is tri-state on the wire: `None` leaves the decision
/// to the platform and is omitted from the JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    pub speech: Option<String>,
    pub reprompt: Option<String>,
    pub should_end_session: Option<bool>,
}

impl Response {
    /// Wrap into the wire envelope, echoing the caller's session attributes.
    pub fn into_envelope(self, session_attributes: Option<&Map<String, Value>>) -> ResponseEnvelope {
        ResponseEnvelope {
            version: RESPONSE_VERSION.to_string(),
            session_attributes: session_attributes.filter(|a| !a.is_empty()).cloned(),
            response: ResponseBody {
                output_speech: self.speech.map(OutputSpeech::plain_text),
                reprompt: self.reprompt.map(|text| Reprompt {
                    output_speech: OutputSpeech::plain_text(text),
                }),
                should_end_session: self.should_end_session,
            },
        }
    }
}

/// Fluent builder mirroring the platform's speak/ask vocabulary.
#[derive(Debug, Default)]
pub struct ResponseBuilder {
    response: Response,
}

impl ResponseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn speak(mut self, speech: impl Into<String>) -> Self {
        self.response.speech = Some(speech.into());
        self
    }

    /// Set the reprompt; a reprompt keeps the session open.
    pub fn ask(mut self, reprompt: impl Into<String>) -> Self {
        self.response.reprompt = Some(reprompt.into());
        self.response.should_end_session = Some(false);
        self
    }

    pub fn set_should_end_session(mut self, end: bool) -> Self {
        self.response.should_end_session = Some(end);
        self
    }

    pub fn build(self) -> Response {
        self.response
    }
}

// ── Wire types ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_attributes: Option<Map<String, Value>>,
    pub response: ResponseBody,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_end_session: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum OutputSpeech {
    PlainText { text: String },
}

impl OutputSpeech {
    pub fn plain_text(text: impl Into<String>) -> Self {
        OutputSpeech::PlainText { text: text.into() }
    }

    pub fn text(&self) -> &str {
        match self {
            OutputSpeech::PlainText { text } => text,
        }
    }
}

impl ResponseEnvelope {
    pub fn speech(&self) -> Option<&str> {
        self.response.output_speech.as_ref().map(OutputSpeech::text)
    }

    pub fn reprompt(&self) -> Option<&str> {
        self.response.reprompt.as_ref().map(|r| r.output_speech.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ask_keeps_session_open() {
        let r = ResponseBuilder::new().speak("hi").ask("again?").build();
        assert_eq!(r.should_end_session, Some(false));
        assert_eq!(r.reprompt.as_deref(), Some("again?"));
    }

    #[test]
    fn speak_alone_leaves_session_flag_unset() {
        let r = ResponseBuilder::new().speak("bye").build();
        assert_eq!(r.should_end_session, None);
        assert_eq!(r.reprompt, None);
    }

    #[test]
    fn envelope_json_layout() {
        let env = ResponseBuilder::new()
            .speak("Welcome.")
            .ask("Welcome.")
            .build()
            .into_envelope(None);
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(
            v,
            json!({
                "version": "1.0",
                "response": {
                    "outputSpeech": { "type": "PlainText", "text": "Welcome." },
                    "reprompt": { "outputSpeech": { "type": "PlainText", "text": "Welcome." } },
                    "shouldEndSession": false
                }
            })
        );
    }

    #[test]
    fn empty_response_serializes_bare_body() {
        let env = Response::default().into_envelope(None);
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(v, json!({ "version": "1.0", "response": {} }));
    }

    #[test]
    fn session_attributes_echoed_when_present() {
        let mut attrs = Map::new();
        attrs.insert("turn".into(), json!(3));
        let env = Response::default().into_envelope(Some(&attrs));
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(v["sessionAttributes"]["turn"], 3);

        let empty = Map::new();
        let env = Response::default().into_envelope(Some(&empty));
        assert!(env.session_attributes.is_none());
    }
}
