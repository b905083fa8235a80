//! Inbound request envelope.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{Map, Value};

pub const LAUNCH_REQUEST: &str = "LaunchRequest";
pub const INTENT_REQUEST: &str = "IntentRequest";
pub const SESSION_ENDED_REQUEST: &str = "SessionEndedRequest";

/// One invocation's worth of input.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub session: Option<Session>,
    #[serde(default)]
    pub context: Option<Context>,
    pub request: Request,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub application: Option<Application>,
    #[serde(default)]
    pub attributes: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Context {
    #[serde(rename = "System", default)]
    pub system: Option<SystemState>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemState {
    #[serde(default)]
    pub api_access_token: Option<String>,
    #[serde(default)]
    pub api_endpoint: Option<String>,
    #[serde(default)]
    pub application: Option<Application>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(default)]
    pub application_id: Option<String>,
}

/// The `request` object. The `type` tag is kept as a string so request
/// types the skill has never heard of still deserialize.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[serde(rename = "type")]
    pub request_type: String,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub intent: Option<Intent>,
    /// `SessionEndedRequest` only.
    #[serde(default)]
    pub reason: Option<String>,
    /// `SessionEndedRequest` only, when the session ended on a platform error.
    #[serde(default)]
    pub error: Option<Value>,
}

/// Coarse request classification used by handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Launch,
    Intent,
    SessionEnded,
    Other,
}

impl Request {
    pub fn kind(&self) -> RequestKind {
        match self.request_type.as_str() {
            LAUNCH_REQUEST => RequestKind::Launch,
            INTENT_REQUEST => RequestKind::Intent,
            SESSION_ENDED_REQUEST => RequestKind::SessionEnded,
            _ => RequestKind::Other,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Intent {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slots: Option<HashMap<String, Slot>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Slot {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub resolutions: Option<Resolutions>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolutions {
    #[serde(default)]
    pub resolutions_per_authority: Option<Vec<Resolution>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Resolution {
    #[serde(default)]
    pub authority: Option<String>,
    #[serde(default)]
    pub status: Option<ResolutionStatus>,
    #[serde(default)]
    pub values: Vec<ResolutionValue>,
}

impl Resolution {
    pub fn status_code(&self) -> StatusCode {
        self.status.as_ref().map_or(StatusCode::Unknown, |s| s.code)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResolutionStatus {
    #[serde(default)]
    pub code: StatusCode,
}

/// Entity resolution status codes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum StatusCode {
    #[serde(rename = "ER_SUCCESS_MATCH")]
    SuccessMatch,
    #[serde(rename = "ER_SUCCESS_NO_MATCH")]
    SuccessNoMatch,
    #[serde(rename = "ER_ERROR_TIMEOUT")]
    ErrorTimeout,
    #[serde(rename = "ER_ERROR_EXCEPTION")]
    ErrorException,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResolutionValue {
    #[serde(default)]
    pub value: Option<CanonicalValue>,
}

impl ResolutionValue {
    /// The canonical id, the entity URL for `AlexaEntities`.
    pub fn id(&self) -> Option<&str> {
        self.value.as_ref()?.id.as_deref()
    }
}

/// A canonical entity; `id` is the entity URL for `AlexaEntities`.
#[derive(Debug, Clone, Deserialize)]
pub struct CanonicalValue {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

impl RequestEnvelope {
    pub fn request_type(&self) -> &str {
        &self.request.request_type
    }

    pub fn is_request_type(&self, request_type: &str) -> bool {
        self.request.request_type == request_type
    }

    /// Intent name, only for `IntentRequest`s.
    pub fn intent_name(&self) -> Option<&str> {
        if self.request.kind() != RequestKind::Intent {
            return None;
        }
        self.request.intent.as_ref()?.name.as_deref()
    }

    pub fn is_intent_name(&self, name: &str) -> bool {
        self.intent_name() == Some(name)
    }

    pub fn slot(&self, name: &str) -> Option<&Slot> {
        self.request
            .intent
            .as_ref()?
            .slots
            .as_ref()?
            .get(name)
    }

    pub fn api_access_token(&self) -> Option<&str> {
        self.context
            .as_ref()?
            .system
            .as_ref()?
            .api_access_token
            .as_deref()
    }

    pub fn locale(&self) -> Option<&str> {
        self.request.locale.as_deref()
    }

    pub fn request_id(&self) -> &str {
        self.request.request_id.as_deref().unwrap_or("-")
    }

    /// Application id from the context, falling back to the session.
    pub fn application_id(&self) -> Option<&str> {
        let from_context = self
            .context
            .as_ref()
            .and_then(|c| c.system.as_ref())
            .and_then(|s| s.application.as_ref())
            .and_then(|a| a.application_id.as_deref());
        from_context.or_else(|| {
            self.session
                .as_ref()?
                .application
                .as_ref()?
                .application_id
                .as_deref()
        })
    }

    pub fn session_attributes(&self) -> Option<&Map<String, Value>> {
        self.session.as_ref()?.attributes.as_ref()
    }
}
