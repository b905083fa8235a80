//! Axum handlers for `/api/*` routes.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, warn};

use super::AxumState;
use super::verify;
use crate::envelope::RequestEnvelope;
use crate::skill::SkillError;

/// Build a JSON error response body.
fn json_error(code: &str, msg: impl std::fmt::Display) -> Json<serde_json::Value> {
    Json(json!({ "error": code, "message": format!("{msg}") }))
}

/// GET /api/health
pub(super) async fn health(State(state): State<AxumState>) -> Response {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "skill": state.skill.name(),
            "knowledge": state.skill.knowledge_provider(),
            "handlers": state.skill.handler_names(),
        })),
    )
        .into_response()
}

/// POST /api/skill
///
/// The body is parsed by hand so a malformed envelope gets the same JSON
/// error shape as every other rejection.
pub(super) async fn skill(State(state): State<AxumState>, body: Bytes) -> Response {
    let envelope: RequestEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(channel_id = %state.channel_id, "malformed request envelope: {e}");
            return (StatusCode::BAD_REQUEST, json_error("bad_request", e)).into_response();
        }
    };

    if state.max_request_age_seconds > 0
        && let Err(e) = verify::check_timestamp(
            envelope.request.timestamp.as_deref(),
            chrono::Utc::now(),
            state.max_request_age_seconds,
        )
    {
        warn!(channel_id = %state.channel_id, request_id = %envelope.request_id(), "{e}");
        return (StatusCode::BAD_REQUEST, json_error("stale_request", e)).into_response();
    }

    match state.skill.invoke(&envelope).await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(e @ SkillError::SkillIdMismatch { .. }) => {
            warn!(channel_id = %state.channel_id, request_id = %envelope.request_id(), "{e}");
            (StatusCode::FORBIDDEN, json_error("forbidden", e)).into_response()
        }
        Err(e) => {
            error!(channel_id = %state.channel_id, request_id = %envelope.request_id(), "skill invoke failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, json_error("internal", e)).into_response()
        }
    }
}
