//! Axum-based HTTP channel, the skill's inbound endpoint.
//!
//! `run()` drives the axum event loop; the [`CancellationToken`] is wired to
//! axum's graceful shutdown.
//!
//! ## URL layout
//!
//! ```text
//! POST /api/skill    one request envelope in, one response envelope out
//! GET  /api/health
//! GET  /favicon.ico  → 204
//! ```

mod api;
pub mod verify;

use std::sync::Arc;

use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::HttpConfig;
use crate::error::AppError;
use crate::skill::Skill;

// ── Shared request state ──────────────────────────────────────────────────────

/// Axum router state injected into every handler via [`axum::extract::State`].
///
/// Cheap to clone: all fields are reference-counted or `Copy`.
#[derive(Clone)]
pub(crate) struct AxumState {
    /// Channel identifier used in log fields.
    pub channel_id: Arc<str>,
    pub skill: Arc<Skill>,
    /// `0` disables the request timestamp check.
    pub max_request_age_seconds: u64,
}

// ── SkillChannel ──────────────────────────────────────────────────────────────

pub struct SkillChannel {
    channel_id: String,
    bind_addr: String,
    router: Router,
}

impl SkillChannel {
    pub fn new(channel_id: impl Into<String>, config: &HttpConfig, skill: Arc<Skill>) -> Self {
        let channel_id = channel_id.into();
        let router = build_router(&channel_id, config, skill);
        Self {
            channel_id,
            bind_addr: config.bind.clone(),
            router,
        }
    }

    /// Serve until `shutdown` is cancelled.
    pub async fn run(self, shutdown: CancellationToken) -> Result<(), AppError> {
        let listener = TcpListener::bind(&self.bind_addr)
            .await
            .map_err(|e| AppError::Comms(format!("axum bind failed on {}: {e}", self.bind_addr)))?;

        info!(channel_id = %self.channel_id, bind_addr = %self.bind_addr, "skill channel listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await
            .map_err(|e| AppError::Comms(format!("axum server error: {e}")))?;

        info!(channel_id = %self.channel_id, "skill channel shut down");
        Ok(())
    }
}

// ── Router ────────────────────────────────────────────────────────────────────

/// Build the channel's router. Exposed so tests can drive it without a socket.
pub fn build_router(channel_id: &str, config: &HttpConfig, skill: Arc<Skill>) -> Router {
    let state = AxumState {
        channel_id: Arc::from(channel_id),
        skill,
        max_request_age_seconds: config.max_request_age_seconds,
    };

    Router::new()
        .route("/api/skill",   post(api::skill))
        .route("/api/health",  get(api::health))
        .route("/favicon.ico", get(|| async { StatusCode::NO_CONTENT }))
        .with_state(state)
}
