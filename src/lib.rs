// Library root: exposes the skill for the binary and integration tests.
// The binary entry point is src/main.rs.

pub mod config;
pub mod envelope;
pub mod error;
pub mod knowledge;
pub mod logger;
pub mod skill;

#[cfg(feature = "channel-axum")]
pub mod comms;
