//! Knowledge provider implementations.
//!
//! `build(config)` is the factory, called once at startup.
//! Adding a new backend = new module + new match arm.

pub mod dummy;
pub mod http;

use crate::config::KnowledgeConfig;
use crate::knowledge::{KnowledgeError, KnowledgeProvider};

/// Construct a `KnowledgeProvider` from config.
pub fn build(config: &KnowledgeConfig) -> Result<KnowledgeProvider, KnowledgeError> {
    match config.provider.as_str() {
        "http" => {
            let p = http::HttpProvider::new(config.http.timeout_seconds)?;
            Ok(KnowledgeProvider::Http(p))
        }
        "dummy" => Ok(KnowledgeProvider::Dummy(dummy::DummyProvider::new())),
        _ => Err(KnowledgeError::UnknownProvider(config.provider.clone())),
    }
}
