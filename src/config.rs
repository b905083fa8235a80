//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory
//! (or the path in `COUNTRY_SKILL_CONFIG`), then applies
//! `COUNTRY_SKILL_LOG_LEVEL`, `COUNTRY_SKILL_BIND` and `COUNTRY_SKILL_ID`.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::error::AppError;

/// Default config location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Entity resolution settings (`[resolution]`).
#[derive(Debug, Clone)]
pub struct ResolutionConfig {
    /// Authority whose resolutions are trusted, e.g. `"AlexaEntities"`.
    pub authority: String,
    /// Slot carrying the spoken country name.
    pub slot: String,
}

/// Settings for the HTTP knowledge provider (`[knowledge.http]`).
#[derive(Debug, Clone)]
pub struct HttpKnowledgeConfig {
    /// Per-request timeout. `None` leaves timing to the outer invocation.
    pub timeout_seconds: Option<u64>,
}

/// Knowledge lookup configuration.
#[derive(Debug, Clone)]
pub struct KnowledgeConfig {
    /// Active provider (`"http"` or `"dummy"`). Maps to `default` in `[knowledge]`.
    pub provider: String,
    pub http: HttpKnowledgeConfig,
}

/// Inbound HTTP channel configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub enabled: bool,
    /// Socket address to bind the HTTP channel to.
    pub bind: String,
    /// Maximum skew between a request's timestamp and now; `0` disables the check.
    pub max_request_age_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct CommsConfig {
    pub http: HttpConfig,
}

/// Fully-resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub skill_name: String,
    pub log_level: String,
    /// When set, requests from any other application id are rejected.
    pub skill_id: Option<String>,
    pub resolution: ResolutionConfig,
    pub knowledge: KnowledgeConfig,
    pub comms: CommsConfig,
}

impl Config {
    /// Returns `true` if the HTTP channel should be started.
    pub fn comms_http_should_load(&self) -> bool {
        self.comms.http.enabled
    }
}

/// Env-var overrides applied on top of the TOML file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub log_level: Option<String>,
    pub bind: Option<String>,
    pub skill_id: Option<String>,
}

impl Overrides {
    pub fn from_env() -> Self {
        Self {
            log_level: env::var("COUNTRY_SKILL_LOG_LEVEL").ok(),
            bind: env::var("COUNTRY_SKILL_BIND").ok(),
            skill_id: env::var("COUNTRY_SKILL_ID").ok().filter(|s| !s.is_empty()),
        }
    }
}

/// Raw TOML shape, the `serde` target before resolution.
#[derive(Deserialize)]
struct RawConfig {
    skill: RawSkill,
    #[serde(default)]
    resolution: RawResolution,
    #[serde(default)]
    knowledge: RawKnowledge,
    #[serde(default)]
    comms: RawComms,
}

#[derive(Deserialize)]
struct RawSkill {
    name: String,
    #[serde(default = "default_log_level")]
    log_level: String,
    #[serde(default)]
    skill_id: Option<String>,
}

#[derive(Deserialize)]
struct RawResolution {
    #[serde(default = "default_authority")]
    authority: String,
    #[serde(default = "default_slot")]
    slot: String,
}

impl Default for RawResolution {
    fn default() -> Self {
        Self { authority: default_authority(), slot: default_slot() }
    }
}

#[derive(Deserialize)]
struct RawKnowledge {
    /// Maps to `default = "..."` in `[knowledge]`.
    #[serde(rename = "default", default = "default_knowledge_provider")]
    provider: String,
    #[serde(default)]
    http: RawHttpKnowledge,
}

impl Default for RawKnowledge {
    fn default() -> Self {
        Self { provider: default_knowledge_provider(), http: RawHttpKnowledge::default() }
    }
}

#[derive(Deserialize, Default)]
struct RawHttpKnowledge {
    #[serde(default)]
    timeout_seconds: Option<u64>,
}

#[derive(Deserialize, Default)]
struct RawComms {
    #[serde(default)]
    http: RawHttp,
}

#[derive(Deserialize)]
struct RawHttp {
    #[serde(default = "default_true")]
    enabled: bool,
    #[serde(default = "default_http_bind")]
    bind: String,
    #[serde(default = "default_max_request_age")]
    max_request_age_seconds: u64,
}

impl Default for RawHttp {
    fn default() -> Self {
        Self {
            enabled: true,
            bind: default_http_bind(),
            max_request_age_seconds: default_max_request_age(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_authority() -> String { "AlexaEntities".to_string() }
fn default_slot() -> String { "country".to_string() }
fn default_knowledge_provider() -> String { "http".to_string() }
fn default_http_bind() -> String { "127.0.0.1:8080".to_string() }
fn default_max_request_age() -> u64 { 150 }

fn default_true() -> bool {
    true
}

/// Resolve the config path: explicit argument, then `COUNTRY_SKILL_CONFIG`,
/// then [`DEFAULT_CONFIG_PATH`].
pub fn config_path(explicit: Option<&str>) -> PathBuf {
    let env_path = env::var("COUNTRY_SKILL_CONFIG").ok();
    let chosen = explicit
        .or(env_path.as_deref())
        .unwrap_or(DEFAULT_CONFIG_PATH);
    expand_home(chosen)
}

/// Load config from `path`, then apply env-var overrides.
pub fn load(path: &Path) -> Result<Config, AppError> {
    load_from(path, Overrides::from_env())
}

/// Internal loader; tests pass overrides directly instead of mutating env vars.
pub fn load_from(path: &Path, overrides: Overrides) -> Result<Config, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
    parse(&raw, overrides)
        .map_err(|e| AppError::Config(format!("{e} in {}", path.display())))
}

fn parse(raw: &str, overrides: Overrides) -> Result<Config, String> {
    let parsed: RawConfig = toml::from_str(raw).map_err(|e| format!("parse error: {e}"))?;

    let s = parsed.skill;
    let log_level = overrides.log_level.unwrap_or(s.log_level);
    let skill_id = overrides
        .skill_id
        .or(s.skill_id)
        .filter(|id| !id.is_empty());

    if parsed.resolution.authority.is_empty() {
        return Err("resolution.authority must not be empty".to_string());
    }
    if parsed.resolution.slot.is_empty() {
        return Err("resolution.slot must not be empty".to_string());
    }

    Ok(Config {
        skill_name: s.name,
        log_level,
        skill_id,
        resolution: ResolutionConfig {
            authority: parsed.resolution.authority,
            slot: parsed.resolution.slot,
        },
        knowledge: KnowledgeConfig {
            provider: parsed.knowledge.provider,
            http: HttpKnowledgeConfig {
                timeout_seconds: parsed.knowledge.http.timeout_seconds.filter(|t| *t > 0),
            },
        },
        comms: CommsConfig {
            http: HttpConfig {
                enabled: parsed.comms.http.enabled,
                bind: overrides.bind.unwrap_or(parsed.comms.http.bind),
                max_request_age_seconds: parsed.comms.http.max_request_age_seconds,
            },
        },
    })
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return home;
    }
    PathBuf::from(path)
}

// ── test helpers ──────────────────────────────────────────────────────────────

impl Config {
    /// Safe `Config` for tests: dummy knowledge provider, no network.
    pub fn test_default() -> Self {
        Self {
            skill_name: "test".into(),
            log_level: "info".into(),
            skill_id: None,
            resolution: ResolutionConfig {
                authority: default_authority(),
                slot: default_slot(),
            },
            knowledge: KnowledgeConfig {
                provider: "dummy".into(),
                http: HttpKnowledgeConfig { timeout_seconds: Some(5) },
            },
            comms: CommsConfig {
                http: HttpConfig {
                    enabled: false,
                    bind: "127.0.0.1:0".into(),
                    max_request_age_seconds: 0,
                },
            },
        }
    }
}
