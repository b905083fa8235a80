//! Logging initialisation via tracing-subscriber.
//!
//! The configured level is a filter directive list: a bare level (`"info"`)
//! or per-target levels (`"country_skill=debug,reqwest=warn"`). Validate it
//! with [`parse_filter`], then hand the result to [`init`] once.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Parse a directive list into an [`EnvFilter`].
///
/// Every directive must carry a recognised level, either alone or after
/// `target=`. A bare word such as `"verbose"` is rejected instead of being
/// read as a target name.
pub fn parse_filter(directives: &str) -> Result<EnvFilter, AppError> {
    let trimmed = directives.trim();
    if trimmed.is_empty() {
        return Err(AppError::Logger("log level must not be empty".into()));
    }

    for directive in trimmed.split(',').map(str::trim) {
        let level = directive.rsplit_once('=').map_or(directive, |(_, level)| level);
        if level.parse::<LevelFilter>().is_err() {
            return Err(AppError::Logger(format!(
                "unrecognised log level '{level}' in '{directives}'"
            )));
        }
    }

    EnvFilter::try_new(trimmed)
        .map_err(|e| AppError::Logger(format!("invalid log filter '{directives}': {e}")))
}

/// Install the global subscriber, writing to stderr.
///
/// With `prefer_configured`, `configured` is used as is. Otherwise a valid
/// `RUST_LOG` wins and `configured` is the fallback.
pub fn init(configured: EnvFilter, prefer_configured: bool) -> Result<(), AppError> {
    let filter = if prefer_configured {
        configured
    } else {
        EnvFilter::try_from_default_env().unwrap_or(configured)
    };

    // stdout is reserved for the one-shot response JSON.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| AppError::Logger(format!("failed to set subscriber: {e}")))
}
