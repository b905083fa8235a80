//! Request timestamp tolerance.

use chrono::{DateTime, Utc};

/// Accept `timestamp` when it lies within `max_age_seconds` of `now`, in
/// either direction. A request without a timestamp is accepted.
pub fn check_timestamp(
    timestamp: Option<&str>,
    now: DateTime<Utc>,
    max_age_seconds: u64,
) -> Result<(), String> {
    let Some(raw) = timestamp else {
        return Ok(());
    };

    let sent = DateTime::parse_from_rfc3339(raw)
        .map_err(|e| format!("unparseable request timestamp '{raw}': {e}"))?
        .with_timezone(&Utc);

    let skew = (now - sent).num_seconds().unsigned_abs();
    if skew > max_age_seconds {
        return Err(format!(
            "request timestamp {raw} is {skew}s from now (tolerance {max_age_seconds}s)"
        ));
    }
    Ok(())
}
