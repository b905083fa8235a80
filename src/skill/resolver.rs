//! Entity resolution: pick the trusted, exactly-matched resolutions of a slot.

use crate::envelope::{Resolution, Slot, StatusCode};
use crate::skill::SkillError;

/// Resolutions of `slot` that come from `authority` with an exact match.
///
/// `None` when the slot, its resolutions or the per-authority list is
/// missing: the platform did not recognise the value. An empty `Vec` means
/// resolutions exist but none is usable. Callers treat both the same way.
/// An entry from `authority` without a status is a malformed request;
/// entries from other authorities are skipped unread.
pub fn slot_resolutions<'a>(
    slot: Option<&'a Slot>,
    authority: &str,
) -> Result<Option<Vec<&'a Resolution>>, SkillError> {
    let Some(per_authority) = slot
        .and_then(|s| s.resolutions.as_ref())
        .and_then(|r| r.resolutions_per_authority.as_ref())
    else {
        return Ok(None);
    };

    let mut matched = Vec::new();
    for resolution in per_authority {
        if resolution.authority.as_deref() != Some(authority) {
            continue;
        }
        let status = resolution.status.as_ref().ok_or_else(|| {
            SkillError::MalformedRequest(format!("resolution from {authority} carries no status"))
        })?;
        if status.code == StatusCode::SuccessMatch {
            matched.push(resolution);
        }
    }
    Ok(Some(matched))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const AUTHORITY: &str = "AlexaEntities";

    fn slot(value: serde_json::Value) -> Slot {
        serde_json::from_value(value).unwrap()
    }

    fn resolution(authority: &str, code: &str, id: &str) -> serde_json::Value {
        json!({
            "authority": authority,
            "status": { "code": code },
            "values": [{ "value": { "name": "X", "id": id } }]
        })
    }

    #[test]
    fn absent_slot_is_none() {
        assert!(slot_resolutions(None, AUTHORITY).unwrap().is_none());
    }

    #[test]
    fn slot_without_resolutions_is_none() {
        let s = slot(json!({ "name": "country", "value": "narnia" }));
        assert!(slot_resolutions(Some(&s), AUTHORITY).unwrap().is_none());
    }

    #[test]
    fn resolutions_without_authority_list_is_none() {
        let s = slot(json!({ "name": "country", "resolutions": {} }));
        assert!(slot_resolutions(Some(&s), AUTHORITY).unwrap().is_none());
    }

    #[test]
    fn keeps_only_exact_matches_from_authority() {
        let s = slot(json!({
            "name": "country",
            "resolutions": { "resolutionsPerAuthority": [
                resolution("amzn1.er-authority.echo-sdk.custom", "ER_SUCCESS_MATCH", "custom"),
                resolution(AUTHORITY, "ER_SUCCESS_NO_MATCH", "nomatch"),
                resolution(AUTHORITY, "ER_SUCCESS_MATCH", "https://kg.example/Q183"),
                resolution(AUTHORITY, "ER_ERROR_TIMEOUT", "timeout"),
            ]}
        }));
        let got = slot_resolutions(Some(&s), AUTHORITY).unwrap().unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].values[0].id(), Some("https://kg.example/Q183"));
    }

    #[test]
    fn wrong_authority_only_is_empty() {
        let s = slot(json!({
            "name": "country",
            "resolutions": { "resolutionsPerAuthority": [
                resolution("OtherAuthority", "ER_SUCCESS_MATCH", "https://kg.example/Q183"),
            ]}
        }));
        assert!(slot_resolutions(Some(&s), AUTHORITY).unwrap().unwrap().is_empty());
    }

    #[test]
    fn entries_from_other_authorities_are_not_inspected() {
        let s = slot(json!({
            "name": "country",
            "resolutions": { "resolutionsPerAuthority": [
                { "authority": "OtherAuthority", "values": [{ "value": { "id": "no-status" } }] },
                { "status": { "code": "ER_SUCCESS_MATCH" }, "values": [{ "value": { "id": "no-authority" } }] },
            ]}
        }));
        assert!(slot_resolutions(Some(&s), AUTHORITY).unwrap().unwrap().is_empty());
    }

    #[test]
    fn trusted_entry_without_status_is_malformed() {
        let s = slot(json!({
            "name": "country",
            "resolutions": { "resolutionsPerAuthority": [
                { "authority": AUTHORITY, "values": [{ "value": { "id": "https://kg.example/Q183" } }] },
            ]}
        }));
        let err = slot_resolutions(Some(&s), AUTHORITY).unwrap_err();
        assert!(matches!(err, SkillError::MalformedRequest(_)));
    }

    #[test]
    fn authority_is_configurable() {
        let s = slot(json!({
            "name": "country",
            "resolutions": { "resolutionsPerAuthority": [
                resolution("OtherAuthority", "ER_SUCCESS_MATCH", "https://kg.example/Q183"),
            ]}
        }));
        assert_eq!(slot_resolutions(Some(&s), "OtherAuthority").unwrap().unwrap().len(), 1);
    }
}
