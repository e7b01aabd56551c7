//! JSON array export and import

use crate::export::FormatError;
use crate::models::PersonRecord;
use serde_json::Value;

/// Pretty-printed JSON array of records
pub fn to_json(records: &[PersonRecord]) -> Result<String, FormatError> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Parse a JSON document that must be an array of records.
///
/// Anything other than an array (object, string, number) is rejected with
/// [`FormatError::NotAnArray`] before record fields are looked at.
pub fn from_json(input: &str) -> Result<Vec<PersonRecord>, FormatError> {
    let value: Value = serde_json::from_str(input)?;
    if !value.is_array() {
        return Err(FormatError::NotAnArray);
    }
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{sample_family, PersonId};

    #[test]
    fn test_round_trip_sample() {
        let json = to_json(&sample_family()).unwrap();
        assert!(json.starts_with('['));
        assert_eq!(from_json(&json).unwrap(), sample_family());
    }

    #[test]
    fn test_rejects_non_array() {
        assert!(matches!(from_json(r#"{"id": 1}"#), Err(FormatError::NotAnArray)));
        assert!(matches!(from_json("not json"), Err(FormatError::Json(_))));
    }

    #[test]
    fn test_accepts_legacy_timestamp_ids() {
        let records = from_json(
            r#"[{"id": 1712345678901, "name": "Imported", "parentId": null, "gender": ""}]"#,
        )
        .unwrap();
        assert_eq!(records[0].id, PersonId(1_712_345_678_901));
        assert_eq!(records[0].gender, None);
    }
}
