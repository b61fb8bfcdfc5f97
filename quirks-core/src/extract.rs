//! Lenient extraction of a JSON object from free-form model output
//!
//! Models often wrap the requested JSON in commentary or code fences. The
//! payload is taken to be everything from the first `{` to the last `}`.

use crate::character::GeneratedCharacter;
use crate::error::GenerationError;

/// Slice out the brace-delimited payload of `raw`
pub fn extract_json_object(raw: &str) -> Result<&str, GenerationError> {
    let start = raw
        .find('{')
        .ok_or_else(|| GenerationError::Malformed("no opening brace in model output".into()))?;
    let end = raw
        .rfind('}')
        .ok_or_else(|| GenerationError::Malformed("no closing brace in model output".into()))?;

    if end < start {
        return Err(GenerationError::Malformed(
            "closing brace precedes opening brace".into(),
        ));
    }

    Ok(&raw[start..=end])
}

/// Parse a [`GeneratedCharacter`] out of noisy model output
pub fn extract_character(raw: &str) -> Result<GeneratedCharacter, GenerationError> {
    let payload = extract_json_object(raw)?;
    serde_json::from_str(payload)
        .map_err(|e| GenerationError::Malformed(format!("invalid character JSON: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_bare_object() {
        let raw = r#"{"role":"baker","quirk1":"a","quirk2":"b"}"#;
        assert_eq!(extract_json_object(raw).unwrap(), raw);
    }

    #[test]
    fn strips_leading_and_trailing_commentary() {
        let raw = "Sure! Here you go:\n```json\n{\"role\":\"baker\",\"quirk1\":\"a\",\"quirk2\":\"b\"}\n```\nEnjoy.";
        let character = extract_character(raw).unwrap();
        assert_eq!(character.role, "baker");
        assert_eq!(character.quirk2, "b");
    }

    #[test]
    fn keeps_nested_schema_object() {
        let raw = r#"text {"role":"florist","quirk1":"a","quirk2":"b","schema":{"@type":"Person"}} more"#;
        let character = extract_character(raw).unwrap();
        assert_eq!(character.schema.unwrap()["@type"], "Person");
    }

    #[test]
    fn missing_braces_is_malformed() {
        let err = extract_json_object("I cannot help with that").unwrap_err();
        assert!(matches!(err, GenerationError::Malformed(_)));

        let err = extract_json_object("only { an opener").unwrap_err();
        assert!(matches!(err, GenerationError::Malformed(_)));
    }

    #[test]
    fn reversed_braces_is_malformed() {
        let err = extract_json_object("} backwards {").unwrap_err();
        assert!(matches!(err, GenerationError::Malformed(_)));
    }

    #[test]
    fn invalid_json_between_braces_is_malformed() {
        let err = extract_character("{role: baker}").unwrap_err();
        assert!(matches!(err, GenerationError::Malformed(_)));
    }

    #[test]
    fn missing_field_is_malformed() {
        let err = extract_character(r#"{"role":"baker","quirk1":"a"}"#).unwrap_err();
        assert!(matches!(err, GenerationError::Malformed(_)));
    }
}
