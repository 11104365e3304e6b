//! Backend payload extraction
//!
//! Models often wrap the requested JSON object in prose or a markdown fence.
//! Extraction tries, in order:
//! 1. The whole text as JSON
//! 2. The body of the first fenced code block
//! 3. The first balanced `{...}` object (braces inside strings ignored)

use crate::errors::ValidationError;
use crate::validation::types::RawCandidate;

/// Maximum payload size accepted for extraction (1MB)
pub const MAX_PAYLOAD_SIZE: usize = 1_048_576;

const FENCE: &str = "```";

/// Turn raw backend text into a flat field-to-string candidate
pub fn extract_candidate(text: &str) -> Result<RawCandidate, ValidationError> {
    if text.len() > MAX_PAYLOAD_SIZE {
        return Err(ValidationError::MalformedPayload(format!(
            "payload of {} bytes exceeds maximum {}",
            text.len(),
            MAX_PAYLOAD_SIZE
        )));
    }

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MalformedPayload(
            "empty backend response".to_string(),
        ));
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        return RawCandidate::from_json(value);
    }

    if let Some(body) = fenced_block(trimmed) {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(body.trim()) {
            return RawCandidate::from_json(value);
        }
    }

    if let Some(object) = first_balanced_object(trimmed) {
        return serde_json::from_str::<serde_json::Value>(object)
            .map_err(|e| ValidationError::MalformedPayload(format!("invalid JSON object: {}", e)))
            .and_then(RawCandidate::from_json);
    }

    Err(ValidationError::MalformedPayload(
        "no JSON object found in backend response".to_string(),
    ))
}

/// Body of the first ``` fenced block, with an optional language tag removed
fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find(FENCE)?;
    let after_open = &text[open + FENCE.len()..];

    // Language tag runs to the end of the opening line
    let body_start = after_open.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after_open[body_start..];

    let close = body.find(FENCE)?;
    Some(&body[..close])
}

/// First complete top-level JSON object using bracket matching.
///
/// ```text
/// depth ← 0, start ← None
/// for each char cᵢ outside string literals:
///   '{' → if depth = 0 { start ← i }; depth ← depth + 1
///   '}' → depth ← depth - 1; if depth = 0 and start ≠ None { return [start..=i] }
/// ```
fn first_balanced_object(text: &str) -> Option<&str> {
    let mut depth: i32 = 0;
    let mut start: Option<usize> = None;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in text.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        if ch == '\\' && in_string {
            escape_next = true;
            continue;
        }

        if ch == '"' && start.is_some() {
            in_string = !in_string;
            continue;
        }

        if in_string {
            continue;
        }

        match ch {
            '{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(s) = start {
                        return Some(&text[s..=i]);
                    }
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json() {
        let candidate = extract_candidate(r#"{"action": "FUEL_RESOLUTION"}"#).unwrap();
        assert_eq!(candidate.get("action"), Some("FUEL_RESOLUTION"));
    }

    #[test]
    fn test_fenced_json_block() {
        let text = "Here is my answer:\n```json\n{\"story\": \"EGALITARIAN\"}\n```\nThanks";
        let candidate = extract_candidate(text).unwrap();
        assert_eq!(candidate.get("story"), Some("EGALITARIAN"));
    }

    #[test]
    fn test_fence_without_language_tag() {
        let text = "```\n{\"story\": \"HIERARCHICAL\"}\n```";
        let candidate = extract_candidate(text).unwrap();
        assert_eq!(candidate.get("story"), Some("HIERARCHICAL"));
    }

    #[test]
    fn test_object_embedded_in_prose() {
        let text = r#"The article focuses on victims. {"hero_class": "NONE", "villain_class": "INDUSTRY_EMISSIONS", "victim_class": "GENERAL_PUBLIC", "focus": "VICTIM"} Hope this helps."#;
        let candidate = extract_candidate(text).unwrap();
        assert_eq!(candidate.get("focus"), Some("VICTIM"));
        assert_eq!(candidate.len(), 4);
    }

    #[test]
    fn test_braces_inside_strings() {
        let text = r#"Answer: {"action": "FUEL_CONFLICT", "note": "uses {braces}"}"#;
        let candidate = extract_candidate(text).unwrap();
        assert_eq!(candidate.get("note"), Some("uses {braces}"));
    }

    #[test]
    fn test_non_json_text() {
        let err = extract_candidate("I cannot classify this article.").unwrap_err();
        assert!(matches!(err, ValidationError::MalformedPayload(_)));
    }

    #[test]
    fn test_empty_text() {
        assert!(extract_candidate("   \n").is_err());
    }

    #[test]
    fn test_non_object_json() {
        let err = extract_candidate("\"FUEL_CONFLICT\"").unwrap_err();
        assert!(err.to_string().contains("expected a JSON object"));
    }

    #[test]
    fn test_unbalanced_object() {
        assert!(extract_candidate(r#"prefix {"action": "FUEL_CONFLICT""#).is_err());
    }

    #[test]
    fn test_oversized_payload() {
        let text = "a".repeat(MAX_PAYLOAD_SIZE + 1);
        assert!(extract_candidate(&text).is_err());
    }
}
