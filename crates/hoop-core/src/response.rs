//! Best-effort coercion of model text into JSON.
//!
//! Models are told to answer with bare JSON but often wrap it in a fenced
//! code block anyway. Only the first fenced block is considered; if it
//! does not parse, the attempt fails rather than trying later blocks.

use serde_json::Value;

use crate::error::GenerateError;

const FENCE: &str = "```";
const JSON_TAG: &str = "json";

/// Return the interior of the first fenced code block in `text`.
///
/// The opening fence may be tagged `json`. Whitespace around the interior
/// is trimmed. Returns `None` when there is no opening fence or when the
/// opening fence is never closed.
pub fn extract_fenced_block(text: &str) -> Option<&str> {
    let open = text.find(FENCE)?;
    let after_open = &text[open + FENCE.len()..];
    let body = after_open.strip_prefix(JSON_TAG).unwrap_or(after_open);
    let close = body.find(FENCE)?;
    Some(body[..close].trim())
}

/// Parse a model answer into JSON.
///
/// Uses the first fenced block when present, else the whole text. Any
/// valid JSON value is accepted; the shape is not checked here.
pub fn parse_plan_response(text: &str) -> Result<Value, GenerateError> {
    let candidate = extract_fenced_block(text).unwrap_or(text);
    serde_json::from_str(candidate).map_err(|_| GenerateError::InvalidFormat)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn extracts_json_tagged_block() {
        let text = "Here you go:\n```json\n{\"a\": 1}\n```\nEnjoy!";
        assert_eq!(extract_fenced_block(text), Some("{\"a\": 1}"));
    }

    #[test]
    fn extracts_untagged_block() {
        let text = "```\n  [1, 2]  \n```";
        assert_eq!(extract_fenced_block(text), Some("[1, 2]"));
    }

    #[test]
    fn only_first_block_is_used() {
        let text = "```json\n{\"first\": true}\n```\n```json\n{\"second\": true}\n```";
        assert_eq!(parse_plan_response(text).unwrap(), json!({"first": true}));
    }

    #[test]
    fn unterminated_fence_falls_back_to_whole_text() {
        assert_eq!(extract_fenced_block("```json\n{\"a\": 1}"), None);
        assert!(matches!(
            parse_plan_response("```json\n{\"a\": 1}"),
            Err(GenerateError::InvalidFormat)
        ));
    }

    #[test]
    fn unfenced_text_is_parsed_whole() {
        let value = parse_plan_response("  {\"name\": \"Jordan\"}\n").unwrap();
        assert_eq!(value["name"], "Jordan");
    }

    #[test]
    fn unparseable_text_is_invalid_format() {
        let err = parse_plan_response("Sure! Here's a great plan for you.").unwrap_err();
        assert!(matches!(err, GenerateError::InvalidFormat));
        assert_eq!(err.to_string(), "The AI generated an invalid response format");
    }

    #[test]
    fn broken_json_inside_fence_is_not_partially_returned() {
        let err = parse_plan_response("```json\n{\"name\": \"Jordan\",\n```").unwrap_err();
        assert!(matches!(err, GenerateError::InvalidFormat));
    }

    #[test]
    fn wrong_shape_json_passes_through() {
        assert_eq!(parse_plan_response("[1, 2, 3]").unwrap(), json!([1, 2, 3]));
    }
}
