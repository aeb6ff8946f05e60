//! Repair of model output before JSON parsing.
//!
//! Models wrap JSON in markdown fences or pad it with prose despite
//! instructions. These helpers cut the payload out of the noise; actual
//! schema validation stays with `serde_json` at the call site.

/// Extract the JSON payload from raw model output.
///
/// Strips markdown code fences (```json or bare ```), then slices from the
/// first `[` to the last `]`, or failing that from the first `{` to the last
/// `}`. Returns the trimmed original text when no bracket pair is found, so
/// the downstream parse error reports what the model actually said.
pub fn extract_json_payload(text: &str) -> &str {
    let mut payload = text.trim();

    if let Some(fenced) = between_fences(payload) {
        payload = fenced.trim();
    }

    for (open, close) in [('[', ']'), ('{', '}')] {
        if let (Some(start), Some(end)) = (payload.find(open), payload.rfind(close)) {
            if start < end {
                return &payload[start..=end];
            }
        }
    }
    payload
}

/// The content of the first fenced code block, if any.
fn between_fences(text: &str) -> Option<&str> {
    let after_open = if let Some(rest) = text.split_once("```json") {
        rest.1
    } else {
        text.split_once("```")?.1
    };
    Some(after_open.split_once("```").map_or(after_open, |(inner, _)| inner))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARRAY: &str = r#"[{"question": "Q?"}]"#;

    #[test]
    fn passes_clean_json_through() {
        assert_eq!(extract_json_payload(ARRAY), ARRAY);
    }

    #[test]
    fn strips_json_code_fences() {
        let fenced = format!("```json\n{ARRAY}\n```");
        assert_eq!(extract_json_payload(&fenced), ARRAY);
    }

    #[test]
    fn strips_bare_code_fences() {
        let fenced = format!("```\n{ARRAY}\n```");
        assert_eq!(extract_json_payload(&fenced), ARRAY);
    }

    #[test]
    fn drops_prose_before_and_after_the_array() {
        let noisy = format!("Here are your questions:\n{ARRAY}\nHope these help!");
        assert_eq!(extract_json_payload(&noisy), ARRAY);
    }

    #[test]
    fn falls_back_to_object_brackets() {
        let object = r#"{"quality_score": 7, "evaluator_feedback": "fine"}"#;
        let noisy = format!("Sure! {object} Anything else?");
        assert_eq!(extract_json_payload(&noisy), object);
    }

    #[test]
    fn unfenced_unbracketed_text_comes_back_trimmed() {
        assert_eq!(extract_json_payload("  no json here  "), "no json here");
    }

    #[test]
    fn unterminated_fence_still_yields_payload() {
        let text = format!("```json\n{ARRAY}");
        assert_eq!(extract_json_payload(&text), ARRAY);
    }
}
