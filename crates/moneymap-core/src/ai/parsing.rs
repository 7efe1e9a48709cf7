//! JSON extraction from LLM replies
//!
//! Model replies often wrap the JSON payload in prose ("Here is the
//! result: ... Done!"). Extraction is an explicit two-stage parse:
//! try the whole reply first, then the outermost brace/bracket span.
//! A reply with no JSON at all is a distinct error (`Error::NoJson`),
//! not a generic parse failure.

use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Truncate long replies for error messages
fn truncate(s: &str) -> String {
    if s.len() > 200 {
        let mut end = 200;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    } else {
        s.to_string()
    }
}

/// Extract and deserialize a JSON object from an LLM reply
pub fn parse_object<T: DeserializeOwned>(response: &str) -> Result<T> {
    parse_span(response, '{', '}')
}

/// Extract and deserialize a JSON array from an LLM reply
pub fn parse_array<T: DeserializeOwned>(response: &str) -> Result<Vec<T>> {
    parse_span(response, '[', ']')
}

fn parse_span<T: DeserializeOwned>(response: &str, open: char, close: char) -> Result<T> {
    let response = response.trim();

    // Stage 1: the reply may already be bare JSON
    if let Ok(value) = serde_json::from_str(response) {
        return Ok(value);
    }

    // Stage 2: outermost delimiter span
    let start = response.find(open);
    let end = response.rfind(close);

    match (start, end) {
        (Some(s), Some(e)) if s < e => {
            let json_str = &response[s..=e];
            serde_json::from_str(json_str).map_err(|e| {
                Error::InvalidData(format!(
                    "Invalid JSON from LLM: {} | Raw: {}",
                    e,
                    truncate(json_str)
                ))
            })
        }
        _ => Err(Error::NoJson(truncate(response))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Card {
        name: String,
    }

    #[test]
    fn test_parse_object_bare() {
        let card: Card = parse_object(r#"{"name": "Sapphire"}"#).unwrap();
        assert_eq!(card.name, "Sapphire");
    }

    #[test]
    fn test_parse_object_with_surrounding_text() {
        let response = r#"Here's the recommendation:
{"name": "Sapphire"}
Hope that helps!"#;
        let card: Card = parse_object(response).unwrap();
        assert_eq!(card.name, "Sapphire");
    }

    #[test]
    fn test_parse_array_with_surrounding_text() {
        let response = r#"Your goals are:
[{"name": "House"}, {"name": "Travel"}]"#;
        let cards: Vec<Card> = parse_array(response).unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[1].name, "Travel");
    }

    #[test]
    fn test_no_json_is_distinct_error() {
        let err = parse_object::<Card>("I couldn't find any structured data.").unwrap_err();
        assert!(matches!(err, Error::NoJson(_)));
    }

    #[test]
    fn test_invalid_json_reports_raw() {
        let err = parse_object::<Card>(r#"{"name": unquoted}"#).unwrap_err();
        match err {
            Error::InvalidData(msg) => assert!(msg.contains("unquoted")),
            other => panic!("expected InvalidData, got {:?}", other),
        }
    }

    #[test]
    fn test_mismatched_delimiters() {
        let err = parse_array::<Card>("only } here").unwrap_err();
        assert!(matches!(err, Error::NoJson(_)));
    }
}
