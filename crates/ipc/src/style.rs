//! Styled response documents produced by AI text sources.
//!
//! The accepted shape is:
//!
//! ```text
//! {"text": "...", "style": {"slant": 4, "spacing": 1.2, "messiness": 0.3, "mood": "calm"}}
//! ```
//!
//! Every field of `style` is optional and is read independently: a field
//! with the wrong type is dropped without affecting its siblings. Input that
//! is not such a document at all is taken as literal text.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Raw style directive as found on the wire (not yet clamped)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleDirective {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slant: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messiness: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
}

impl StyleDirective {
    /// Returns true when no field is set
    pub fn is_empty(&self) -> bool {
        self.slant.is_none() && self.spacing.is_none() && self.messiness.is_none() && self.mood.is_none()
    }

    /// Read a directive out of an arbitrary JSON value, field by field
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };

        Self {
            slant: object.get("slant").and_then(lenient_number),
            spacing: object.get("spacing").and_then(lenient_number),
            messiness: object.get("messiness").and_then(lenient_number),
            mood: object
                .get("mood")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|mood| !mood.is_empty())
                .map(str::to_string),
        }
    }
}

/// Text plus optional style, as produced by an AI response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyledResponse {
    pub text: String,
    #[serde(default, deserialize_with = "lenient_style")]
    pub style: StyleDirective,
}

impl StyledResponse {
    /// Plain text with no style
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: StyleDirective::default(),
        }
    }

    /// Parse a raw response, never failing
    ///
    /// A document wrapped in a markdown code fence is unwrapped first.
    /// Anything that is not a JSON object with a string `text` field is
    /// returned verbatim as literal text with an empty style.
    pub fn parse(raw: &str) -> Self {
        let candidate = strip_code_fence(raw);
        match serde_json::from_str::<StyledResponse>(candidate) {
            Ok(response) => response,
            Err(_) => Self::literal(raw),
        }
    }
}

fn lenient_style<'de, D>(deserializer: D) -> Result<StyleDirective, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(StyleDirective::from_value(&value))
}

fn lenient_number(value: &Value) -> Option<f32> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    let number = number as f32;
    number.is_finite().then_some(number)
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop an info string such as `json` on the opening fence line
    match body.find('\n') {
        Some(newline) => body[newline + 1..].trim(),
        None => body.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_document() {
        let response = StyledResponse::parse(
            r#"{"text": "hello there", "style": {"slant": 4, "spacing": 1.5, "messiness": 0.2, "mood": "calm"}}"#,
        );
        assert_eq!(response.text, "hello there");
        assert_eq!(response.style.slant, Some(4.0));
        assert_eq!(response.style.spacing, Some(1.5));
        assert_eq!(response.style.messiness, Some(0.2));
        assert_eq!(response.style.mood.as_deref(), Some("calm"));
    }

    #[test]
    fn test_parse_without_style() {
        let response = StyledResponse::parse(r#"{"text": "just text"}"#);
        assert_eq!(response.text, "just text");
        assert!(response.style.is_empty());
    }

    #[test]
    fn test_non_json_is_literal() {
        let raw = "Sure! Here's a thought: {not json";
        let response = StyledResponse::parse(raw);
        assert_eq!(response.text, raw);
        assert!(response.style.is_empty());
    }

    #[test]
    fn test_json_without_text_is_literal() {
        let raw = r#"{"style": {"slant": 3}}"#;
        let response = StyledResponse::parse(raw);
        assert_eq!(response.text, raw);
        assert!(response.style.is_empty());
    }

    #[test]
    fn test_bad_field_does_not_poison_siblings() {
        let response = StyledResponse::parse(
            r#"{"text": "hi", "style": {"slant": "steep", "spacing": [1], "messiness": 0.4, "mood": 7}}"#,
        );
        assert_eq!(response.text, "hi");
        assert_eq!(response.style.slant, None);
        assert_eq!(response.style.spacing, None);
        assert_eq!(response.style.messiness, Some(0.4));
        assert_eq!(response.style.mood, None);
    }

    #[test]
    fn test_style_not_an_object() {
        let response = StyledResponse::parse(r#"{"text": "hi", "style": "bold"}"#);
        assert_eq!(response.text, "hi");
        assert!(response.style.is_empty());
    }

    #[test]
    fn test_numeric_strings_accepted() {
        let response = StyledResponse::parse(r#"{"text": "hi", "style": {"slant": " -2.5 "}}"#);
        assert_eq!(response.style.slant, Some(-2.5));
    }

    #[test]
    fn test_code_fence_unwrapped() {
        let raw = "```json\n{\"text\": \"fenced\", \"style\": {\"mood\": \"excited\"}}\n```";
        let response = StyledResponse::parse(raw);
        assert_eq!(response.text, "fenced");
        assert_eq!(response.style.mood.as_deref(), Some("excited"));
    }
}
