use serde_json::{json, Value};
use thiserror::Error;

use crate::core::models::shopping::ShoppingList;

#[derive(Error, Debug)]
pub enum ParseErrorKind {
    #[error("no JSON found in response")]
    NoJson,
    #[error("invalid JSON: {0}")]
    InvalidJson(serde_json::Error),
    #[error("unexpected shopping list shape: {0}")]
    UnexpectedShape(serde_json::Error),
}

/// The model's reply could not be turned into structured data.
/// Keeps the raw reply for diagnostics.
#[derive(Error, Debug)]
#[error("Failed to parse response: {kind}")]
pub struct ParseFailure {
    pub kind: ParseErrorKind,
    pub raw_response: String,
}

impl ParseFailure {
    fn new(kind: ParseErrorKind, raw: &str) -> Self {
        Self {
            kind,
            raw_response: raw.to_string(),
        }
    }

    /// The error document printed and saved in place of a shopping list.
    pub fn to_json(&self) -> Value {
        json!({
            "error": "Failed to parse response",
            "detail": self.kind.to_string(),
            "raw_response": self.raw_response,
        })
    }
}

/// Extract the JSON object embedded in free-form model output.
///
/// Takes everything from the first `{` to the last `}` inclusive. Replies
/// containing several fragments produce an over-wide slice that usually
/// fails to decode; that is accepted behavior.
pub fn parse_response(raw: &str) -> Result<Value, ParseFailure> {
    let (start, end) = match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) => (start, end),
        _ => return Err(ParseFailure::new(ParseErrorKind::NoJson, raw)),
    };

    // A closing brace before the opening one leaves nothing to decode.
    let slice = if end >= start { &raw[start..=end] } else { "" };

    serde_json::from_str(slice).map_err(|e| ParseFailure::new(ParseErrorKind::InvalidJson(e), raw))
}

/// `parse_response` followed by a lenient decode into a `ShoppingList`.
/// Wrong-typed or null fields fall back to their defaults rather than
/// failing the reply.
pub fn parse_shopping_list(raw: &str) -> Result<ShoppingList, ParseFailure> {
    let value = parse_response(raw)?;
    serde_json::from_value(value)
        .map_err(|e| ParseFailure::new(ParseErrorKind::UnexpectedShape(e), raw))
}
