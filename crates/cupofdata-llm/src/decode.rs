//! Strict decoding of completion payloads.
//!
//! A reply either matches the requested shape exactly or is an error; no
//! fence stripping or substring search.

use cupofdata_core::Segment;
use serde::Deserialize;

use crate::error::LlmError;

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DrinksReply {
    drinks: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SegmentsReply {
    segments: Vec<SegmentReply>,
}

#[derive(Debug, Deserialize)]
struct SegmentReply {
    brand: String,
    content: String,
}

/// Message content of the first choice in a chat completions response body.
///
/// # Errors
///
/// [`LlmError::Decode`] when the body is not a completions response,
/// [`LlmError::MissingContent`] when it has no choice or no content.
pub fn chat_content(body: &str) -> Result<String, LlmError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| LlmError::Decode(e.to_string()))?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or(LlmError::MissingContent)
}

/// `{"drinks": [..]}`; blank names are dropped.
///
/// # Errors
///
/// [`LlmError::Decode`] when `content` is not that object.
pub fn decode_drinks(content: &str) -> Result<Vec<String>, LlmError> {
    let reply: DrinksReply =
        serde_json::from_str(content.trim()).map_err(|e| LlmError::Decode(e.to_string()))?;
    Ok(reply
        .drinks
        .into_iter()
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .collect())
}

/// `YES` or `NO`, case-insensitive, surrounding whitespace ignored.
///
/// # Errors
///
/// [`LlmError::Decode`] for any other reply.
pub fn decode_yes_no(content: &str) -> Result<bool, LlmError> {
    match content.trim() {
        s if s.eq_ignore_ascii_case("yes") => Ok(true),
        s if s.eq_ignore_ascii_case("no") => Ok(false),
        other => Err(LlmError::Decode(format!("expected YES or NO, got {other:?}"))),
    }
}

/// `true` or `false`, case-insensitive, surrounding whitespace ignored.
///
/// # Errors
///
/// [`LlmError::Decode`] for any other reply.
pub fn decode_true_false(content: &str) -> Result<bool, LlmError> {
    match content.trim() {
        s if s.eq_ignore_ascii_case("true") => Ok(true),
        s if s.eq_ignore_ascii_case("false") => Ok(false),
        other => Err(LlmError::Decode(format!("expected true or false, got {other:?}"))),
    }
}

/// `{"segments": [{"brand", "content"}]}`.
///
/// # Errors
///
/// [`LlmError::Decode`] when `content` is not that object.
pub fn decode_segments(content: &str) -> Result<Vec<Segment>, LlmError> {
    let reply: SegmentsReply =
        serde_json::from_str(content.trim()).map_err(|e| LlmError::Decode(e.to_string()))?;
    Ok(reply
        .segments
        .into_iter()
        .map(|s| Segment::new(s.brand, s.content))
        .collect())
}

/// Trimmed, non-empty prose.
///
/// # Errors
///
/// [`LlmError::Decode`] when the reply is blank.
pub fn decode_summary(content: &str) -> Result<String, LlmError> {
    let text = content.trim();
    if text.is_empty() {
        return Err(LlmError::Decode("empty summary".to_string()));
    }
    Ok(text.to_string())
}
