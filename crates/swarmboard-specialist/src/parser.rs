//! Parse specialist output into a tool call and/or a contribution

use crate::error::SpecialistFailure;
use crate::types::{ParsedResponse, ToolCall};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

static CONFIDENCE_MENTION: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"(?i)confidence\W{0,3}(?:[a-z]+\W{1,3})?\s*([01](?:\.\d+)?|\.\d+)\b").ok()
});

/// Fields that mark a JSON object as a structured response
const RESPONSE_FIELDS: &[&str] = &["tool_call", "answer", "key", "confidence", "final", "is_final"];

/// Parse a model response
///
/// Structured JSON (optionally fenced or surrounded by prose) is read
/// field by field. Anything else is taken as a free-text contribution.
pub(crate) fn parse_response(response: &str) -> Result<ParsedResponse, SpecialistFailure> {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return Err(SpecialistFailure::ResponseUnparseable("empty response".to_string()));
    }

    let structured = extract_object(trimmed);

    match structured {
        Some(map) if RESPONSE_FIELDS.iter().any(|f| map.contains_key(*f)) => parse_structured(map),
        Some(map) => {
            debug!("JSON response without response fields, using it as the answer");
            Ok(ParsedResponse {
                answer: Some(Value::Object(map)),
                ..ParsedResponse::default()
            })
        }
        None => Ok(ParsedResponse {
            answer: Some(Value::String(trimmed.to_string())),
            confidence: confidence_mention(trimmed),
            ..ParsedResponse::default()
        }),
    }
}

fn parse_structured(mut map: Map<String, Value>) -> Result<ParsedResponse, SpecialistFailure> {
    let tool_call = match map.remove("tool_call") {
        None | Some(Value::Null) => None,
        Some(call) => Some(parse_tool_call(call)?),
    };

    let answer = match map.remove("answer") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(value) => Some(value),
    };

    let key = map
        .get("key")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string);

    let confidence = map.get("confidence").and_then(confidence_value);
    let is_final = map
        .get("final")
        .or_else(|| map.get("is_final"))
        .and_then(Value::as_bool)
        .unwrap_or(false);

    if tool_call.is_none() && answer.is_none() {
        return Err(SpecialistFailure::ResponseUnparseable(
            "response has neither a tool_call nor an answer".to_string(),
        ));
    }

    Ok(ParsedResponse {
        tool_call,
        answer,
        key,
        confidence,
        is_final,
    })
}

fn parse_tool_call(call: Value) -> Result<ToolCall, SpecialistFailure> {
    let Value::Object(mut call) = call else {
        return Err(SpecialistFailure::ResponseUnparseable(
            "tool_call must be an object".to_string(),
        ));
    };

    let tool = call
        .get("tool")
        .or_else(|| call.get("name"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            SpecialistFailure::ResponseUnparseable("tool_call is missing `tool`".to_string())
        })?;

    let input = call
        .remove("input")
        .or_else(|| call.remove("arguments"))
        .unwrap_or_else(|| Value::Object(Map::new()));

    Ok(ToolCall { tool, input })
}

/// Read a reported confidence; percentages in (1, 100] are scaled down
fn confidence_value(value: &Value) -> Option<f64> {
    let raw = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok()?,
        _ => return None,
    };
    if raw > 1.0 && raw <= 100.0 {
        Some(raw / 100.0)
    } else {
        Some(raw)
    }
}

/// Find a `confidence: 0.x` mention in free text
fn confidence_mention(text: &str) -> Option<f64> {
    let captures = CONFIDENCE_MENTION.as_ref()?.captures(text)?;
    let value: f64 = captures.get(1)?.as_str().parse().ok()?;
    (0.0..=1.0).contains(&value).then_some(value)
}

/// Locate the JSON object in a response
///
/// A markdown code fence is tried first, then every `{` in order. The first
/// complete object wins, so braces in surrounding prose are skipped.
fn extract_object(response: &str) -> Option<Map<String, Value>> {
    fenced_body(response)
        .and_then(first_object)
        .or_else(|| first_object(response))
}

fn fenced_body(response: &str) -> Option<&str> {
    let fence_start = response.find("```")?;
    let after_fence = &response[fence_start + 3..];
    // skip the language tag line
    let body_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after_fence[body_start..];
    let body = match body.find("```") {
        Some(end) => &body[..end],
        None => body,
    };
    Some(body.trim())
}

fn first_object(text: &str) -> Option<Map<String, Value>> {
    text.match_indices('{').find_map(|(start, _)| {
        let mut values = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
        match values.next() {
            Some(Ok(Value::Object(map))) => Some(map),
            _ => None,
        }
    })
}
