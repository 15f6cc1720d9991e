use super::report::{FeedbackReport, Rating};
use crate::error::AuditError;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Turns raw generated text into a validated `FeedbackReport`.
///
/// The report is accepted or rejected as a whole: nothing is coerced and no
/// partially valid report is ever returned.
pub struct FeedbackParser;

impl FeedbackParser {
    pub fn parse(raw: &str) -> Result<FeedbackReport, AuditError> {
        let payload = strip_code_fence(raw);

        let value: Value =
            serde_json::from_str(payload).map_err(|e| AuditError::ParseFailure {
                detail: e.to_string(),
                raw: raw.to_string(),
            })?;

        validate(&value, raw)
    }
}

/// Remove a leading ```` ``` ```` / ```` ```json ```` line and a trailing
/// ```` ``` ````, ignoring case and surrounding whitespace.
fn strip_code_fence(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        text = match rest.get(..4) {
            Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
            _ => rest,
        };
    }

    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

fn validate(value: &Value, raw: &str) -> Result<FeedbackReport, AuditError> {
    let object = value
        .as_object()
        .ok_or_else(|| AuditError::schema("top-level value is not an object", raw))?;

    let summary = required_str(object, &["summary"], raw)?;
    let overall_sentiment = required_str(object, &["overall_sentiment", "overallSentiment"], raw)?;

    let ratings_value = object
        .get("ratings")
        .ok_or_else(|| AuditError::schema("missing `ratings`", raw))?;
    let ratings = validate_ratings(ratings_value, raw)?;

    let areas_value = lookup(object, &["areas_for_improvement", "areasForImprovement"])
        .ok_or_else(|| AuditError::schema("missing `areas_for_improvement`", raw))?;
    let areas = areas_value
        .as_array()
        .ok_or_else(|| AuditError::schema("`areas_for_improvement` is not an array", raw))?;

    let areas_for_improvement = areas
        .iter()
        .enumerate()
        .map(|(index, area)| {
            area.as_str().map(str::to_string).ok_or_else(|| {
                AuditError::schema(
                    format!("`areas_for_improvement[{}]` is not a string", index),
                    raw,
                )
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FeedbackReport {
        summary,
        ratings,
        overall_sentiment,
        areas_for_improvement,
    })
}

fn validate_ratings(value: &Value, raw: &str) -> Result<BTreeMap<String, Rating>, AuditError> {
    let entries = value
        .as_object()
        .ok_or_else(|| AuditError::schema("`ratings` is not an object", raw))?;

    let mut ratings = BTreeMap::new();
    for (key, entry) in entries {
        let entry = entry
            .as_object()
            .ok_or_else(|| AuditError::schema(format!("rating `{}` is not an object", key), raw))?;

        let stars = entry
            .get("stars")
            .and_then(Value::as_u64)
            .filter(|stars| (1..=5).contains(stars))
            .ok_or_else(|| {
                AuditError::schema(
                    format!("rating `{}` needs integer `stars` between 1 and 5", key),
                    raw,
                )
            })?;

        let explanation = entry
            .get("explanation")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                AuditError::schema(format!("rating `{}` has no string `explanation`", key), raw)
            })?;

        ratings.insert(
            key.clone(),
            Rating {
                stars: stars as u8,
                explanation: explanation.to_string(),
            },
        );
    }

    Ok(ratings)
}

fn lookup<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| object.get(*key))
}

fn required_str(
    object: &Map<String, Value>,
    keys: &[&str],
    raw: &str,
) -> Result<String, AuditError> {
    match lookup(object, keys) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(AuditError::schema(format!("`{}` is not a string", keys[0]), raw)),
        None => Err(AuditError::schema(format!("missing `{}`", keys[0]), raw)),
    }
}
