// Tests for parsing and validating generated feedback
//
// The parser must accept a report only when every required field has the
// right shape, and must tolerate a fenced code block around the JSON.

use practice_audit::{AuditError, FeedbackParser, FeedbackReport, Rating};
use std::collections::BTreeMap;

const PAYLOAD: &str = r#"{"summary":"ok","ratings":{"x":{"stars":4,"explanation":"good"}},"overall_sentiment":"Positive","areas_for_improvement":[]}"#;

fn sample_report() -> FeedbackReport {
    let mut ratings = BTreeMap::new();
    ratings.insert(
        "establish_rapport".to_string(),
        Rating {
            stars: 5,
            explanation: "Warm and open.".to_string(),
        },
    );
    ratings.insert(
        "follow_up_and_accountability".to_string(),
        Rating {
            stars: 1,
            explanation: "No follow-up was agreed.".to_string(),
        },
    );

    FeedbackReport {
        summary: "Coaching session about tardiness.".to_string(),
        ratings,
        overall_sentiment: "Constructive".to_string(),
        areas_for_improvement: vec![
            "Agree on a check-in date".to_string(),
            "Let Elsa propose solutions".to_string(),
        ],
    }
}

fn is_schema_mismatch(result: &Result<FeedbackReport, AuditError>) -> bool {
    matches!(result, Err(AuditError::SchemaMismatch { .. }))
}

#[test]
fn test_fenced_json_parses() {
    let raw = format!("```json\n{}\n```", PAYLOAD);

    let report = FeedbackParser::parse(&raw).unwrap();

    assert_eq!(report.summary, "ok");
    assert_eq!(report.ratings.len(), 1);
    assert_eq!(report.ratings["x"].stars, 4);
    assert_eq!(report.ratings["x"].explanation, "good");
    assert_eq!(report.overall_sentiment, "Positive");
    assert!(report.areas_for_improvement.is_empty());
}

#[test]
fn test_fence_variants_parse_identically() {
    let plain = FeedbackParser::parse(PAYLOAD).unwrap();

    let variants = [
        format!("```json\n{}\n```", PAYLOAD),
        format!("  \n```JSON\n{}\n```  \n", PAYLOAD),
        format!("```Json{}```", PAYLOAD),
        format!("```\n{}\n```", PAYLOAD),
        format!("\t```json   \n\n{}\n\n   ```\n\n", PAYLOAD),
        format!("\n\n{}\n", PAYLOAD),
    ];

    for raw in &variants {
        assert_eq!(FeedbackParser::parse(raw).unwrap(), plain, "variant: {:?}", raw);
    }
}

#[test]
fn test_not_json_is_parse_failure() {
    match FeedbackParser::parse("not json") {
        Err(AuditError::ParseFailure { raw, .. }) => assert_eq!(raw, "not json"),
        other => panic!("expected ParseFailure, got {:?}", other),
    }
}

#[test]
fn test_truncated_json_is_parse_failure() {
    let raw = &PAYLOAD[..PAYLOAD.len() - 10];
    assert!(matches!(
        FeedbackParser::parse(raw),
        Err(AuditError::ParseFailure { .. })
    ));
}

#[test]
fn test_missing_fields_is_schema_mismatch() {
    match FeedbackParser::parse(r#"{"summary":"ok"}"#) {
        Err(AuditError::SchemaMismatch { raw, .. }) => assert_eq!(raw, r#"{"summary":"ok"}"#),
        other => panic!("expected SchemaMismatch, got {:?}", other),
    }
}

#[test]
fn test_non_object_is_schema_mismatch() {
    assert!(is_schema_mismatch(&FeedbackParser::parse("[1, 2, 3]")));
    assert!(is_schema_mismatch(&FeedbackParser::parse("\"summary\"")));
}

#[test]
fn test_wrong_field_types_are_rejected() {
    let cases = [
        // summary not a string
        r#"{"summary":1,"ratings":{},"overall_sentiment":"x","areas_for_improvement":[]}"#,
        // ratings not an object
        r#"{"summary":"s","ratings":[],"overall_sentiment":"x","areas_for_improvement":[]}"#,
        // rating entry not an object
        r#"{"summary":"s","ratings":{"a":3},"overall_sentiment":"x","areas_for_improvement":[]}"#,
        // stars missing
        r#"{"summary":"s","ratings":{"a":{"explanation":"e"}},"overall_sentiment":"x","areas_for_improvement":[]}"#,
        // stars not numeric
        r#"{"summary":"s","ratings":{"a":{"stars":"4","explanation":"e"}},"overall_sentiment":"x","areas_for_improvement":[]}"#,
        // stars null, as in an unfilled template
        r#"{"summary":"s","ratings":{"a":{"stars":null,"explanation":""}},"overall_sentiment":"x","areas_for_improvement":[]}"#,
        // explanation not a string
        r#"{"summary":"s","ratings":{"a":{"stars":4,"explanation":4}},"overall_sentiment":"x","areas_for_improvement":[]}"#,
        // sentiment not a string
        r#"{"summary":"s","ratings":{},"overall_sentiment":["x"],"areas_for_improvement":[]}"#,
        // areas not an array
        r#"{"summary":"s","ratings":{},"overall_sentiment":"x","areas_for_improvement":"more"}"#,
        // areas with a non-string entry
        r#"{"summary":"s","ratings":{},"overall_sentiment":"x","areas_for_improvement":["a",2]}"#,
    ];

    for raw in cases {
        assert!(is_schema_mismatch(&FeedbackParser::parse(raw)), "accepted: {}", raw);
    }
}

#[test]
fn test_one_bad_rating_rejects_whole_report() {
    let raw = r#"{
        "summary": "s",
        "ratings": {
            "good": { "stars": 5, "explanation": "fine" },
            "bad": { "stars": 5 }
        },
        "overall_sentiment": "Neutral",
        "areas_for_improvement": []
    }"#;

    assert!(is_schema_mismatch(&FeedbackParser::parse(raw)));
}

#[test]
fn test_stars_out_of_range_are_rejected() {
    for stars in ["0", "6", "-1", "3.5"] {
        let raw = format!(
            r#"{{"summary":"s","ratings":{{"a":{{"stars":{},"explanation":"e"}}}},"overall_sentiment":"x","areas_for_improvement":[]}}"#,
            stars
        );
        assert!(is_schema_mismatch(&FeedbackParser::parse(&raw)), "accepted stars {}", stars);
    }
}

#[test]
fn test_camel_case_keys_are_accepted() {
    let raw = r#"{
        "summary": "s",
        "ratings": { "a": { "stars": 3, "explanation": "e" } },
        "overallSentiment": "Escalating",
        "areasForImprovement": ["Listen more"]
    }"#;

    let report = FeedbackParser::parse(raw).unwrap();

    assert_eq!(report.overall_sentiment, "Escalating");
    assert_eq!(report.areas_for_improvement, vec!["Listen more".to_string()]);
}

#[test]
fn test_empty_ratings_are_accepted() {
    let raw = r#"{"summary":"s","ratings":{},"overall_sentiment":"x","areas_for_improvement":[]}"#;
    assert!(FeedbackParser::parse(raw).unwrap().ratings.is_empty());
}

#[test]
fn test_extra_fields_are_ignored() {
    let raw = r#"{"summary":"s","ratings":{},"overall_sentiment":"x","areas_for_improvement":[],"model":"v2"}"#;
    assert!(FeedbackParser::parse(raw).is_ok());
}

#[test]
fn test_parse_is_idempotent() {
    let inputs = [
        PAYLOAD.to_string(),
        "not json".to_string(),
        r#"{"summary":"ok"}"#.to_string(),
        String::new(),
    ];

    for raw in &inputs {
        assert_eq!(FeedbackParser::parse(raw), FeedbackParser::parse(raw));
    }
}

#[test]
fn test_serialized_report_parses_back() {
    let report = sample_report();
    let json = serde_json::to_string_pretty(&report).unwrap();

    assert!(json.contains("\"overall_sentiment\""));
    assert!(json.contains("\"areas_for_improvement\""));
    assert_eq!(FeedbackParser::parse(&json).unwrap(), report);

    let fenced = format!("```json\n{}\n```", json);
    assert_eq!(FeedbackParser::parse(&fenced).unwrap(), report);
}
