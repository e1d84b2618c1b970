// src/store/legacy.rs
//
// Migrate-on-read for stored reports. Older records predate the usability,
// technologies and social categories and carry no `schemaVersion`. Their
// checks may also lack `impact`, `difficulty`, `explanation` or `howToFix`.
// Everything is filled in here so the rest of the crate only ever sees a
// complete `Report`.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::StoredReport;
use crate::error::StoreError;
use crate::scoring::rounded_mean;
use crate::types::*;

pub fn migrate_report(value: Value) -> Result<Report, StoreError> {
    let record = as_object(&value)?;

    let url = record
        .get("url")
        .and_then(Value::as_str)
        .ok_or(StoreError::MissingField("url"))?
        .to_string();

    let empty = Map::new();
    let details_obj = record.get("details").and_then(Value::as_object).unwrap_or(&empty);

    let mut details = Details::default();
    for category in Category::ALL {
        let section_value = details_obj.get(category.key()).and_then(Value::as_object);
        let top_level = record.get(&score_key(category)).and_then(as_score);
        let section_score = section_value.and_then(|s| s.get("score")).and_then(as_score);

        let checks = section_value
            .and_then(|s| s.get("checks"))
            .and_then(Value::as_array)
            .map(|checks| checks.iter().filter_map(migrate_check).collect())
            .unwrap_or_default();

        *details.section_mut(category) = AnalysisSection {
            score: section_score.or(top_level).unwrap_or(0),
            checks,
        };
    }

    let category_score = |category: Category| {
        record
            .get(&score_key(category))
            .and_then(as_score)
            .unwrap_or(details.section(category).score)
    };
    let scores: Vec<u8> = Category::ALL.iter().map(|c| category_score(*c)).collect();

    let overall_score = record
        .get("overallScore")
        .and_then(as_score)
        .unwrap_or_else(|| rounded_mean(&scores));

    Ok(Report {
        schema_version: SCHEMA_VERSION,
        url,
        overall_score,
        seo_score: scores[0],
        performance_score: scores[1],
        security_score: scores[2],
        mobile_score: scores[3],
        usability_score: scores[4],
        technologies_score: scores[5],
        social_score: scores[6],
        details,
    })
}

pub fn migrate_stored(value: Value) -> Result<StoredReport, StoreError> {
    let record = as_object(&value)?;

    let id = record
        .get("id")
        .and_then(Value::as_u64)
        .ok_or(StoreError::MissingField("id"))?;

    // Legacy rows allowed a null creation time.
    let created_at = match record.get("createdAt") {
        None | Some(Value::Null) => DateTime::<Utc>::UNIX_EPOCH,
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| StoreError::InvalidField {
                field: "createdAt",
                reason: e.to_string(),
            })?,
        Some(other) => {
            return Err(StoreError::InvalidField {
                field: "createdAt",
                reason: format!("expected a timestamp string, got {}", other),
            })
        }
    };

    Ok(StoredReport {
        id,
        created_at,
        report: migrate_report(value)?,
    })
}

fn as_object(value: &Value) -> Result<&Map<String, Value>, StoreError> {
    value.as_object().ok_or(StoreError::InvalidField {
        field: "record",
        reason: "expected a JSON object".to_string(),
    })
}

fn score_key(category: Category) -> String {
    format!("{}Score", category.key())
}

/// Any JSON number, rounded and clamped to 0..=100.
fn as_score(value: &Value) -> Option<u8> {
    value.as_f64().map(|n| n.round().clamp(0.0, 100.0) as u8)
}

fn migrate_check(value: &Value) -> Option<CheckResult> {
    let check = value.as_object()?;
    let text = |key: &str| {
        check
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
            .filter(|s| !s.is_empty())
    };

    let passed = check.get("passed").and_then(Value::as_bool).unwrap_or(false);
    let score = check
        .get("score")
        .and_then(as_score)
        .unwrap_or(if passed { 100 } else { 0 });
    let recommendation = text("recommendation");

    Some(CheckResult {
        passed,
        score,
        title: text("title").unwrap_or_default(),
        description: text("description").unwrap_or_default(),
        impact: check
            .get("impact")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or(Impact::Medium),
        difficulty: check
            .get("difficulty")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or(Difficulty::Medium),
        explanation: text("explanation").unwrap_or_default(),
        how_to_fix: text("howToFix")
            .or_else(|| recommendation.clone())
            .unwrap_or_default(),
        recommendation,
        learn_more_url: text("learnMoreUrl"),
        details: match check.get("details") {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
            Some(Value::String(s)) => vec![s.clone()],
            _ => Vec::new(),
        },
    })
}
