//! Parsing of the model's structured answer
//!
//! The answer must be a JSON object. Markers that are missing from an otherwise valid
//! object default to a neutral 5, while a marker that is present but not a number is a
//! malformed answer. The evidence marker may be given either as a missing-evidence score
//! or as a reliability score (`missing = 10 - reliability`).

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::error::SemanticError;
use crate::model::SemanticRisk;
use crate::model::semantic::MAX_MARKER_SCORE;

/// Score used for a marker the model did not report
const NEUTRAL_MARKER_SCORE: u8 = 5;

/// Keeps an explicit `null` as `Some(Value::Null)` so it is told apart from an absent key
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Default, Deserialize)]
struct RawMarker {
    #[serde(default, deserialize_with = "present")]
    score: Option<Value>,
    #[serde(default)]
    details: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RawEvidence {
    #[serde(
        default,
        deserialize_with = "present",
        alias = "score_manque_preuves",
        alias = "lack_of_evidence_score"
    )]
    missing_evidence_score: Option<Value>,
    #[serde(default, deserialize_with = "present", alias = "score_fiabilite")]
    reliability_score: Option<Value>,
    #[serde(default)]
    details: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawSemanticReport {
    #[serde(default, alias = "analyse_subjectivite")]
    subjectivity_analysis: Option<RawMarker>,
    #[serde(default, alias = "analyse_clickbait")]
    clickbait_analysis: Option<RawMarker>,
    #[serde(default, alias = "analyse_preuves")]
    evidence_analysis: Option<RawEvidence>,
    #[serde(default, alias = "synthese_globale")]
    overall_summary: Option<Value>,
    #[serde(default, alias = "verdict_style")]
    style_verdict: Option<Value>,
}

/// Remove Markdown code fences the model may wrap its answer in
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "")
        .replace("```JSON", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Marker score as an integer in [0, 10]
///
/// `Ok(None)` when the key is absent. Numbers and numeric strings are accepted; any other
/// value is an error naming the field.
fn marker_score(field: &str, value: Option<&Value>) -> Result<Option<u8>, String> {
    let Some(value) = value else {
        return Ok(None);
    };
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
    .ok_or_else(|| format!("{field} is not a numeric score: {value}"))?;

    Ok(Some(number.round().clamp(0.0, f64::from(MAX_MARKER_SCORE)) as u8))
}

fn text_of(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        other => Some(other.to_string()),
    }
}

/// Parse a raw model answer into a [`SemanticRisk`]
pub fn parse_semantic_response(raw: &str, model_used: &str) -> Result<SemanticRisk, SemanticError> {
    let cleaned = strip_code_fences(raw);

    let report: RawSemanticReport =
        serde_json::from_str(&cleaned).map_err(|e| SemanticError::MalformedOutput {
            message: e.to_string(),
            raw: raw.to_string(),
        })?;

    let subjectivity = report.subjectivity_analysis.unwrap_or_default();
    let clickbait = report.clickbait_analysis.unwrap_or_default();
    let evidence = report.evidence_analysis.unwrap_or_default();

    let malformed = |message: String| SemanticError::MalformedOutput {
        message,
        raw: raw.to_string(),
    };

    let subjectivity_score = marker_score("subjectivity score", subjectivity.score.as_ref())
        .map_err(malformed)?
        .unwrap_or(NEUTRAL_MARKER_SCORE);
    let clickbait_score = marker_score("clickbait score", clickbait.score.as_ref())
        .map_err(malformed)?
        .unwrap_or(NEUTRAL_MARKER_SCORE);
    let missing_evidence = marker_score(
        "missing evidence score",
        evidence.missing_evidence_score.as_ref(),
    )
    .map_err(malformed)?;
    let evidence_score = match missing_evidence {
        Some(score) => score,
        None => marker_score("reliability score", evidence.reliability_score.as_ref())
            .map_err(malformed)?
            .map(|reliability| MAX_MARKER_SCORE - reliability)
            .unwrap_or(NEUTRAL_MARKER_SCORE),
    };

    Ok(SemanticRisk {
        subjectivity: subjectivity_score,
        clickbait: clickbait_score,
        evidence_absence: evidence_score,
        aggregate_risk: SemanticRisk::aggregate(subjectivity_score, clickbait_score, evidence_score),
        narrative_summary: text_of(report.overall_summary.as_ref()).unwrap_or_default(),
        model_used: model_used.to_string(),
        style_verdict: text_of(report.style_verdict.as_ref()),
        subjectivity_details: text_of(subjectivity.details.as_ref()),
        clickbait_details: text_of(clickbait.details.as_ref()),
        evidence_details: text_of(evidence.details.as_ref()),
    })
}
