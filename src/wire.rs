//! JSON boundary
//!
//! Input: `{ "<question id>": <zero-based option index>, ... }`.
//! Output: `{ primary, secondary, scores, confidence? }`.
//!
//! Under the legacy contract `confidence` is present only for quick-quiz
//! results; callers must not assume it for the full quiz. The unified
//! contract emits it for both.

use archetype_types::{
    AnswerSet, ArchetypeClass, ClassificationResult, ConfidenceBand, QuizVariant, ScoreVector,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::classify::{confidence_between, ConfidenceThresholds};
use crate::config::OutputContract;
use crate::error::WireError;

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Strictly parse an answer document.
///
/// The document itself must be a JSON object; individual entries with
/// garbage values are still dropped as "not answered".
pub fn try_parse_answers(json: &str) -> Result<AnswerSet, WireError> {
    let value: Value = serde_json::from_str(json)?;
    let map = match value {
        Value::Object(map) => map,
        other => {
            return Err(WireError::NotAnObject {
                found: json_kind(&other),
            })
        }
    };
    let (answers, rejected) = AnswerSet::from_json_map(map);
    if !rejected.is_empty() {
        tracing::debug!(?rejected, "Ignoring answers without a valid option index");
    }
    Ok(answers)
}

/// Parse an answer document, treating any malformed input as "no answers"
pub fn parse_answers(json: &str) -> AnswerSet {
    try_parse_answers(json).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Malformed answer document, classifying as unanswered");
        AnswerSet::new()
    })
}

/// Classification result as exchanged with callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPayload {
    pub primary: ArchetypeClass,
    pub secondary: Option<ArchetypeClass>,
    pub scores: ScoreVector,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<ConfidenceBand>,
}

impl ResultPayload {
    pub fn from_result(
        result: &ClassificationResult,
        variant: QuizVariant,
        contract: OutputContract,
    ) -> Self {
        Self {
            primary: result.primary,
            secondary: result.secondary,
            scores: result.scores,
            confidence: contract
                .includes_confidence(variant)
                .then_some(result.confidence),
        }
    }

    /// Rebuild a result; a missing confidence is recomputed from the scores
    pub fn into_result(self, thresholds: &ConfidenceThresholds) -> ClassificationResult {
        let confidence = self.confidence.unwrap_or_else(|| {
            confidence_between(&self.scores, self.primary, self.secondary, thresholds)
        });
        ClassificationResult {
            primary: self.primary,
            secondary: self.secondary,
            scores: self.scores,
            confidence,
        }
    }

    pub fn to_json(&self) -> Result<String, WireError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, WireError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, WireError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ClassificationResult {
        ClassificationResult {
            primary: ArchetypeClass::Lover,
            secondary: Some(ArchetypeClass::Caregiver),
            scores: ScoreVector::from_pairs([
                (ArchetypeClass::Lover, 1.5 / 2.1),
                (ArchetypeClass::Caregiver, 0.6 / 2.1),
            ]),
            confidence: ConfidenceBand::High,
        }
    }

    #[test]
    fn test_parse_answers_drops_garbage_entries() {
        let answers = parse_answers(r#"{"q1": 0, "q2": "x", "q3": 2, "q4": -3}"#);
        assert_eq!(answers.len(), 2);
        assert_eq!(answers.get("q3"), Some(2));
    }

    #[test]
    fn test_parse_answers_malformed_document_is_empty() {
        assert!(parse_answers("not json").is_empty());
        assert!(parse_answers("[1, 2, 3]").is_empty());
        assert!(parse_answers("").is_empty());
    }

    #[test]
    fn test_try_parse_answers_reports_shape() {
        let err = try_parse_answers("[1]").unwrap_err();
        assert!(matches!(err, WireError::NotAnObject { found: "array" }));
        assert!(matches!(try_parse_answers("{").unwrap_err(), WireError::Json(_)));
    }

    #[test]
    fn test_legacy_contract_omits_full_confidence() {
        let result = sample();
        let full = ResultPayload::from_result(&result, QuizVariant::Full, OutputContract::Legacy);
        let json: Value = serde_json::from_str(&full.to_json().unwrap()).unwrap();
        assert!(json.get("confidence").is_none());
        assert_eq!(json["primary"], "lover");

        let quick = ResultPayload::from_result(&result, QuizVariant::Quick, OutputContract::Legacy);
        let json: Value = serde_json::from_str(&quick.to_json().unwrap()).unwrap();
        assert_eq!(json["confidence"], "high");
    }

    #[test]
    fn test_unified_contract_always_has_confidence() {
        let payload =
            ResultPayload::from_result(&sample(), QuizVariant::Full, OutputContract::Unified);
        assert_eq!(payload.confidence, Some(ConfidenceBand::High));
    }

    #[test]
    fn test_null_secondary_round_trips() {
        let json = r#"{"primary":"explorer","secondary":null,"scores":{}}"#;
        let payload = ResultPayload::from_json(json).unwrap();
        assert_eq!(payload.secondary, None);
        let result = payload.into_result(&ConfidenceThresholds::default());
        assert_eq!(result.confidence, ConfidenceBand::Low);
        assert!(result.is_degenerate());
    }

    #[test]
    fn test_missing_confidence_is_recomputed() {
        let payload =
            ResultPayload::from_result(&sample(), QuizVariant::Full, OutputContract::Legacy);
        let parsed = ResultPayload::from_json(&payload.to_json().unwrap()).unwrap();
        let result = parsed.into_result(&ConfidenceThresholds::default());
        assert_eq!(result, sample());
    }

    #[test]
    fn test_rejects_unknown_class() {
        let json = r#"{"primary":"wizard","secondary":null,"scores":{}}"#;
        assert!(ResultPayload::from_json(json).is_err());
    }
}
