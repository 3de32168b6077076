//! Classifier
//!
//! Ranks a normalized score vector, picks primary/secondary classes and bands
//! the gap between them into a coarse confidence label.
//!
//! Ties always resolve to the class declared first in the taxonomy. An
//! all-zero vector never fails: it yields the configured default primary with
//! no secondary and `low` confidence.

use archetype_types::{ArchetypeClass, ClassificationResult, ConfidenceBand, ScoreVector};
use serde::{Deserialize, Serialize};

/// Gap above which confidence is `high`
pub const DEFAULT_HIGH_GAP: f64 = 0.15;
/// Gap above which confidence is `medium`
pub const DEFAULT_MEDIUM_GAP: f64 = 0.08;

/// Normalized primary-minus-secondary gap thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfidenceThresholds {
    pub high_gap: f64,
    pub medium_gap: f64,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            high_gap: DEFAULT_HIGH_GAP,
            medium_gap: DEFAULT_MEDIUM_GAP,
        }
    }
}

impl ConfidenceThresholds {
    /// Band a gap. Strict comparisons: a gap equal to a threshold falls below it.
    pub fn band(&self, gap: f64) -> ConfidenceBand {
        if gap > self.high_gap {
            ConfidenceBand::High
        } else if gap > self.medium_gap {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }
}

/// Classifier settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierPolicy {
    pub thresholds: ConfidenceThresholds,
    /// Reported when no class carries any score
    pub default_primary: ArchetypeClass,
}

impl Default for ClassifierPolicy {
    fn default() -> Self {
        Self {
            thresholds: ConfidenceThresholds::default(),
            default_primary: ArchetypeClass::Explorer,
        }
    }
}

/// Confidence for a primary/secondary pair; a missing secondary scores 0
pub fn confidence_between(
    scores: &ScoreVector,
    primary: ArchetypeClass,
    secondary: Option<ArchetypeClass>,
    thresholds: &ConfidenceThresholds,
) -> ConfidenceBand {
    if scores.is_zero() {
        return ConfidenceBand::Low;
    }
    let runner_up = secondary.map(|class| scores.get(class)).unwrap_or(0.0);
    thresholds.band(scores.get(primary) - runner_up)
}

/// Classify a normalized score vector
pub fn classify(vector: &ScoreVector, policy: &ClassifierPolicy) -> ClassificationResult {
    if vector.is_zero() {
        tracing::debug!(
            default_primary = %policy.default_primary,
            "Empty score vector, using default classification"
        );
        return ClassificationResult {
            primary: policy.default_primary,
            secondary: None,
            scores: *vector,
            confidence: ConfidenceBand::Low,
        };
    }

    let ranked = vector.ranked();
    let primary = ranked[0];
    let secondary = if vector.nonzero_count() >= 2 {
        Some(ranked[1])
    } else {
        None
    };
    let confidence = confidence_between(vector, primary, secondary, &policy.thresholds);

    ClassificationResult {
        primary,
        secondary,
        scores: *vector,
        confidence,
    }
}
