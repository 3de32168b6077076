//! Archetype Types - Level 1 Foundation Types
//!
//! Pure data structures shared by the classification engine and anything that
//! consumes its results (display, sharing, persistence collaborators).
//!
//! ## Architecture Level: LEVEL 1 (Foundation)
//!
//! This crate depends on nothing else in the workspace. The engine crate builds
//! the taxonomy, question banks and scoring pipeline on top of these types.
//!
//! ## Contents
//!
//! - The closed set of 12 archetype classes, in declared taxonomy order
//! - Language, quiz variant and confidence band tags
//! - Dense score vectors with the JSON `{ classKey: number }` shape
//! - Answer sets (question id → option index) with lenient parsing
//! - Classification results
//!
//! ## Rules
//!
//! 1. **NO I/O** - Only data structures and their parsing
//! 2. **NO WORKSPACE DEPENDENCIES**
//! 3. **SERIALIZABLE** - All public types support serde
//! 4. **DETERMINISTIC** - Iteration order is always the declared class order

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

/// Errors raised while parsing foundation types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TypesError {
    #[error("Unknown archetype class: '{0}'")]
    UnknownClass(String),

    #[error("Invalid score for '{class}': {value} (must be finite and >= 0)")]
    InvalidScore { class: String, value: f64 },

    #[error("Unknown quiz variant: '{0}'")]
    UnknownVariant(String),

    #[error("Unknown confidence band: '{0}'")]
    UnknownBand(String),
}

// ============================================================================
// ARCHETYPE CLASS
// ============================================================================

/// One of the 12 canonical archetype classes.
///
/// Variant order IS the declared taxonomy order. It drives tie-breaking during
/// classification, so never reorder these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchetypeClass {
    Explorer,
    Sage,
    Innocent,
    Outlaw,
    Magician,
    Hero,
    Lover,
    Jester,
    Everyman,
    Caregiver,
    Ruler,
    Creator,
}

impl ArchetypeClass {
    /// Number of classes in the taxonomy
    pub const COUNT: usize = 12;

    /// All classes in declared order
    pub const ALL: [ArchetypeClass; Self::COUNT] = [
        ArchetypeClass::Explorer,
        ArchetypeClass::Sage,
        ArchetypeClass::Innocent,
        ArchetypeClass::Outlaw,
        ArchetypeClass::Magician,
        ArchetypeClass::Hero,
        ArchetypeClass::Lover,
        ArchetypeClass::Jester,
        ArchetypeClass::Everyman,
        ArchetypeClass::Caregiver,
        ArchetypeClass::Ruler,
        ArchetypeClass::Creator,
    ];

    /// Canonical key, as used in the JSON contract and config files
    pub fn as_str(&self) -> &'static str {
        match self {
            ArchetypeClass::Explorer => "explorer",
            ArchetypeClass::Sage => "sage",
            ArchetypeClass::Innocent => "innocent",
            ArchetypeClass::Outlaw => "outlaw",
            ArchetypeClass::Magician => "magician",
            ArchetypeClass::Hero => "hero",
            ArchetypeClass::Lover => "lover",
            ArchetypeClass::Jester => "jester",
            ArchetypeClass::Everyman => "everyman",
            ArchetypeClass::Caregiver => "caregiver",
            ArchetypeClass::Ruler => "ruler",
            ArchetypeClass::Creator => "creator",
        }
    }

    /// Position in declared order (0-based)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`ArchetypeClass::index`]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Parse a raw key, returning `None` instead of an error.
    ///
    /// Used by fail-soft lookups that must echo unknown keys back to the caller.
    pub fn parse_lenient(key: &str) -> Option<Self> {
        key.parse().ok()
    }
}

impl FromStr for ArchetypeClass {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|class| class.as_str().eq_ignore_ascii_case(key))
            .ok_or_else(|| TypesError::UnknownClass(s.to_string()))
    }
}

impl fmt::Display for ArchetypeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TAGS: LANGUAGE, QUIZ VARIANT, CONFIDENCE
// ============================================================================

/// Display language for registry lookups
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    En,
    Es,
}

impl Lang {
    pub const ALL: [Lang; 2] = [Lang::En, Lang::Es];

    pub fn as_str(&self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Es => "es",
        }
    }

    /// Resolve a language tag such as `es`, `es-MX` or `EN_us`.
    ///
    /// Unknown or empty tags resolve to English.
    pub fn parse_or_default(tag: &str) -> Self {
        let base = tag
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match base.as_str() {
            "es" => Lang::Es,
            _ => Lang::En,
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which quiz flow produced an answer set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizVariant {
    /// 15-question deliberate self-assessment
    Full,
    /// 7-question first-time / guest funnel
    Quick,
}

impl QuizVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuizVariant::Full => "full",
            QuizVariant::Quick => "quick",
        }
    }

    /// Only the quick flow collects a dream narrative alongside the answers
    pub fn accepts_free_text(&self) -> bool {
        matches!(self, QuizVariant::Quick)
    }
}

impl FromStr for QuizVariant {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(QuizVariant::Full),
            "quick" => Ok(QuizVariant::Quick),
            _ => Err(TypesError::UnknownVariant(s.to_string())),
        }
    }
}

impl fmt::Display for QuizVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse label for how decisively the primary class led the secondary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    Low,
    Medium,
    High,
}

impl ConfidenceBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceBand::Low => "low",
            ConfidenceBand::Medium => "medium",
            ConfidenceBand::High => "high",
        }
    }
}

impl FromStr for ConfidenceBand {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(ConfidenceBand::Low),
            "medium" => Ok(ConfidenceBand::Medium),
            "high" => Ok(ConfidenceBand::High),
            _ => Err(TypesError::UnknownBand(s.to_string())),
        }
    }
}

impl fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SCORE VECTOR
// ============================================================================

/// Total mapping from all 12 classes to a non-negative accumulator.
///
/// Stored densely in declared class order. Unscored classes hold 0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreVector {
    values: [f64; ArchetypeClass::COUNT],
}

impl ScoreVector {
    /// All-zero vector ("no information")
    pub fn zero() -> Self {
        Self::default()
    }

    /// Build from `(class, score)` pairs; repeated classes are summed
    pub fn from_pairs(pairs: impl IntoIterator<Item = (ArchetypeClass, f64)>) -> Self {
        let mut vector = Self::zero();
        for (class, score) in pairs {
            vector.add(class, score);
        }
        vector
    }

    pub fn get(&self, class: ArchetypeClass) -> f64 {
        self.values[class.index()]
    }

    /// Add weight to a class.
    ///
    /// Non-finite and non-positive weights are ignored so the vector stays
    /// non-negative.
    pub fn add(&mut self, class: ArchetypeClass, weight: f64) {
        if weight.is_finite() && weight > 0.0 {
            self.values[class.index()] += weight;
        }
    }

    /// Sum of all accumulators
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// True when no class carries any score
    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|v| *v == 0.0)
    }

    /// Number of classes with a non-zero score
    pub fn nonzero_count(&self) -> usize {
        self.values.iter().filter(|v| **v != 0.0).count()
    }

    /// Iterate `(class, score)` in declared order
    pub fn iter(&self) -> impl Iterator<Item = (ArchetypeClass, f64)> + '_ {
        ArchetypeClass::ALL
            .iter()
            .map(move |class| (*class, self.values[class.index()]))
    }

    /// Raw values in declared order
    pub fn values(&self) -> &[f64; ArchetypeClass::COUNT] {
        &self.values
    }

    /// Apply `f` to every accumulator
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        let mut values = self.values;
        for v in values.iter_mut() {
            *v = f(*v);
        }
        Self { values }
    }

    /// All 12 classes ordered by score, descending.
    ///
    /// Ties keep declared taxonomy order (stable sort over `ALL`), so equal
    /// scores always resolve to the class declared first.
    pub fn ranked(&self) -> Vec<ArchetypeClass> {
        let mut classes = ArchetypeClass::ALL.to_vec();
        classes.sort_by(|a, b| self.get(*b).total_cmp(&self.get(*a)));
        classes
    }
}

impl Serialize for ScoreVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(ArchetypeClass::COUNT))?;
        for (class, score) in self.iter() {
            map.serialize_entry(class.as_str(), &score)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ScoreVector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ScoreVectorVisitor;

        impl<'de> Visitor<'de> for ScoreVectorVisitor {
            type Value = ScoreVector;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from archetype class key to a non-negative number")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut vector = ScoreVector::zero();
                while let Some((key, value)) = access.next_entry::<String, f64>()? {
                    let class: ArchetypeClass =
                        key.parse().map_err(<A::Error as de::Error>::custom)?;
                    if !value.is_finite() || value < 0.0 {
                        return Err(de::Error::custom(TypesError::InvalidScore {
                            class: key,
                            value,
                        }));
                    }
                    vector.values[class.index()] = value;
                }
                Ok(vector)
            }
        }

        deserializer.deserialize_map(ScoreVectorVisitor)
    }
}

// ============================================================================
// ANSWER SET
// ============================================================================

/// Caller-supplied mapping from question id to a zero-based option index.
///
/// May be partial. Ordered by question id so scoring is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnswerSet {
    answers: BTreeMap<String, usize>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer, replacing any earlier one for the same question
    pub fn insert(&mut self, question_id: impl Into<String>, option_index: usize) {
        self.answers.insert(question_id.into(), option_index);
    }

    /// Builder-style [`AnswerSet::insert`]
    pub fn with(mut self, question_id: impl Into<String>, option_index: usize) -> Self {
        self.insert(question_id, option_index);
        self
    }

    pub fn get(&self, question_id: &str) -> Option<usize> {
        self.answers.get(question_id).copied()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.answers.iter().map(|(id, idx)| (id.as_str(), *idx))
    }

    /// Build from a loosely-typed JSON object.
    ///
    /// Entries whose value is not a non-negative integer are treated as "not
    /// answered". Their ids are returned alongside the set so callers can log
    /// them.
    pub fn from_json_map(
        map: impl IntoIterator<Item = (String, serde_json::Value)>,
    ) -> (Self, Vec<String>) {
        let mut set = Self::new();
        let mut rejected = Vec::new();
        for (id, value) in map {
            match value.as_u64().and_then(|n| usize::try_from(n).ok()) {
                Some(index) => set.insert(id, index),
                None => rejected.push(id),
            }
        }
        (set, rejected)
    }
}

impl FromIterator<(String, usize)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (String, usize)>>(iter: I) -> Self {
        Self {
            answers: iter.into_iter().collect(),
        }
    }
}

impl<'de> Deserialize<'de> for AnswerSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        Ok(AnswerSet::from_json_map(raw).0)
    }
}

// ============================================================================
// CLASSIFICATION RESULT
// ============================================================================

/// Ranked archetype profile for one quiz session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Top-ranked class
    pub primary: ArchetypeClass,
    /// Second-ranked class; `None` when fewer than two classes scored
    pub secondary: Option<ArchetypeClass>,
    /// Normalized score vector (sums to 1 unless all-zero)
    pub scores: ScoreVector,
    /// How decisively primary led secondary
    pub confidence: ConfidenceBand,
}

impl ClassificationResult {
    /// All 12 classes in rank order
    pub fn ranked(&self) -> Vec<ArchetypeClass> {
        self.scores.ranked()
    }

    /// Normalized score for a class
    pub fn score_of(&self, class: ArchetypeClass) -> f64 {
        self.scores.get(class)
    }

    /// True when the result carries no quiz signal at all
    pub fn is_degenerate(&self) -> bool {
        self.scores.is_zero()
    }
}
