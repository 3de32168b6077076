//! Error types for catalog loading, configuration and the wire boundary
//!
//! Per-request classification never fails. Everything here is raised either at
//! startup (catalog/config validation) or at the JSON boundary when a caller
//! explicitly asks for strict parsing.

use archetype_types::{ArchetypeClass, QuizVariant};
use thiserror::Error;

/// Top-level error for building an engine
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Taxonomy, question bank and keyword dictionary validation errors
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Unsupported version {found} in {origin} (expected {expected})")]
    UnsupportedVersion {
        origin: String,
        found: u32,
        expected: u32,
    },

    #[error("Taxonomy must declare exactly {expected} archetypes, found {found}")]
    ArchetypeCount { expected: usize, found: usize },

    #[error("Archetype '{found}' at position {position} is out of order (expected '{expected}')")]
    ArchetypeOrder {
        position: usize,
        expected: ArchetypeClass,
        found: ArchetypeClass,
    },

    #[error("{owner} is missing English text for '{field}'")]
    MissingEnglish { owner: String, field: &'static str },

    #[error("Archetype '{class}' has invalid {field} '{value}' (expected #RRGGBB)")]
    InvalidColor {
        class: ArchetypeClass,
        field: &'static str,
        value: String,
    },

    #[error("Archetype '{class}' has invalid compatibility set: {reason}")]
    InvalidCompatibility {
        class: ArchetypeClass,
        reason: String,
    },

    #[error("Expected a {expected} question bank in {origin}, found {found}")]
    VariantMismatch {
        origin: String,
        expected: QuizVariant,
        found: QuizVariant,
    },

    #[error("The {variant} question bank has no questions")]
    EmptyBank { variant: QuizVariant },

    #[error("Question id '{id}' is declared more than once in the {variant} bank")]
    DuplicateQuestion { variant: QuizVariant, id: String },

    #[error("Question id '{id}' appears in both the full and quick banks")]
    SharedQuestionId { id: String },

    #[error("{variant} bank declares a question with a blank id at position {position}")]
    BlankQuestionId { variant: QuizVariant, position: usize },

    #[error("Question '{id}' must offer at least 2 options, found {found}")]
    TooFewOptions { id: String, found: usize },

    #[error("Question '{id}' option {index}: {reason}")]
    InvalidOption {
        id: String,
        index: usize,
        reason: String,
    },

    #[error("Keyword '{keyword}' for '{class}' is invalid: {reason}")]
    InvalidKeyword {
        class: ArchetypeClass,
        keyword: String,
        reason: &'static str,
    },
}

/// Engine tunable validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Confidence thresholds must satisfy 0 <= medium_gap < high_gap <= 1 (got medium={medium}, high={high})")]
    InvalidThresholds { medium: f64, high: f64 },

    #[error("Keyword bonus must be finite and positive, got {0}")]
    InvalidKeywordBonus(f64),

    #[error("max_keyword_classes must be at least 1")]
    InvalidKeywordCap,

    #[error("Free text can add {text_mass} ({bonus} x {max_classes} classes), more than {max_share} of the lightest quick answer ('{question}' option {index}, {answer_mass})")]
    BonusDominates {
        bonus: f64,
        max_classes: usize,
        text_mass: f64,
        max_share: f64,
        question: String,
        index: usize,
        answer_mass: f64,
    },
}

/// JSON boundary errors (strict parsing only)
#[derive(Error, Debug)]
pub enum WireError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected a JSON object of question id to option index, found {found}")]
    NotAnObject { found: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_wraps_config_error() {
        let err: EngineError = ConfigError::InvalidKeywordBonus(-1.0).into();
        let msg = err.to_string();
        assert!(msg.starts_with("Configuration error"));
        assert!(msg.contains("-1"));
    }

    #[test]
    fn test_catalog_error_messages_name_the_question() {
        let err = CatalogError::TooFewOptions {
            id: "q3".to_string(),
            found: 1,
        };
        assert_eq!(
            err.to_string(),
            "Question 'q3' must offer at least 2 options, found 1"
        );
    }
}
