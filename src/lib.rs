//! Dream Archetype Classification Engine
//!
//! Turns quiz answers (and, for the quick quiz, an optional dream narrative)
//! into a ranked profile over 12 fixed archetype classes with a coarse
//! confidence band. Shared by the deep quiz, the quick first-time quiz and the
//! result display / sharing flow, so it behaves identically for every caller.
//!
//! # Architecture
//!
//! ```text
//! config/*.yaml (embedded, optional override dir)
//!       │  loaded + validated once
//!       ▼
//! ┌─────────────────────────────────────────┐
//! │  Catalog                                │
//! │  TaxonomyRegistry · QuestionBank ×2     │
//! │  KeywordDictionary                      │
//! └─────────────────────────────────────────┘
//!       │
//!       ▼
//! AnswerSet ─► score ─► normalize ─► classify ─► ClassificationResult
//! ```
//!
//! Weights are hand-authored constants. The engine does no I/O per request,
//! holds no mutable state and never fails on malformed input: unknown ids,
//! bad indexes and empty answer sets all produce a renderable result. Errors
//! exist only at load time, when the data files are checked for consistency.
//!
//! # Example
//!
//! ```
//! use dream_archetype::{AnswerSet, ArchetypeEngine};
//!
//! let engine = ArchetypeEngine::builtin().unwrap();
//! let answers = AnswerSet::new().with("quick_q1", 2).with("quick_q6", 1);
//! let result = engine.quick_quiz(&answers, Some("I dreamt of a kiss"));
//! assert_eq!(result.primary.as_str(), "lover");
//! ```

pub mod catalog;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod keywords;
pub mod normalize;
pub mod questions;
pub mod scoring;
pub mod taxonomy;
pub mod wire;

pub use archetype_types::{
    AnswerSet, ArchetypeClass, ClassificationResult, ConfidenceBand, Lang, QuizVariant,
    ScoreVector, TypesError,
};
pub use catalog::Catalog;
pub use classify::{classify, ClassifierPolicy, ConfidenceThresholds};
pub use config::{DataFile, DataSource, EngineConfig, OutputContract, CONFIG_DIR_ENV};
pub use engine::ArchetypeEngine;
pub use error::{CatalogError, ConfigError, EngineError, WireError};
pub use keywords::KeywordDictionary;
pub use normalize::normalize;
pub use questions::{AnswerOption, QuestionBank, QuestionDefinition, QuizProgress};
pub use scoring::{score, KeywordPolicy};
pub use taxonomy::{ArchetypeRecord, LocalizedText, ProfileView, TaxonomyRegistry};
pub use wire::{parse_answers, try_parse_answers, ResultPayload};
