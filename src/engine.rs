//! Archetype Engine - single entry point for every quiz flow
//!
//! ```text
//! AnswerSet (+ free text, quick only)
//!       │
//!       ▼  scoring::score
//! raw ScoreVector
//!       │
//!       ▼  normalize::normalize
//! normalized ScoreVector
//!       │
//!       ▼  classify::classify
//! ClassificationResult ──► ResultPayload (JSON) / ProfileView (display)
//! ```
//!
//! The engine holds only immutable data. Every call is a pure function of its
//! inputs, so one instance is shared freely across threads.

use archetype_types::{AnswerSet, ClassificationResult, Lang, QuizVariant, ScoreVector};
use once_cell::sync::OnceCell;

use crate::catalog::Catalog;
use crate::classify::classify;
use crate::config::{DataSource, EngineConfig};
use crate::error::EngineError;
use crate::keywords::KeywordDictionary;
use crate::normalize::normalize;
use crate::questions::{QuestionBank, QuizProgress};
use crate::scoring::score;
use crate::taxonomy::{ProfileView, TaxonomyRegistry};
use crate::wire::ResultPayload;

static SHARED: OnceCell<ArchetypeEngine> = OnceCell::new();

/// Immutable catalog + tunables
#[derive(Debug, Clone)]
pub struct ArchetypeEngine {
    catalog: Catalog,
    config: EngineConfig,
}

impl ArchetypeEngine {
    /// Build an engine, checking the tunables against the catalog
    pub fn new(catalog: Catalog, config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        config.validate_against(catalog.bank(QuizVariant::Quick))?;
        tracing::info!(
            full_questions = catalog.bank(QuizVariant::Full).len(),
            quick_questions = catalog.bank(QuizVariant::Quick).len(),
            keywords = catalog.keywords().len(),
            "Archetype engine ready"
        );
        Ok(Self { catalog, config })
    }

    /// Engine over the embedded data files and default tunables
    pub fn builtin() -> Result<Self, EngineError> {
        Self::from_source(&DataSource::embedded())
    }

    pub fn from_source(source: &DataSource) -> Result<Self, EngineError> {
        let catalog = Catalog::load(source)?;
        let config = EngineConfig::load(source)?;
        Self::new(catalog, config)
    }

    /// Engine honoring `ARCHETYPE_CONFIG_DIR`
    pub fn from_env() -> Result<Self, EngineError> {
        Self::from_source(&DataSource::from_env())
    }

    /// Process-wide engine, built from the environment on first use.
    ///
    /// A failed build is returned to the caller and retried on the next call.
    pub fn shared() -> Result<&'static ArchetypeEngine, EngineError> {
        SHARED.get_or_try_init(Self::from_env)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn taxonomy(&self) -> &TaxonomyRegistry {
        self.catalog.taxonomy()
    }

    pub fn bank(&self, variant: QuizVariant) -> &QuestionBank {
        self.catalog.bank(variant)
    }

    pub fn keywords(&self) -> &KeywordDictionary {
        self.catalog.keywords()
    }

    /// Raw score vector. Free text only counts for variants that collect it.
    pub fn score(
        &self,
        variant: QuizVariant,
        answers: &AnswerSet,
        free_text: Option<&str>,
    ) -> ScoreVector {
        let free_text = match free_text {
            Some(text) if !variant.accepts_free_text() => {
                if !text.trim().is_empty() {
                    tracing::debug!(%variant, "Ignoring free text for variant without narrative");
                }
                None
            }
            other => other,
        };
        score(
            answers,
            self.bank(variant),
            free_text,
            self.keywords(),
            &self.config.keyword_policy(),
        )
    }

    /// Score, normalize and classify
    pub fn evaluate(
        &self,
        variant: QuizVariant,
        answers: &AnswerSet,
        free_text: Option<&str>,
    ) -> ClassificationResult {
        let raw = self.score(variant, answers, free_text);
        let result = classify(&normalize(&raw), &self.config.classifier_policy());
        tracing::debug!(
            %variant,
            answers = answers.len(),
            primary = %result.primary,
            secondary = ?result.secondary,
            confidence = %result.confidence,
            "Classified answer set"
        );
        result
    }

    /// 15-question deep quiz
    pub fn full_quiz(&self, answers: &AnswerSet) -> ClassificationResult {
        self.evaluate(QuizVariant::Full, answers, None)
    }

    /// 7-question quick quiz with an optional dream narrative
    pub fn quick_quiz(&self, answers: &AnswerSet, free_text: Option<&str>) -> ClassificationResult {
        self.evaluate(QuizVariant::Quick, answers, free_text)
    }

    pub fn progress(&self, variant: QuizVariant, answers: &AnswerSet) -> QuizProgress {
        self.bank(variant).progress(answers)
    }

    /// JSON payload under the configured output contract
    pub fn payload(&self, variant: QuizVariant, result: &ClassificationResult) -> ResultPayload {
        ResultPayload::from_result(result, variant, self.config.output_contract)
    }

    /// Rebuild a result from a stored or shared payload
    pub fn restore(&self, payload: ResultPayload) -> ClassificationResult {
        payload.into_result(&self.config.confidence)
    }

    /// Display bundle for the result screen
    pub fn profile(&self, result: &ClassificationResult, lang: Lang, top_n: usize) -> ProfileView {
        self.taxonomy().profile(result, lang, top_n)
    }
}
