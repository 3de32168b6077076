//! Question bank definitions and load-time validation

use std::collections::{BTreeMap, HashMap};

use archetype_types::{AnswerSet, ArchetypeClass, QuizVariant};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::taxonomy::LocalizedText;

/// Largest weight a single option may cast onto one class
pub const MAX_OPTION_WEIGHT: f64 = 3.0;
/// Most classes a single option may vote for
pub const MAX_SCORED_CLASSES: usize = 3;

const BANK_VERSION: u32 = 1;

/// One selectable answer and the votes it casts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnswerOption {
    pub text: LocalizedText,
    /// Sparse class → positive weight map (1-3 entries)
    pub scores: BTreeMap<ArchetypeClass, f64>,
}

impl AnswerOption {
    pub fn new(text: LocalizedText, scores: impl IntoIterator<Item = (ArchetypeClass, f64)>) -> Self {
        Self {
            text,
            scores: scores.into_iter().collect(),
        }
    }

    /// Total weight this option adds to the score vector
    pub fn mass(&self) -> f64 {
        self.scores.values().sum()
    }

    /// Class carrying the highest weight; ties go to declared order
    pub fn dominant(&self) -> Option<ArchetypeClass> {
        let mut best: Option<(ArchetypeClass, f64)> = None;
        for (class, weight) in &self.scores {
            match best {
                Some((_, w)) if w >= *weight => {}
                _ => best = Some((*class, *weight)),
            }
        }
        best.map(|(class, _)| class)
    }
}

/// A quiz question with its ordered options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuestionDefinition {
    pub id: String,
    pub prompt: LocalizedText,
    pub options: Vec<AnswerOption>,
}

impl QuestionDefinition {
    pub fn option(&self, index: usize) -> Option<&AnswerOption> {
        self.options.get(index)
    }
}

/// How far through a bank an answer set has progressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuizProgress {
    /// Answers that resolve to a real option in this bank
    pub answered: usize,
    pub total: usize,
}

impl QuizProgress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.answered as f64 / self.total as f64
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.answered >= self.total
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BankFile {
    version: u32,
    variant: QuizVariant,
    questions: Vec<QuestionDefinition>,
}

/// Ordered, immutable set of questions for one quiz variant
#[derive(Debug, Clone)]
pub struct QuestionBank {
    variant: QuizVariant,
    questions: Vec<QuestionDefinition>,
    /// question id → position
    index: HashMap<String, usize>,
}

impl QuestionBank {
    /// Parse and validate a question bank file
    pub fn from_yaml_str(
        yaml: &str,
        expected: QuizVariant,
        origin: &str,
    ) -> Result<Self, CatalogError> {
        let file: BankFile = serde_yaml::from_str(yaml).map_err(|source| CatalogError::Parse {
            origin: origin.to_string(),
            source,
        })?;
        if file.version != BANK_VERSION {
            return Err(CatalogError::UnsupportedVersion {
                origin: origin.to_string(),
                found: file.version,
                expected: BANK_VERSION,
            });
        }
        if file.variant != expected {
            return Err(CatalogError::VariantMismatch {
                origin: origin.to_string(),
                expected,
                found: file.variant,
            });
        }
        let bank = Self::new(file.variant, file.questions)?;
        tracing::info!(
            origin,
            variant = %bank.variant,
            questions = bank.len(),
            "Loaded question bank"
        );
        Ok(bank)
    }

    /// Validate questions and build the bank
    pub fn new(
        variant: QuizVariant,
        questions: Vec<QuestionDefinition>,
    ) -> Result<Self, CatalogError> {
        if questions.is_empty() {
            return Err(CatalogError::EmptyBank { variant });
        }
        let mut index = HashMap::with_capacity(questions.len());
        for (position, question) in questions.iter().enumerate() {
            if question.id.trim().is_empty() {
                return Err(CatalogError::BlankQuestionId { variant, position });
            }
            validate_question(question)?;
            if index.insert(question.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateQuestion {
                    variant,
                    id: question.id.clone(),
                });
            }
        }
        Ok(Self {
            variant,
            questions,
            index,
        })
    }

    pub fn variant(&self) -> QuizVariant {
        self.variant
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Questions in presentation order
    pub fn iter(&self) -> impl Iterator<Item = &QuestionDefinition> + '_ {
        self.questions.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.questions.iter().map(|q| q.id.as_str())
    }

    pub fn get(&self, id: &str) -> Option<&QuestionDefinition> {
        self.index.get(id).map(|&position| &self.questions[position])
    }

    /// Selected option, or `None` for unknown ids and out-of-range indexes
    pub fn option(&self, id: &str, index: usize) -> Option<&AnswerOption> {
        self.get(id).and_then(|q| q.option(index))
    }

    /// Count answers that resolve to an option in this bank
    pub fn progress(&self, answers: &AnswerSet) -> QuizProgress {
        let answered = answers
            .iter()
            .filter(|(id, index)| self.option(id, *index).is_some())
            .count();
        QuizProgress {
            answered,
            total: self.len(),
        }
    }

    /// The option adding the least total weight, as `(question id, index, mass)`.
    ///
    /// Any answered question contributes at least this much.
    pub fn lightest_option(&self) -> Option<(&str, usize, f64)> {
        self.questions
            .iter()
            .flat_map(|q| {
                q.options
                    .iter()
                    .enumerate()
                    .map(move |(index, option)| (q.id.as_str(), index, option.mass()))
            })
            .min_by(|a, b| a.2.total_cmp(&b.2))
    }
}

fn validate_question(question: &QuestionDefinition) -> Result<(), CatalogError> {
    let id = &question.id;
    if !question.prompt.has_english() {
        return Err(CatalogError::MissingEnglish {
            owner: format!("Question '{}'", id),
            field: "prompt",
        });
    }
    if question.options.len() < 2 {
        return Err(CatalogError::TooFewOptions {
            id: id.clone(),
            found: question.options.len(),
        });
    }
    for (index, option) in question.options.iter().enumerate() {
        let invalid = |reason: String| CatalogError::InvalidOption {
            id: id.clone(),
            index,
            reason,
        };
        if !option.text.has_english() {
            return Err(CatalogError::MissingEnglish {
                owner: format!("Question '{}' option {}", id, index),
                field: "text",
            });
        }
        if option.scores.is_empty() || option.scores.len() > MAX_SCORED_CLASSES {
            return Err(invalid(format!(
                "score map must have 1-{} entries, found {}",
                MAX_SCORED_CLASSES,
                option.scores.len()
            )));
        }
        for (class, weight) in &option.scores {
            if !weight.is_finite() || *weight <= 0.0 || *weight > MAX_OPTION_WEIGHT {
                return Err(invalid(format!(
                    "weight for '{}' must be in (0, {}], got {}",
                    class, MAX_OPTION_WEIGHT, weight
                )));
            }
        }
    }
    Ok(())
}
