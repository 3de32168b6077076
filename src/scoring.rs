//! Scoring Engine
//!
//! Accumulates the weighted votes of an answer set into a raw score vector,
//! plus a small capped bonus from keyword matches in free text.
//!
//! Malformed input degrades instead of failing:
//! - unknown question ids are skipped (stale ids from an older bank)
//! - out-of-range option indexes are skipped
//! - blank free text contributes nothing

use archetype_types::{AnswerSet, ArchetypeClass, ScoreVector};

use crate::keywords::KeywordDictionary;
use crate::questions::QuestionBank;

/// Bonus added per keyword-matched class
pub const DEFAULT_KEYWORD_BONUS: f64 = 0.5;
/// Most classes that may receive a keyword bonus from one text
pub const DEFAULT_MAX_KEYWORD_CLASSES: usize = 1;

/// How free text is allowed to nudge the scores
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeywordPolicy {
    pub bonus: f64,
    pub max_classes: usize,
}

impl Default for KeywordPolicy {
    fn default() -> Self {
        Self {
            bonus: DEFAULT_KEYWORD_BONUS,
            max_classes: DEFAULT_MAX_KEYWORD_CLASSES,
        }
    }
}

/// Sum the score maps of every selected option
pub fn accumulate_answers(answers: &AnswerSet, bank: &QuestionBank) -> ScoreVector {
    let mut vector = ScoreVector::zero();
    for (question_id, option_index) in answers.iter() {
        let Some(question) = bank.get(question_id) else {
            tracing::debug!(
                question_id,
                variant = %bank.variant(),
                "Skipping answer for unknown question"
            );
            continue;
        };
        let Some(option) = question.option(option_index) else {
            tracing::debug!(
                question_id,
                option_index,
                options = question.options.len(),
                "Skipping out-of-range option index"
            );
            continue;
        };
        for (class, weight) in &option.scores {
            vector.add(*class, *weight);
        }
    }
    vector
}

/// Add the keyword bonus for `text` into `vector`.
///
/// Each matched class is credited once, and at most `policy.max_classes`
/// classes are credited (declared order). Returns the credited classes.
pub fn apply_keyword_bonus(
    vector: &mut ScoreVector,
    text: &str,
    keywords: &KeywordDictionary,
    policy: &KeywordPolicy,
) -> Vec<ArchetypeClass> {
    let mut matched = keywords.matches(text);
    if matched.len() > policy.max_classes {
        tracing::debug!(
            matched = matched.len(),
            cap = policy.max_classes,
            "Capping keyword bonus"
        );
        matched.truncate(policy.max_classes);
    }
    for class in &matched {
        vector.add(*class, policy.bonus);
    }
    matched
}

/// Raw (un-normalized) score vector for an answer set and optional free text
pub fn score(
    answers: &AnswerSet,
    bank: &QuestionBank,
    free_text: Option<&str>,
    keywords: &KeywordDictionary,
    policy: &KeywordPolicy,
) -> ScoreVector {
    let mut vector = accumulate_answers(answers, bank);
    if let Some(text) = free_text.filter(|t| !t.trim().is_empty()) {
        apply_keyword_bonus(&mut vector, text, keywords, policy);
    }
    vector
}
