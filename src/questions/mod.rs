//! Question Banks
//!
//! Two independently authored banks over one taxonomy:
//!
//! - **Full** (15 questions): narrow, discriminating questions for deliberate
//!   self-assessment. Options weight 3 / 2 / 1 (primary / secondary / tertiary).
//! - **Quick** (7 questions): fewer, broader questions for the first-time and
//!   guest funnel. Options spread softer votes across more classes.
//!
//! Banks are disjoint id spaces. The quick bank is less precise by design; the
//! confidence band makes that visible to callers instead of hiding it.

mod bank;

pub use bank::{
    AnswerOption, QuestionBank, QuestionDefinition, QuizProgress, MAX_OPTION_WEIGHT,
    MAX_SCORED_CLASSES,
};
