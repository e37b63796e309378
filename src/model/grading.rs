//! Quiz scoring.
//!
//! A learner is "right" about a choice when they selected a correct one or
//! left an incorrect one unselected. The earned score is the fraction of
//! choices they were right about, scaled by the question's grade.

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::model::entity::{Choice, Question};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GradingError {
    #[error("question {0} has no choices, its score is undefined")]
    NoChoices(Uuid),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuestionScore {
    pub earned: f64,
    pub max: i32,
}

/// Scores a single question against the set of selected choice ids.
///
/// `choices` may contain choices of other questions; only those belonging to
/// `question` are counted. A question without choices is an error, never a
/// silent zero.
pub fn score_question(
    question: &Question,
    choices: &[Choice],
    selected: &HashSet<Uuid>,
) -> Result<QuestionScore, GradingError> {
    let mut total = 0usize;
    let mut right = 0usize;

    for choice in choices.iter().filter(|c| c.question_id() == question.id()) {
        total += 1;
        if choice.is_correct() == selected.contains(&choice.id()) {
            right += 1;
        }
    }

    if total == 0 {
        return Err(GradingError::NoChoices(question.id()));
    }

    let max = question.grade();
    let earned = right as f64 / total as f64 * f64::from(max);
    tracing::debug!(
        question = %question.id(),
        right,
        total,
        earned,
        max,
        "scored question"
    );

    Ok(QuestionScore { earned, max })
}
