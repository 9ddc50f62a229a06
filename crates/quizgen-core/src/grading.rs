//! Grading: compare a learner's submission against stored questions.
//!
//! Pure — persistence of attempts and feedback generation happen in the
//! engine, not here.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::Question;

/// The graded outcome of one submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeReport {
    /// 0–100, floor of `correct * 100 / total`; 0 when nothing resolved.
    pub score: u32,
    pub correct: u32,
    pub incorrect: u32,
    /// One entry per resolved question, in submission order.
    pub details: Vec<AnswerDetail>,
    /// Prompts of missed questions, for downstream feedback generation.
    pub missed_prompts: Vec<String>,
}

/// Per-question grading detail shown back to the learner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerDetail {
    pub question_id: Uuid,
    pub prompt: String,
    pub submitted_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
    pub explanation: String,
}

/// Grade a submission against a set of stored questions.
///
/// Question ids that do not resolve are silently skipped and excluded
/// from the total — clients grade against cached quiz state, and a stale
/// id after regeneration is expected, not an error. Answer comparison
/// uses the same normalization the builder validated with.
pub fn grade(questions: &[Question], answers: &[(Uuid, String)]) -> GradeReport {
    let by_id: HashMap<Uuid, &Question> = questions.iter().map(|q| (q.id, q)).collect();

    let mut correct = 0u32;
    let mut total = 0u32;
    let mut details = Vec::new();
    let mut missed_prompts = Vec::new();

    for (question_id, submitted) in answers {
        let Some(question) = by_id.get(question_id) else {
            tracing::debug!(%question_id, "skipping answer for unknown question");
            continue;
        };

        total += 1;
        let is_correct = question.accepts(submitted);
        if is_correct {
            correct += 1;
        } else {
            missed_prompts.push(question.prompt.clone());
        }

        details.push(AnswerDetail {
            question_id: *question_id,
            prompt: question.prompt.clone(),
            submitted_answer: submitted.clone(),
            correct_answer: question.answer.clone(),
            is_correct,
            explanation: question.explanation.clone(),
        });
    }

    GradeReport {
        score: if total > 0 { correct * 100 / total } else { 0 },
        correct,
        incorrect: total - correct,
        details,
        missed_prompts,
    }
}
