//! Core data model types for quizgen.
//!
//! These are the fundamental entities the whole system operates on:
//! courses, lessons, questions, and per-learner progress records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kinds of questions the generator is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice,
    FillBlank,
    TrueFalse,
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::MultipleChoice => write!(f, "multiple_choice"),
            QuestionKind::FillBlank => write!(f, "fill_blank"),
            QuestionKind::TrueFalse => write!(f, "true_false"),
        }
    }
}

impl FromStr for QuestionKind {
    type Err = String;

    /// Accepts canonical names plus the vocabulary the generator has
    /// historically used (`multiple`, `completar`, `verdadero_falso`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "multiple_choice" | "multiple" | "opcion_multiple" => Ok(QuestionKind::MultipleChoice),
            "fill_blank" | "completar" | "fill_in_the_blank" => Ok(QuestionKind::FillBlank),
            "true_false" | "verdadero_falso" | "boolean" => Ok(QuestionKind::TrueFalse),
            other => Err(format!("unknown question kind: {other}")),
        }
    }
}

/// Difficulty label attached to each question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "facil" | "fácil" => Ok(Difficulty::Easy),
            "medium" | "media" => Ok(Difficulty::Medium),
            "hard" | "dificil" | "difícil" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// The one normalization rule shared by build-time validation and grading.
///
/// Builder and grader must agree on this, or answers that were accepted
/// at build time get mis-graded at submission time.
pub fn normalize_answer(s: &str) -> String {
    s.trim().to_lowercase()
}

/// A course created from one uploaded document.
///
/// `source_text` is retained verbatim so question sets can be regenerated
/// later without re-ingesting the document; it is immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: Uuid,
    pub name: String,
    /// Label of the content provider (institution, vendor, uploader).
    pub provider: String,
    pub source_text: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a course.
#[derive(Debug, Clone)]
pub struct NewCourse {
    pub name: String,
    pub provider: String,
    pub source_text: String,
}

/// An AI-generated lesson belonging to a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    /// 1-based position within the course.
    pub position: u32,
    pub content_markdown: String,
    #[serde(default)]
    pub code_examples: Vec<CodeExample>,
    #[serde(default)]
    pub key_points: Vec<String>,
    pub estimated_minutes: u32,
}

/// A worked code example embedded in a lesson.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeExample {
    pub language: String,
    #[serde(default)]
    pub description: String,
    pub code: String,
}

/// A validated lesson not yet persisted; the store assigns identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonDraft {
    pub title: String,
    pub position: u32,
    pub content_markdown: String,
    pub code_examples: Vec<CodeExample>,
    pub key_points: Vec<String>,
    pub estimated_minutes: u32,
}

/// One evaluable question with a correct answer and distractor options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub course_id: Uuid,
    #[serde(default)]
    pub lesson_id: Option<Uuid>,
    pub kind: QuestionKind,
    pub prompt: String,
    /// 2–4 candidate answers, unique under `normalize_answer`.
    pub options: Vec<String>,
    /// Matches one of `options` under `normalize_answer`; enforced at
    /// build time, never re-checked here.
    pub answer: String,
    #[serde(default)]
    pub explanation: String,
    pub difficulty: Difficulty,
}

impl Question {
    /// Whether a submitted answer is correct under the shared normalization.
    pub fn accepts(&self, submitted: &str) -> bool {
        normalize_answer(submitted) == normalize_answer(&self.answer)
    }
}

/// A validated question not yet persisted; the store assigns identity
/// and ownership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub kind: QuestionKind,
    pub prompt: String,
    pub options: Vec<String>,
    pub answer: String,
    pub explanation: String,
    pub difficulty: Difficulty,
}

/// The learner-facing view of a question. Never carries the answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: Uuid,
    pub kind: QuestionKind,
    pub prompt: String,
    pub options: Vec<String>,
    pub difficulty: Difficulty,
}

impl From<&Question> for QuizQuestion {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id,
            kind: q.kind,
            prompt: q.prompt.clone(),
            options: q.options.clone(),
            difficulty: q.difficulty,
        }
    }
}

/// A learner's latest recorded response to one question.
///
/// At most one row exists per (user, question) pair; resubmission
/// overwrites the answer and bumps `attempts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attempt {
    pub id: Uuid,
    pub user_id: Uuid,
    pub question_id: Uuid,
    pub chosen_answer: String,
    pub is_correct: bool,
    pub attempts: u32,
    pub updated_at: DateTime<Utc>,
}

/// Per (user, lesson) completion record; same upsert rule as `Attempt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonProgress {
    pub id: Uuid,
    pub user_id: Uuid,
    pub lesson_id: Uuid,
    pub completed: bool,
    #[serde(default)]
    pub seconds_spent: u32,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// A learner. Authentication is out of scope; this exists so progress
/// records have a real owner to reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
}
