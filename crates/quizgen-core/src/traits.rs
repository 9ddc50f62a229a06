//! Collaborator traits: the text-generation service and the backing store.
//!
//! Both are async seams implemented outside this crate (`quizgen-providers`
//! and `quizgen-store`); the engine only ever sees these interfaces.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::model::{
    Attempt, Course, Lesson, LessonDraft, LessonProgress, NewCourse, Question, QuestionDraft, User,
};

// ---------------------------------------------------------------------------
// Text generation
// ---------------------------------------------------------------------------

/// A generative-text backend (Gemini, OpenAI-compatible, mock).
///
/// Implementations return whatever the model produced — free-form text
/// with no JSON guarantee. Turning it into structured data is the
/// builder's job.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Human-readable backend name (e.g. "gemini").
    fn name(&self) -> &str;

    /// Run one generation call.
    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse>;
}

/// One generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Model identifier (e.g. "gemini-2.5-flash").
    pub model: String,
    pub prompt: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Maximum tokens to generate.
    pub max_output_tokens: u32,
}

/// Response from a generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Raw model output, unprocessed.
    pub text: String,
    /// Model that actually answered.
    pub model: String,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Outcome of an atomic question-set replacement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplacedQuestions {
    /// Questions removed from the course.
    pub removed: usize,
    /// Attempts cascade-deleted because their question went away.
    pub removed_attempts: usize,
    /// The freshly inserted set, with assigned ids.
    pub questions: Vec<Question>,
}

/// One row of a course listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSummary {
    pub id: Uuid,
    pub name: String,
    pub provider: String,
    pub lesson_count: usize,
    pub question_count: usize,
}

/// Narrow persistence interface for quiz entities.
///
/// The relational mechanics behind this are out of scope; what matters
/// to the engine is the contract: multi-row mutations
/// (`replace_questions`, the upserts) are atomic, so no caller observes
/// a half-replaced question set or a lost attempt-counter increment.
#[async_trait]
pub trait QuizStore: Send + Sync {
    // Courses
    async fn insert_course(&self, new: NewCourse) -> Result<Course>;
    async fn course(&self, id: Uuid) -> Result<Option<Course>>;
    async fn list_courses(&self) -> Result<Vec<CourseSummary>>;

    // Users
    async fn insert_user(&self, name: &str) -> Result<User>;
    async fn user(&self, id: Uuid) -> Result<Option<User>>;
    async fn list_users(&self) -> Result<Vec<User>>;

    // Lessons
    async fn insert_lessons(&self, course_id: Uuid, drafts: Vec<LessonDraft>)
        -> Result<Vec<Lesson>>;
    async fn lesson(&self, id: Uuid) -> Result<Option<Lesson>>;
    /// Ordered by lesson position.
    async fn lessons_for_course(&self, course_id: Uuid) -> Result<Vec<Lesson>>;

    // Questions
    async fn insert_questions(
        &self,
        course_id: Uuid,
        lesson_id: Option<Uuid>,
        drafts: Vec<QuestionDraft>,
    ) -> Result<Vec<Question>>;
    async fn question(&self, id: Uuid) -> Result<Option<Question>>;
    async fn questions_for_course(&self, course_id: Uuid) -> Result<Vec<Question>>;
    async fn questions_for_lesson(&self, lesson_id: Uuid) -> Result<Vec<Question>>;

    /// Atomically delete a course's question set and insert a new one,
    /// cascade-deleting attempts that referenced the outgoing questions.
    async fn replace_questions(
        &self,
        course_id: Uuid,
        drafts: Vec<QuestionDraft>,
    ) -> Result<ReplacedQuestions>;

    // Progress
    /// Atomic at-most-one-row upsert per (user, question): an existing
    /// attempt gets its counter bumped and answer overwritten, otherwise
    /// a new row starts at counter 1.
    async fn upsert_attempt(
        &self,
        user_id: Uuid,
        question_id: Uuid,
        chosen_answer: &str,
        is_correct: bool,
    ) -> Result<Attempt>;
    async fn attempt(&self, user_id: Uuid, question_id: Uuid) -> Result<Option<Attempt>>;
    async fn attempts_for_user(&self, user_id: Uuid) -> Result<Vec<Attempt>>;

    /// Same upsert rule for lesson completion.
    async fn upsert_lesson_progress(
        &self,
        user_id: Uuid,
        lesson_id: Uuid,
        seconds_spent: u32,
    ) -> Result<LessonProgress>;
    async fn lesson_progress(&self, user_id: Uuid, lesson_id: Uuid)
        -> Result<Option<LessonProgress>>;
}
