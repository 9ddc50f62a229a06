//! The orchestrating quiz engine.
//!
//! Wires the generator, sanitizer/builder, grading, and store into the
//! user-facing operations: course creation, quiz views, grading with
//! progress recording, lesson progress, and question-set regeneration.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::builder::{build_lesson_set, build_question_set};
use crate::error::{QuizError, Result};
use crate::grading::{grade, GradeReport};
use crate::model::{
    Attempt, Course, Lesson, LessonProgress, NewCourse, Question, QuizQuestion, User,
};
use crate::prompt;
use crate::traits::{CourseSummary, GenerateRequest, QuizStore, TextGenerator};

/// Engine configuration: generation parameters and defaults.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Model identifier passed to the generator.
    pub model: String,
    /// Sampling temperature for generation.
    pub temperature: f64,
    /// Max tokens per generation call.
    pub max_output_tokens: u32,
    /// Questions per exam when the caller doesn't specify.
    pub question_count: usize,
    /// Lessons per course when the caller doesn't specify.
    pub lesson_count: usize,
    /// Retries on transient generator errors.
    pub max_retries: u32,
    /// Initial delay between retries (doubles per retry).
    pub retry_delay: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            temperature: 0.7,
            max_output_tokens: 8192,
            question_count: 10,
            lesson_count: 5,
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
        }
    }
}

/// Options for course creation.
#[derive(Debug, Clone)]
pub struct CreateOptions {
    /// Also generate interactive lessons (on by default).
    pub generate_lessons: bool,
    /// Override the configured question count.
    pub question_count: Option<usize>,
    /// Override the configured lesson count.
    pub lesson_count: Option<usize>,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            generate_lessons: true,
            question_count: None,
            lesson_count: None,
        }
    }
}

/// Result of course creation. Lesson/question generation is best-effort;
/// empty vecs mean generation failed but the course itself persisted.
#[derive(Debug, Clone)]
pub struct CourseCreated {
    pub course: Course,
    pub lessons: Vec<Lesson>,
    pub questions: Vec<Question>,
}

/// Result of grading one submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeOutcome {
    #[serde(flatten)]
    pub report: GradeReport,
    /// AI-generated study advice; `None` when the feedback call failed.
    pub feedback: Option<String>,
}

/// Result of regenerating a course's question set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegenerationOutcome {
    pub course_id: Uuid,
    pub course_name: String,
    pub old_count: usize,
    pub new_count: usize,
    pub questions: Vec<QuizQuestion>,
}

/// A lesson quiz view, falling back to course-level questions when the
/// lesson has none of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonQuiz {
    pub lesson_id: Uuid,
    pub lesson_title: String,
    pub questions: Vec<QuizQuestion>,
}

/// Detailed course view for listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseOverview {
    pub id: Uuid,
    pub name: String,
    pub provider: String,
    pub lessons: Vec<LessonSummary>,
    pub question_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonSummary {
    pub id: Uuid,
    pub title: String,
    pub position: u32,
    pub estimated_minutes: u32,
}

/// A user's progress through a course's lessons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseProgress {
    pub lessons: Vec<LessonProgressEntry>,
    pub completed: usize,
    pub total: usize,
    /// Floor percentage, 0 when the course has no lessons.
    pub percent: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonProgressEntry {
    pub lesson_id: Uuid,
    pub title: String,
    pub position: u32,
    pub completed: bool,
    pub seconds_spent: u32,
}

/// The central engine. Constructed once with its collaborators and
/// passed by reference; no ambient client state.
pub struct QuizEngine {
    generator: Arc<dyn TextGenerator>,
    store: Arc<dyn QuizStore>,
    config: EngineConfig,
}

impl QuizEngine {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        store: Arc<dyn QuizStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            generator,
            store,
            config,
        }
    }

    pub fn store(&self) -> &Arc<dyn QuizStore> {
        &self.store
    }

    /// Create a course from extracted document text, generating lessons
    /// and an initial question set.
    ///
    /// Partial-success semantics: generation or parse trouble degrades to
    /// an empty lesson/question set with a warn log. Only an empty source
    /// text fails the call.
    pub async fn create_course(
        &self,
        new: NewCourse,
        opts: CreateOptions,
    ) -> Result<CourseCreated> {
        if new.source_text.trim().is_empty() {
            return Err(QuizError::InvalidInput(
                "course has no source text".to_string(),
            ));
        }
        if new.name.trim().is_empty() {
            return Err(QuizError::InvalidInput("course name is empty".to_string()));
        }

        let course = self.store.insert_course(new).await?;
        tracing::info!(course_id = %course.id, name = %course.name, "course created");

        let lessons = if opts.generate_lessons {
            let count = opts.lesson_count.unwrap_or(self.config.lesson_count);
            match self
                .generate(&prompt::lessons_prompt(&course.source_text, count))
                .await
            {
                Ok(text) => {
                    let drafts = build_lesson_set(&text);
                    self.store.insert_lessons(course.id, drafts).await?
                }
                Err(e) => {
                    tracing::warn!(course_id = %course.id, error = %e, "lesson generation failed, continuing without lessons");
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        let count = opts.question_count.unwrap_or(self.config.question_count);
        let questions = match self
            .generate(&prompt::exam_prompt(&course.source_text, count))
            .await
        {
            Ok(text) => {
                let drafts = build_question_set(&text);
                self.store.insert_questions(course.id, None, drafts).await?
            }
            Err(e) => {
                tracing::warn!(course_id = %course.id, error = %e, "exam generation failed, continuing without questions");
                Vec::new()
            }
        };

        tracing::info!(
            course_id = %course.id,
            lessons = lessons.len(),
            questions = questions.len(),
            "course content generated"
        );

        Ok(CourseCreated {
            course,
            lessons,
            questions,
        })
    }

    /// All of a course's questions, in learner-facing form.
    pub async fn course_quiz(&self, course_id: Uuid) -> Result<Vec<QuizQuestion>> {
        self.require_course(course_id).await?;
        let questions = self.store.questions_for_course(course_id).await?;
        Ok(questions.iter().map(QuizQuestion::from).collect())
    }

    /// A lesson's quiz; lessons without questions of their own fall back
    /// to the course-level set.
    pub async fn lesson_quiz(&self, lesson_id: Uuid) -> Result<LessonQuiz> {
        let lesson = self
            .store
            .lesson(lesson_id)
            .await?
            .ok_or_else(|| QuizError::not_found("lesson", lesson_id))?;

        let mut questions = self.store.questions_for_lesson(lesson_id).await?;
        if questions.is_empty() {
            questions = self.store.questions_for_course(lesson.course_id).await?;
        }

        Ok(LessonQuiz {
            lesson_id,
            lesson_title: lesson.title,
            questions: questions.iter().map(QuizQuestion::from).collect(),
        })
    }

    /// Grade a full submission, record per-question progress, and ask the
    /// generator for study feedback.
    ///
    /// `answers` maps question id → chosen answer, in the order the
    /// learner answered. Stale ids (cached quiz state from before a
    /// regeneration) are skipped. Feedback is best-effort.
    pub async fn grade_submission(
        &self,
        user_id: Uuid,
        answers: &[(Uuid, String)],
    ) -> Result<GradeOutcome> {
        self.require_user(user_id).await?;

        let mut questions = Vec::new();
        for (question_id, _) in answers {
            if let Some(q) = self.store.question(*question_id).await? {
                questions.push(q);
            }
        }

        let report = grade(&questions, answers);

        for detail in &report.details {
            self.store
                .upsert_attempt(
                    user_id,
                    detail.question_id,
                    &detail.submitted_answer,
                    detail.is_correct,
                )
                .await?;
        }

        let feedback = match self
            .generate(&prompt::feedback_prompt(report.score, &report.missed_prompts))
            .await
        {
            Ok(text) => Some(text.trim().to_string()),
            Err(e) => {
                tracing::warn!(%user_id, error = %e, "feedback generation failed");
                None
            }
        };

        tracing::info!(
            %user_id,
            score = report.score,
            correct = report.correct,
            incorrect = report.incorrect,
            "submission graded"
        );

        Ok(GradeOutcome { report, feedback })
    }

    /// Record a single answer. The caller supplies correctness (it may
    /// have graded locally); both user and question must exist.
    pub async fn record_attempt(
        &self,
        user_id: Uuid,
        question_id: Uuid,
        chosen_answer: &str,
        is_correct: bool,
    ) -> Result<Attempt> {
        self.require_user(user_id).await?;
        if self.store.question(question_id).await?.is_none() {
            return Err(QuizError::not_found("question", question_id));
        }
        self.store
            .upsert_attempt(user_id, question_id, chosen_answer, is_correct)
            .await
    }

    /// Replace a course's question set with a freshly generated one.
    ///
    /// Generation runs before anything is deleted; the swap itself is a
    /// single atomic store operation. On any failure — generator error,
    /// unusable output, cancellation mid-generation — the existing set is
    /// left exactly as it was.
    pub async fn regenerate(
        &self,
        course_id: Uuid,
        count: Option<usize>,
    ) -> Result<RegenerationOutcome> {
        let course = self.require_course(course_id).await?;
        if course.source_text.trim().is_empty() {
            return Err(QuizError::InvalidInput(
                "course has no stored content to regenerate from".to_string(),
            ));
        }

        let count = count.unwrap_or(self.config.question_count);
        let text = self
            .generate(&prompt::exam_prompt(&course.source_text, count))
            .await
            .map_err(|e| QuizError::Generation(e.to_string()))?;

        let drafts = build_question_set(&text);
        if drafts.is_empty() {
            return Err(QuizError::Generation(
                "generator produced no usable questions; existing set left untouched".to_string(),
            ));
        }

        let replaced = self.store.replace_questions(course_id, drafts).await?;
        tracing::info!(
            %course_id,
            old = replaced.removed,
            new = replaced.questions.len(),
            dropped_attempts = replaced.removed_attempts,
            "question set regenerated"
        );

        Ok(RegenerationOutcome {
            course_id,
            course_name: course.name,
            old_count: replaced.removed,
            new_count: replaced.questions.len(),
            questions: replaced.questions.iter().map(QuizQuestion::from).collect(),
        })
    }

    pub async fn list_courses(&self) -> Result<Vec<CourseSummary>> {
        self.store.list_courses().await
    }

    pub async fn course_overview(&self, course_id: Uuid) -> Result<CourseOverview> {
        let course = self.require_course(course_id).await?;
        let lessons = self.store.lessons_for_course(course_id).await?;
        let question_count = self.store.questions_for_course(course_id).await?.len();

        Ok(CourseOverview {
            id: course.id,
            name: course.name,
            provider: course.provider,
            lessons: lessons
                .iter()
                .map(|l| LessonSummary {
                    id: l.id,
                    title: l.title.clone(),
                    position: l.position,
                    estimated_minutes: l.estimated_minutes,
                })
                .collect(),
            question_count,
        })
    }

    pub async fn lesson(&self, lesson_id: Uuid) -> Result<Lesson> {
        self.store
            .lesson(lesson_id)
            .await?
            .ok_or_else(|| QuizError::not_found("lesson", lesson_id))
    }

    /// Mark a lesson complete for a user (idempotent upsert).
    pub async fn complete_lesson(
        &self,
        user_id: Uuid,
        lesson_id: Uuid,
        seconds_spent: u32,
    ) -> Result<LessonProgress> {
        self.require_user(user_id).await?;
        if self.store.lesson(lesson_id).await?.is_none() {
            return Err(QuizError::not_found("lesson", lesson_id));
        }
        self.store
            .upsert_lesson_progress(user_id, lesson_id, seconds_spent)
            .await
    }

    /// Per-lesson completion status for one user in one course.
    pub async fn course_progress(&self, course_id: Uuid, user_id: Uuid) -> Result<CourseProgress> {
        self.require_course(course_id).await?;
        self.require_user(user_id).await?;

        let lessons = self.store.lessons_for_course(course_id).await?;
        let mut entries = Vec::with_capacity(lessons.len());
        for lesson in &lessons {
            let progress = self.store.lesson_progress(user_id, lesson.id).await?;
            entries.push(LessonProgressEntry {
                lesson_id: lesson.id,
                title: lesson.title.clone(),
                position: lesson.position,
                completed: progress.as_ref().is_some_and(|p| p.completed),
                seconds_spent: progress.map(|p| p.seconds_spent).unwrap_or(0),
            });
        }

        let total = entries.len();
        let completed = entries.iter().filter(|e| e.completed).count();
        Ok(CourseProgress {
            lessons: entries,
            completed,
            total,
            percent: if total > 0 {
                (completed * 100 / total) as u32
            } else {
                0
            },
        })
    }

    async fn require_course(&self, course_id: Uuid) -> Result<Course> {
        self.store
            .course(course_id)
            .await?
            .ok_or_else(|| QuizError::not_found("course", course_id))
    }

    async fn require_user(&self, user_id: Uuid) -> Result<User> {
        self.store
            .user(user_id)
            .await?
            .ok_or_else(|| QuizError::not_found("user", user_id))
    }

    /// Run one generation call with retries on transient errors.
    ///
    /// Permanent errors (bad credentials, unknown model) abort
    /// immediately; rate-limit errors honor the provider's retry-after
    /// hint; everything else backs off exponentially.
    async fn generate(&self, prompt_text: &str) -> anyhow::Result<String> {
        let request = GenerateRequest {
            model: self.config.model.clone(),
            prompt: prompt_text.to_string(),
            temperature: self.config.temperature,
            max_output_tokens: self.config.max_output_tokens,
        };

        let mut last_error = None;
        let mut retry_delay = self.config.retry_delay;
        for retry in 0..=self.config.max_retries {
            if retry > 0 {
                tokio::time::sleep(retry_delay).await;
                retry_delay = (retry_delay * 2).min(Duration::from_secs(60));
            }
            match self.generator.generate(&request).await {
                Ok(response) => {
                    tracing::debug!(
                        model = %response.model,
                        latency_ms = response.latency_ms,
                        chars = response.text.len(),
                        "generation call succeeded"
                    );
                    return Ok(response.text);
                }
                Err(e) => {
                    let err_str = e.to_string();
                    if err_str.contains("authentication") || err_str.contains("model not found") {
                        return Err(e);
                    }
                    if err_str.contains("rate limited") {
                        if let Some(ms) = parse_retry_after_ms(&err_str) {
                            retry_delay = Duration::from_millis(ms);
                        }
                    }
                    tracing::warn!(retry, error = %err_str, "generation call failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("generation failed with unknown error")))
    }
}

/// Parse retry-after milliseconds from a rate-limit error message.
fn parse_retry_after_ms(err_msg: &str) -> Option<u64> {
    // Error format: "rate limited, retry after {ms}ms"
    err_msg
        .strip_prefix("rate limited, retry after ")
        .and_then(|s| s.strip_suffix("ms"))
        .and_then(|s| s.parse::<u64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_retry_after_ms_from_error() {
        assert_eq!(
            parse_retry_after_ms("rate limited, retry after 2500ms"),
            Some(2500)
        );
        assert_eq!(parse_retry_after_ms("network error"), None);
    }

    #[test]
    fn config_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.question_count, 10);
        assert_eq!(config.lesson_count, 5);
        assert_eq!(config.max_retries, 3);
    }
}
