//! quizgen-store — in-process persistence for quizgen entities.
//!
//! `MemoryStore` keeps everything behind one async mutex, which makes
//! every multi-row mutation trivially atomic: `replace_questions` and
//! the upserts run start to finish under the lock. An optional JSON
//! snapshot file carries state between CLI invocations.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use quizgen_core::error::{QuizError, Result};
use quizgen_core::model::{
    normalize_answer, Attempt, Course, Lesson, LessonDraft, LessonProgress, NewCourse, Question,
    QuestionDraft, User,
};
use quizgen_core::traits::{CourseSummary, QuizStore, ReplacedQuestions};

/// Everything the store holds, in snapshot-serializable form.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreState {
    courses: Vec<Course>,
    users: Vec<User>,
    lessons: Vec<Lesson>,
    questions: Vec<Question>,
    attempts: Vec<Attempt>,
    lesson_progress: Vec<LessonProgress>,
}

/// In-memory store with optional file-backed snapshots.
#[derive(Debug)]
pub struct MemoryStore {
    state: Mutex<StoreState>,
    snapshot: Option<PathBuf>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Purely in-memory store; state is gone when it drops.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            snapshot: None,
        }
    }

    /// Store backed by a JSON snapshot file. An existing snapshot is
    /// loaded; a missing one starts empty. Every mutation rewrites the
    /// file.
    pub fn with_snapshot(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let state: StoreState = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| {
                QuizError::Store(format!("failed to read snapshot {}: {e}", path.display()))
            })?;
            serde_json::from_str(&content).map_err(|e| {
                QuizError::Store(format!("corrupt snapshot {}: {e}", path.display()))
            })?
        } else {
            StoreState::default()
        };
        tracing::debug!(
            path = %path.display(),
            courses = state.courses.len(),
            users = state.users.len(),
            "snapshot loaded"
        );

        Ok(Self {
            state: Mutex::new(state),
            snapshot: Some(path),
        })
    }

    /// Write the snapshot after a mutation. Called while the state lock
    /// is held, so readers never observe a snapshot ahead of memory.
    fn persist(&self, state: &StoreState) -> Result<()> {
        let Some(path) = &self.snapshot else {
            return Ok(());
        };
        let json = serde_json::to_vec_pretty(state)
            .map_err(|e| QuizError::Store(format!("failed to serialize snapshot: {e}")))?;
        std::fs::write(path, json).map_err(|e| {
            QuizError::Store(format!("failed to write snapshot {}: {e}", path.display()))
        })
    }
}

#[async_trait]
impl QuizStore for MemoryStore {
    async fn insert_course(&self, new: NewCourse) -> Result<Course> {
        let mut state = self.state.lock().await;
        let course = Course {
            id: Uuid::new_v4(),
            name: new.name,
            provider: new.provider,
            source_text: new.source_text,
            created_at: Utc::now(),
        };
        state.courses.push(course.clone());
        self.persist(&state)?;
        Ok(course)
    }

    async fn course(&self, id: Uuid) -> Result<Option<Course>> {
        let state = self.state.lock().await;
        Ok(state.courses.iter().find(|c| c.id == id).cloned())
    }

    async fn list_courses(&self) -> Result<Vec<CourseSummary>> {
        let state = self.state.lock().await;
        Ok(state
            .courses
            .iter()
            .map(|c| CourseSummary {
                id: c.id,
                name: c.name.clone(),
                provider: c.provider.clone(),
                lesson_count: state.lessons.iter().filter(|l| l.course_id == c.id).count(),
                question_count: state
                    .questions
                    .iter()
                    .filter(|q| q.course_id == c.id)
                    .count(),
            })
            .collect())
    }

    async fn insert_user(&self, name: &str) -> Result<User> {
        let name = name.trim();
        if name.is_empty() {
            return Err(QuizError::InvalidInput("user name is empty".to_string()));
        }
        let mut state = self.state.lock().await;
        if state
            .users
            .iter()
            .any(|u| normalize_answer(&u.name) == normalize_answer(name))
        {
            return Err(QuizError::Conflict(format!("user already exists: {name}")));
        }
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        state.users.push(user.clone());
        self.persist(&state)?;
        Ok(user)
    }

    async fn user(&self, id: Uuid) -> Result<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let state = self.state.lock().await;
        Ok(state.users.clone())
    }

    async fn insert_lessons(
        &self,
        course_id: Uuid,
        drafts: Vec<LessonDraft>,
    ) -> Result<Vec<Lesson>> {
        let mut state = self.state.lock().await;
        if !state.courses.iter().any(|c| c.id == course_id) {
            return Err(QuizError::not_found("course", course_id));
        }
        let lessons: Vec<Lesson> = drafts
            .into_iter()
            .map(|d| Lesson {
                id: Uuid::new_v4(),
                course_id,
                title: d.title,
                position: d.position,
                content_markdown: d.content_markdown,
                code_examples: d.code_examples,
                key_points: d.key_points,
                estimated_minutes: d.estimated_minutes,
            })
            .collect();
        state.lessons.extend(lessons.iter().cloned());
        self.persist(&state)?;
        Ok(lessons)
    }

    async fn lesson(&self, id: Uuid) -> Result<Option<Lesson>> {
        let state = self.state.lock().await;
        Ok(state.lessons.iter().find(|l| l.id == id).cloned())
    }

    async fn lessons_for_course(&self, course_id: Uuid) -> Result<Vec<Lesson>> {
        let state = self.state.lock().await;
        let mut lessons: Vec<Lesson> = state
            .lessons
            .iter()
            .filter(|l| l.course_id == course_id)
            .cloned()
            .collect();
        lessons.sort_by_key(|l| l.position);
        Ok(lessons)
    }

    async fn insert_questions(
        &self,
        course_id: Uuid,
        lesson_id: Option<Uuid>,
        drafts: Vec<QuestionDraft>,
    ) -> Result<Vec<Question>> {
        let mut state = self.state.lock().await;
        if !state.courses.iter().any(|c| c.id == course_id) {
            return Err(QuizError::not_found("course", course_id));
        }
        if let Some(lid) = lesson_id {
            if !state.lessons.iter().any(|l| l.id == lid) {
                return Err(QuizError::not_found("lesson", lid));
            }
        }
        let questions: Vec<Question> = drafts
            .into_iter()
            .map(|d| Question {
                id: Uuid::new_v4(),
                course_id,
                lesson_id,
                kind: d.kind,
                prompt: d.prompt,
                options: d.options,
                answer: d.answer,
                explanation: d.explanation,
                difficulty: d.difficulty,
            })
            .collect();
        state.questions.extend(questions.iter().cloned());
        self.persist(&state)?;
        Ok(questions)
    }

    async fn question(&self, id: Uuid) -> Result<Option<Question>> {
        let state = self.state.lock().await;
        Ok(state.questions.iter().find(|q| q.id == id).cloned())
    }

    async fn questions_for_course(&self, course_id: Uuid) -> Result<Vec<Question>> {
        let state = self.state.lock().await;
        Ok(state
            .questions
            .iter()
            .filter(|q| q.course_id == course_id)
            .cloned()
            .collect())
    }

    async fn questions_for_lesson(&self, lesson_id: Uuid) -> Result<Vec<Question>> {
        let state = self.state.lock().await;
        Ok(state
            .questions
            .iter()
            .filter(|q| q.lesson_id == Some(lesson_id))
            .cloned()
            .collect())
    }

    async fn replace_questions(
        &self,
        course_id: Uuid,
        drafts: Vec<QuestionDraft>,
    ) -> Result<ReplacedQuestions> {
        let mut state = self.state.lock().await;
        if !state.courses.iter().any(|c| c.id == course_id) {
            return Err(QuizError::not_found("course", course_id));
        }

        let outgoing: HashSet<Uuid> = state
            .questions
            .iter()
            .filter(|q| q.course_id == course_id)
            .map(|q| q.id)
            .collect();
        let removed = outgoing.len();

        state.questions.retain(|q| q.course_id != course_id);
        let attempts_before = state.attempts.len();
        state.attempts.retain(|a| !outgoing.contains(&a.question_id));
        let removed_attempts = attempts_before - state.attempts.len();

        let questions: Vec<Question> = drafts
            .into_iter()
            .map(|d| Question {
                id: Uuid::new_v4(),
                course_id,
                lesson_id: None,
                kind: d.kind,
                prompt: d.prompt,
                options: d.options,
                answer: d.answer,
                explanation: d.explanation,
                difficulty: d.difficulty,
            })
            .collect();
        state.questions.extend(questions.iter().cloned());
        self.persist(&state)?;

        Ok(ReplacedQuestions {
            removed,
            removed_attempts,
            questions,
        })
    }

    async fn upsert_attempt(
        &self,
        user_id: Uuid,
        question_id: Uuid,
        chosen_answer: &str,
        is_correct: bool,
    ) -> Result<Attempt> {
        let mut state = self.state.lock().await;
        let now = Utc::now();

        let attempt = if let Some(existing) = state
            .attempts
            .iter_mut()
            .find(|a| a.user_id == user_id && a.question_id == question_id)
        {
            existing.chosen_answer = chosen_answer.to_string();
            existing.is_correct = is_correct;
            existing.attempts += 1;
            existing.updated_at = now;
            existing.clone()
        } else {
            let attempt = Attempt {
                id: Uuid::new_v4(),
                user_id,
                question_id,
                chosen_answer: chosen_answer.to_string(),
                is_correct,
                attempts: 1,
                updated_at: now,
            };
            state.attempts.push(attempt.clone());
            attempt
        };

        self.persist(&state)?;
        Ok(attempt)
    }

    async fn attempt(&self, user_id: Uuid, question_id: Uuid) -> Result<Option<Attempt>> {
        let state = self.state.lock().await;
        Ok(state
            .attempts
            .iter()
            .find(|a| a.user_id == user_id && a.question_id == question_id)
            .cloned())
    }

    async fn attempts_for_user(&self, user_id: Uuid) -> Result<Vec<Attempt>> {
        let state = self.state.lock().await;
        Ok(state
            .attempts
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn upsert_lesson_progress(
        &self,
        user_id: Uuid,
        lesson_id: Uuid,
        seconds_spent: u32,
    ) -> Result<LessonProgress> {
        let mut state = self.state.lock().await;
        let now = Utc::now();

        let progress = if let Some(existing) = state
            .lesson_progress
            .iter_mut()
            .find(|p| p.user_id == user_id && p.lesson_id == lesson_id)
        {
            existing.completed = true;
            existing.seconds_spent += seconds_spent;
            existing.completed_at = Some(now);
            existing.clone()
        } else {
            let progress = LessonProgress {
                id: Uuid::new_v4(),
                user_id,
                lesson_id,
                completed: true,
                seconds_spent,
                completed_at: Some(now),
            };
            state.lesson_progress.push(progress.clone());
            progress
        };

        self.persist(&state)?;
        Ok(progress)
    }

    async fn lesson_progress(
        &self,
        user_id: Uuid,
        lesson_id: Uuid,
    ) -> Result<Option<LessonProgress>> {
        let state = self.state.lock().await;
        Ok(state
            .lesson_progress
            .iter()
            .find(|p| p.user_id == user_id && p.lesson_id == lesson_id)
            .cloned())
    }
}
