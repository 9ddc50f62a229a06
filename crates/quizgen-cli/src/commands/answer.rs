//! The `quizgen answer` command: answer a single question immediately.

use std::path::Path;

use anyhow::Result;
use uuid::Uuid;

pub async fn execute(
    config_path: Option<&Path>,
    user_id: Uuid,
    question_id: Uuid,
    answer: String,
) -> Result<()> {
    let engine = super::build_engine(config_path, false)?;

    let question = engine
        .store()
        .question(question_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("question not found: {question_id}"))?;

    let is_correct = question.accepts(&answer);
    let attempt = engine
        .record_attempt(user_id, question_id, &answer, is_correct)
        .await?;

    if is_correct {
        println!("Correct! (attempt {})", attempt.attempts);
    } else {
        println!(
            "Not quite. The correct answer is: {}",
            question.answer
        );
    }
    if !question.explanation.is_empty() {
        println!("{}", question.explanation);
    }
    Ok(())
}
