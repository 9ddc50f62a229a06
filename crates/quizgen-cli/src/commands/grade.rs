//! The `quizgen grade` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};
use serde::Deserialize;
use uuid::Uuid;

/// One entry of the answers file.
#[derive(Debug, Deserialize)]
struct AnswerEntry {
    question_id: Uuid,
    answer: String,
}

pub async fn execute(config_path: Option<&Path>, user_id: Uuid, answers: PathBuf) -> Result<()> {
    let content = std::fs::read_to_string(&answers)
        .with_context(|| format!("failed to read {}", answers.display()))?;
    let entries: Vec<AnswerEntry> = serde_json::from_str(&content)
        .with_context(|| format!("invalid answers file {}", answers.display()))?;
    anyhow::ensure!(!entries.is_empty(), "answers file is empty");

    let submission: Vec<(Uuid, String)> = entries
        .into_iter()
        .map(|e| (e.question_id, e.answer))
        .collect();

    let engine = super::build_engine(config_path, false)?;
    let outcome = engine.grade_submission(user_id, &submission).await?;

    let mut table = Table::new();
    table.set_header(vec!["Question", "Your answer", "Correct answer", "Result"]);
    for detail in &outcome.report.details {
        table.add_row(vec![
            Cell::new(&detail.prompt),
            Cell::new(&detail.submitted_answer),
            Cell::new(&detail.correct_answer),
            Cell::new(if detail.is_correct { "OK" } else { "MISS" }),
        ]);
    }
    println!("{table}");

    println!(
        "\nScore: {}/100 ({} correct, {} incorrect)",
        outcome.report.score, outcome.report.correct, outcome.report.incorrect
    );

    let skipped = submission.len() - outcome.report.details.len();
    if skipped > 0 {
        println!("{skipped} answer(s) referenced questions that no longer exist and were skipped.");
    }

    if let Some(feedback) = &outcome.feedback {
        println!("\n{feedback}");
    }

    Ok(())
}
