//! The `quizgen progress` and `quizgen complete` commands.

use std::path::Path;

use anyhow::Result;
use comfy_table::Table;
use uuid::Uuid;

pub async fn show(config_path: Option<&Path>, course_id: Uuid, user_id: Uuid) -> Result<()> {
    let engine = super::build_engine(config_path, false)?;
    let progress = engine.course_progress(course_id, user_id).await?;

    if progress.lessons.is_empty() {
        println!("This course has no lessons.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Lesson", "Done", "Time spent"]);
    for entry in &progress.lessons {
        table.add_row(vec![
            entry.position.to_string(),
            entry.title.clone(),
            if entry.completed { "yes" } else { "no" }.to_string(),
            format!("{}s", entry.seconds_spent),
        ]);
    }
    println!("{table}");
    println!(
        "\n{}/{} lessons completed ({}%)",
        progress.completed, progress.total, progress.percent
    );
    Ok(())
}

pub async fn complete(
    config_path: Option<&Path>,
    user_id: Uuid,
    lesson_id: Uuid,
    seconds: u32,
) -> Result<()> {
    let engine = super::build_engine(config_path, false)?;
    let record = engine.complete_lesson(user_id, lesson_id, seconds).await?;
    println!(
        "Lesson marked complete ({}s total on record)",
        record.seconds_spent
    );
    Ok(())
}
