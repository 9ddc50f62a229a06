//! The `quizgen regenerate` command.

use std::path::Path;

use anyhow::Result;
use uuid::Uuid;

pub async fn execute(
    config_path: Option<&Path>,
    course_id: Uuid,
    count: Option<usize>,
) -> Result<()> {
    let engine = super::build_engine(config_path, true)?;
    let outcome = engine.regenerate(course_id, count).await?;

    println!(
        "Regenerated questions for {}: {} old replaced by {} new",
        outcome.course_name, outcome.old_count, outcome.new_count
    );
    Ok(())
}
