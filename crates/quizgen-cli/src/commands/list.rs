//! The `quizgen list` command.

use std::path::Path;

use anyhow::Result;
use comfy_table::Table;

use quizgen_core::traits::QuizStore;

pub async fn execute(config_path: Option<&Path>) -> Result<()> {
    let (_config, store) = super::open(config_path)?;
    let courses = store.list_courses().await?;

    if courses.is_empty() {
        println!("No courses yet. Run `quizgen create` to make one.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Id", "Name", "Provider", "Lessons", "Questions"]);
    for course in &courses {
        table.add_row(vec![
            course.id.to_string(),
            course.name.clone(),
            course.provider.clone(),
            course.lesson_count.to_string(),
            course.question_count.to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}
