//! The `quizgen show` command.

use std::path::Path;

use anyhow::Result;
use comfy_table::Table;
use uuid::Uuid;

pub async fn execute(
    config_path: Option<&Path>,
    course_id: Option<Uuid>,
    lesson_id: Option<Uuid>,
) -> Result<()> {
    let engine = super::build_engine(config_path, false)?;

    match (course_id, lesson_id) {
        (Some(course), None) => show_course(&engine, course).await,
        (None, Some(lesson)) => show_lesson(&engine, lesson).await,
        _ => anyhow::bail!("pass exactly one of --course or --lesson"),
    }
}

async fn show_course(engine: &quizgen_core::engine::QuizEngine, course_id: Uuid) -> Result<()> {
    let overview = engine.course_overview(course_id).await?;

    println!("{} ({})", overview.name, overview.id);
    println!("Provider: {}", overview.provider);
    println!("Questions: {}", overview.question_count);

    if overview.lessons.is_empty() {
        println!("No lessons.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Id", "Title", "Est. minutes"]);
    for lesson in &overview.lessons {
        table.add_row(vec![
            lesson.position.to_string(),
            lesson.id.to_string(),
            lesson.title.clone(),
            lesson.estimated_minutes.to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

async fn show_lesson(engine: &quizgen_core::engine::QuizEngine, lesson_id: Uuid) -> Result<()> {
    let lesson = engine.lesson(lesson_id).await?;

    println!(
        "Lesson {}: {} (~{} min)\n",
        lesson.position, lesson.title, lesson.estimated_minutes
    );
    println!("{}", lesson.content_markdown);

    for example in &lesson.code_examples {
        if !example.description.is_empty() {
            println!("\n{}:", example.description);
        }
        println!("```{}\n{}\n```", example.language, example.code);
    }

    if !lesson.key_points.is_empty() {
        println!("\nKey points:");
        for point in &lesson.key_points {
            println!("  - {point}");
        }
    }
    Ok(())
}
