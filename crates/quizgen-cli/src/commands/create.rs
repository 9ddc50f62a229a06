//! The `quizgen create` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use quizgen_core::engine::CreateOptions;
use quizgen_core::model::NewCourse;

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    config_path: Option<&Path>,
    name: String,
    file: PathBuf,
    provider: String,
    questions: Option<usize>,
    lessons: Option<usize>,
    no_lessons: bool,
) -> Result<()> {
    let source_text = std::fs::read_to_string(&file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let engine = super::build_engine(config_path, true)?;

    let created = engine
        .create_course(
            NewCourse {
                name,
                provider,
                source_text,
            },
            CreateOptions {
                generate_lessons: !no_lessons,
                question_count: questions,
                lesson_count: lessons,
            },
        )
        .await?;

    println!("Created course: {} ({})", created.course.name, created.course.id);
    println!(
        "  {} lessons, {} questions",
        created.lessons.len(),
        created.questions.len()
    );

    if created.questions.is_empty() {
        println!(
            "  Warning: question generation produced nothing; \
             run `quizgen regenerate --course {}` to retry",
            created.course.id
        );
    }

    Ok(())
}
