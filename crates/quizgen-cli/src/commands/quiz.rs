//! The `quizgen quiz` command.

use std::path::Path;

use anyhow::Result;
use uuid::Uuid;

use quizgen_core::model::QuizQuestion;

pub async fn execute(
    config_path: Option<&Path>,
    course_id: Option<Uuid>,
    lesson_id: Option<Uuid>,
) -> Result<()> {
    let engine = super::build_engine(config_path, false)?;

    let questions = match (course_id, lesson_id) {
        (Some(course), None) => engine.course_quiz(course).await?,
        (None, Some(lesson)) => {
            let quiz = engine.lesson_quiz(lesson).await?;
            println!("Quiz for lesson: {}\n", quiz.lesson_title);
            quiz.questions
        }
        _ => anyhow::bail!("pass exactly one of --course or --lesson"),
    };

    if questions.is_empty() {
        println!("No questions. Run `quizgen regenerate` to generate a set.");
        return Ok(());
    }

    for (i, question) in questions.iter().enumerate() {
        print_question(i + 1, question);
    }
    println!(
        "Answer with: quizgen grade --user <id> --answers answers.json\n\
         where answers.json is [{{\"question_id\": \"...\", \"answer\": \"...\"}}]"
    );
    Ok(())
}

fn print_question(number: usize, question: &QuizQuestion) {
    println!(
        "{number}. [{}|{}] {}",
        question.kind, question.difficulty, question.prompt
    );
    println!("   id: {}", question.id);
    for (i, option) in question.options.iter().enumerate() {
        // a) b) c) d)
        let letter = (b'a' + i as u8) as char;
        println!("   {letter}) {option}");
    }
    println!();
}
