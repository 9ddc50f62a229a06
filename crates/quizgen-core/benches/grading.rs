use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizgen_core::grading::grade;
use quizgen_core::model::{Difficulty, Question, QuestionKind};
use uuid::Uuid;

fn make_questions(n: usize) -> Vec<Question> {
    (0..n)
        .map(|i| Question {
            id: Uuid::new_v4(),
            course_id: Uuid::nil(),
            lesson_id: None,
            kind: QuestionKind::MultipleChoice,
            prompt: format!("Question {i}?"),
            options: vec![format!("right {i}"), format!("wrong {i}")],
            answer: format!("right {i}"),
            explanation: format!("Answer {i} follows from the text."),
            difficulty: Difficulty::Medium,
        })
        .collect()
}

fn make_answers(questions: &[Question], correct_ratio: f64) -> Vec<(Uuid, String)> {
    let cutoff = (questions.len() as f64 * correct_ratio) as usize;
    questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let answer = if i < cutoff {
                // Mixed-case with padding to exercise normalization.
                format!("  Right {i} ")
            } else {
                format!("wrong {i}")
            };
            (q.id, answer)
        })
        .collect()
}

fn bench_grade(c: &mut Criterion) {
    let mut group = c.benchmark_group("grade");

    for n in [10usize, 100, 1000] {
        let questions = make_questions(n);
        let answers = make_answers(&questions, 0.7);
        group.bench_function(format!("{n}_questions"), |b| {
            b.iter(|| grade(black_box(&questions), black_box(&answers)))
        });
    }

    group.finish();
}

fn bench_grade_stale_ids(c: &mut Criterion) {
    let mut group = c.benchmark_group("grade_stale");

    let questions = make_questions(100);
    // Half the submission references questions that no longer exist.
    let mut answers = make_answers(&questions[..50], 1.0);
    answers.extend((0..50).map(|i| (Uuid::new_v4(), format!("stale {i}"))));

    group.bench_function("half_stale", |b| {
        b.iter(|| grade(black_box(&questions), black_box(&answers)))
    });

    group.finish();
}

criterion_group!(benches, bench_grade, bench_grade_stale_ids);
criterion_main!(benches);
