//! quizgen CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use uuid::Uuid;

mod commands;

#[derive(Parser)]
#[command(name = "quizgen", version, about = "AI quiz and course generator")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create starter config
    Init,

    /// Manage learners
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Create a course from a text document
    Create {
        /// Course name
        #[arg(long)]
        name: String,

        /// Path to a UTF-8 text file with the course material
        #[arg(long)]
        file: PathBuf,

        /// Content provider label
        #[arg(long, default_value = "local")]
        provider: String,

        /// Number of questions to generate
        #[arg(long)]
        questions: Option<usize>,

        /// Number of lessons to generate
        #[arg(long)]
        lessons: Option<usize>,

        /// Skip lesson generation
        #[arg(long)]
        no_lessons: bool,
    },

    /// List courses
    List,

    /// Show a course with its lessons, or one lesson's content
    Show {
        /// Course id
        #[arg(long, conflicts_with = "lesson")]
        course: Option<Uuid>,

        /// Lesson id
        #[arg(long)]
        lesson: Option<Uuid>,
    },

    /// Print a quiz (answers hidden)
    Quiz {
        /// Course id
        #[arg(long, conflicts_with = "lesson")]
        course: Option<Uuid>,

        /// Lesson id
        #[arg(long)]
        lesson: Option<Uuid>,
    },

    /// Answer a single question and record the attempt
    Answer {
        /// User id
        #[arg(long)]
        user: Uuid,

        /// Question id
        #[arg(long)]
        question: Uuid,

        /// Your answer
        #[arg(long)]
        answer: String,
    },

    /// Grade a submission from an answers file
    Grade {
        /// User id
        #[arg(long)]
        user: Uuid,

        /// JSON file: [{"question_id": "...", "answer": "..."}]
        #[arg(long)]
        answers: PathBuf,
    },

    /// Regenerate a course's question set
    Regenerate {
        /// Course id
        #[arg(long)]
        course: Uuid,

        /// Number of questions to generate
        #[arg(long)]
        count: Option<usize>,
    },

    /// Show a user's progress through a course
    Progress {
        /// Course id
        #[arg(long)]
        course: Uuid,

        /// User id
        #[arg(long)]
        user: Uuid,
    },

    /// Mark a lesson complete for a user
    Complete {
        /// User id
        #[arg(long)]
        user: Uuid,

        /// Lesson id
        #[arg(long)]
        lesson: Uuid,

        /// Time spent reading, in seconds
        #[arg(long, default_value = "0")]
        seconds: u32,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Register a learner
    Add {
        /// Display name
        name: String,
    },
    /// List registered learners
    List,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizgen=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let config_path = cli.config;

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::User { action } => match action {
            UserAction::Add { name } => commands::user::add(config_path.as_deref(), &name).await,
            UserAction::List => commands::user::list(config_path.as_deref()).await,
        },
        Commands::Create {
            name,
            file,
            provider,
            questions,
            lessons,
            no_lessons,
        } => {
            commands::create::execute(
                config_path.as_deref(),
                name,
                file,
                provider,
                questions,
                lessons,
                no_lessons,
            )
            .await
        }
        Commands::List => commands::list::execute(config_path.as_deref()).await,
        Commands::Show { course, lesson } => {
            commands::show::execute(config_path.as_deref(), course, lesson).await
        }
        Commands::Quiz { course, lesson } => {
            commands::quiz::execute(config_path.as_deref(), course, lesson).await
        }
        Commands::Answer {
            user,
            question,
            answer,
        } => commands::answer::execute(config_path.as_deref(), user, question, answer).await,
        Commands::Grade { user, answers } => {
            commands::grade::execute(config_path.as_deref(), user, answers).await
        }
        Commands::Regenerate { course, count } => {
            commands::regenerate::execute(config_path.as_deref(), course, count).await
        }
        Commands::Progress { course, user } => {
            commands::progress::show(config_path.as_deref(), course, user).await
        }
        Commands::Complete {
            user,
            lesson,
            seconds,
        } => commands::progress::complete(config_path.as_deref(), user, lesson, seconds).await,
    };

    if let Err(e) = result {
        match e.downcast_ref::<quizgen_core::error::QuizError>() {
            Some(quiz_err) => eprintln!("Error ({}): {e:#}", quiz_err.kind()),
            None => eprintln!("Error: {e:#}"),
        }
        process::exit(1);
    }
}
