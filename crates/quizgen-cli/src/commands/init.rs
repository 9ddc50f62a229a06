//! The `quizgen init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("quizgen.toml").exists() {
        println!("quizgen.toml already exists, skipping.");
    } else {
        std::fs::write("quizgen.toml", SAMPLE_CONFIG)?;
        println!("Created quizgen.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit quizgen.toml with your API key (or export GEMINI_API_KEY)");
    println!("  2. Run: quizgen user add \"Your Name\"");
    println!("  3. Run: quizgen create --name \"My Course\" --file notes.txt");

    Ok(())
}

// Top-level keys must stay above the [providers.*] tables; anything
// after a table header belongs to that table.
const SAMPLE_CONFIG: &str = r#"# quizgen configuration

default_provider = "gemini"
default_model = "gemini-2.5-flash"
temperature = 0.7
question_count = 10
lesson_count = 5
data_path = "./quizgen-data.json"

[providers.gemini]
type = "gemini"
api_key = "${GEMINI_API_KEY}"

[providers.openai]
type = "openai"
api_key = "${OPENAI_API_KEY}"
"#;
