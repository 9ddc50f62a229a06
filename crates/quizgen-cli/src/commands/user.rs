//! The `quizgen user` commands.

use std::path::Path;

use anyhow::Result;
use comfy_table::Table;

use quizgen_core::traits::QuizStore;

pub async fn add(config_path: Option<&Path>, name: &str) -> Result<()> {
    let (_config, store) = super::open(config_path)?;
    let user = store.insert_user(name).await?;
    println!("Registered {} ({})", user.name, user.id);
    Ok(())
}

pub async fn list(config_path: Option<&Path>) -> Result<()> {
    let (_config, store) = super::open(config_path)?;
    let users = store.list_users().await?;

    if users.is_empty() {
        println!("No users registered. Run `quizgen user add <name>`.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Id", "Name"]);
    for user in &users {
        table.add_row(vec![user.id.to_string(), user.name.clone()]);
    }
    println!("{table}");
    Ok(())
}
