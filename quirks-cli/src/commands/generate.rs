//! One-shot character generation from the command line
//!
//! Runs the same novelty selection as the server, under a single local
//! client key, and prints each accepted character as a JSON line.

use anyhow::Result;
use clap::Args;
use quirks_core::{CharacterGenerator, ClientKey, Difficulty, NoveltySelector};

use crate::commands::build_generator;
use crate::config::ConfigLoader;

/// Arguments for the generate command
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Difficulty tier (1-4)
    #[arg(short, long, value_parser = parse_difficulty)]
    pub difficulty: Difficulty,

    /// Number of characters to generate
    #[arg(short, long, default_value_t = 1)]
    pub count: u32,
}

fn parse_difficulty(value: &str) -> Result<Difficulty, String> {
    value.parse().map_err(|e: quirks_core::InvalidDifficulty| e.to_string())
}

/// Run the generate command
pub async fn run(args: GenerateArgs) -> Result<()> {
    let config = ConfigLoader::load()?;
    let selector = NoveltySelector::new(config.selection()?);
    let generator = build_generator(&config.model)?;

    let lines = generate_lines(&selector, generator.as_ref(), args.difficulty, args.count).await?;
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

/// Generate `count` characters in sequence, each one novel against the last
async fn generate_lines(
    selector: &NoveltySelector,
    generator: &dyn CharacterGenerator,
    difficulty: Difficulty,
    count: u32,
) -> Result<Vec<String>> {
    let key = ClientKey::new("cli");
    let mut lines = Vec::with_capacity(count as usize);

    for _ in 0..count {
        let selection = selector.select(&key, generator, difficulty).await?;
        lines.push(serde_json::to_string(&selection.character)?);
    }

    Ok(lines)
}
