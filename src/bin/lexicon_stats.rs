//! Print coverage statistics for the configured lexicon as JSON.
//!
//! Usage:
//!   lexicon-stats                      # statistics for the whole corpus
//!   lexicon-stats --category greetings # also list one category in each language
//!
//! Optional:
//! - LEXICON_PATH (defaults to the bundled reference lexicon)

use anyhow::{Context, Result};
use phrase_resolver::language::LanguageRegistry;
use phrase_resolver::lexicon::{Category, LexiconStore};
use phrase_resolver::text::Normalizer;
use serde_json::json;
use tracing::info;

fn parse_category(name: &str) -> Result<Category> {
    serde_json::from_value(json!(name)).with_context(|| format!("Unknown category: {}", name))
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("phrase_resolver=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let registry = LanguageRegistry::get();
    let normalizer = Normalizer::from_registry(registry);

    let store = match std::env::var("LEXICON_PATH") {
        Ok(path) => LexiconStore::from_path(&path, normalizer)
            .with_context(|| format!("Failed to load lexicon from {}", path))?,
        Err(_) => {
            info!("LEXICON_PATH not set, using the bundled reference lexicon");
            LexiconStore::reference(normalizer).context("Failed to load reference lexicon")?
        }
    };

    let args: Vec<String> = std::env::args().collect();
    let category = match args.iter().position(|a| a == "--category") {
        Some(index) => {
            let name = args
                .get(index + 1)
                .context("--category needs a value")?;
            Some(parse_category(name)?)
        }
        None => None,
    };

    let mut output = json!({ "stats": store.stats(registry) });

    if let Some(category) = category {
        let by_language: serde_json::Map<String, serde_json::Value> = store
            .stats(registry)
            .coverage_by_language
            .keys()
            .map(|language| -> Result<(String, serde_json::Value)> {
                let phrases = store.phrases_in_category(category, language.as_str());
                Ok((language.to_string(), serde_json::to_value(phrases)?))
            })
            .collect::<Result<_>>()?;
        output["category"] = json!({ "name": category, "phrases": by_language });
    }

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
