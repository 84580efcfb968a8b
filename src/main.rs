//! Resolve one phrase and print the result as JSON.
//!
//! Usage:
//!   phrase-resolver <text> <from> <to> [--offline] [--ensemble]
//!
//! Optional environment variables:
//! - OPENAI_API_KEY (enables the language model provider)
//! - SYSTRAN_API_KEY (enables the commercial MT provider)
//! - see `Config::from_env` for tuning and endpoints

use anyhow::{bail, Context, Result};
use phrase_resolver::config::Config;
use phrase_resolver::engine::{Engine, ResolutionOptions, ResolutionRequest};
use tracing::info;

struct Args {
    text: String,
    from: String,
    to: String,
    offline: bool,
    ensemble: bool,
}

impl Args {
    fn parse() -> Result<Self> {
        let mut positional = Vec::new();
        let mut offline = false;
        let mut ensemble = false;

        for arg in std::env::args().skip(1) {
            match arg.as_str() {
                "--offline" => offline = true,
                "--ensemble" => ensemble = true,
                flag if flag.starts_with("--") => bail!("Unknown flag: {}", flag),
                _ => positional.push(arg),
            }
        }

        let [text, from, to]: [String; 3] = positional.try_into().map_err(|_| {
            anyhow::anyhow!("Usage: phrase-resolver <text> <from> <to> [--offline] [--ensemble]")
        })?;

        Ok(Self {
            text,
            from,
            to,
            offline,
            ensemble,
        })
    }

    fn options(&self) -> ResolutionOptions {
        let mut options = if self.offline {
            ResolutionOptions::offline()
        } else {
            ResolutionOptions::default()
        };
        if self.ensemble {
            options = options.with_ensemble();
        }
        for (credential, var) in [("openai", "OPENAI_API_KEY"), ("systran", "SYSTRAN_API_KEY")] {
            if let Ok(secret) = std::env::var(var) {
                options = options.with_credential(credential, secret);
            }
        }
        options
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("phrase_resolver=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse()?;
    let config = Config::from_env()?;
    let engine = Engine::from_config(&config)?;

    let request = ResolutionRequest::new(args.text.clone(), args.from.as_str(), args.to.as_str())
        .with_options(args.options());
    let result = engine.translate(request).await;

    println!(
        "{}",
        serde_json::to_string_pretty(&result).context("Failed to serialize result")?
    );

    info!(
        "Metrics: {}",
        serde_json::to_string(&engine.metrics().report()).context("Failed to serialize metrics")?
    );
    Ok(())
}
