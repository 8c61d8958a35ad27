//! Production entry point: reads GitHub-Actions-style inputs, runs the
//! shared pipeline, and reports the changed flag through `GITHUB_OUTPUT` so
//! the calling workflow can decide whether to commit.

use std::env;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{info, warn};

use credly_badges::config::{Config, DEFAULT_BADGE_SIZE, DEFAULT_README_FILE};
use credly_badges::pipeline::{self, Outcome};

#[tokio::main]
async fn main() {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    if let Err(err) = run().await {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = config_from_env()?;

    info!("Credly user: {}", config.username);
    info!("Badge size: {}", config.badge_size);
    info!("README file: {}", config.readme_path.display());

    let outcome = pipeline::run(&config).await?;

    match outcome {
        Outcome::Updated => info!("{} updated successfully", config.readme_path.display()),
        Outcome::Unchanged => info!("no changes detected in {}", config.readme_path.display()),
        Outcome::NoData => warn!("no badge data captured, nothing to do"),
    }

    write_github_output(outcome.changed())
}

fn config_from_env() -> Result<Config> {
    let username = env::var("INPUT_CREDLY_USER").context("INPUT_CREDLY_USER is required")?;

    let badge_size = match env::var("INPUT_BADGE_SIZE") {
        Ok(value) if !value.is_empty() => value
            .parse()
            .context("INPUT_BADGE_SIZE must be a number of pixels")?,
        _ => DEFAULT_BADGE_SIZE,
    };

    let readme_file = env::var("INPUT_README_FILE")
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_README_FILE.to_string());

    let workspace = match env::var("GITHUB_WORKSPACE") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => env::current_dir().context("cannot resolve working directory")?,
    };

    let mut config = Config::new(username, workspace.join(readme_file));
    config.badge_size = badge_size;
    Ok(config)
}

/// Append `changes_made=<bool>` to the file GitHub points us at, when set.
fn write_github_output(changed: bool) -> Result<()> {
    let Ok(path) = env::var("GITHUB_OUTPUT") else {
        return Ok(());
    };

    let mut file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(&path)
        .with_context(|| format!("failed to open {path}"))?;
    writeln!(file, "changes_made={changed}").with_context(|| format!("failed to write {path}"))?;
    Ok(())
}
