//! Manual/diagnostic entry point: same pipeline as the action binary, but
//! configured from argv and pointed at a scratch document by default. Handy
//! for checking what a run would produce without touching a real README.

use anyhow::{Context, Result};
use log::info;

use credly_badges::config::Config;
use credly_badges::pipeline::{self, Outcome};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    if let Err(err) = run().await {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let username = args
        .next()
        .context("usage: preview <credly-user> [target-file]")?;
    let target = args.next().unwrap_or_else(|| "_README.md".to_string());

    let config = Config::new(username, target);
    let outcome = pipeline::run(&config).await?;

    match outcome {
        Outcome::Updated => info!("wrote {}", config.readme_path.display()),
        Outcome::Unchanged => info!("{} already up to date", config.readme_path.display()),
        Outcome::NoData => info!("nothing captured, {} untouched", config.readme_path.display()),
    }
    Ok(())
}
