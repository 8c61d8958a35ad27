use anyhow::Result;
use chrono::Utc;
use log::{info, warn};

use crate::capture;
use crate::config::Config;
use crate::patch::patch_document;
use crate::render::render_fragment;

/// Terminal outcome of one pipeline run. `NoData` is a successful no-op,
/// not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Updated,
    Unchanged,
    NoData,
}

impl Outcome {
    /// The flag a calling process branches on (e.g. whether to commit).
    pub fn changed(self) -> bool {
        matches!(self, Outcome::Updated)
    }
}

/// The one shared pipeline: capture → render → patch. Both entry points are
/// thin adapters around this.
pub async fn run(config: &Config) -> Result<Outcome> {
    info!("fetching badges for Credly user {}", config.username);

    let result = capture::capture(config).await?;

    let Some(user_id) = result.user_id.as_deref() else {
        warn!("no identity observed for {}; skipping update", config.username);
        return Ok(Outcome::NoData);
    };
    if result.badges.is_empty() {
        warn!("no badges found for user {user_id}; skipping update");
        return Ok(Outcome::NoData);
    }

    info!("found {} badges for user {user_id}", result.badges.len());

    let fragment = render_fragment(&result.badges, config.badge_size, Utc::now());
    let changed = patch_document(
        &config.readme_path,
        &fragment,
        &config.start_marker,
        &config.end_marker,
    )?;

    Ok(if changed {
        Outcome::Updated
    } else {
        Outcome::Unchanged
    })
}
