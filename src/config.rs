use std::path::PathBuf;
use std::time::Duration;

pub const CREDLY_BASE_URL: &str = "https://www.credly.com";

pub const DEFAULT_BADGE_SIZE: u32 = 80;
pub const DEFAULT_README_FILE: &str = "README.md";

/// Sentinel lines delimiting the region of the document this tool owns.
pub const START_MARKER: &str = "<!-- BADGES:START -->";
pub const END_MARKER: &str = "<!-- BADGES:END -->";

const NAV_TIMEOUT_SECS: u64 = 30;

/// Everything one pipeline run needs. Built by the entry points and passed
/// in; there is no process-global configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub username: String,
    /// Rendered width/height of each badge image, in pixels.
    pub badge_size: u32,
    pub readme_path: PathBuf,
    pub start_marker: String,
    pub end_marker: String,
    /// Hard deadline on "navigate and wait for the network to settle".
    /// Hitting it is not a failure; the capture keeps what it has.
    pub nav_timeout: Duration,
}

impl Config {
    pub fn new(username: impl Into<String>, readme_path: impl Into<PathBuf>) -> Self {
        Self {
            username: username.into(),
            badge_size: DEFAULT_BADGE_SIZE,
            readme_path: readme_path.into(),
            start_marker: START_MARKER.to_string(),
            end_marker: END_MARKER.to_string(),
            nav_timeout: Duration::from_secs(NAV_TIMEOUT_SECS),
        }
    }

    /// The public profile page whose load triggers the API calls we capture.
    pub fn profile_url(&self) -> String {
        format!("{CREDLY_BASE_URL}/users/{}/badges", self.username)
    }
}
