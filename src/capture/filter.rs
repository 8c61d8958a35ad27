use crate::config::Config;

/// First page, fixed page size. These are capture parameters baked into the
/// profile page's own API call, not something the user configures.
pub const BADGE_LIST_SIGNATURE: &str = "/badges?page=1&page_size=48";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Identity,
    BadgeList,
}

/// Pure classifier for network responses seen while the profile page loads.
/// Decides whether a response is one of the two endpoints of interest.
#[derive(Debug, Clone)]
pub struct ResponseFilter {
    identity_path: String,
}

impl ResponseFilter {
    pub fn new(username: &str) -> Self {
        Self {
            identity_path: format!("/users/{username}"),
        }
    }

    pub fn for_config(config: &Config) -> Self {
        Self::new(&config.username)
    }

    /// URL pattern first, then content type and status. Non-JSON and non-200
    /// responses are ignored, not treated as failures; plenty of unrelated
    /// traffic on the page fails without affecting the capture.
    pub fn classify(&self, url: &str, status: i64, mime_type: &str) -> Option<ResponseKind> {
        let is_identity = url.contains(&self.identity_path);
        let is_badge_list = url.contains(BADGE_LIST_SIGNATURE);

        if !is_identity && !is_badge_list {
            return None;
        }
        if status != 200 || !mime_type.starts_with("application/json") {
            return None;
        }

        // A URL matching both patterns counts as the identity lookup.
        if is_identity {
            Some(ResponseKind::Identity)
        } else {
            Some(ResponseKind::BadgeList)
        }
    }
}
