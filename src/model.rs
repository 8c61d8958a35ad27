use chrono::NaiveDate;
use serde::Deserialize;

/// Fallbacks for badge records whose nested template/issuer fields are
/// missing. The Credly API omits them occasionally; rendering a placeholder
/// beats dropping the badge.
pub const FALLBACK_TEMPLATE_NAME: &str = "Badge";
pub const FALLBACK_ISSUER_NAME: &str = "Issuer";

/// One earned badge, projected down to the fields the rendered fragment needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub id: String,
    pub image_url: String,
    pub template_name: String,
    pub issuer_name: String,
    pub issued_on: NaiveDate,
}

/// Accumulated output of one capture session. `user_id` is set by the first
/// matching identity response; `badges` is replaced wholesale by the
/// badge-list response.
#[derive(Debug, Clone, Default)]
pub struct CaptureResult {
    pub user_id: Option<String>,
    pub badges: Vec<Badge>,
}

impl CaptureResult {
    /// Whether there is anything worth rendering. An absent identity or an
    /// empty badge list both mean "no usable data", not an error.
    pub fn has_data(&self) -> bool {
        self.user_id.is_some() && !self.badges.is_empty()
    }
}

// Raw response envelopes. Everything below mirrors the Credly API shape;
// unknown fields are ignored, known-but-absent fields default.

#[derive(Debug, Deserialize)]
pub struct IdentityEnvelope {
    pub data: IdentityData,
}

#[derive(Debug, Deserialize)]
pub struct IdentityData {
    pub id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct BadgeListEnvelope {
    #[serde(default)]
    pub data: Vec<RawBadge>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawBadge {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub issued_at_date: Option<String>,
    #[serde(default)]
    pub badge_template: Option<RawBadgeTemplate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawBadgeTemplate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub issuer: Option<RawIssuer>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawIssuer {
    #[serde(default)]
    pub entities: Vec<RawIssuerEntity>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawIssuerEntity {
    #[serde(default)]
    pub entity: Option<RawEntity>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawEntity {
    #[serde(default)]
    pub name: Option<String>,
}

impl From<RawBadge> for Badge {
    fn from(raw: RawBadge) -> Self {
        let template = raw.badge_template.unwrap_or_default();

        // Top-level image wins; the template image is the fallback.
        let image_url = raw
            .image_url
            .or(template.image_url)
            .unwrap_or_default();

        let template_name = template
            .name
            .unwrap_or_else(|| FALLBACK_TEMPLATE_NAME.to_string());

        let issuer_name = template
            .issuer
            .and_then(|issuer| issuer.entities.into_iter().next())
            .and_then(|entry| entry.entity)
            .and_then(|entity| entity.name)
            .unwrap_or_else(|| FALLBACK_ISSUER_NAME.to_string());

        // Unparseable or missing dates sort last (epoch) rather than
        // discarding the badge.
        let issued_on = raw
            .issued_at_date
            .as_deref()
            .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
            .unwrap_or_default();

        Self {
            id: raw.id,
            image_url,
            template_name,
            issuer_name,
            issued_on,
        }
    }
}
