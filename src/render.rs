use chrono::{DateTime, Utc};

use crate::config::CREDLY_BASE_URL;
use crate::model::Badge;

/// Render the badge fragment: one anchor per badge, newest first, plus a
/// trailing "last updated" line. Pure function of its inputs so the output
/// is fully deterministic and testable.
///
/// An empty badge list renders to an empty string; the pipeline treats that
/// as nothing to patch.
pub fn render_fragment(badges: &[Badge], size: u32, rendered_at: DateTime<Utc>) -> String {
    if badges.is_empty() {
        return String::new();
    }

    // Stable sort: equal dates keep their input order.
    let mut sorted: Vec<&Badge> = badges.iter().collect();
    sorted.sort_by(|a, b| b.issued_on.cmp(&a.issued_on));

    let mut fragment = String::from("\n");

    for badge in sorted {
        let badge_url = format!("{CREDLY_BASE_URL}/badges/{}", badge.id);
        let issued = badge.issued_on.format("%b %-d, %Y");

        fragment.push_str(&format!(
            "<a href=\"{badge_url}\" target=\"_blank\">\
             <img src=\"{src}\" width=\"{size}\" height=\"{size}\" alt=\"{name}\" \
             title=\"{name}&#10;Issued by: {issuer}&#10;Date: {issued}\" /></a>\n",
            src = badge.image_url,
            name = badge.template_name,
            issuer = badge.issuer_name,
        ));
    }

    fragment.push_str("\n\n");
    fragment.push_str(&format!(
        "*Last updated: {}*\n",
        rendered_at.format("%a, %d %b %Y %H:%M:%S GMT")
    ));

    fragment
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn badge(id: &str, issued_on: &str) -> Badge {
        Badge {
            id: id.to_string(),
            image_url: format!("https://images.credly.com/{id}.png"),
            template_name: format!("Template {id}"),
            issuer_name: format!("Issuer {id}"),
            issued_on: NaiveDate::parse_from_str(issued_on, "%Y-%m-%d").unwrap(),
        }
    }

    fn render_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 8, 5, 12, 0, 0).unwrap()
    }

    #[test]
    fn empty_badges_render_empty_fragment() {
        assert_eq!(render_fragment(&[], 80, render_time()), "");
    }

    #[test]
    fn newest_badge_comes_first() {
        let badges = vec![badge("old", "2022-03-01"), badge("new", "2024-01-05")];
        let fragment = render_fragment(&badges, 80, render_time());

        let new_pos = fragment.find("/badges/new").unwrap();
        let old_pos = fragment.find("/badges/old").unwrap();
        assert!(new_pos < old_pos);
    }

    #[test]
    fn equal_dates_keep_input_order() {
        let badges = vec![
            badge("first", "2023-05-10"),
            badge("second", "2023-05-10"),
            badge("third", "2023-05-10"),
        ];
        let fragment = render_fragment(&badges, 80, render_time());

        let first = fragment.find("/badges/first").unwrap();
        let second = fragment.find("/badges/second").unwrap();
        let third = fragment.find("/badges/third").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn anchor_carries_image_and_title() {
        let badges = vec![Badge {
            id: "b1".into(),
            image_url: "https://images.credly.com/b1.png".into(),
            template_name: "X".into(),
            issuer_name: "Y".into(),
            issued_on: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        }];
        let fragment = render_fragment(&badges, 64, render_time());

        assert!(fragment.contains("href=\"https://www.credly.com/badges/b1\""));
        assert!(fragment.contains("src=\"https://images.credly.com/b1.png\""));
        assert!(fragment.contains("width=\"64\" height=\"64\""));
        assert!(fragment.contains("alt=\"X\""));
        assert!(fragment.contains("title=\"X&#10;Issued by: Y&#10;Date: Jan 5, 2024\""));
    }

    #[test]
    fn trailing_line_records_render_time() {
        let badges = vec![badge("b1", "2024-01-05")];
        let fragment = render_fragment(&badges, 80, render_time());

        assert!(fragment.ends_with("*Last updated: Mon, 05 Aug 2024 12:00:00 GMT*\n"));
    }

    #[test]
    fn does_not_mutate_input_order() {
        let badges = vec![badge("old", "2022-03-01"), badge("new", "2024-01-05")];
        let _ = render_fragment(&badges, 80, render_time());
        assert_eq!(badges[0].id, "old");
    }
}
