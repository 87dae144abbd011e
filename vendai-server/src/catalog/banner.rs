//! Banner message display windows
//!
//! A banner is visible when `today` (local date, business timezone) lies
//! within `[start_date, end_date]`, both inclusive, a missing bound being
//! unbounded on that side.

use chrono_tz::Tz;
use shared::models::BannerMessage;

use crate::utils::time::today_string;

/// Banners visible today, order preserved
pub fn active_banners(messages: &[BannerMessage], tz: Tz) -> Vec<BannerMessage> {
    let today = today_string(tz);
    active_banners_on(messages, &today)
}

/// Banners visible on a given `YYYY-MM-DD` date, order preserved
pub fn active_banners_on(messages: &[BannerMessage], today: &str) -> Vec<BannerMessage> {
    messages
        .iter()
        .filter(|m| m.visible_on(today))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn banner(text: &str, start: Option<&str>, end: Option<&str>) -> BannerMessage {
        BannerMessage {
            text: text.to_string(),
            start_date: start.map(String::from),
            end_date: end.map(String::from),
        }
    }

    #[test]
    fn test_window_filtering_preserves_order() {
        let messages = vec![
            banner("sempre", None, None),
            banner("marco", Some("2024-03-01"), Some("2024-04-01")),
            banner("futuro", Some("2030-01-01"), None),
        ];

        let active = active_banners_on(&messages, "2024-03-15");
        let texts: Vec<&str> = active.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["sempre", "marco"]);

        let active = active_banners_on(&messages, "2024-04-02");
        let texts: Vec<&str> = active.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["sempre"]);
    }

    #[test]
    fn test_empty_list() {
        assert!(active_banners_on(&[], "2024-03-15").is_empty());
    }
}
