//! Publish-date parsing for news card date labels.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;

// "January 23, 2024", "Jan 23, 2024", "Sept. 5 2024"
static MONTH_DAY_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z]{3,9})\.?\s+(\d{1,2}),?\s+(\d{4})").expect("valid date regex")
});

/// Parses a card date label such as `"Posted: January 23, 2024"` into
/// midnight UTC of that day.
///
/// The `Posted:` prefix is optional and abbreviated month names are accepted.
/// Returns `None` when no month/day/year triple can be read.
#[must_use]
pub fn parse_publish_date(text: &str) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_prefix("Posted:").unwrap_or(trimmed).trim();

    let caps = MONTH_DAY_YEAR.captures(trimmed)?;
    // %B accepts both full and three-letter month names when parsing.
    let month = caps.get(1)?.as_str();
    let month = if month.len() > 3 && !is_full_month(month) {
        &month[..3]
    } else {
        month
    };
    let normalized = format!("{month} {}, {}", &caps[2], &caps[3]);

    let date = NaiveDate::parse_from_str(&normalized, "%B %d, %Y").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

/// Like [`parse_publish_date`], but never fails: unparseable text logs a
/// warning and yields the current time.
#[must_use]
pub fn normalize_publish_date(text: &str) -> DateTime<Utc> {
    parse_publish_date(text).unwrap_or_else(|| {
        tracing::warn!(date_text = text, "scraper: unparseable publish date, using now");
        Utc::now()
    })
}

fn is_full_month(name: &str) -> bool {
    const MONTHS: [&str; 12] = [
        "january",
        "february",
        "march",
        "april",
        "may",
        "june",
        "july",
        "august",
        "september",
        "october",
        "november",
        "december",
    ];
    let lower = name.to_ascii_lowercase();
    MONTHS.contains(&lower.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn midnight(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn parses_full_month_with_prefix() {
        assert_eq!(
            parse_publish_date("Posted: January 23, 2024"),
            Some(midnight(2024, 1, 23))
        );
    }

    #[test]
    fn parses_abbreviated_month() {
        assert_eq!(
            parse_publish_date("Posted: Jun 7, 2024"),
            Some(midnight(2024, 6, 7))
        );
    }

    #[test]
    fn parses_without_prefix() {
        assert_eq!(
            parse_publish_date("  December 31, 2023 "),
            Some(midnight(2023, 12, 31))
        );
    }

    #[test]
    fn parses_dotted_four_letter_abbreviation() {
        assert_eq!(
            parse_publish_date("Posted: Sept. 5, 2024"),
            Some(midnight(2024, 9, 5))
        );
    }

    #[test]
    fn rejects_garbage_and_impossible_dates() {
        assert_eq!(parse_publish_date("yesterday"), None);
        assert_eq!(parse_publish_date(""), None);
        assert_eq!(parse_publish_date("Posted: February 30, 2024"), None);
        assert_eq!(parse_publish_date("Posted: Jan 23 @ 10:00am"), None);
    }

    #[test]
    fn normalize_falls_back_to_now() {
        let before = Utc::now();
        let parsed = normalize_publish_date("not a date");
        let after = Utc::now();
        assert!(parsed >= before && parsed <= after);
    }

    #[test]
    fn normalize_keeps_parsed_value() {
        assert_eq!(
            normalize_publish_date("Posted: March 3, 2025"),
            midnight(2025, 3, 3)
        );
    }
}
