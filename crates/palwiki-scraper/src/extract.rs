//! Steam news card extraction.

use std::sync::LazyLock;

use palwiki_core::CandidateUpdate;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::date::normalize_publish_date;

static CARD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".apphub_Card").expect("valid card selector"));
static TITLE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".apphub_CardContentNewsTitle").expect("valid title selector")
});
static BODY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".apphub_CardContentNewsBody").expect("valid body selector"));
static DATE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".apphub_CardContentNewsDate").expect("valid date selector"));
static LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid link selector"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Extracts every news card in `document`, in document order.
///
/// Missing title, body, date, or link elements yield empty strings (the date
/// falls back to the extraction time) rather than dropping the card.
#[must_use]
pub fn extract_updates(document: &Html) -> Vec<CandidateUpdate> {
    document.select(&CARD).map(card_to_update).collect()
}

fn card_to_update(card: ElementRef<'_>) -> CandidateUpdate {
    let title = first_text(card, &TITLE);
    let body = first_text(card, &BODY);
    let date_text = first_text(card, &DATE);
    let link = card_link(card);

    CandidateUpdate::new(title, body, normalize_publish_date(&date_text), link)
}

fn first_text(card: ElementRef<'_>, selector: &Selector) -> String {
    card.select(selector)
        .next()
        .map(|el| clean_text(&el.text().collect::<String>()))
        .unwrap_or_default()
}

// Steam renders each card as an <a>; other layouts nest the anchor inside.
fn card_link(card: ElementRef<'_>) -> String {
    card.value()
        .attr("href")
        .or_else(|| {
            card.select(&LINK)
                .next()
                .and_then(|a| a.value().attr("href"))
        })
        .map(|href| href.trim().to_string())
        .unwrap_or_default()
}

pub(crate) fn clean_text(input: &str) -> String {
    WHITESPACE.replace_all(input, " ").trim().to_string()
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
