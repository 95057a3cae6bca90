//! Steam news page scraping: fetch the page, find the news cards, and turn
//! each card into a [`palwiki_core::CandidateUpdate`].

pub mod client;
pub mod date;
pub mod error;
pub mod extract;

pub use client::NewsClient;
pub use date::{normalize_publish_date, parse_publish_date};
pub use error::ScraperError;
pub use extract::extract_updates;
