use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Marker prepended to the source update's title for every AI-written guide.
pub const GUIDE_TITLE_PREFIX: &str = "【AI生成】";

/// Category label stored on guides derived from official updates.
pub const AI_GUIDE_CATEGORY: &str = "官方更新";

/// Version string stamped on newly generated guides.
pub const AI_GUIDE_VERSION: &str = "1.0";

/// One news item extracted from the official update feed, not yet persisted.
///
/// `source_link` is the business key: two candidates with the same link are
/// the same update no matter how the other fields differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateUpdate {
    pub title: String,
    /// Card body text. Empty when the card has no body element.
    pub body: String,
    /// Parsed publish date, or the extraction time when the date text was unparseable.
    pub publish_date: DateTime<Utc>,
    pub source_link: String,
    /// Whether synthesis has been attempted and recorded for this update.
    pub processed: bool,
}

impl CandidateUpdate {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        publish_date: DateTime<Utc>,
        source_link: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            publish_date,
            source_link: source_link.into(),
            processed: false,
        }
    }
}

/// A guide ready to be inserted. The store assigns `id` and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGuide {
    pub title: String,
    pub content: String,
    /// Comma-separated tags. Empty for generated guides.
    pub tags: String,
    pub category: String,
    pub source_link: String,
    pub is_ai_generated: bool,
    pub version: String,
}

impl NewGuide {
    /// Builds the guide record for synthesized `content` derived from `update`.
    #[must_use]
    pub fn from_update(update: &CandidateUpdate, content: impl Into<String>) -> Self {
        Self {
            title: format!("{GUIDE_TITLE_PREFIX}{}", update.title),
            content: content.into(),
            tags: String::new(),
            category: AI_GUIDE_CATEGORY.to_string(),
            source_link: update.source_link.clone(),
            is_ai_generated: true,
            version: AI_GUIDE_VERSION.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_defaults_to_unprocessed() {
        let update = CandidateUpdate::new("v0.3.1 Patch Notes", "", Utc::now(), "/a");
        assert!(!update.processed);
        assert!(update.body.is_empty());
    }

    #[test]
    fn guide_from_update_uses_fixed_markers() {
        let update = CandidateUpdate::new("v0.3.1 Patch Notes", "Fixes", Utc::now(), "/a");
        let guide = NewGuide::from_update(&update, "generated text");

        assert_eq!(guide.title, "【AI生成】v0.3.1 Patch Notes");
        assert_eq!(guide.content, "generated text");
        assert_eq!(guide.category, AI_GUIDE_CATEGORY);
        assert_eq!(guide.source_link, "/a");
        assert_eq!(guide.version, "1.0");
        assert!(guide.is_ai_generated);
        assert!(guide.tags.is_empty());
    }

    #[test]
    fn candidate_is_serializable() {
        let update = CandidateUpdate::new("Title", "Body", Utc::now(), "/news/1");
        let json = serde_json::to_string(&update).expect("serialize candidate");
        assert!(json.contains("\"source_link\":\"/news/1\""));
        assert!(json.contains("\"processed\":false"));
    }
}
