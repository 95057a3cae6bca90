//! Prompt templates and the manual-topic wrapper.

use chrono::Utc;
use palwiki_core::CandidateUpdate;
use uuid::Uuid;

const GUIDE_PERSONA: &str = "你现在是【幻兽帕鲁】游戏的专属攻略创作AI。\
你的唯一职责是根据提供的攻略主题和相关信息，创作一篇极其准确、详细、全面且最新的幻兽帕鲁游戏攻略。\
严禁创作任何与幻兽帕鲁无关的内容。\
如果主题与幻兽帕鲁无关，或者你无法创作相关攻略，请直接回答“抱歉，我只能创作幻兽帕鲁相关的攻略。”";

const QUESTION_PERSONA: &str = "你现在是【幻兽帕鲁】游戏的专属攻略AI助手。\
你的唯一职责是根据用户提出的问题，提供极其准确、详细、全面且最新的幻兽帕鲁游戏攻略。\
严禁回答任何与幻兽帕鲁无关的内容。\
如果用户的问题与幻兽帕鲁无关，或者你无法提供相关攻略，请直接回答“抱歉，我只能提供幻兽帕鲁相关的攻略信息。”";

/// Prefix of `source_link` for updates created from a manual topic.
pub const MANUAL_TOPIC_LINK_PREFIX: &str = "manual:topic/";

/// Prompt asking for a guide about an update's `title` and `body`.
#[must_use]
pub fn build_guide_prompt(title: &str, body: &str) -> String {
    format!("{GUIDE_PERSONA}\n\n攻略主题：{title}\n相关内容：{body}")
}

/// Prompt for a free-form player question.
#[must_use]
pub fn build_question_prompt(question: &str) -> String {
    format!("{QUESTION_PERSONA}\n\n用户问题：{question}")
}

/// Wraps an operator-supplied topic as a candidate update.
///
/// Each call gets a fresh `source_link`, so the same topic submitted twice
/// produces two guides.
#[must_use]
pub fn topic_candidate(topic: &str) -> CandidateUpdate {
    let topic = topic.trim();
    CandidateUpdate::new(
        format!("AI生成攻略主题: {topic}"),
        format!("根据主题“{topic}”生成的攻略。"),
        Utc::now(),
        format!("{MANUAL_TOPIC_LINK_PREFIX}{}", Uuid::new_v4()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guide_prompt_carries_persona_title_and_body() {
        let prompt = build_guide_prompt("v0.3 更新", "新增樱花岛");
        assert!(prompt.starts_with("你现在是【幻兽帕鲁】游戏的专属攻略创作AI。"));
        assert!(prompt.ends_with("攻略主题：v0.3 更新\n相关内容：新增樱花岛"));
    }

    #[test]
    fn guide_prompt_tolerates_empty_body() {
        let prompt = build_guide_prompt("标题", "");
        assert!(prompt.ends_with("相关内容："));
    }

    #[test]
    fn question_prompt_ends_with_question() {
        let prompt = build_question_prompt("怎么抓捕阿努比斯？");
        assert!(prompt.contains("专属攻略AI助手"));
        assert!(prompt.ends_with("用户问题：怎么抓捕阿努比斯？"));
    }

    #[test]
    fn topic_candidate_wraps_topic() {
        let candidate = topic_candidate("  配种攻略 ");
        assert_eq!(candidate.title, "AI生成攻略主题: 配种攻略");
        assert_eq!(candidate.body, "根据主题“配种攻略”生成的攻略。");
        assert!(candidate.source_link.starts_with(MANUAL_TOPIC_LINK_PREFIX));
        assert!(!candidate.processed);
    }

    #[test]
    fn topic_candidates_get_distinct_links() {
        let a = topic_candidate("same");
        let b = topic_candidate("same");
        assert_ne!(a.source_link, b.source_link);
    }
}
