use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use std::str::FromStr;

use crate::model::{ContentType, MediaAnalysis, Message, Platform, Sentiment};

pub mod table;

pub const REJECTION_REPLY: &str =
    "Please share a valid social media link from Instagram, Facebook, Twitter, or YouTube for me to analyze.";

pub const WELCOME_MESSAGE: &str = "Welcome! Share a social media link (Instagram, Facebook, Twitter, or YouTube) and I'll provide a detailed analysis of the content.";

/// Substring rules, checked in order; the first hit wins.
const PLATFORM_RULES: &[(Platform, &[&str])] = &[
    (Platform::Instagram, &["instagram.com"]),
    (Platform::Facebook, &["facebook.com"]),
    (Platform::Twitter, &["twitter.com", "x.com"]),
    (Platform::Youtube, &["youtube.com", "youtu.be"]),
];

impl Platform {
    /// Case-sensitive substring match against the raw submitted text.
    pub fn detect(text: &str) -> Option<Platform> {
        PLATFORM_RULES
            .iter()
            .find(|(_, needles)| needles.iter().any(|needle| text.contains(needle)))
            .map(|(platform, _)| *platform)
    }
}

pub fn announcement(platform: Platform) -> String {
    format!("I've analyzed the {platform} content. Here's what I found:")
}

/// How the video/image split is chosen for non-YouTube links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentTypeRule {
    /// Unseeded coin flip per call.
    Random,
    /// Pure function of the submitted URL.
    Stable,
}

impl FromStr for ContentTypeRule {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(ContentTypeRule::Random),
            "stable" => Ok(ContentTypeRule::Stable),
            other => Err(anyhow::anyhow!("unknown content type rule: {other}")),
        }
    }
}

impl ContentTypeRule {
    pub fn content_type(&self, platform: Platform, url: &str) -> ContentType {
        if platform == Platform::Youtube {
            return ContentType::Video;
        }

        let video = match self {
            ContentTypeRule::Random => rand::thread_rng().gen_bool(0.5),
            ContentTypeRule::Stable => fnv1a(url.as_bytes()) % 2 == 0,
        };

        if video {
            ContentType::Video
        } else {
            ContentType::Image
        }
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0xcbf2_9ce4_8422_2325, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(0x0000_0100_0000_01b3)
    })
}

/// Fields a provider contributes; ids and timestamps are stamped by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisFields {
    pub content_type: ContentType,
    pub summary: String,
    pub sentiment: Sentiment,
    pub tags: Vec<String>,
}

#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    async fn analyze(&self, platform: Platform, url: &str) -> Result<AnalysisFields>;
}

/// Fixed per-platform answers. Stand-in until a real content fetcher exists.
pub struct StaticAnalysisProvider {
    rule: ContentTypeRule,
}

impl StaticAnalysisProvider {
    pub fn new(rule: ContentTypeRule) -> Self {
        Self { rule }
    }
}

#[async_trait]
impl AnalysisProvider for StaticAnalysisProvider {
    async fn analyze(&self, platform: Platform, url: &str) -> Result<AnalysisFields> {
        let canned = table::canned_analysis(platform);
        Ok(AnalysisFields {
            content_type: self.rule.content_type(platform, url),
            summary: canned.summary.to_string(),
            sentiment: canned.sentiment,
            tags: canned.tags.iter().map(|t| t.to_string()).collect(),
        })
    }
}

/// Build the system reply for one submitted text.
pub async fn respond(provider: &dyn AnalysisProvider, chat_id: &str, text: &str) -> Result<Message> {
    let Some(platform) = Platform::detect(text) else {
        return Ok(Message::system(chat_id, REJECTION_REPLY));
    };

    let fields = provider.analyze(platform, text).await?;
    let analysis = MediaAnalysis {
        id: crate::model::new_id(),
        chat_id: chat_id.to_string(),
        url: text.to_string(),
        platform,
        content_type: fields.content_type,
        summary: fields.summary,
        sentiment: fields.sentiment,
        tags: fields.tags,
        timestamp: Utc::now(),
    };

    Ok(Message::with_analysis(
        chat_id,
        announcement(platform),
        analysis,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Author;

    #[test]
    fn detects_each_platform() {
        let cases = [
            ("https://www.instagram.com/p/xyz", Some(Platform::Instagram)),
            ("see facebook.com/story", Some(Platform::Facebook)),
            ("https://twitter.com/a/status/1", Some(Platform::Twitter)),
            ("https://x.com/a/status/1", Some(Platform::Twitter)),
            ("https://www.youtube.com/watch?v=1", Some(Platform::Youtube)),
            ("https://youtu.be/abc", Some(Platform::Youtube)),
            ("hello there", None),
            ("https://tiktok.com/@who", None),
        ];
        for (text, expected) in cases {
            assert_eq!(Platform::detect(text), expected, "{text}");
        }
    }

    #[test]
    fn first_rule_wins() {
        assert_eq!(
            Platform::detect("youtube.com then instagram.com"),
            Some(Platform::Instagram)
        );
        // "x.com" is a substring of many hosts and still routes to Twitter.
        assert_eq!(Platform::detect("https://box.com/file"), Some(Platform::Twitter));
        assert_eq!(
            Platform::detect("facebook.com x.com"),
            Some(Platform::Facebook)
        );
    }

    #[test]
    fn detection_is_case_sensitive() {
        assert_eq!(Platform::detect("https://INSTAGRAM.COM/p/1"), None);
    }

    #[test]
    fn youtube_is_always_video() {
        for rule in [ContentTypeRule::Random, ContentTypeRule::Stable] {
            for _ in 0..32 {
                assert_eq!(
                    rule.content_type(Platform::Youtube, "https://youtu.be/abc"),
                    ContentType::Video
                );
            }
        }
    }

    #[test]
    fn random_rule_only_yields_video_or_image() {
        for _ in 0..64 {
            let ct = ContentTypeRule::Random.content_type(Platform::Facebook, "facebook.com/p");
            assert!(matches!(ct, ContentType::Video | ContentType::Image));
        }
    }

    #[test]
    fn stable_rule_is_repeatable() {
        let url = "https://www.instagram.com/p/xyz";
        let first = ContentTypeRule::Stable.content_type(Platform::Instagram, url);
        for _ in 0..8 {
            assert_eq!(
                ContentTypeRule::Stable.content_type(Platform::Instagram, url),
                first
            );
        }
    }

    #[test]
    fn parses_rule_names() {
        assert_eq!("Stable".parse::<ContentTypeRule>().unwrap(), ContentTypeRule::Stable);
        assert_eq!("random".parse::<ContentTypeRule>().unwrap(), ContentTypeRule::Random);
        assert!("coin".parse::<ContentTypeRule>().is_err());
    }

    #[test]
    fn every_platform_has_canned_fields() {
        for platform in Platform::ALL {
            let canned = table::canned_analysis(platform);
            assert!(!canned.summary.is_empty());
            assert_eq!(canned.tags.len(), 5);
        }
        assert_eq!(
            table::canned_analysis(Platform::Facebook).sentiment,
            Sentiment::Neutral
        );
    }

    #[tokio::test]
    async fn instagram_reply_carries_fixed_fields() {
        let provider = StaticAnalysisProvider::new(ContentTypeRule::Stable);
        let text = "check this out https://www.instagram.com/p/xyz";
        let reply = respond(&provider, "c1", text).await.unwrap();

        assert_eq!(reply.author, Author::System);
        assert_eq!(reply.chat_id, "c1");
        assert_eq!(
            reply.content,
            "I've analyzed the instagram content. Here's what I found:"
        );
        let analysis = reply.media_analysis.expect("analysis attached");
        assert_eq!(analysis.platform, Platform::Instagram);
        assert_eq!(analysis.url, text);
        assert_eq!(analysis.chat_id, "c1");
        assert_eq!(analysis.sentiment, Sentiment::Positive);
        assert_eq!(
            analysis.tags,
            ["fashion", "sustainability", "lifestyle", "eco-friendly", "outdoor"]
        );
        assert!(analysis.summary.starts_with("This Instagram reel showcases"));
    }

    #[tokio::test]
    async fn unknown_text_gets_rejection() {
        let provider = StaticAnalysisProvider::new(ContentTypeRule::Random);
        let reply = respond(&provider, "c1", "hello there").await.unwrap();
        assert_eq!(reply.content, REJECTION_REPLY);
        assert!(reply.media_analysis.is_none());
        let json = serde_json::to_value(&reply).unwrap();
        assert!(json.get("mediaAnalysis").is_none());
    }
}
