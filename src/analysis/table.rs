use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::model::{Platform, Sentiment};

pub struct CannedAnalysis {
    pub summary: &'static str,
    pub sentiment: Sentiment,
    pub tags: &'static [&'static str],
}

static CANNED: Lazy<HashMap<Platform, CannedAnalysis>> = Lazy::new(|| {
    HashMap::from([
        (
            Platform::Instagram,
            CannedAnalysis {
                summary: "This Instagram reel showcases a lifestyle brand promoting sustainable fashion. \
                          The video features a model wearing eco-friendly clothing in a natural outdoor setting. \
                          The content emphasizes environmental consciousness and ethical fashion choices.",
                sentiment: Sentiment::Positive,
                tags: &["fashion", "sustainability", "lifestyle", "eco-friendly", "outdoor"],
            },
        ),
        (
            Platform::Facebook,
            CannedAnalysis {
                summary: "This Facebook post discusses the latest trends in digital marketing. \
                          It includes statistics about social media engagement and provides actionable tips \
                          for businesses to improve their online presence.",
                sentiment: Sentiment::Neutral,
                tags: &["marketing", "business", "social media", "engagement", "tips"],
            },
        ),
        (
            Platform::Twitter,
            CannedAnalysis {
                summary: "This Twitter thread explores the impact of AI on modern technology. \
                          The author shares insights about machine learning applications and discusses \
                          future implications for various industries.",
                sentiment: Sentiment::Positive,
                tags: &["AI", "technology", "machine learning", "future", "innovation"],
            },
        ),
        (
            Platform::Youtube,
            CannedAnalysis {
                summary: "This YouTube video is a comprehensive tutorial on web development using React. \
                          The creator explains component architecture, state management, and best practices \
                          for building scalable applications.",
                sentiment: Sentiment::Positive,
                tags: &["programming", "react", "tutorial", "web development", "education"],
            },
        ),
    ])
});

pub fn canned_analysis(platform: Platform) -> &'static CannedAnalysis {
    // every Platform variant has an entry
    &CANNED[&platform]
}
