use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{analysis::MediaAnalysis, chat::Chat};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Author {
    User,
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub chat_id: String,
    #[serde(rename = "type")]
    pub author: Author,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_analysis: Option<MediaAnalysis>,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn user(chat_id: &str, content: impl Into<String>) -> Self {
        Self::new(chat_id, Author::User, content.into(), None)
    }

    pub fn system(chat_id: &str, content: impl Into<String>) -> Self {
        Self::new(chat_id, Author::System, content.into(), None)
    }

    /// The greeting shown at the top of a chat. Its id and timestamp come from
    /// the chat, so every rendering (and the persisted copy) is the same message.
    pub fn welcome(chat: &Chat, content: impl Into<String>) -> Self {
        Self {
            id: format!("welcome-{}", chat.id),
            chat_id: chat.id.clone(),
            author: Author::System,
            content: content.into(),
            media_analysis: None,
            timestamp: chat.created_at,
        }
    }

    pub fn with_analysis(chat_id: &str, content: impl Into<String>, analysis: MediaAnalysis) -> Self {
        Self::new(chat_id, Author::System, content.into(), Some(analysis))
    }

    fn new(
        chat_id: &str,
        author: Author,
        content: String,
        media_analysis: Option<MediaAnalysis>,
    ) -> Self {
        Self {
            id: super::new_id(),
            chat_id: chat_id.to_string(),
            author,
            content,
            media_analysis,
            timestamp: Utc::now(),
        }
    }

    #[inline]
    pub fn is_user(&self) -> bool {
        matches!(self.author, Author::User)
    }
}
