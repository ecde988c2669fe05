use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const CHAT_TITLE_PREFIX: &str = "Analysis";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl Chat {
    /// `existing` is the number of chats the owner already has.
    pub fn numbered(user_id: &str, existing: usize, now: DateTime<Utc>) -> Self {
        Self {
            id: super::new_id(),
            user_id: user_id.to_string(),
            title: format!("{CHAT_TITLE_PREFIX} {}", existing + 1),
            created_at: now,
            last_activity: now,
        }
    }
}
