use anyhow::Result;
use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::{db::DBLayer, model::chat::Chat};

/// Dashboard figures. `chats_this_month` compares calendar months in UTC, not the
/// viewer's local month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatStats {
    pub total_chats: usize,
    pub chats_this_month: usize,
    pub last_activity: Option<DateTime<Utc>>,
}

pub struct ChatStore {
    db: Arc<DBLayer>,
    // serializes read-modify-write of the per-user lists
    write_lock: Mutex<()>,
}

impl ChatStore {
    pub fn new(db: Arc<DBLayer>) -> Self {
        Self {
            db,
            write_lock: Mutex::new(()),
        }
    }

    /// Most recent first.
    pub async fn list_chats(&self, user_id: &str) -> Result<Vec<Chat>> {
        self.db.list_chats_for_user(user_id).await
    }

    pub async fn find_chat(&self, user_id: &str, chat_id: &str) -> Result<Option<Chat>> {
        Ok(self
            .list_chats(user_id)
            .await?
            .into_iter()
            .find(|c| c.id == chat_id))
    }

    pub async fn create_chat(&self, user_id: &str) -> Result<Chat> {
        let _guard = self.write_lock.lock().await;

        let mut chats = self.db.list_chats_for_user(user_id).await?;
        let chat = Chat::numbered(user_id, chats.len(), Utc::now());
        chats.insert(0, chat.clone());
        self.db.save_chats_for_user(user_id, &chats).await?;

        info!(
            user_id,
            chat_id = chat.id.as_str(),
            title = chat.title.as_str(),
            "chat created"
        );
        Ok(chat)
    }

    /// Moves `last_activity` forward; returns false when the chat is unknown.
    pub async fn touch_chat(&self, user_id: &str, chat_id: &str, at: DateTime<Utc>) -> Result<bool> {
        let _guard = self.write_lock.lock().await;

        let mut chats = self.db.list_chats_for_user(user_id).await?;
        let Some(chat) = chats.iter_mut().find(|c| c.id == chat_id) else {
            return Ok(false);
        };
        if at > chat.last_activity {
            chat.last_activity = at;
        }
        self.db.save_chats_for_user(user_id, &chats).await?;
        Ok(true)
    }

    pub async fn stats(&self, user_id: &str, now: DateTime<Utc>) -> Result<ChatStats> {
        let chats = self.list_chats(user_id).await?;
        let chats_this_month = chats
            .iter()
            .filter(|c| c.created_at.year() == now.year() && c.created_at.month() == now.month())
            .count();
        let last_activity = chats.iter().map(|c| c.last_activity).max();

        Ok(ChatStats {
            total_chats: chats.len(),
            chats_this_month,
            last_activity,
        })
    }
}
