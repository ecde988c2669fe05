use anyhow::Result;
use rocksdb::{Options, DB};
use serde::{de::DeserializeOwned, Serialize};
use std::{collections::HashMap, path::Path, sync::RwLock};
use tracing::warn;

use crate::model::{chat::Chat, message::Message, user::User};

const SESSION_USER_KEY: &str = "user";

/// Raw byte storage underneath `DBLayer`. Every value is a JSON document.
pub trait KvBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    fn put(&self, key: &str, value: &[u8]) -> Result<()>;
    fn delete(&self, key: &str) -> Result<()>;
}

pub struct RocksBackend {
    db: DB,
}

impl RocksBackend {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, path)?;
        Ok(Self { db })
    }
}

impl KvBackend for RocksBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.db.get(key)?)
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        self.db.put(key, value)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.db.delete(key)?;
        Ok(())
    }
}

/// Process-local map, used for tests and throwaway runs.
#[derive(Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl KvBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| anyhow::anyhow!("memory backend lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| anyhow::anyhow!("memory backend lock poisoned"))?;
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| anyhow::anyhow!("memory backend lock poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}

pub struct DBLayer {
    backend: Box<dyn KvBackend>,
}

impl DBLayer {
    pub fn new(path: &str) -> Result<Self> {
        Ok(Self::with_backend(RocksBackend::open(path)?))
    }

    pub fn in_memory() -> Self {
        Self::with_backend(MemoryBackend::default())
    }

    pub fn with_backend(backend: impl KvBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    fn chats_key(user_id: &str) -> String {
        format!("chats_{user_id}")
    }

    fn messages_key(chat_id: &str) -> String {
        format!("messages_{chat_id}")
    }

    // ============================================================
    // JSON HELPERS
    // ============================================================

    /// Corrupt values are reported and read as absent.
    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.backend.get(key)? else {
            return Ok(None);
        };

        match serde_json::from_slice(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                warn!(key, error = %err, "discarding unreadable persisted value");
                Ok(None)
            }
        }
    }

    fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_vec(value)?;
        self.backend.put(key, &raw)
    }

    // ============================================================
    // SESSION USER
    // ============================================================
    pub async fn load_session_user(&self) -> Result<Option<User>> {
        self.read_json(SESSION_USER_KEY)
    }

    pub async fn save_session_user(&self, user: &User) -> Result<()> {
        self.write_json(SESSION_USER_KEY, user)
    }

    pub async fn clear_session_user(&self) -> Result<()> {
        self.backend.delete(SESSION_USER_KEY)
    }

    // ============================================================
    // CHAT LISTS (PER USER, MOST RECENT FIRST)
    // ============================================================
    pub async fn list_chats_for_user(&self, user_id: &str) -> Result<Vec<Chat>> {
        Ok(self
            .read_json(&Self::chats_key(user_id))?
            .unwrap_or_default())
    }

    pub async fn save_chats_for_user(&self, user_id: &str, chats: &[Chat]) -> Result<()> {
        self.write_json(&Self::chats_key(user_id), chats)
    }

    // ============================================================
    // MESSAGE TIMELINES (PER CHAT, INSERTION ORDER)
    // ============================================================
    pub async fn list_messages_for_chat(&self, chat_id: &str) -> Result<Vec<Message>> {
        Ok(self
            .read_json(&Self::messages_key(chat_id))?
            .unwrap_or_default())
    }

    pub async fn save_messages_for_chat(&self, chat_id: &str, messages: &[Message]) -> Result<()> {
        self.write_json(&Self::messages_key(chat_id), messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentType, MediaAnalysis, Platform, Sentiment};
    use chrono::Utc;

    fn demo_user() -> User {
        User {
            id: "1".into(),
            name: "John Doe".into(),
            email: "john.doe@gmail.com".into(),
            picture: "/placeholder.svg?height=40&width=40".into(),
        }
    }

    fn analysed_message(chat_id: &str) -> Message {
        let analysis = MediaAnalysis {
            id: "a1".into(),
            chat_id: chat_id.into(),
            url: "https://www.instagram.com/p/xyz".into(),
            platform: Platform::Instagram,
            content_type: ContentType::Image,
            summary: "summary".into(),
            sentiment: Sentiment::Positive,
            tags: vec!["fashion".into(), "outdoor".into()],
            timestamp: Utc::now(),
        };
        Message::with_analysis(chat_id, "done", analysis)
    }

    #[tokio::test]
    async fn session_user_round_trips_and_clears() {
        let db = DBLayer::in_memory();
        assert!(db.load_session_user().await.unwrap().is_none());

        db.save_session_user(&demo_user()).await.unwrap();
        assert_eq!(db.load_session_user().await.unwrap(), Some(demo_user()));

        db.clear_session_user().await.unwrap();
        assert!(db.load_session_user().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn chats_and_messages_round_trip() {
        let db = DBLayer::in_memory();
        let now = Utc::now();
        let chats = vec![Chat::numbered("1", 1, now), Chat::numbered("1", 0, now)];
        db.save_chats_for_user("1", &chats).await.unwrap();
        assert_eq!(db.list_chats_for_user("1").await.unwrap(), chats);
        assert!(db.list_chats_for_user("2").await.unwrap().is_empty());

        let messages = vec![Message::user("c1", "hi"), analysed_message("c1")];
        db.save_messages_for_chat("c1", &messages).await.unwrap();
        assert_eq!(db.list_messages_for_chat("c1").await.unwrap(), messages);
        assert!(db.list_messages_for_chat("c2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupt_values_read_as_absent() {
        let backend = MemoryBackend::default();
        backend.put("user", b"{not json").unwrap();
        backend.put("chats_1", b"[1, 2").unwrap();
        backend.put("messages_c1", b"\"nope\"").unwrap();
        let db = DBLayer::with_backend(backend);

        assert!(db.load_session_user().await.unwrap().is_none());
        assert!(db.list_chats_for_user("1").await.unwrap().is_empty());
        assert!(db.list_messages_for_chat("c1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rocks_backend_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db");
        let path = path.to_str().unwrap();
        let messages = vec![Message::user("c1", "hi"), analysed_message("c1")];

        {
            let db = DBLayer::new(path).unwrap();
            db.save_session_user(&demo_user()).await.unwrap();
            db.save_messages_for_chat("c1", &messages).await.unwrap();
        }

        let db = DBLayer::new(path).unwrap();
        assert_eq!(db.load_session_user().await.unwrap(), Some(demo_user()));
        assert_eq!(db.list_messages_for_chat("c1").await.unwrap(), messages);
    }
}
