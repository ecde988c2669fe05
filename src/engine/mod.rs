use std::collections::HashSet;
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tracing::{error, info};

use crate::{
    analysis::{self, AnalysisProvider, WELCOME_MESSAGE},
    chats::ChatStore,
    db::DBLayer,
    error::{AppError, AppResult},
    model::{chat::Chat, message::Message},
};

/// A user message accepted for analysis, with the deferred system reply.
pub struct Submission {
    pub user_message: Message,
    pub reply: JoinHandle<AppResult<Message>>,
}

/// Per-chat timelines plus the deferred analysis reply.
pub struct MessageEngine {
    db: Arc<DBLayer>,
    chats: Arc<ChatStore>,
    provider: Arc<dyn AnalysisProvider>,
    reply_delay: Duration,
    // serializes read-modify-write of message lists
    timeline_lock: Mutex<()>,
    pending: Arc<StdMutex<HashSet<String>>>,
}

impl MessageEngine {
    pub fn new(
        db: Arc<DBLayer>,
        chats: Arc<ChatStore>,
        provider: Arc<dyn AnalysisProvider>,
        reply_delay: Duration,
    ) -> Self {
        Self {
            db,
            chats,
            provider,
            reply_delay,
            timeline_lock: Mutex::new(()),
            pending: Arc::new(StdMutex::new(HashSet::new())),
        }
    }

    async fn ensure_chat(&self, user_id: &str, chat_id: &str) -> AppResult<Chat> {
        self.chats
            .find_chat(user_id, chat_id)
            .await?
            .ok_or_else(|| AppError::ChatNotFound(chat_id.to_string()))
    }

    async fn load_timeline(&self, chat: &Chat) -> AppResult<Vec<Message>> {
        let messages = self.db.list_messages_for_chat(&chat.id).await?;
        if messages.is_empty() {
            return Ok(vec![Message::welcome(chat, WELCOME_MESSAGE)]);
        }
        Ok(messages)
    }

    /// Persisted messages, or just the welcome line for a chat nobody has written to.
    pub async fn timeline(&self, user_id: &str, chat_id: &str) -> AppResult<Vec<Message>> {
        let chat = self.ensure_chat(user_id, chat_id).await?;
        self.load_timeline(&chat).await
    }

    async fn append(&self, user_id: &str, chat_id: &str, message: Message) -> AppResult<Message> {
        let chat = self.ensure_chat(user_id, chat_id).await?;

        {
            let _guard = self.timeline_lock.lock().await;
            let mut messages = self.load_timeline(&chat).await?;
            messages.push(message.clone());
            self.db.save_messages_for_chat(chat_id, &messages).await?;
        }

        self.chats
            .touch_chat(user_id, chat_id, message.timestamp)
            .await?;
        Ok(message)
    }

    /// Blank text is ignored and yields `None`.
    pub async fn append_user_message(
        &self,
        user_id: &str,
        chat_id: &str,
        text: &str,
    ) -> AppResult<Option<Message>> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        let message = self
            .append(user_id, chat_id, Message::user(chat_id, text))
            .await?;
        info!(
            user_id,
            chat_id,
            message_id = message.id.as_str(),
            "user message appended"
        );
        Ok(Some(message))
    }

    /// Waits out the fixed analysis delay, then appends the system reply.
    pub async fn classify_and_respond(
        &self,
        user_id: &str,
        chat_id: &str,
        text: &str,
    ) -> AppResult<Message> {
        sleep(self.reply_delay).await;

        let reply = analysis::respond(self.provider.as_ref(), chat_id, text).await?;
        let reply = self.append(user_id, chat_id, reply).await?;
        info!(
            user_id,
            chat_id,
            message_id = reply.id.as_str(),
            platform = reply
                .media_analysis
                .as_ref()
                .map(|a| a.platform.as_str())
                .unwrap_or("none"),
            "system reply appended"
        );
        Ok(reply)
    }

    /// Appends the user message and schedules the reply. At most one analysis
    /// runs per chat; blank text is a no-op.
    pub async fn submit(
        self: &Arc<Self>,
        user_id: &str,
        chat_id: &str,
        text: &str,
    ) -> AppResult<Option<Submission>> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        self.ensure_chat(user_id, chat_id).await?;

        let pending = PendingGuard::acquire(&self.pending, chat_id)
            .ok_or_else(|| AppError::AnalysisPending(chat_id.to_string()))?;

        let Some(user_message) = self.append_user_message(user_id, chat_id, text).await? else {
            return Ok(None);
        };

        let engine = Arc::clone(self);
        let user_id = user_id.to_string();
        let chat_id = chat_id.to_string();
        let text = text.to_string();
        let reply = tokio::spawn(async move {
            let _pending = pending;
            let result = engine.classify_and_respond(&user_id, &chat_id, &text).await;
            if let Err(err) = &result {
                error!(chat_id = chat_id.as_str(), error = %err, "analysis reply failed");
            }
            result
        });

        Ok(Some(Submission {
            user_message,
            reply,
        }))
    }

    pub fn is_pending(&self, chat_id: &str) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(chat_id)
    }
}

/// Marks a chat as analyzing until dropped.
struct PendingGuard {
    set: Arc<StdMutex<HashSet<String>>>,
    chat_id: String,
}

impl PendingGuard {
    fn acquire(set: &Arc<StdMutex<HashSet<String>>>, chat_id: &str) -> Option<Self> {
        let inserted = set
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(chat_id.to_string());

        inserted.then(|| Self {
            set: Arc::clone(set),
            chat_id: chat_id.to_string(),
        })
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.set
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&self.chat_id);
    }
}
