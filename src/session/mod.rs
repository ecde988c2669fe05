use anyhow::Result;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::{
    db::DBLayer,
    error::{AppError, AppResult},
    model::user::User,
};

pub mod guard;

/// Who is signed in. Passed explicitly to whatever needs an access decision.
pub struct SessionStore {
    db: Arc<DBLayer>,
    current: RwLock<Option<User>>,
}

impl SessionStore {
    /// Restores the persisted identity; unreadable state starts signed out.
    pub async fn load(db: Arc<DBLayer>) -> Result<Self> {
        let current = db.load_session_user().await?;
        if let Some(user) = &current {
            info!(user_id = user.id.as_str(), "restored session");
        }
        Ok(Self {
            db,
            current: RwLock::new(current),
        })
    }

    pub async fn sign_in(&self, user: User) -> Result<()> {
        let mut current = self.current.write().await;
        self.db.save_session_user(&user).await?;
        info!(user_id = user.id.as_str(), "signed in");
        *current = Some(user);
        Ok(())
    }

    /// Drops the identity only; the user's chats stay in storage.
    pub async fn sign_out(&self) -> Result<()> {
        let mut current = self.current.write().await;
        self.db.clear_session_user().await?;
        if let Some(user) = current.take() {
            info!(user_id = user.id.as_str(), "signed out");
        }
        Ok(())
    }

    pub async fn current_user(&self) -> Option<User> {
        self.current.read().await.clone()
    }

    pub async fn require_user(&self) -> AppResult<User> {
        self.current_user().await.ok_or(AppError::NotSignedIn)
    }
}
