use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};

use crate::{
    analysis::StaticAnalysisProvider,
    auth::{CredentialProvider, DemoGoogleProvider},
    chats::ChatStore,
    config::AppConfig,
    db::DBLayer,
    engine::MessageEngine,
    session::SessionStore,
};

pub mod handlers;
pub mod types;

use handlers::{
    create_chat, current_user, get_chat, google_sign_in, list_chats, post_message, resolve_route,
    sign_out, stats,
};

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<SessionStore>,
    pub chats: Arc<ChatStore>,
    pub engine: Arc<MessageEngine>,
    pub credentials: Arc<dyn CredentialProvider>,
}

impl AppState {
    pub async fn build(config: &AppConfig, db: Arc<DBLayer>) -> Result<Self> {
        let session = Arc::new(SessionStore::load(db.clone()).await?);
        let chats = Arc::new(ChatStore::new(db.clone()));
        let provider = Arc::new(StaticAnalysisProvider::new(config.content_type_rule));
        let engine = Arc::new(MessageEngine::new(
            db,
            chats.clone(),
            provider,
            config.analysis_delay,
        ));
        let credentials = Arc::new(DemoGoogleProvider::new(config.signin_delay));

        Ok(Self {
            session,
            chats,
            engine,
            credentials,
        })
    }
}

pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/google", post(google_sign_in))
        .route("/api/auth/signout", post(sign_out))
        .route("/api/auth/me", get(current_user))
        .route("/api/chats", get(list_chats).post(create_chat))
        .route("/api/chats/{chat_id}", get(get_chat))
        .route("/api/chats/{chat_id}/messages", post(post_message))
        .route("/api/stats", get(stats))
        .route("/api/route", get(resolve_route))
}
