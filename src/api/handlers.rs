use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tracing::info;

use super::AppState;
use crate::{
    api::types::{
        ChatThreadResponse, ChatsResponse, PostMessageRequest, PostMessageResponse, RouteQuery,
        RouteResponse, SignInRequest, StatsResponse,
    },
    error::{AppError, AppResult},
    model::{chat::Chat, user::User},
    session::guard::{self, View},
};

// ------------------------------------------------------------
// SESSION
// ------------------------------------------------------------
pub async fn google_sign_in(
    State(state): State<AppState>,
    Json(req): Json<SignInRequest>,
) -> AppResult<Json<User>> {
    let user = state
        .credentials
        .exchange(req.id_token.as_deref())
        .await
        .map_err(|e| AppError::SignInFailed(e.to_string()))?;

    info!(
        provider = state.credentials.name(),
        user_id = user.id.as_str(),
        "credential exchange complete"
    );
    state.session.sign_in(user.clone()).await?;
    Ok(Json(user))
}

pub async fn sign_out(State(state): State<AppState>) -> AppResult<StatusCode> {
    state.session.sign_out().await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn current_user(State(state): State<AppState>) -> AppResult<Json<User>> {
    Ok(Json(state.session.require_user().await?))
}

// ------------------------------------------------------------
// CHATS
// ------------------------------------------------------------
pub async fn list_chats(State(state): State<AppState>) -> AppResult<Json<ChatsResponse>> {
    let user = state.session.require_user().await?;
    let chats = state.chats.list_chats(&user.id).await?;
    Ok(Json(ChatsResponse { chats }))
}

pub async fn create_chat(State(state): State<AppState>) -> AppResult<(StatusCode, Json<Chat>)> {
    let user = state.session.require_user().await?;
    let chat = state.chats.create_chat(&user.id).await?;
    Ok((StatusCode::CREATED, Json(chat)))
}

pub async fn get_chat(
    Path(chat_id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<Json<ChatThreadResponse>> {
    let user = state.session.require_user().await?;
    let chat = state
        .chats
        .find_chat(&user.id, &chat_id)
        .await?
        .ok_or_else(|| AppError::ChatNotFound(chat_id.clone()))?;
    let messages = state.engine.timeline(&user.id, &chat_id).await?;

    Ok(Json(ChatThreadResponse {
        chat,
        messages,
        pending: state.engine.is_pending(&chat_id),
    }))
}

pub async fn post_message(
    Path(chat_id): Path<String>,
    State(state): State<AppState>,
    Json(req): Json<PostMessageRequest>,
) -> AppResult<Response> {
    let user = state.session.require_user().await?;

    // The reply task keeps running after its handle is dropped here.
    match state.engine.submit(&user.id, &chat_id, &req.text).await? {
        None => Ok(StatusCode::NO_CONTENT.into_response()),
        Some(submission) => Ok((
            StatusCode::ACCEPTED,
            Json(PostMessageResponse {
                message: submission.user_message,
                pending: true,
            }),
        )
            .into_response()),
    }
}

pub async fn stats(State(state): State<AppState>) -> AppResult<Json<StatsResponse>> {
    let user = state.session.require_user().await?;
    let stats = state.chats.stats(&user.id, Utc::now()).await?;
    Ok(Json(StatsResponse {
        greeting_name: user.first_name().to_string(),
        stats,
    }))
}

// ------------------------------------------------------------
// ROUTE GUARD
// ------------------------------------------------------------
pub async fn resolve_route(
    State(state): State<AppState>,
    Query(query): Query<RouteQuery>,
) -> AppResult<Json<RouteResponse>> {
    let requested =
        View::from_path(&query.path).ok_or_else(|| AppError::UnknownRoute(query.path.clone()))?;

    let user = state.session.current_user().await;
    let resolved = guard::resolve(user.as_ref(), requested.clone());
    let redirect = (resolved != requested).then(|| resolved.path());

    Ok(Json(RouteResponse {
        requested,
        resolved,
        redirect,
    }))
}
