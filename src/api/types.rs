use serde::{Deserialize, Serialize};

use crate::{
    chats::ChatStats,
    model::{chat::Chat, message::Message},
    session::guard::View,
};

#[derive(Debug, Default, Deserialize)]
pub struct SignInRequest {
    #[serde(default)]
    pub id_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatsResponse {
    pub chats: Vec<Chat>,
}

#[derive(Debug, Serialize)]
pub struct ChatThreadResponse {
    pub chat: Chat,
    pub messages: Vec<Message>,
    pub pending: bool,
}

#[derive(Debug, Deserialize)]
pub struct PostMessageRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct PostMessageResponse {
    pub message: Message,
    pub pending: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub greeting_name: String,
    #[serde(flatten)]
    pub stats: ChatStats,
}

#[derive(Debug, Deserialize)]
pub struct RouteQuery {
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub requested: View,
    pub resolved: View,
    pub redirect: Option<String>,
}
