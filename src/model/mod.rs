pub mod analysis;
pub mod chat;
pub mod message;
pub mod user;

pub use analysis::{ContentType, MediaAnalysis, Platform, Sentiment};
pub use chat::Chat;
pub use message::{Author, Message};
pub use user::User;

/// Time-ordered, globally unique id.
pub(crate) fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}
