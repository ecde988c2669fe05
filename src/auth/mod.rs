use anyhow::Result;
use async_trait::async_trait;

use crate::model::user::User;

pub mod google;

pub use google::DemoGoogleProvider;

/// Performs the sign-in handshake. The session only consumes the returned `User`.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn exchange(&self, credential: Option<&str>) -> Result<User>;
}
