use anyhow::Result;
use async_trait::async_trait;
use tokio::time::{sleep, Duration};
use tracing::debug;

use super::CredentialProvider;
use crate::model::user::User;

/// Simulated Google sign-in: waits, then hands back the fixed demo account.
pub struct DemoGoogleProvider {
    delay: Duration,
}

impl DemoGoogleProvider {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn demo_user() -> User {
        User {
            id: "1".into(),
            name: "John Doe".into(),
            email: "john.doe@gmail.com".into(),
            picture: "/placeholder.svg?height=40&width=40".into(),
        }
    }
}

#[async_trait]
impl CredentialProvider for DemoGoogleProvider {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn exchange(&self, credential: Option<&str>) -> Result<User> {
        debug!(
            has_credential = credential.is_some(),
            "simulating google credential exchange"
        );
        sleep(self.delay).await;
        Ok(Self::demo_user())
    }
}
