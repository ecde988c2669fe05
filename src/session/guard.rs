use serde::{Deserialize, Serialize};

use crate::model::user::User;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "view", content = "chat_id", rename_all = "snake_case")]
pub enum View {
    Landing,
    SignIn,
    Dashboard,
    Chat(String),
}

impl View {
    /// Parses frontend paths: `/`, `/signin`, `/dashboard`, `/chat/<id>`.
    pub fn from_path(path: &str) -> Option<View> {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Some(View::Landing),
            "/signin" => Some(View::SignIn),
            "/dashboard" => Some(View::Dashboard),
            other => other
                .strip_prefix("/chat/")
                .filter(|id| !id.is_empty() && !id.contains('/'))
                .map(|id| View::Chat(id.to_string())),
        }
    }

    pub fn path(&self) -> String {
        match self {
            View::Landing => "/".to_string(),
            View::SignIn => "/signin".to_string(),
            View::Dashboard => "/dashboard".to_string(),
            View::Chat(id) => format!("/chat/{id}"),
        }
    }
}

/// Where the router should actually land for a requested view.
pub fn resolve(current: Option<&User>, requested: View) -> View {
    match (current, requested) {
        (_, View::Landing) => View::Landing,
        (Some(_), View::SignIn) => View::Dashboard,
        (None, View::SignIn) => View::SignIn,
        (None, View::Dashboard | View::Chat(_)) => View::SignIn,
        (Some(_), requested) => requested,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: "1".into(),
            name: "John Doe".into(),
            email: "john.doe@gmail.com".into(),
            picture: String::new(),
        }
    }

    #[test]
    fn signed_out_is_sent_to_sign_in() {
        assert_eq!(resolve(None, View::Dashboard), View::SignIn);
        assert_eq!(resolve(None, View::Chat("c1".into())), View::SignIn);
        assert_eq!(resolve(None, View::SignIn), View::SignIn);
    }

    #[test]
    fn signed_in_skips_sign_in() {
        let user = user();
        assert_eq!(resolve(Some(&user), View::SignIn), View::Dashboard);
        assert_eq!(
            resolve(Some(&user), View::Chat("c1".into())),
            View::Chat("c1".into())
        );
        assert_eq!(resolve(Some(&user), View::Dashboard), View::Dashboard);
    }

    #[test]
    fn parses_and_renders_paths() {
        for path in ["/", "/signin", "/dashboard", "/chat/abc"] {
            assert_eq!(View::from_path(path).unwrap().path(), path);
        }
        assert_eq!(View::from_path("/dashboard/"), Some(View::Dashboard));
        assert_eq!(View::from_path("/chat/"), None);
        assert_eq!(View::from_path("/settings"), None);
    }

    #[test]
    fn landing_is_public() {
        assert_eq!(resolve(None, View::Landing), View::Landing);
        assert_eq!(resolve(Some(&user()), View::Landing), View::Landing);
    }
}
