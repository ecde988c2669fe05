//! Runtime configuration read from the environment (and `.env` via dotenvy).
//!
//! Every key has a default so the service starts with no configuration at all.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::analysis::ContentTypeRule;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Env: `HTTP_ADDR`. Default `0.0.0.0:3000`.
    pub http_addr: SocketAddr,

    /// RocksDB directory. Env: `DB_PATH`. Default `analyticsdb`.
    pub db_path: String,

    /// Pause before the system reply. Env: `ANALYSIS_DELAY_MS`. Default 2000.
    pub analysis_delay: Duration,

    /// Simulated credential exchange. Env: `SIGNIN_DELAY_MS`. Default 2000.
    pub signin_delay: Duration,

    /// Env: `ANALYSIS_CONTENT_TYPE` (`random` | `stable`). Default `random`.
    pub content_type_rule: ContentTypeRule,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            db_path: "analyticsdb".to_string(),
            analysis_delay: Duration::from_millis(2000),
            signin_delay: Duration::from_millis(2000),
            content_type_rule: ContentTypeRule::Random,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            http_addr: parse_or("HTTP_ADDR", &lookup, defaults.http_addr),
            db_path: lookup("DB_PATH")
                .filter(|p| !p.trim().is_empty())
                .unwrap_or(defaults.db_path),
            analysis_delay: Duration::from_millis(parse_or(
                "ANALYSIS_DELAY_MS",
                &lookup,
                defaults.analysis_delay.as_millis() as u64,
            )),
            signin_delay: Duration::from_millis(parse_or(
                "SIGNIN_DELAY_MS",
                &lookup,
                defaults.signin_delay.as_millis() as u64,
            )),
            content_type_rule: parse_or(
                "ANALYSIS_CONTENT_TYPE",
                &lookup,
                defaults.content_type_rule,
            ),
        }
    }
}

fn parse_or<T: FromStr>(key: &str, lookup: &impl Fn(&str) -> Option<String>, default: T) -> T {
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = raw.as_str(), "ignoring unparseable setting");
            default
        }),
    }
}
