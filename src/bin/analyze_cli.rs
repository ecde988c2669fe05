use anyhow::{bail, Result};
use media_analytics::{
    analysis::{respond, StaticAnalysisProvider},
    config::AppConfig,
};

/// Runs one text through platform detection and prints the system reply as JSON.
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let text = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if text.trim().is_empty() {
        bail!("usage: analyze_cli <text or social media link>");
    }

    let config = AppConfig::from_env();
    let provider = StaticAnalysisProvider::new(config.content_type_rule);
    let reply = respond(&provider, "cli", &text).await?;

    println!("{}", serde_json::to_string_pretty(&reply)?);
    Ok(())
}
