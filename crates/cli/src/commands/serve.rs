//! `tutorly serve` — Start the web UI and HTTP API.

use std::path::Path;
use tutorly_config::AppConfig;

pub async fn run(
    config_path: Option<&Path>,
    port_override: Option<u16>,
    host_override: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config =
        AppConfig::load_with(config_path).map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }
    if let Some(host) = host_override {
        config.gateway.host = host;
    }
    config.validate()?;

    // Refuse to start without a credential.
    config.require_api_key()?;
    tracing::debug!(?config, "Configuration loaded");

    println!("🎓 Tutorly");
    println!("   Open:     http://{}:{}/", config.gateway.host, config.gateway.port);
    println!("   Provider: {} ({})", config.provider, config.model);

    tutorly_gateway::start(config).await?;

    Ok(())
}
