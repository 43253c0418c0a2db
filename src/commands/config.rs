use anyhow::Result;
use colored::Colorize;
use kea_relay::config::{self, Config};
use kea_relay::logging::SensitiveApiKey;
use std::path::Path;
use tracing::info;

/// Execute the config show command
///
/// Displays the effective configuration with the upstream key masked
pub fn show(config_path: &Path) -> Result<()> {
    println!("{}", "Loading configuration...".yellow());
    info!("Loading configuration for display");

    let cfg = config::load_config(config_path)?;
    let sanitized = sanitize_secrets(&cfg);

    println!("{}", "Current Configuration:".green().bold());
    println!();

    let toml_string = toml::to_string_pretty(&sanitized)?;
    println!("{}", toml_string);

    Ok(())
}

/// Mask secrets in configuration for safe display
fn sanitize_secrets(cfg: &Config) -> Config {
    let mut sanitized = cfg.clone();
    sanitized.relay.api_key = SensitiveApiKey::new(&cfg.relay.api_key).to_string();
    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_secrets() {
        let mut cfg = Config::default();
        cfg.relay.api_key = "0123456789abcdef0123".to_string();
        cfg.relay.endpoint = "https://kea.openai.azure.com".to_string();

        let sanitized = sanitize_secrets(&cfg);
        assert_eq!(sanitized.relay.api_key, "0123...0123");
        assert_eq!(sanitized.relay.endpoint, cfg.relay.endpoint);
    }

    #[test]
    fn test_sanitized_config_serializes_to_toml() {
        let mut cfg = Config::default();
        cfg.relay.api_key = "0123456789abcdef0123".to_string();

        let toml_string = toml::to_string_pretty(&sanitize_secrets(&cfg)).unwrap();
        assert!(toml_string.contains("[relay]"));
        assert!(!toml_string.contains("0123456789abcdef0123"));
    }
}
