use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::{error::AppError, logging::SensitiveApiKey, models::kea::ManifestDeployment};

/// Environment variables understood by the hosting platform, mapped to config keys.
///
/// These take precedence over the config file and `KEA_RELAY__*` variables.
const PLATFORM_ENV_OVERRIDES: &[(&str, &str)] = &[
    ("AOAI_ENDPOINT", "relay.endpoint"),
    ("AOAI_API_VERSION", "relay.api_version"),
    ("AOAI_API_KEY", "relay.api_key"),
    ("REQUEST_TIMEOUT_MS", "relay.timeout_ms"),
    ("MODEL_MAP", "manifest.model_map"),
    ("RELAY_VERSION", "manifest.version"),
    ("FUNCTIONS_CUSTOMHANDLER_PORT", "server.port"),
];

/// Paths served by the relay router; the metrics endpoint must not shadow them
const RELAY_ROUTES: &[&str] = &[
    "/",
    "/kea",
    "/kea/v1",
    "/kea/v1/chat",
    "/kea/v1/manifest",
    "/kea/manifest",
    "/kea/v1/provider",
    "/health",
    "/ready",
];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub relay: RelayConfig,
    pub manifest: ManifestConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        }
    }
}

/// Upstream Azure OpenAI settings as loaded, before validation
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RelayConfig {
    pub endpoint: String,
    pub api_version: String,
    pub api_key: String,
    pub timeout_ms: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_version: String::new(),
            api_key: String::new(),
            timeout_ms: 60_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ManifestConfig {
    /// JSON object mapping display names to deployment names
    pub model_map: String,
    pub version: String,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            model_map: "{}".to_string(),
            version: "1".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub endpoint: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "/metrics".to_string(),
        }
    }
}

/// Validated upstream settings used for a single forwarded call
#[derive(Clone)]
pub struct UpstreamTarget {
    pub base_url: Url,
    pub api_version: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for UpstreamTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamTarget")
            .field("base_url", &self.base_url.as_str())
            .field("api_version", &self.api_version)
            .field("api_key", &SensitiveApiKey::new(&self.api_key).to_string())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl RelayConfig {
    /// Resolve the relay settings into an upstream target
    ///
    /// Called on every chat request; the snapshot may be swapped by a reload.
    pub fn resolve(&self) -> Result<UpstreamTarget, AppError> {
        let endpoint = self.endpoint.trim().trim_end_matches('/');
        let api_version = self.api_version.trim();
        let api_key = self.api_key.trim();

        let missing: Vec<&str> = [
            ("AOAI_ENDPOINT", endpoint),
            ("AOAI_API_VERSION", api_version),
            ("AOAI_API_KEY", api_key),
        ]
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| *name)
        .collect();

        if !missing.is_empty() {
            return Err(AppError::Config(format!(
                "Server misconfiguration: AOAI_ENDPOINT, AOAI_API_VERSION, and AOAI_API_KEY must be set (missing: {}).",
                missing.join(", ")
            )));
        }

        if self.timeout_ms == 0 {
            return Err(AppError::Config(
                "Server misconfiguration: REQUEST_TIMEOUT_MS must be greater than zero.".to_string(),
            ));
        }

        let base_url = Url::parse(endpoint).map_err(|e| {
            AppError::Config(format!(
                "Server misconfiguration: AOAI_ENDPOINT is not a valid URL ({}).",
                e
            ))
        })?;

        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(
                "Server misconfiguration: AOAI_ENDPOINT must be an http(s) base URL.".to_string(),
            ));
        }

        Ok(UpstreamTarget {
            base_url,
            api_version: api_version.to_string(),
            api_key: api_key.to_string(),
            timeout: Duration::from_millis(self.timeout_ms),
        })
    }
}

impl ManifestConfig {
    /// Deployments derived from the model map, sorted by display name
    pub fn deployments(&self) -> Result<Vec<ManifestDeployment>, AppError> {
        let raw = self.model_map.trim();
        let raw = if raw.is_empty() { "{}" } else { raw };

        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(raw)
            .map_err(|e| {
                AppError::Config(format!("MODEL_MAP must be a JSON object: {}", e))
            })?;

        let mut deployments = map
            .into_iter()
            .map(|(display_name, value)| match value {
                serde_json::Value::String(deployment_name) => Ok(ManifestDeployment {
                    display_name,
                    deployment_name,
                }),
                _ => Err(AppError::Config(format!(
                    "MODEL_MAP entry '{}' must map to a deployment name string",
                    display_name
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        deployments.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        Ok(deployments)
    }
}

/// Load configuration from defaults, an optional file and the environment
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    load_config_with(path, |name| std::env::var(name).ok())
}

fn load_config_with<F>(path: &Path, lookup: F) -> anyhow::Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let mut builder = config::Config::builder()
        .add_source(config::Config::try_from(&Config::default())?)
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix("KEA_RELAY").separator("__"));

    for (var, key) in PLATFORM_ENV_OVERRIDES {
        let value = lookup(var).filter(|v| !v.trim().is_empty());
        builder = builder.set_override_option(*key, value)?;
    }

    let cfg: Config = builder.build()?.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

/// Structural validation run at start-up and on reload
///
/// Missing upstream credentials are not checked here; they are reported per
/// request by [`RelayConfig::resolve`].
pub fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    if cfg.server.host.trim().is_empty() {
        anyhow::bail!("Server host cannot be empty");
    }

    if cfg.server.port == 0 {
        anyhow::bail!("Server port must be greater than zero");
    }

    match cfg.server.log_format.as_str() {
        "text" | "json" => {}
        other => anyhow::bail!("Invalid log format '{}': expected 'text' or 'json'", other),
    }

    if cfg.metrics.enabled {
        if !cfg.metrics.endpoint.starts_with('/') {
            anyhow::bail!("Metrics endpoint must start with '/'");
        }
        if RELAY_ROUTES.contains(&cfg.metrics.endpoint.as_str()) {
            anyhow::bail!(
                "Metrics endpoint '{}' collides with a relay route",
                cfg.metrics.endpoint
            );
        }
    }

    Ok(())
}
