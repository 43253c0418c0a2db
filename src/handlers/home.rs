use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse},
};

use crate::{config::Config, handlers::chat::AppState, handlers::manifest::PROVIDER_ID};

const RESOURCE_NAME: &str = "Azure OpenAI";

/// Handle GET /, /kea and /kea/v1
/// Human-readable status page; never shows secrets
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let config = state.config.load();

    (
        [(header::CACHE_CONTROL, "no-store")],
        Html(render_home_html(&config)),
    )
}

/// Number of keys in MODEL_MAP, whatever their values; 0 unless it is a JSON object
fn model_map_entries(model_map: &str) -> usize {
    serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(model_map)
        .map(|map| map.len())
        .unwrap_or(0)
}

fn render_home_html(config: &Config) -> String {
    let version = escape_html(&config.manifest.version);
    let has_endpoint = !config.relay.endpoint.trim().is_empty();
    let has_api_key = !config.relay.api_key.trim().is_empty();
    let api_version = match config.relay.api_version.trim() {
        "" => "(unset)".to_string(),
        value => escape_html(value),
    };
    let model_count = model_map_entries(&config.manifest.model_map);

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Exchange Relay · {provider_id}</title>
<meta name="viewport" content="width=device-width, initial-scale=1" />
<style>
  :root {{ color-scheme: light dark; }}
  body {{ font-family: ui-sans-serif, system-ui, -apple-system, Segoe UI, Roboto, Helvetica, Arial, sans-serif; margin: 2rem; line-height: 1.5; }}
  .card {{ border: 1px solid #9993; border-radius: 12px; padding: 1rem 1.25rem; max-width: 860px; box-shadow: 0 1px 8px #0001; }}
  h1 {{ margin: 0 0 .25rem 0; font-size: 1.4rem; }}
  code, pre {{ font-family: ui-monospace, SFMono-Regular, Menlo, Consolas, "Liberation Mono", monospace; }}
  pre {{ background: #0000000d; padding: .75rem; border-radius: 8px; overflow-x: auto; }}
  .grid {{ display: grid; gap: .5rem 1rem; grid-template-columns: 11rem 1fr; }}
  a {{ text-decoration: none; }}
</style>
</head>
<body>
  <div class="card">
    <h1>Exchange Relay</h1>
    <div>Resource: <strong>{resource}</strong> · Version: <strong>{version}</strong></div>
    <p>This relay exposes minimal endpoints for Kea. Try the links below.</p>

    <h2>Useful links</h2>
    <ul>
      <li><a href="/kea/v1/provider">/kea/v1/provider</a> – provider info</li>
      <li><a href="/kea/v1/manifest">/kea/v1/manifest</a> – deployments (displayName → deploymentName)</li>
      <li><code>POST /kea/v1/chat</code> – chat completions (see curl example)</li>
    </ul>

    <h2>Status (no secrets shown)</h2>
    <div class="grid">
      <div>Endpoint set:</div><div>{has_endpoint}</div>
      <div>API version:</div><div>{api_version}</div>
      <div>API key set:</div><div>{has_api_key}</div>
      <div>MODEL_MAP entries:</div><div>{model_count}</div>
    </div>

    <h2>curl example</h2>
    <pre>curl -s -X POST http(s)://&lt;host&gt;/kea/v1/chat \
  -H "Content-Type: application/json" \
  -d '{{ "model":"&lt;deploymentName&gt;", "max_tokens":128,
        "messages":[{{"role":"user","content":"Hello from Kea"}}] }}'</pre>
  </div>
</body>
</html>"#,
        provider_id = PROVIDER_ID,
        resource = RESOURCE_NAME,
        version = version,
        has_endpoint = yes_no(has_endpoint),
        api_version = api_version,
        has_api_key = yes_no(has_api_key),
        model_count = model_count,
    )
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_reports_unset_configuration() {
        let html = render_home_html(&Config::default());
        assert!(html.contains("<div>Endpoint set:</div><div>no</div>"));
        assert!(html.contains("<div>API version:</div><div>(unset)</div>"));
        assert!(html.contains("<div>API key set:</div><div>no</div>"));
        assert!(html.contains("<div>MODEL_MAP entries:</div><div>0</div>"));
    }

    #[test]
    fn test_home_never_shows_api_key() {
        let mut config = Config::default();
        config.relay.endpoint = "https://kea.openai.azure.com".to_string();
        config.relay.api_version = "2024-06-01".to_string();
        config.relay.api_key = "super-secret-key".to_string();
        config.manifest.model_map = r#"{"a":"b","c":"d"}"#.to_string();

        let html = render_home_html(&config);
        assert!(!html.contains("super-secret-key"));
        assert!(html.contains("<div>API key set:</div><div>yes</div>"));
        assert!(html.contains("<div>API version:</div><div>2024-06-01</div>"));
        assert!(html.contains("<div>MODEL_MAP entries:</div><div>2</div>"));
    }

    #[test]
    fn test_model_map_count_ignores_value_types() {
        let mut config = Config::default();
        config.manifest.model_map = r#"{"a":"b","c":3,"d":null}"#.to_string();

        let html = render_home_html(&config);
        assert!(html.contains("<div>MODEL_MAP entries:</div><div>3</div>"));
        assert_eq!(model_map_entries("[1,2]"), 0);
        assert_eq!(model_map_entries("not json"), 0);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>&\"</b>"), "&lt;b&gt;&amp;&quot;&lt;/b&gt;");
    }
}
