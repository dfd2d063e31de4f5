use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Environment variable that overrides `github.access_token`.
pub const ACCESS_TOKEN_ENV: &str = "QAPI_ACCESS_TOKEN";

/// Process-wide settings loaded from `.qapi.yaml`. Read-only once loaded.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QapiConfig {
    /// Value of the document's `host` field.
    pub server_name: String,
    pub schemes: Vec<String>,
    /// SPARQL endpoint used when a query declares none.
    pub default_endpoint: String,
    /// Output MIME types every operation advertises.
    pub produces: Vec<String>,
    /// Decorator keys copied verbatim onto specification items.
    pub extra_metadata: Vec<String>,
    pub on_conflict: ConflictPolicy,
    pub github: GithubConfig,
}

impl Default for QapiConfig {
    fn default() -> Self {
        Self {
            server_name: "localhost:8088".to_string(),
            schemes: vec!["http".to_string()],
            default_endpoint: "http://dbpedia.org/sparql".to_string(),
            produces: vec![
                "text/csv".to_string(),
                "application/json".to_string(),
                "text/html".to_string(),
            ],
            extra_metadata: Vec::new(),
            on_conflict: ConflictPolicy::Error,
            github: GithubConfig::default(),
        }
    }
}

/// What to do when two query files derive the same call name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Abort the build.
    #[default]
    Error,
    /// Keep the later file's operation, replacing the earlier one.
    LastWins,
}

/// Hosting platform settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub api_base_url: String,
    /// Raw file base URL; also the base of the license link.
    pub raw_base_url: String,
    pub access_token: Option<String>,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.github.com/".to_string(),
            raw_base_url: "https://raw.githubusercontent.com/".to_string(),
            access_token: None,
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".qapi.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<QapiConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: QapiConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

impl QapiConfig {
    /// Apply environment overrides. Only the access token can be overridden.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(token) = std::env::var(ACCESS_TOKEN_ENV) {
            if !token.is_empty() {
                self.github.access_token = Some(token);
            }
        }
        self
    }
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# qapi configuration
server_name: localhost:8088
schemes: [http]

# Used when a query has no `endpoint` decorator and the source has no endpoint.txt
default_endpoint: http://dbpedia.org/sparql

produces:
  - text/csv
  - application/json
  - text/html

# Decorator keys copied onto every specification item
extra_metadata: []

on_conflict: error    # error | last_wins

github:
  api_base_url: https://api.github.com/
  raw_base_url: https://raw.githubusercontent.com/
  # access_token: ghp_...   (or set QAPI_ACCESS_TOKEN)
"#
}
