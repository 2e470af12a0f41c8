//! Configuration loading
//!
//! App settings follow a layered YAML chain (explicit path, then the user
//! config dir, then the working directory, then defaults). The LLM
//! credential is resolved separately through the `OAI_CONFIG_LIST`
//! env-or-file convention: the variable either holds the JSON config list
//! itself or names a file containing it.

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::maps::DEFAULT_BASE_URL;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub maps: MapsConfig,
    pub llm: LlmConfig,
    pub agent: AgentConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapsConfig {
    /// Azure Maps host
    pub base_url: String,
    /// Environment variable holding the subscription key
    pub key_env: String,
    /// Category table file; the bundled table is used when unset
    pub categories_file: Option<PathBuf>,
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            key_env: "AZURE_SUBSCRIPTION_KEY".to_string(),
            categories_file: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub base_url: String,
    /// Env var or file name holding the JSON model config list
    pub config_list: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            config_list: "OAI_CONFIG_LIST".to_string(),
            temperature: None,
            max_tokens: None,
            timeout_ms: 120_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Maximum consecutive tool-execution rounds per turn
    pub max_auto_replies: u32,
    /// Override for the built-in system prompt
    pub system_prompt: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_auto_replies: 2,
            system_prompt: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            maps: MapsConfig::default(),
            llm: LlmConfig::default(),
            agent: AgentConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let project_name = env!("CARGO_PKG_NAME");
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// One entry of the model config list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelEndpoint {
    pub model: String,
    pub api_key: String,
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Parse a JSON model config list
pub fn parse_config_list(content: &str) -> Result<Vec<ModelEndpoint>> {
    serde_json::from_str(content).context("Failed to parse model config list")
}

/// Load the model config list from an env variable or a file of that name
///
/// The variable's value is the JSON itself; when the variable is unset, a
/// file with the variable's name is tried. An absent list is not an error
/// (the `OPENAI_API_KEY` fallback may still apply).
pub fn load_config_list(env_or_file: &str) -> Result<Vec<ModelEndpoint>> {
    if let Ok(raw) = env::var(env_or_file) {
        if !raw.trim().is_empty() {
            return parse_config_list(&raw);
        }
    }

    let path = Path::new(env_or_file);
    if path.exists() {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read model config list from {}", path.display()))?;
        return parse_config_list(&content);
    }

    Ok(Vec::new())
}

impl LlmConfig {
    /// Resolve the endpoint to talk to
    ///
    /// The first config-list entry wins; without one, `OPENAI_API_KEY`
    /// pairs with the configured model and base URL.
    pub fn resolve_endpoint(&self) -> Result<ModelEndpoint> {
        let list = load_config_list(&self.config_list)?;
        if let Some(endpoint) = list.into_iter().next() {
            log::info!("Using model '{}' from {}", endpoint.model, self.config_list);
            return Ok(endpoint);
        }

        if let Ok(key) = env::var("OPENAI_API_KEY") {
            if !key.is_empty() {
                return Ok(ModelEndpoint {
                    model: self.model.clone(),
                    api_key: key,
                    base_url: Some(self.base_url.clone()),
                });
            }
        }

        eyre::bail!(
            "no model endpoint configured: set {} or OPENAI_API_KEY",
            self.config_list
        )
    }
}
