//! Application context
//!
//! Everything the front ends share, constructed once at process start and
//! passed down explicitly: configuration, the category table, the maps
//! client, and the LLM client. Tool registration happens per agent so each
//! chat session gets a fresh registry.

use std::sync::Arc;
use std::time::Duration;

use eyre::{Context, Result};

use crate::agent::{AgentOptions, AgentRunner, DEFAULT_SYSTEM_PROMPT};
use crate::categories::CategoryTable;
use crate::config::Config;
use crate::llm::{LlmClient, OpenAiClient, OpenAiConfig};
use crate::maps::MapsClient;
use crate::tools::{
    GeolocationTool, RestaurantCategoryTool, RestaurantDistanceTool, RestaurantTool, ToolRegistry,
};

/// Shared process-wide state
pub struct AppContext {
    pub config: Config,
    pub categories: Arc<CategoryTable>,
    pub maps: Arc<MapsClient>,
    pub llm: Arc<dyn LlmClient>,
}

impl AppContext {
    /// Build the context from loaded configuration
    ///
    /// Fails fast on a missing maps subscription key or LLM credential,
    /// before any front end starts.
    pub fn initialize(config: Config) -> Result<Self> {
        let categories = match &config.maps.categories_file {
            Some(path) => CategoryTable::load(path)
                .context(format!("Failed to load category table from {}", path.display()))?,
            None => CategoryTable::bundled().context("Failed to parse the bundled category table")?,
        };

        let maps = MapsClient::from_env(config.maps.base_url.as_str(), &config.maps.key_env)
            .context("Failed to create the maps client")?;

        let endpoint = config.llm.resolve_endpoint()?;
        let llm_config = OpenAiConfig {
            model: endpoint.model.clone(),
            base_url: endpoint
                .base_url
                .clone()
                .unwrap_or_else(|| config.llm.base_url.clone()),
            temperature: config.llm.temperature,
            max_tokens: config.llm.max_tokens,
            timeout: Duration::from_millis(config.llm.timeout_ms),
        };
        let llm = OpenAiClient::new(endpoint.api_key, llm_config)
            .context("Failed to create the LLM client")?;

        log::info!("Context ready: model={}, {} categories", llm.model(), categories.len());

        Ok(Self {
            config,
            categories: Arc::new(categories),
            maps: Arc::new(maps),
            llm: Arc::new(llm),
        })
    }

    /// Register the four assistant tools into a fresh registry
    pub fn build_registry(&self) -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(GeolocationTool::new(self.maps.clone())));
        registry.register(Arc::new(RestaurantTool::new(self.maps.clone())));
        registry.register(Arc::new(RestaurantCategoryTool::new(self.categories.clone())));
        registry.register(Arc::new(RestaurantDistanceTool::new(self.maps.clone())));
        registry
    }

    /// Build an agent with a freshly registered tool set
    pub fn build_agent(&self) -> AgentRunner {
        let options = AgentOptions {
            system_prompt: self
                .config
                .agent
                .system_prompt
                .clone()
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            max_auto_replies: self.config.agent.max_auto_replies,
            temperature: self.config.llm.temperature,
            max_tokens: self.config.llm.max_tokens,
        };
        AgentRunner::new(self.llm.clone(), self.build_registry(), options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlmClient;

    fn test_context() -> AppContext {
        AppContext {
            config: Config::default(),
            categories: Arc::new(CategoryTable::bundled().unwrap()),
            maps: Arc::new(MapsClient::with_key("https://example.test", "key").unwrap()),
            llm: Arc::new(MockLlmClient::new(Vec::new())),
        }
    }

    #[test]
    fn test_build_registry_registers_all_four_tools() {
        let ctx = test_context();
        let registry = ctx.build_registry();

        assert_eq!(registry.len(), 4);
        for name in ["geolocation", "restaurant", "restaurant_category", "restaurant_distance"] {
            assert!(registry.contains(name), "missing tool {name}");
        }
    }

    #[test]
    fn test_registry_rebuild_is_idempotent() {
        let ctx = test_context();
        // Rebuilding per session re-registers the same names; the count
        // stays stable
        let first = ctx.build_registry();
        let second = ctx.build_registry();
        assert_eq!(first.len(), second.len());
    }

    #[test]
    fn test_build_agent_uses_default_prompt() {
        let ctx = test_context();
        let agent = ctx.build_agent();
        assert_eq!(agent.model(), "mock-model");
        assert_eq!(agent.tool_names().len(), 4);
    }
}
