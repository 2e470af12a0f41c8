//! geolocation tool - resolve a free-text address query

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::maps::MapsClient;

use super::{require_str, Tool};

/// Resolves addresses and place names to coordinates via geocoding
pub struct GeolocationTool {
    maps: Arc<MapsClient>,
}

impl GeolocationTool {
    pub fn new(maps: Arc<MapsClient>) -> Self {
        Self { maps }
    }
}

#[async_trait]
impl Tool for GeolocationTool {
    fn name(&self) -> &'static str {
        "geolocation"
    }

    fn description(&self) -> &'static str {
        "Geolocation assistant. Resolves a free-text address or place name to address candidates with coordinates."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Address or place name to resolve, e.g. 'Haarlem, Netherlands'"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String> {
        let query = require_str(&args, "query")?;
        let document = self.maps.geocode(query).await?;
        Ok(serde_json::to_string_pretty(&document)?)
    }
}
