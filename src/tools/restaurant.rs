//! restaurant tool - nearby POI search by category

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::maps::{Coordinate, MapsClient};

use super::{category_id_arg, require_f64, Tool};

/// Lists restaurants of one category around a position
pub struct RestaurantTool {
    maps: Arc<MapsClient>,
}

impl RestaurantTool {
    pub fn new(maps: Arc<MapsClient>) -> Self {
        Self { maps }
    }
}

#[async_trait]
impl Tool for RestaurantTool {
    fn name(&self) -> &'static str {
        "restaurant"
    }

    fn description(&self) -> &'static str {
        "Restaurant assistant. Lists restaurants of the given category near a latitude/longitude position."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "latitude": {
                    "type": "number",
                    "description": "Latitude of the search center"
                },
                "longitude": {
                    "type": "number",
                    "description": "Longitude of the search center"
                },
                "category_id": {
                    "type": "string",
                    "description": "Restaurant category id from the restaurant_category tool"
                }
            },
            "required": ["latitude", "longitude", "category_id"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String> {
        let latitude = require_f64(&args, "latitude")?;
        let longitude = require_f64(&args, "longitude")?;
        let category_id = category_id_arg(&args, "category_id")?;

        let position = Coordinate::new(latitude, longitude);
        let document = self.maps.nearby_search(position, &category_id).await?;
        Ok(serde_json::to_string_pretty(&document)?)
    }
}
