//! restaurant_distance tool - travel distance between two positions

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::maps::{Coordinate, MapsClient};

use super::{require_f64, Tool};

/// Computes travel distance/time between an origin and a destination
pub struct RestaurantDistanceTool {
    maps: Arc<MapsClient>,
}

impl RestaurantDistanceTool {
    pub fn new(maps: Arc<MapsClient>) -> Self {
        Self { maps }
    }
}

#[async_trait]
impl Tool for RestaurantDistanceTool {
    fn name(&self) -> &'static str {
        "restaurant_distance"
    }

    fn description(&self) -> &'static str {
        "Distance Assistant. Computes travel distance and time between an origin and a destination position."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "origin_latitude": {
                    "type": "number",
                    "description": "Latitude of the origin"
                },
                "origin_longitude": {
                    "type": "number",
                    "description": "Longitude of the origin"
                },
                "destination_latitude": {
                    "type": "number",
                    "description": "Latitude of the destination"
                },
                "destination_longitude": {
                    "type": "number",
                    "description": "Longitude of the destination"
                }
            },
            "required": [
                "origin_latitude",
                "origin_longitude",
                "destination_latitude",
                "destination_longitude"
            ]
        })
    }

    async fn execute(&self, args: Value) -> Result<String> {
        let origin = Coordinate::new(
            require_f64(&args, "origin_latitude")?,
            require_f64(&args, "origin_longitude")?,
        );
        let destination = Coordinate::new(
            require_f64(&args, "destination_latitude")?,
            require_f64(&args, "destination_longitude")?,
        );

        let document = self.maps.route_matrix(origin, destination).await?;
        Ok(serde_json::to_string_pretty(&document)?)
    }
}
