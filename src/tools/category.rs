//! restaurant_category tool - category table lookup

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::categories::CategoryTable;
use crate::error::Result;

use super::{require_str, Tool};

/// Sentinel string the assistant sees on a lookup miss
const NOT_FOUND: &str = "Category not found";

/// Looks up a restaurant category id by fuzzy name
pub struct RestaurantCategoryTool {
    table: Arc<CategoryTable>,
}

impl RestaurantCategoryTool {
    pub fn new(table: Arc<CategoryTable>) -> Self {
        Self { table }
    }
}

#[async_trait]
impl Tool for RestaurantCategoryTool {
    fn name(&self) -> &'static str {
        "restaurant_category"
    }

    fn description(&self) -> &'static str {
        "Restaurant Category Assistant. Finds the category id for a type of restaurant, e.g. 'pizza' or 'sushi'."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "category": {
                    "type": "string",
                    "description": "Type of restaurant to look up"
                }
            },
            "required": ["category"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String> {
        let category = require_str(&args, "category")?;
        match self.table.find(category) {
            Some(record) => Ok(serde_json::to_string_pretty(record)?),
            None => Ok(NOT_FOUND.to_string()),
        }
    }
}
