//! Static restaurant category table
//!
//! Loads the Azure Maps restaurant category records once at startup and
//! answers fuzzy name lookups. The table is read-only for the lifetime of
//! the process; a lookup miss is a normal value, not an error.

use std::fs;
use std::path::Path;

use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Category table shipped with the binary, used when no file is configured
const BUNDLED: &str = include_str!("../data/restaurant_categories.json");

/// One record of the category table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: u32,
    pub category_name: String,
}

/// Ordered, immutable category table
#[derive(Debug, Clone)]
pub struct CategoryTable {
    entries: Vec<Category>,
}

impl CategoryTable {
    /// Build a table from already-parsed records
    pub fn new(entries: Vec<Category>) -> Self {
        Self { entries }
    }

    /// Load the table from a JSON array file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let entries: Vec<Category> = serde_json::from_str(&content)?;
        log::info!(
            "Loaded {} restaurant categories from {}",
            entries.len(),
            path.as_ref().display()
        );
        Ok(Self { entries })
    }

    /// Load the table packaged into the binary
    pub fn bundled() -> Result<Self> {
        let entries: Vec<Category> = serde_json::from_str(BUNDLED)?;
        Ok(Self { entries })
    }

    /// Find the first category whose name matches `query`
    ///
    /// The query is treated as a case-insensitive regex searched anywhere in
    /// the category name, so a plain word behaves as a substring match. The
    /// scan runs in file order and the first hit wins. A query that is not
    /// valid regex syntax is a failed match, never an error.
    pub fn find(&self, query: &str) -> Option<&Category> {
        let pattern = RegexBuilder::new(query).case_insensitive(true).build().ok()?;
        self.entries.iter().find(|category| pattern.is_match(&category.category_name))
    }

    /// Get the number of categories
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all categories in file order
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.entries.iter()
    }
}
