//! bistro - a restaurant recommendation agent
//!
//! Wires an LLM conversation loop to four Azure Maps tools (geocoding,
//! nearby restaurant search, category lookup, travel distance) behind a
//! terminal REPL and a browser chat page.

pub mod agent;
pub mod categories;
pub mod config;
pub mod context;
pub mod error;
pub mod llm;
pub mod maps;
pub mod repl;
pub mod server;
pub mod tools;

pub use error::{BistroError, Result};
