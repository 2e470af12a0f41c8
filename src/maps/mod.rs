//! Azure Maps client layer
//!
//! Thin wrappers around the geocoding, nearby-search, and route-matrix
//! endpoints. Every call is a single shot: no retries, no backoff, no
//! caching. Results are opaque JSON documents returned verbatim.

pub mod client;

pub use client::{Coordinate, MapsClient, DEFAULT_BASE_URL};
