//! Provider layer for Modelmux — routing, payload shaping, and normalization.
//!
//! # Architecture
//!
//! - [`registry`] — resolves a task kind + model name to one provider target
//! - [`payload`] — pure per-kind builders for the outbound request body
//! - [`normalize`] — extracts the canonical result from each provider's schema
//! - [`similarity`] — cosine-similarity scoring over embedding pairs
//! - [`client::ProviderClient`] — ties the above into one round-trip per request

pub mod client;
pub mod normalize;
pub mod payload;
pub mod registry;
pub mod similarity;

// Re-export main types for convenience
pub use client::ProviderClient;
pub use registry::{resolve, Provider, ProviderTarget};
