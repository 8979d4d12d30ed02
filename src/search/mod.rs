/// Scryfall search integration
///
/// This module owns everything network-facing:
/// - Response deserialization and image URL derivation (response.rs)
/// - The HTTP client, lookup pipeline, and error taxonomy (client.rs)

pub mod client;
pub mod response;

pub use client::{LookupError, ResolvedCard, SearchClient};
