/// Scryfall lookup client
///
/// One lookup is a small pipeline: search request, exact-200 status check,
/// response parse, image URL derivation, artwork byte download. The whole
/// pipeline runs under a single client-side deadline so a slot can never
/// hang in its searching state.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

use super::response::SearchResults;
use crate::config::Config;

/// A successfully resolved card, ready for a slot to display
#[derive(Debug, Clone)]
pub struct ResolvedCard {
    /// Display name, used for the status line
    pub name: String,
    /// The "normal" resolution image URL the search settled on
    pub image_url: String,
    /// Encoded image bytes downloaded from that URL
    pub artwork: Vec<u8>,
}

/// Everything that can go wrong during one lookup
///
/// Clone because completions travel inside UI messages; transport errors
/// are captured as strings since reqwest's error type is not cloneable.
#[derive(Debug, Clone, Error)]
pub enum LookupError {
    #[error("search returned HTTP {0}")]
    Status(u16),
    #[error("no card matched the query")]
    NoResults,
    #[error("card has no image to display")]
    MissingImage,
    #[error("lookup timed out")]
    TimedOut,
    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            LookupError::TimedOut
        } else {
            LookupError::Request(error.to_string())
        }
    }
}

/// Shared HTTP client for card searches and artwork downloads
///
/// Cheap to clone (reqwest clients are handles over a shared pool), so
/// each background lookup task carries its own copy.
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl SearchClient {
    /// Build a client against the configured endpoint
    pub fn new(config: &Config) -> Self {
        // Scryfall asks API consumers to identify themselves
        let http = reqwest::Client::builder()
            .user_agent(concat!("card-binder/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to construct the HTTP client");

        Self {
            http,
            endpoint: config.search_endpoint.clone(),
            timeout: config.lookup_timeout,
        }
    }

    /// Resolve a query to a card image, artwork bytes included
    ///
    /// The search and the artwork download share one deadline.
    pub async fn find_card(&self, query: &str) -> Result<ResolvedCard, LookupError> {
        tokio::time::timeout(self.timeout, self.resolve(query))
            .await
            .map_err(|_| LookupError::TimedOut)?
    }

    /// Download one image, under the same deadline as a lookup
    ///
    /// Also used at startup for the card back and fallback card.
    pub async fn fetch_artwork(&self, url: &str) -> Result<Vec<u8>, LookupError> {
        tokio::time::timeout(self.timeout, self.download(url))
            .await
            .map_err(|_| LookupError::TimedOut)?
    }

    async fn resolve(&self, query: &str) -> Result<ResolvedCard, LookupError> {
        // .query() takes care of URL-encoding the user's text
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("q", query)])
            .send()
            .await?;

        // Anything but a plain 200 counts as a failed lookup, body ignored
        if response.status() != StatusCode::OK {
            return Err(LookupError::Status(response.status().as_u16()));
        }

        let results: SearchResults = response.json().await?;
        let (name, image_url) = choose_card(results)?;

        println!("🃏 Matched \"{}\" -> {}", name, image_url);

        let artwork = self.download(&image_url).await?;
        Ok(ResolvedCard {
            name,
            image_url,
            artwork,
        })
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, LookupError> {
        let response = self.http.get(url).send().await?;
        if response.status() != StatusCode::OK {
            return Err(LookupError::Status(response.status().as_u16()));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// Pick the display card out of a search response
///
/// The first match wins. A response with no matches, or a match carrying
/// no image at all, fails the lookup here so a slot is never handed a
/// card it cannot show.
fn choose_card(results: SearchResults) -> Result<(String, String), LookupError> {
    let card = results.data.into_iter().next().ok_or(LookupError::NoResults)?;
    let image_url = card
        .image_url()
        .ok_or(LookupError::MissingImage)?
        .to_string();
    Ok((card.name, image_url))
}
