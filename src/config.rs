/// Process-wide configuration
///
/// Every fixed URL and tuning knob the binder uses lives here instead of
/// being scattered as literals, so tests can point the client at a local
/// endpoint and the placeholder art can be swapped without touching code.

use std::time::Duration;

/// Scryfall card search endpoint (the query is passed as `?q=`)
const SEARCH_ENDPOINT: &str = "https://api.scryfall.com/cards/search";

/// Classic card back, shown behind slots that have never resolved an image
const CARD_BACK_URL: &str =
    "https://gamesbyjohnny.files.wordpress.com/2009/11/magic-the-gathering-card-back.jpg";

/// Card shown when a lookup fails or a slot is reset with an empty query
const FALLBACK_CARD_URL: &str =
    "https://c1.scryfall.com/file/scryfall-cards/normal/front/5/2/52558748-6893-4c72-a9e2-e87d31796b59.jpg?1559959349";

/// How long one lookup (search plus artwork download) may take
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Immutable settings shared by the whole application
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the card search API
    pub search_endpoint: String,
    /// Image shown while a slot has no committed card
    pub card_back_url: String,
    /// Image shown for reset and failed slots
    pub fallback_card_url: String,
    /// Client-side deadline for a whole lookup
    pub lookup_timeout: Duration,
}

impl Default for Config {
    /// Production values: the real Scryfall endpoint and placeholder art
    fn default() -> Self {
        Self {
            search_endpoint: SEARCH_ENDPOINT.to_string(),
            card_back_url: CARD_BACK_URL.to_string(),
            fallback_card_url: FALLBACK_CARD_URL.to_string(),
            lookup_timeout: LOOKUP_TIMEOUT,
        }
    }
}
