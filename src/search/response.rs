/// Scryfall search response model
///
/// Only the fields the binder actually reads are modeled; the real card
/// objects carry dozens more, which serde ignores during deserialization.
/// Double-faced cards have no top-level image set, only per-face ones.

use serde::Deserialize;

/// Body of a successful `GET /cards/search` response
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResults {
    /// Matching cards, best match first; defaults to empty if absent
    #[serde(default)]
    pub data: Vec<Card>,
}

/// One card entry from the result list
#[derive(Debug, Clone, Deserialize)]
pub struct Card {
    /// Display name of the card
    #[serde(default)]
    pub name: String,
    /// Image set for single-faced cards
    pub image_uris: Option<ImageUris>,
    /// Faces of a double-faced card, each with its own image set
    pub card_faces: Option<Vec<CardFace>>,
}

/// One face of a double-faced card
#[derive(Debug, Clone, Deserialize)]
pub struct CardFace {
    pub image_uris: Option<ImageUris>,
}

/// The image variants Scryfall serves per face
#[derive(Debug, Clone, Deserialize)]
pub struct ImageUris {
    /// The "normal" resolution variant, the one the binder displays
    pub normal: String,
}

impl Card {
    /// Pick the display image for this card
    ///
    /// Prefers the top-level image set; double-faced cards fall back to
    /// the front face. Returns None when neither carries an image.
    pub fn image_url(&self) -> Option<&str> {
        if let Some(uris) = &self.image_uris {
            return Some(uris.normal.as_str());
        }
        self.card_faces
            .as_ref()?
            .first()?
            .image_uris
            .as_ref()
            .map(|uris| uris.normal.as_str())
    }
}
