//! Type definitions for catalog records.
//!
//! Field names on the wire are camelCase, matching the REST surface and the
//! JSON blob kept in the local persistence slot.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Artist credited when a record does not name one.
pub const GALLERY_ARTIST: &str = "Benard Mugambi";

/// Closed set of artwork categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtCategory {
    #[serde(rename = "Painting")]
    Painting,
    #[serde(rename = "Pencil Work")]
    PencilWork,
}

impl ArtCategory {
    /// Wire name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtCategory::Painting => "Painting",
            ArtCategory::PencilWork => "Pencil Work",
        }
    }
}

impl fmt::Display for ArtCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtCategory {
    type Err = String;

    /// Accepts the wire name as well as the enum-style spellings
    /// (`PAINTING`, `PENCIL`, `PENCIL_WORK`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "painting" => Ok(ArtCategory::Painting),
            "pencil work" | "pencil" => Ok(ArtCategory::PencilWork),
            _ => Err(s.to_string()),
        }
    }
}

/// A catalog entry as held by a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artwork {
    /// Application-level identity; never reassigned after creation.
    pub id: String,
    pub title: String,
    #[serde(default = "default_artist")]
    pub artist: String,
    pub category: ArtCategory,
    pub price: f64,
    pub dimensions: String,
    pub year: i32,
    #[serde(default)]
    pub description: String,
    /// External URL or a `data:image/...` URI carrying the image bytes.
    pub image_url: String,
    #[serde(default = "default_available")]
    pub available: bool,
    /// Assigned by the remote service only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_artist() -> String {
    GALLERY_ARTIST.to_string()
}

fn default_available() -> bool {
    true
}

impl Artwork {
    /// Applies a validated partial update. `id` and `created_at` are never touched.
    pub fn apply(&mut self, patch: &ArtworkPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(artist) = &patch.artist {
            self.artist = artist.clone();
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(dimensions) = &patch.dimensions {
            self.dimensions = dimensions.clone();
        }
        if let Some(year) = patch.year {
            self.year = year;
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(image_url) = &patch.image_url {
            self.image_url = image_url.clone();
        }
        if let Some(available) = patch.available {
            self.available = available;
        }
    }

    /// Returns a candidate carrying every field of this record, including its id.
    ///
    /// Used by editors that load a record, change some fields, and hand it
    /// back for saving.
    pub fn to_draft(&self) -> ArtworkDraft {
        ArtworkDraft {
            id: Some(self.id.clone()),
            title: Some(self.title.clone()),
            artist: Some(self.artist.clone()),
            category: Some(self.category.as_str().to_string()),
            price: Some(self.price),
            dimensions: Some(self.dimensions.clone()),
            year: Some(self.year),
            description: Some(self.description.clone()),
            image_url: Some(self.image_url.clone()),
            available: Some(self.available),
        }
    }
}

/// Unvalidated candidate as submitted by a caller.
///
/// Every field is optional so that the same shape serves create bodies and
/// partial update bodies. `id` is only read by callers deciding between
/// create and update; validation never carries it into a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
}

/// Validated fields for a record that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArtwork {
    pub title: String,
    pub artist: String,
    pub category: ArtCategory,
    pub price: f64,
    pub dimensions: String,
    pub year: i32,
    pub description: String,
    pub image_url: String,
    pub available: bool,
}

impl NewArtwork {
    /// Attaches identity (and, for the remote service, a creation time).
    pub fn into_artwork(self, id: String, created_at: Option<DateTime<Utc>>) -> Artwork {
        Artwork {
            id,
            title: self.title,
            artist: self.artist,
            category: self.category,
            price: self.price,
            dimensions: self.dimensions,
            year: self.year,
            description: self.description,
            image_url: self.image_url,
            available: self.available,
            created_at,
        }
    }
}

/// Validated partial update. Absent fields are left unchanged.
///
/// Has no `id` field; identity cannot be patched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ArtCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
}

impl ArtworkPatch {
    pub fn is_empty(&self) -> bool {
        *self == ArtworkPatch::default()
    }

    /// JSON object holding only the supplied fields, in wire naming.
    pub fn to_document(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({}))
    }
}
