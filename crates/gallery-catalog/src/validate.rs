//! Write-time validation of artwork candidates.

use chrono::{Datelike, Utc};

use crate::model::{ArtCategory, ArtworkDraft, ArtworkPatch, NewArtwork, GALLERY_ARTIST};

/// Maximum accepted length of `imageUrl` (10MB, the transport payload cap).
pub const MAX_IMAGE_URL_LEN: usize = 10 * 1024 * 1024;

/// Earliest creation year accepted for a physical artwork.
pub const MIN_YEAR: i32 = 1000;

/// Prefix of an embedded image.
pub const DATA_IMAGE_PREFIX: &str = "data:image/";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Field must not be empty: {0}")]
    EmptyField(&'static str),

    #[error("Invalid category: '{0}' (expected one of: Painting, Pencil Work)")]
    InvalidCategory(String),

    #[error("Invalid price: {0} (must be a non-negative number)")]
    InvalidPrice(f64),

    #[error("Invalid year: {year} (expected {min}..={max})")]
    YearOutOfRange { year: i32, min: i32, max: i32 },

    #[error("Invalid imageUrl: must be an http(s) URL, a site path, or a data:image/ URI")]
    InvalidImageUrl,

    #[error("imageUrl exceeds maximum size: {len} bytes (max: {max} bytes)")]
    ImageTooLarge { len: usize, max: usize },
}

/// Validates a create candidate, filling defaults for `artist`,
/// `description` and `available`. Any `id` on the draft is ignored.
pub fn validate(draft: ArtworkDraft) -> Result<NewArtwork, ValidationError> {
    let title = required_text(draft.title, "title")?;
    let category = parse_category(draft.category.ok_or(ValidationError::MissingField("category"))?)?;
    let price = check_price(draft.price.ok_or(ValidationError::MissingField("price"))?)?;
    let year = check_year(draft.year.ok_or(ValidationError::MissingField("year"))?)?;
    let dimensions = required_text(draft.dimensions, "dimensions")?;
    let image_url = check_image_url(draft.image_url.ok_or(ValidationError::MissingField("imageUrl"))?)?;

    let artist = match draft.artist {
        Some(artist) => non_empty(artist, "artist")?,
        None => GALLERY_ARTIST.to_string(),
    };

    Ok(NewArtwork {
        title,
        artist,
        category,
        price,
        dimensions,
        year,
        description: draft.description.unwrap_or_default(),
        image_url,
        available: draft.available.unwrap_or(true),
    })
}

/// Validates the supplied fields of a partial update.
///
/// The draft's `id` is stripped: it never reaches the returned patch.
pub fn validate_patch(draft: ArtworkDraft) -> Result<ArtworkPatch, ValidationError> {
    Ok(ArtworkPatch {
        title: draft.title.map(|t| non_empty(t, "title")).transpose()?,
        artist: draft.artist.map(|a| non_empty(a, "artist")).transpose()?,
        category: draft.category.map(parse_category).transpose()?,
        price: draft.price.map(check_price).transpose()?,
        dimensions: draft
            .dimensions
            .map(|d| non_empty(d, "dimensions"))
            .transpose()?,
        year: draft.year.map(check_year).transpose()?,
        description: draft.description,
        image_url: draft.image_url.map(check_image_url).transpose()?,
        available: draft.available,
    })
}

/// Returns true when `value` is a `data:image/...` URI.
pub fn is_data_image_uri(value: &str) -> bool {
    value.starts_with(DATA_IMAGE_PREFIX)
}

fn required_text(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    non_empty(value.ok_or(ValidationError::MissingField(field))?, field)
}

fn non_empty(value: String, field: &'static str) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(value)
}

fn parse_category(value: String) -> Result<ArtCategory, ValidationError> {
    value
        .parse::<ArtCategory>()
        .map_err(ValidationError::InvalidCategory)
}

fn check_price(price: f64) -> Result<f64, ValidationError> {
    if !price.is_finite() || price < 0.0 {
        return Err(ValidationError::InvalidPrice(price));
    }
    Ok(price)
}

fn check_year(year: i32) -> Result<i32, ValidationError> {
    let max = Utc::now().year() + 1;
    if !(MIN_YEAR..=max).contains(&year) {
        return Err(ValidationError::YearOutOfRange {
            year,
            min: MIN_YEAR,
            max,
        });
    }
    Ok(year)
}

fn check_image_url(value: String) -> Result<String, ValidationError> {
    let value = non_empty(value, "imageUrl")?;

    if value.len() > MAX_IMAGE_URL_LEN {
        return Err(ValidationError::ImageTooLarge {
            len: value.len(),
            max: MAX_IMAGE_URL_LEN,
        });
    }

    let recognized = is_data_image_uri(&value)
        || value.starts_with("https://")
        || value.starts_with("http://")
        || value.starts_with('/');
    if !recognized {
        return Err(ValidationError::InvalidImageUrl);
    }

    Ok(value)
}
