// Building artwork candidates from command-line flags

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use clap::Args;
use gallery_catalog::ArtworkDraft;

/// Artwork fields accepted by `save`. Omitted fields are left unset.
#[derive(Args, Debug, Default)]
pub struct ArtworkArgs {
    /// Id of the artwork to update (omit to create)
    #[arg(long)]
    pub id: Option<String>,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub artist: Option<String>,

    /// "Painting" or "Pencil Work"
    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub price: Option<f64>,

    /// Free text, e.g. 24x36
    #[arg(long)]
    pub dimensions: Option<String>,

    #[arg(long)]
    pub year: Option<i32>,

    #[arg(long)]
    pub description: Option<String>,

    /// Image URL or data URI
    #[arg(long, conflicts_with = "image_file")]
    pub image_url: Option<String>,

    /// Local image file, embedded as a data URI
    #[arg(long)]
    pub image_file: Option<std::path::PathBuf>,

    #[arg(long)]
    pub available: Option<bool>,
}

impl ArtworkArgs {
    pub fn into_draft(self) -> Result<ArtworkDraft> {
        let image_url = match (self.image_url, self.image_file) {
            (Some(url), _) => Some(url),
            (None, Some(path)) => Some(image_data_uri(&path)?),
            (None, None) => None,
        };

        Ok(ArtworkDraft {
            id: self.id,
            title: self.title,
            artist: self.artist,
            category: self.category,
            price: self.price,
            dimensions: self.dimensions,
            year: self.year,
            description: self.description,
            image_url,
            available: self.available,
        })
    }
}

/// Reads an image file and encodes it as a `data:image/...;base64,` URI.
pub fn image_data_uri(path: &Path) -> Result<String> {
    let mime = image_mime_type(path).ok_or_else(|| {
        anyhow!(
            "Unsupported image type '{}' (expected png, jpg, gif, webp or svg)",
            path.display()
        )
    })?;
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read '{}'", path.display()))?;
    Ok(format!("data:{};base64,{}", mime, BASE64_STANDARD.encode(bytes)))
}

fn image_mime_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_draft_copies_fields() {
        let args = ArtworkArgs {
            id: Some("7".to_string()),
            title: Some("Nocturne".to_string()),
            price: Some(1200.0),
            available: Some(false),
            ..Default::default()
        };
        let draft = args.into_draft().unwrap();
        assert_eq!(draft.id.as_deref(), Some("7"));
        assert_eq!(draft.title.as_deref(), Some("Nocturne"));
        assert_eq!(draft.price, Some(1200.0));
        assert_eq!(draft.available, Some(false));
        assert_eq!(draft.category, None);
    }

    #[test]
    fn test_image_file_becomes_data_uri() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sketch.PNG");
        std::fs::write(&path, [0u8, 0, 0]).unwrap();

        let args = ArtworkArgs {
            image_file: Some(path),
            ..Default::default()
        };
        let draft = args.into_draft().unwrap();
        assert_eq!(draft.image_url.as_deref(), Some("data:image/png;base64,AAAA"));
    }

    #[test]
    fn test_unsupported_image_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();

        let err = image_data_uri(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported image type"));
    }
}
