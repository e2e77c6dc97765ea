//! Default catalog shown before anything has been persisted.

use crate::model::{ArtCategory, Artwork, GALLERY_ARTIST};

#[allow(clippy::too_many_arguments)]
fn entry(
    id: &str,
    title: &str,
    category: ArtCategory,
    price: f64,
    dimensions: &str,
    year: i32,
    description: &str,
    image: &str,
    available: bool,
) -> Artwork {
    Artwork {
        id: id.to_string(),
        title: title.to_string(),
        artist: GALLERY_ARTIST.to_string(),
        category,
        price,
        dimensions: dimensions.to_string(),
        year,
        description: description.to_string(),
        image_url: format!("https://picsum.photos/seed/{}/800/1000", image),
        available,
        created_at: None,
    }
}

/// The seed catalog, newest first.
pub fn default_catalog() -> Vec<Artwork> {
    vec![
        entry(
            "6",
            "Quiet Harbour",
            ArtCategory::PencilWork,
            320.0,
            "A3",
            2024,
            "Graphite study of fishing boats at dawn",
            "harbour",
            true,
        ),
        entry(
            "5",
            "Market Day",
            ArtCategory::Painting,
            1450.0,
            "30x40 in",
            2023,
            "Acrylic on canvas, crowded colour and noise",
            "market",
            true,
        ),
        entry(
            "4",
            "Grandmother's Hands",
            ArtCategory::PencilWork,
            280.0,
            "A4",
            2023,
            "Charcoal and pencil portrait study",
            "hands",
            false,
        ),
        entry(
            "3",
            "Savannah Dusk",
            ArtCategory::Painting,
            2100.0,
            "36x48 in",
            2022,
            "Oil on canvas, amber light over open grassland",
            "savannah",
            true,
        ),
        entry(
            "2",
            "City in Rain",
            ArtCategory::Painting,
            980.0,
            "24x30 in",
            2022,
            "Moody street scene in blues and greys",
            "rain",
            true,
        ),
        entry(
            "1",
            "Self Portrait I",
            ArtCategory::PencilWork,
            450.0,
            "A2",
            2021,
            "",
            "portrait",
            false,
        ),
    ]
}
