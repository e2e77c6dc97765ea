//! Purchase inquiry links for the messaging channel.

use crate::model::Artwork;

/// Default gallery number used for WhatsApp inquiries.
pub const DEFAULT_WHATSAPP_NUMBER: &str = "254711874765";

/// Builds a `wa.me` link whose pre-filled message names the artwork, its
/// artist and listed price.
pub fn inquiry_link(artwork: &Artwork, phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    let message = format!(
        "Hi, I'm interested in purchasing \"{}\" by {} listed at ${}. Is it still available?",
        artwork.title, artwork.artist, artwork.price
    );
    format!(
        "https://wa.me/{}?text={}",
        digits,
        urlencoding::encode(&message)
    )
}
