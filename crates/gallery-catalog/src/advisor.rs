//! Read-only catalog context for the shopper advisor.
//!
//! The advisor itself lives behind a third-party model API; this module only
//! renders what it is allowed to know about the collection.

use crate::model::Artwork;

pub const GALLERY_NAME: &str = "Sketchy Gallery";
pub const ADVISOR_NAME: &str = "Aura";

/// One inventory line per artwork.
pub fn inventory_context(artworks: &[Artwork]) -> String {
    artworks
        .iter()
        .map(|art| {
            format!(
                "- \"{}\" ({}): ${}. {}. Available: {}",
                art.title,
                art.category,
                art.price,
                art.description,
                if art.available { "Yes" } else { "No" }
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// System instruction that grounds the advisor in the current collection.
pub fn system_instruction(artworks: &[Artwork]) -> String {
    format!(
        "You are the Art Advisor and Curator for the {gallery}.\n\
         Your name is \"{advisor}\".\n\
         You are sophisticated, knowledgeable, and polite.\n\
         Your goal is to help visitors find artwork from our collection that matches their tastes, budget, or interior design needs.\n\
         \n\
         Here is our current collection:\n\
         {inventory}\n\
         \n\
         Rules:\n\
         1. Only recommend artworks from the list above.\n\
         2. If a user asks about buying, suggest they click the \"Inquire on WhatsApp\" button on the artwork details.\n\
         3. Keep your responses concise (under 100 words) but elegant.\n\
         4. If the user asks for something we don't have, politely explain our style (Contemporary, Abstract, Moody) and suggest the closest match.\n\
         5. Do not make up artworks that are not in the list.",
        gallery = GALLERY_NAME,
        advisor = ADVISOR_NAME,
        inventory = inventory_context(artworks),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::default_catalog;

    #[test]
    fn test_inventory_lists_every_artwork() {
        let catalog = default_catalog();
        let context = inventory_context(&catalog);
        assert_eq!(context.lines().count(), catalog.len());
        assert!(context.contains("\"Savannah Dusk\" (Painting): $2100."));
        assert!(context.contains("Available: No"));
    }

    #[test]
    fn test_system_instruction_embeds_inventory() {
        let instruction = system_instruction(&default_catalog());
        assert!(instruction.contains("Your name is \"Aura\""));
        assert!(instruction.contains("Quiet Harbour"));
        assert!(instruction.ends_with("not in the list."));
    }
}
