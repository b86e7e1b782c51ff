pub mod advise;
pub mod optimize;
pub mod run;

use deckhand_core::{Card, Deck, DeckContext};
use std::path::Path;

/// A deck file on disk: the deck itself plus an optional replacement pool.
///
/// `{"deck": {...}, "candidate_pool": [...]}` — the same shape the agent
/// keeps in its context, so a file round-trips cleanly.
pub fn load_deck_file(path: &Path) -> Result<DeckContext, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let mut ctx: DeckContext = serde_json::from_str(&content)
        .map_err(|e| format!("Invalid deck file {}: {e}", path.display()))?;
    // A freshly loaded deck is never considered optimized.
    ctx.optimized = false;
    Ok(ctx)
}

/// Render a deck as a short human-readable summary.
pub fn deck_summary(deck: &Deck) -> String {
    let curve = deck.curve();
    let curve_str: Vec<String> = curve.iter().map(|c| c.to_string()).collect();
    format!(
        "{} ({} cards, curve [{}])",
        deck.name,
        deck.cards.len(),
        curve_str.join(" "),
    )
}

/// One-line card rendering for suggestion output.
pub fn card_line(card: &Card) -> String {
    format!("{} ({}-cost {})", card.name, card.cost, card.card_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn deck_file_round_trips_and_clears_optimized() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"deck": {{"id": "d1", "name": "Ember Rush", "cards": [
                {{"id": "c1", "name": "Cinder Imp", "cost": 1, "card_type": "creature"}}
            ]}}, "candidate_pool": [], "optimized": true}}"#
        )
        .unwrap();

        let ctx = load_deck_file(file.path()).unwrap();
        assert_eq!(ctx.deck.name, "Ember Rush");
        assert_eq!(ctx.deck.cards.len(), 1);
        assert!(!ctx.optimized);
    }

    #[test]
    fn missing_deck_file_is_a_readable_error() {
        let err = load_deck_file(Path::new("/nonexistent/deck.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn deck_summary_includes_curve() {
        let deck = Deck::new(
            "d1",
            "test",
            vec![Card::new("c1", "Sprout", 1), Card::new("c2", "Wisp", 1)],
        );
        assert_eq!(deck_summary(&deck), "test (2 cards, curve [0 2 0 0 0 0 0 0])");
    }
}
