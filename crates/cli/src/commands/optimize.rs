//! `deckhand optimize` — Run the deck optimizer directly on a deck file.

use deckhand_core::DeckOptimizerProvider;
use deckhand_providers::HeuristicDeckOptimizer;
use std::path::Path;

pub async fn run(deck_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let deck_ctx = super::load_deck_file(deck_path)?;
    println!("  Deck: {}", super::deck_summary(&deck_ctx.deck));
    println!("  Pool: {} candidate cards", deck_ctx.candidate_pool.len());

    let optimizer = HeuristicDeckOptimizer::new();
    let result = optimizer
        .optimize(&deck_ctx.deck, &deck_ctx.candidate_pool)
        .await
        .map_err(|e| format!("Optimization failed: {e}"))?;

    println!();
    println!("  Synergy score:      {:.2}", result.synergy_score);
    println!(
        "  Predicted win rate: {:.0}%",
        result.predicted_win_rate * 100.0
    );
    println!();

    if result.suggestions.is_empty() {
        println!("  No changes suggested.");
    } else {
        println!("  Suggestions:");
        for suggestion in &result.suggestions {
            println!("    - {suggestion}");
        }
    }

    println!();
    println!("  Optimized list:");
    for card in &result.optimized_deck.cards {
        println!("    {}", super::card_line(card));
    }
    println!();

    Ok(())
}
