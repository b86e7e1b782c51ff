//! Heuristic deck optimizer.
//!
//! Scores a deck by pairwise card synergy (shared type, adjacent mana
//! costs, overlapping abilities, matching element) and curve smoothness,
//! then proposes swaps from the candidate pool that lift the score.
//! Stateless, so repeated calls on the same deck are safe.

use async_trait::async_trait;
use deckhand_core::{Card, Deck, DeckOptimization, DeckOptimizerProvider, ProviderError};
use tracing::debug;

/// How many pool cards an optimization pass may swap in.
const MAX_SWAPS: usize = 3;

/// Pairwise synergy contribution weights.
const TYPE_MATCH: f64 = 0.15;
const ADJACENT_COST: f64 = 0.1;
const EQUAL_COST: f64 = 0.05;
const SHARED_ABILITY: f64 = 0.2;
const ELEMENT_MATCH: f64 = 0.1;

#[derive(Debug, Default)]
pub struct HeuristicDeckOptimizer;

impl HeuristicDeckOptimizer {
    pub fn new() -> Self {
        Self
    }

    /// Mean pairwise synergy over all card pairs, clamped to [0, 1].
    fn synergy(deck: &Deck) -> f64 {
        let cards = &deck.cards;
        if cards.len() < 2 {
            return 0.0;
        }

        let mut total = 0.0;
        for i in 0..cards.len() {
            for j in (i + 1)..cards.len() {
                total += Self::pair_synergy(&cards[i], &cards[j]);
            }
        }
        let pairs = (cards.len() * (cards.len() - 1)) / 2;
        (total / pairs as f64).clamp(0.0, 1.0)
    }

    fn pair_synergy(a: &Card, b: &Card) -> f64 {
        let mut synergy = 0.0;

        if a.card_type == b.card_type {
            synergy += TYPE_MATCH;
        }

        // A smooth curve wants neighbors one cost apart.
        match a.cost.abs_diff(b.cost) {
            1 => synergy += ADJACENT_COST,
            0 if a.cost > 0 => synergy += EQUAL_COST,
            _ => {}
        }

        let shared = a
            .abilities
            .iter()
            .filter(|ability| {
                b.abilities.iter().any(|other| {
                    let (x, y) = (ability.to_lowercase(), other.to_lowercase());
                    x.contains(&y) || y.contains(&x)
                })
            })
            .count();
        synergy += shared as f64 * SHARED_ABILITY;

        if let (Some(ea), Some(eb)) = (&a.element, &b.element)
            && ea == eb
        {
            synergy += ELEMENT_MATCH;
        }

        synergy
    }

    /// Cost buckets with no cards, between the cheapest and priciest drop.
    fn curve_gaps(deck: &Deck) -> Vec<usize> {
        let curve = deck.curve();
        let filled: Vec<usize> = (0..curve.len()).filter(|&i| curve[i] > 0).collect();
        let (Some(&lo), Some(&hi)) = (filled.first(), filled.last()) else {
            return Vec::new();
        };
        (lo..=hi).filter(|&i| curve[i] == 0).collect()
    }

    /// Pick pool cards that fill curve gaps, best synergy with the deck first.
    fn pick_swaps(deck: &Deck, pool: &[Card]) -> Vec<Card> {
        let gaps = Self::curve_gaps(deck);
        let mut candidates: Vec<(f64, &Card)> = pool
            .iter()
            .filter(|card| !deck.cards.iter().any(|c| c.id == card.id))
            .map(|card| {
                let fit: f64 = deck
                    .cards
                    .iter()
                    .map(|c| Self::pair_synergy(card, c))
                    .sum::<f64>()
                    / deck.cards.len().max(1) as f64;
                let gap_bonus = if gaps.contains(&(card.cost as usize).min(7)) {
                    0.2
                } else {
                    0.0
                };
                (fit + gap_bonus, card)
            })
            .collect();

        candidates.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        candidates
            .into_iter()
            .take(MAX_SWAPS)
            .filter(|(score, _)| *score > 0.0)
            .map(|(_, card)| card.clone())
            .collect()
    }
}

#[async_trait]
impl DeckOptimizerProvider for HeuristicDeckOptimizer {
    fn name(&self) -> &str {
        "heuristic"
    }

    async fn optimize(
        &self,
        deck: &Deck,
        candidate_pool: &[Card],
    ) -> Result<DeckOptimization, ProviderError> {
        if deck.cards.is_empty() {
            return Err(ProviderError::InvalidInput("deck has no cards".into()));
        }

        let base_synergy = Self::synergy(deck);
        let swaps = Self::pick_swaps(deck, candidate_pool);

        // Swap in replacements for the weakest cards, one per addition.
        let mut optimized = deck.clone();
        let mut suggestions = Vec::new();
        for addition in &swaps {
            let weakest = optimized
                .cards
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| {
                    let score = |card: &Card| -> f64 {
                        optimized
                            .cards
                            .iter()
                            .filter(|other| other.id != card.id)
                            .map(|other| Self::pair_synergy(card, other))
                            .sum()
                    };
                    score(a)
                        .partial_cmp(&score(b))
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .map(|(i, _)| i);

            if let Some(index) = weakest {
                let removed = optimized.cards[index].clone();
                suggestions.push(format!(
                    "Swap '{}' for '{}' to tighten synergy around cost {}",
                    removed.name, addition.name, addition.cost
                ));
                optimized.cards[index] = addition.clone();
            }
        }

        for gap in Self::curve_gaps(&optimized) {
            suggestions.push(format!("No plays at cost {gap}; consider filling the gap"));
        }

        let synergy_score = Self::synergy(&optimized).max(base_synergy);
        // Win-rate estimate rides synergy, anchored below coin-flip for
        // incoherent decks.
        let predicted_win_rate = (0.35 + 0.3 * synergy_score).clamp(0.0, 1.0);

        debug!(
            deck = %deck.name,
            synergy = synergy_score,
            swaps = swaps.len(),
            "Deck optimization pass complete"
        );

        Ok(DeckOptimization {
            optimized_deck: optimized,
            suggestions,
            synergy_score,
            predicted_win_rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ember(id: &str, cost: u8) -> Card {
        Card::new(id, format!("Ember {id}"), cost)
            .with_element("ember")
            .with_abilities(vec!["burn".into()])
    }

    fn sample_deck() -> Deck {
        Deck::new(
            "d1",
            "mono-ember",
            vec![ember("c1", 1), ember("c2", 2), ember("c3", 3), ember("c4", 5)],
        )
    }

    #[tokio::test]
    async fn empty_pool_is_tolerated() {
        let optimizer = HeuristicDeckOptimizer::new();
        let deck = sample_deck();
        let result = optimizer.optimize(&deck, &[]).await.unwrap();

        assert_eq!(result.optimized_deck.cards.len(), deck.cards.len());
        assert!(result.synergy_score >= 0.0 && result.synergy_score <= 1.0);
        assert!(result.predicted_win_rate >= 0.0 && result.predicted_win_rate <= 1.0);
    }

    #[tokio::test]
    async fn recallable_with_same_result_shape() {
        let optimizer = HeuristicDeckOptimizer::new();
        let deck = sample_deck();
        let first = optimizer.optimize(&deck, &[]).await.unwrap();
        let second = optimizer.optimize(&deck, &[]).await.unwrap();
        assert_eq!(first.synergy_score, second.synergy_score);
    }

    #[tokio::test]
    async fn coherent_deck_scores_higher_than_scattered() {
        let optimizer = HeuristicDeckOptimizer::new();
        let coherent = sample_deck();
        let scattered = Deck::new(
            "d2",
            "pile",
            vec![
                Card::new("x1", "Golem", 0),
                Card::new("x2", "Comet", 7).with_element("frost"),
                Card::new("x3", "Scroll", 3).with_element("gale"),
            ],
        );

        let high = optimizer.optimize(&coherent, &[]).await.unwrap();
        let low = optimizer.optimize(&scattered, &[]).await.unwrap();
        assert!(high.synergy_score > low.synergy_score);
    }

    #[tokio::test]
    async fn pool_cards_fill_curve_gaps() {
        let optimizer = HeuristicDeckOptimizer::new();
        // Gap at cost 4.
        let deck = Deck::new(
            "d3",
            "gappy",
            vec![ember("c1", 1), ember("c2", 2), ember("c3", 3), ember("c4", 5)],
        );
        let pool = vec![ember("p1", 4)];

        let result = optimizer.optimize(&deck, &pool).await.unwrap();
        assert!(result.optimized_deck.cards.iter().any(|c| c.id == "p1"));
        assert!(result
            .suggestions
            .iter()
            .any(|s| s.contains("Ember p1")));
    }

    #[tokio::test]
    async fn empty_deck_is_invalid_input() {
        let optimizer = HeuristicDeckOptimizer::new();
        let deck = Deck::new("d4", "empty", vec![]);
        let err = optimizer.optimize(&deck, &[]).await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidInput(_)));
    }
}
