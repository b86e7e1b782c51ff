//! Capability provider traits — the abstraction over domain intelligence.
//!
//! A provider supplies one narrow piece of expertise (deck optimization,
//! sentiment analysis). The decision loop calls providers defensively: any
//! failure is caught at the call site and recorded as a degraded insight,
//! never propagated. Providers are injected into the loop and the CLI;
//! implementations live in `deckhand-providers`.

use crate::card::{Card, Deck};
use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The result of a deck optimization pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckOptimization {
    pub optimized_deck: Deck,

    /// Human-readable improvement suggestions.
    pub suggestions: Vec<String>,

    /// How well the deck's cards work together, 0–1.
    pub synergy_score: f64,

    /// Estimated win rate with the optimized list, 0–1.
    pub predicted_win_rate: f64,
}

/// Optimizes decks against a pool of candidate replacements.
///
/// Implementations must tolerate an empty candidate pool and must be
/// safely re-callable on the same deck.
#[async_trait]
pub trait DeckOptimizerProvider: Send + Sync {
    /// A human-readable name for this provider.
    fn name(&self) -> &str;

    async fn optimize(
        &self,
        deck: &Deck,
        candidate_pool: &[Card],
    ) -> std::result::Result<DeckOptimization, ProviderError>;
}

/// Detected sentiment of a piece of player text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

/// The result of analyzing one piece of text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentReport {
    pub sentiment: Sentiment,

    /// How sure the analyzer is, 0–1.
    pub confidence: f64,
}

/// Classifies the emotional tone of player input.
#[async_trait]
pub trait SentimentProvider: Send + Sync {
    /// A human-readable name for this provider.
    fn name(&self) -> &str;

    async fn analyze(&self, text: &str) -> std::result::Result<SentimentReport, ProviderError>;
}
