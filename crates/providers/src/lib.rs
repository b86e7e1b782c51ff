//! Capability provider implementations for Deckhand.
//!
//! These are deterministic heuristics, not learned models: pairwise synergy
//! and curve analysis for deck optimization, a keyword lexicon for
//! sentiment. Both implement the core traits and can be swapped for
//! smarter backends without touching the decision loop.

pub mod deck;
pub mod sentiment;

pub use deck::HeuristicDeckOptimizer;
pub use sentiment::LexiconSentimentAnalyzer;
