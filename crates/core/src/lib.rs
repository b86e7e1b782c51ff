//! # Deckhand Core
//!
//! Domain types, traits, and error definitions for the Deckhand game
//! assistant agent. This crate has **zero framework dependencies** — it
//! defines the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Capability providers (deck optimization, sentiment analysis) are defined
//! as traits here and injected into the decision loop. Implementations live
//! in their own crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub providers
//! - Clean dependency graph (all crates depend inward on core)

pub mod card;
pub mod context;
pub mod error;
pub mod event;
pub mod goal;
pub mod metrics;
pub mod provider;
pub mod snapshot;

// Re-export key types at crate root for ergonomics
pub use card::{Card, Deck};
pub use context::{Context, ContextKind, ContextPatch, DeckContext, GameContext, PlayerProfile, SkillLevel};
pub use error::{Error, ProviderError, Result};
pub use event::{Action, ActionKind, AgentEvent, Observation, ObservationKind};
pub use goal::{Goal, GoalId, GoalKind, GoalPatch, GoalStatus};
pub use metrics::PerformanceMetrics;
pub use provider::{DeckOptimization, DeckOptimizerProvider, Sentiment, SentimentProvider, SentimentReport};
pub use snapshot::{Learning, MemoryView, Snapshot, CAPABILITIES};

/// Clamp a confidence value to the range the agent promises to stay within.
///
/// Every confidence computed by the event log or the decision loop passes
/// through this before it is stored or published.
pub fn clamp_confidence(value: f64) -> f64 {
    value.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

/// Lower bound for agent-computed confidence.
pub const MIN_CONFIDENCE: f64 = 0.1;

/// Upper bound for agent-computed confidence.
pub const MAX_CONFIDENCE: f64 = 0.95;
