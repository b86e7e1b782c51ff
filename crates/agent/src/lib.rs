//! The decision core of Deckhand — the heart of the assistant.
//!
//! The agent follows an **Observe → Decide → Act** cycle:
//!
//! 1. **Observe**: build an immutable snapshot from the event log
//! 2. **Decide**: pick the next action from goals, situation, and
//!    capability-provider insights
//! 3. **Act**: execute the action via the injected providers and publish
//!    the resulting observation, then the action itself
//! 4. **Adapt**: update rolling metrics, evaluate the pause condition,
//!    apply the adaptive delay, and loop
//!
//! The loop continues until every goal is terminal, `stop()` is requested,
//! or the iteration cap is reached. Nothing in this crate aborts on a
//! caught error: failures degrade to low-confidence actions or
//! error-tagged observations.

pub mod heuristics;
pub mod loop_runner;
pub mod reasoning;

pub use loop_runner::{DecisionLoop, RunOutcome};
pub use reasoning::{
    analyze_situation, GamePhase, GoalOp, NextStep, PlayerNeed, ReasoningEngine, Situation,
};
