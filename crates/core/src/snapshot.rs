//! Snapshot — an immutable read view of the agent's full state.
//!
//! Rebuilt by the event log on every loop iteration. Consumers treat a
//! snapshot as frozen: whatever they compute from it describes the agent
//! at one instant, not a live reference.

use crate::context::Context;
use crate::event::{ActionKind, AgentEvent};
use crate::goal::Goal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What this agent can do, advertised on every snapshot.
pub const CAPABILITIES: &[&str] = &[
    "deck_optimization",
    "game_analysis",
    "strategy_advice",
    "sentiment_analysis",
    "pattern_tracking",
];

/// One entry of accumulated experience: a situation, what was done, and
/// how it turned out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Learning {
    pub situation: String,
    pub action_kind: ActionKind,
    pub outcome: String,
    pub success: bool,
    pub timestamp: DateTime<Utc>,
}

/// A read-only copy of the event log's memory sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryView {
    /// The most recent events, bounded by the log's trim policy.
    pub short_term: Vec<AgentEvent>,

    /// Durable key→value facts.
    pub long_term: HashMap<String, serde_json::Value>,

    /// Occurrence counters per event kind label.
    pub patterns: HashMap<String, u64>,

    /// Accumulated experience records.
    pub learnings: Vec<Learning>,
}

/// An immutable view of the agent's state at one loop iteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// True iff the goal set is empty or every goal is terminal.
    pub done: bool,

    /// The full ordered event history.
    pub history: Vec<AgentEvent>,

    /// Goals, sorted by descending priority.
    pub goals: Vec<Goal>,

    pub memory: MemoryView,

    pub context: Context,

    /// Constant capability advertisement.
    #[serde(skip_deserializing, default = "default_capabilities")]
    pub capabilities: &'static [&'static str],

    /// Aggregate self-assessment, clamped to [0.1, 0.95].
    pub confidence: f64,

    pub last_update: DateTime<Utc>,
}

fn default_capabilities() -> &'static [&'static str] {
    CAPABILITIES
}

impl Snapshot {
    /// Goals that can still make progress, in priority order.
    pub fn active_goals(&self) -> impl Iterator<Item = &Goal> {
        self.goals.iter().filter(|g| g.is_active())
    }

    /// Whether any goal has failed.
    pub fn any_goal_failed(&self) -> bool {
        self.goals
            .iter()
            .any(|g| g.status == crate::goal::GoalStatus::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal::{Goal, GoalKind, GoalStatus};

    fn snapshot_with_goals(goals: Vec<Goal>) -> Snapshot {
        Snapshot {
            done: goals.is_empty() || goals.iter().all(|g| g.status.is_terminal()),
            history: vec![],
            goals,
            memory: MemoryView::default(),
            context: Context::default(),
            capabilities: CAPABILITIES,
            confidence: 0.5,
            last_update: Utc::now(),
        }
    }

    #[test]
    fn active_goals_skip_terminal() {
        let mut done = Goal::new(GoalKind::AnalyzeGame, "watch the game", 5);
        done.status = GoalStatus::Completed;
        let pending = Goal::new(GoalKind::AssistPlayer, "advise", 3);
        let snap = snapshot_with_goals(vec![done, pending]);

        let active: Vec<_> = snap.active_goals().collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].kind, GoalKind::AssistPlayer);
    }

    #[test]
    fn capabilities_are_advertised() {
        let snap = snapshot_with_goals(vec![]);
        assert!(snap.capabilities.contains(&"deck_optimization"));
        assert!(snap.done);
    }
}
