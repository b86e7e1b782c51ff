//! The event log — append-only record plus derived state.
//!
//! One loop instance owns one log; concurrent writers are unsupported.
//! Sharing a log across orchestrators requires external synchronization.

use chrono::Utc;
use deckhand_core::{
    clamp_confidence, AgentEvent, Context, ContextPatch, Goal, GoalId, GoalPatch, Learning,
    MemoryView, Snapshot, CAPABILITIES,
};
use std::collections::HashMap;
use tracing::debug;

/// Short-term buffer capacity. Exceeding it triggers a trim.
pub const SHORT_TERM_CAP: usize = 100;

/// How many of the most recent events survive a trim.
pub const SHORT_TERM_RETAIN: usize = 50;

/// How many of the most recent learnings feed the confidence estimate.
const RECENT_LEARNING_WINDOW: usize = 10;

/// The agent's memory store.
#[derive(Debug, Default)]
pub struct EventLog {
    history: Vec<AgentEvent>,
    short_term: Vec<AgentEvent>,
    long_term: HashMap<String, serde_json::Value>,
    patterns: HashMap<String, u64>,
    learnings: Vec<Learning>,
    goals: Vec<Goal>,
    context: Context,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event to the full history and the short-term buffer,
    /// and bump its pattern counter.
    ///
    /// The short-term buffer never exceeds [`SHORT_TERM_CAP`]; once it
    /// would, it is truncated to the most recent [`SHORT_TERM_RETAIN`]
    /// events.
    pub fn publish(&mut self, event: impl Into<AgentEvent>) {
        let event = event.into();
        let label = event.kind_label();
        *self.patterns.entry(label.to_string()).or_insert(0) += 1;

        self.history.push(event.clone());
        self.short_term.push(event);
        // Grows freely up to the cap; the first overflow collapses it to the
        // most recent 50 and it stays a sliding window from then on.
        if self.history.len() > SHORT_TERM_CAP && self.short_term.len() > SHORT_TERM_RETAIN {
            let drop = self.short_term.len() - SHORT_TERM_RETAIN;
            self.short_term.drain(..drop);
        }
    }

    /// Insert a goal and re-sort by descending priority.
    ///
    /// The sort is stable, so equal priorities keep insertion order.
    pub fn add_goal(&mut self, goal: Goal) {
        debug!(goal_id = %goal.id, kind = goal.kind.as_str(), priority = goal.priority, "Goal added");
        self.goals.push(goal);
        self.goals.sort_by_key(|g| std::cmp::Reverse(g.priority));
    }

    /// Merge a partial update into the goal with the given id.
    ///
    /// Unknown ids are silently ignored — a deliberately lenient contract
    /// so callers never have to pre-check goal existence.
    pub fn update_goal(&mut self, id: &GoalId, patch: &GoalPatch) {
        match self.goals.iter_mut().find(|g| &g.id == id) {
            Some(goal) => {
                goal.apply(patch);
                if patch.priority.is_some() {
                    self.goals.sort_by_key(|g| std::cmp::Reverse(g.priority));
                }
            }
            None => debug!(goal_id = %id, "update_goal: unknown id, ignoring"),
        }
    }

    /// Merge a partial context update.
    pub fn update_context(&mut self, patch: ContextPatch) {
        self.context.merge(patch);
    }

    /// Store a durable key→value fact.
    pub fn remember(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.long_term.insert(key.into(), value);
    }

    /// Append an experience record.
    pub fn record_learning(&mut self, learning: Learning) {
        self.learnings.push(learning);
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn learnings(&self) -> &[Learning] {
        &self.learnings
    }

    pub fn pattern_count(&self, label: &str) -> u64 {
        self.patterns.get(label).copied().unwrap_or(0)
    }

    /// Build an immutable snapshot of the current state.
    ///
    /// Pure with respect to the log: calling `observe` repeatedly without
    /// intervening writes yields equivalent snapshots.
    pub fn observe(&self) -> Snapshot {
        let done = self.goals.is_empty() || self.goals.iter().all(|g| g.status.is_terminal());

        Snapshot {
            done,
            history: self.history.clone(),
            goals: self.goals.clone(),
            memory: MemoryView {
                short_term: self.short_term.clone(),
                long_term: self.long_term.clone(),
                patterns: self.patterns.clone(),
                learnings: self.learnings.clone(),
            },
            context: self.context.clone(),
            capabilities: CAPABILITIES,
            confidence: self.confidence(),
            last_update: Utc::now(),
        }
    }

    /// Aggregate self-assessment from goal completion and recent learnings:
    /// `clamp(0.1, 0.95, (success_rate + recent_successes/10) / 2)`.
    fn confidence(&self) -> f64 {
        let success_rate = if self.goals.is_empty() {
            0.5
        } else {
            let completed = self
                .goals
                .iter()
                .filter(|g| g.status == deckhand_core::GoalStatus::Completed)
                .count();
            completed as f64 / self.goals.len() as f64
        };

        let recent_successes = self
            .learnings
            .iter()
            .rev()
            .take(RECENT_LEARNING_WINDOW)
            .filter(|l| l.success)
            .count();

        clamp_confidence((success_rate + recent_successes as f64 / 10.0) / 2.0)
    }
}
