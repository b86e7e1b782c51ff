//! Goal registry types — prioritized units of intent with a lifecycle.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a goal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GoalId(pub String);

impl GoalId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl From<&str> for GoalId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for GoalId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Default for GoalId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for GoalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The category of assistance a goal represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    /// Improve the player's deck composition
    OptimizeDeck,
    /// Track and interpret the current game
    AnalyzeGame,
    /// Give the player actionable advice
    AssistPlayer,
    /// Teach mechanics and build up strategic knowledge
    LearnStrategy,
}

impl GoalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalKind::OptimizeDeck => "optimize_deck",
            GoalKind::AnalyzeGame => "analyze_game",
            GoalKind::AssistPlayer => "assist_player",
            GoalKind::LearnStrategy => "learn_strategy",
        }
    }
}

/// Lifecycle status of a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl GoalStatus {
    /// A goal is terminal once it can no longer make progress.
    pub fn is_terminal(&self) -> bool {
        matches!(self, GoalStatus::Completed | GoalStatus::Failed)
    }
}

/// A prioritized unit of intent.
///
/// Goals are never deleted; they are mutated in place by id via
/// [`GoalPatch`] merges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub kind: GoalKind,
    pub description: String,
    /// Higher priority sorts first in the registry.
    pub priority: i32,
    pub status: GoalStatus,
    /// Completion estimate, 0–100.
    pub progress: u8,
}

impl Goal {
    /// Create a pending goal with zero progress.
    pub fn new(kind: GoalKind, description: impl Into<String>, priority: i32) -> Self {
        Self {
            id: GoalId::new(),
            kind,
            description: description.into(),
            priority,
            status: GoalStatus::Pending,
            progress: 0,
        }
    }

    /// A goal is active while it is pending or in progress.
    pub fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Merge a partial update into this goal.
    pub fn apply(&mut self, patch: &GoalPatch) {
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(progress) = patch.progress {
            self.progress = progress.min(100);
        }
    }
}

/// A partial goal update. Fields left `None` are untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<GoalStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
}

impl GoalPatch {
    /// Patch that only transitions the status.
    pub fn status(status: GoalStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Patch that sets progress, marking completion at 100.
    pub fn progress(progress: u8) -> Self {
        let progress = progress.min(100);
        Self {
            progress: Some(progress),
            status: (progress >= 100).then_some(GoalStatus::Completed),
            ..Self::default()
        }
    }
}
