//! Event types — the append-only record of everything the agent decides
//! and everything it sees.
//!
//! Actions and Observations are immutable once published. The event log
//! counts occurrences per kind label, so both carry a stable snake_case
//! label via [`AgentEvent::kind_label`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything the agent knows how to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Take stock of the current situation without acting
    ObserveEnvironment,
    /// Surface a status update or suggestion to the player
    Communicate,
    /// Run deck optimization over the player's current deck
    OptimizeDeck,
    /// Interpret the current game state
    AnalyzeGameState,
    /// Produce concrete strategic advice for the current turn
    SuggestStrategy,
    /// Explain a mechanic or concept to a learning player
    TeachMechanics,
    /// Judge the opening hand and early plays
    EvaluateOpening,
    /// Weigh board presence and tempo mid-game
    AssessBoard,
    /// Map out the path to closing the game
    PlanEndgame,
    /// Look back over recent decisions and their outcomes
    ReviewPerformance,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::ObserveEnvironment => "observe_environment",
            ActionKind::Communicate => "communicate",
            ActionKind::OptimizeDeck => "optimize_deck",
            ActionKind::AnalyzeGameState => "analyze_game_state",
            ActionKind::SuggestStrategy => "suggest_strategy",
            ActionKind::TeachMechanics => "teach_mechanics",
            ActionKind::EvaluateOpening => "evaluate_opening",
            ActionKind::AssessBoard => "assess_board",
            ActionKind::PlanEndgame => "plan_endgame",
            ActionKind::ReviewPerformance => "review_performance",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an observation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationKind {
    UserInput,
    GameState,
    Environment,
    Feedback,
    Error,
}

impl ObservationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObservationKind::UserInput => "user_input",
            ObservationKind::GameState => "game_state",
            ObservationKind::Environment => "environment",
            ObservationKind::Feedback => "feedback",
            ObservationKind::Error => "error",
        }
    }
}

impl std::fmt::Display for ObservationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decided unit of work carrying a reasoning trace and confidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    pub kind: ActionKind,

    /// Opaque action parameters (deck ids, advice text, ...).
    #[serde(default)]
    pub payload: serde_json::Value,

    /// Human-readable explanation of why this action was chosen.
    pub reasoning: String,

    /// Estimated reliability of the decision, 0–1.
    pub confidence: f64,

    pub timestamp: DateTime<Utc>,

    /// What the agent expects to happen, if it has an expectation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_result: Option<String>,
}

impl Action {
    pub fn new(kind: ActionKind, reasoning: impl Into<String>, confidence: f64) -> Self {
        Self {
            kind,
            payload: serde_json::Value::Null,
            reasoning: reasoning.into(),
            confidence,
            timestamp: Utc::now(),
            expected_result: None,
        }
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_expected_result(mut self, expected: impl Into<String>) -> Self {
        self.expected_result = Some(expected.into());
        self
    }
}

/// A log entry describing something that happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub kind: ObservationKind,

    pub message: String,

    /// Opaque structured detail.
    #[serde(default)]
    pub data: serde_json::Value,

    pub timestamp: DateTime<Utc>,

    /// Which component produced this observation.
    pub source: String,
}

impl Observation {
    pub fn new(kind: ObservationKind, message: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            data: serde_json::Value::Null,
            timestamp: Utc::now(),
            source: source.into(),
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }

    /// Shorthand for an error-tagged observation.
    pub fn error(message: impl Into<String>, source: impl Into<String>) -> Self {
        Self::new(ObservationKind::Error, message, source)
    }
}

/// An entry in the agent's event log — either something it decided to do
/// or something it saw.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentEvent {
    Action(Action),
    Observation(Observation),
}

impl AgentEvent {
    /// The snake_case label used as the pattern-counter key.
    pub fn kind_label(&self) -> &'static str {
        match self {
            AgentEvent::Action(a) => a.kind.as_str(),
            AgentEvent::Observation(o) => o.kind.as_str(),
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            AgentEvent::Action(a) => a.timestamp,
            AgentEvent::Observation(o) => o.timestamp,
        }
    }
}

impl From<Action> for AgentEvent {
    fn from(action: Action) -> Self {
        AgentEvent::Action(action)
    }
}

impl From<Observation> for AgentEvent {
    fn from(observation: Observation) -> Self {
        AgentEvent::Observation(observation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_kind_labels_are_snake_case() {
        assert_eq!(ActionKind::ObserveEnvironment.as_str(), "observe_environment");
        assert_eq!(ActionKind::OptimizeDeck.to_string(), "optimize_deck");
    }

    #[test]
    fn event_kind_label_discriminates() {
        let action: AgentEvent = Action::new(ActionKind::Communicate, "say hello", 0.8).into();
        let obs: AgentEvent =
            Observation::new(ObservationKind::GameState, "turn 4 started", "game").into();
        assert_eq!(action.kind_label(), "communicate");
        assert_eq!(obs.kind_label(), "game_state");
    }

    #[test]
    fn action_builder_chain() {
        let action = Action::new(ActionKind::OptimizeDeck, "deck is unoptimized", 0.7)
            .with_payload(serde_json::json!({"deck_id": "d1"}))
            .with_expected_result("higher synergy score");
        assert_eq!(action.payload["deck_id"], "d1");
        assert_eq!(action.expected_result.as_deref(), Some("higher synergy score"));
    }

    #[test]
    fn event_serialization_tags_type() {
        let event: AgentEvent = Observation::error("provider down", "loop").into();
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"observation\""));
        assert!(json.contains("provider down"));
    }
}
