//! Data-driven decision tables.
//!
//! Candidate generation, evaluation profiles, and goal alignment are all
//! plain lookups from enums to static records, so changing the agent's
//! priors never means touching control flow.

use crate::reasoning::{GamePhase, PlayerNeed};
use deckhand_core::{ActionKind, GoalKind};

/// Static evaluation record for one action kind.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationProfile {
    pub pros: &'static [&'static str],
    pub cons: &'static [&'static str],
    pub base_confidence: f64,
    pub expected_outcome: Option<&'static str>,
}

/// Profile for action kinds without a dedicated table entry.
const DEFAULT_PROFILE: EvaluationProfile = EvaluationProfile {
    pros: &["keeps options open"],
    cons: &["low direct impact", "no specialist evaluation"],
    base_confidence: 0.35,
    expected_outcome: None,
};

/// Look up the evaluation profile for an action kind.
pub fn profile(kind: ActionKind) -> EvaluationProfile {
    match kind {
        ActionKind::ObserveEnvironment => EvaluationProfile {
            pros: &["always safe", "improves situational awareness"],
            cons: &["defers concrete progress"],
            base_confidence: 0.5,
            expected_outcome: Some("fresh context for the next decision"),
        },
        ActionKind::Communicate => EvaluationProfile {
            pros: &["keeps the player informed"],
            cons: &["may interrupt play"],
            base_confidence: 0.45,
            expected_outcome: Some("player sees a status update"),
        },
        ActionKind::OptimizeDeck => EvaluationProfile {
            pros: &["directly improves deck quality", "raises predicted win rate"],
            cons: &["takes time", "reshuffles familiar cards"],
            base_confidence: 0.7,
            expected_outcome: Some("higher synergy score"),
        },
        ActionKind::AnalyzeGameState => EvaluationProfile {
            pros: &["grounds advice in the actual board"],
            cons: &["goes stale quickly"],
            base_confidence: 0.6,
            expected_outcome: Some("current game assessment"),
        },
        ActionKind::SuggestStrategy => EvaluationProfile {
            pros: &["actionable this turn", "answers a help request"],
            cons: &["may not match player intent"],
            base_confidence: 0.65,
            expected_outcome: Some("player receives a concrete line of play"),
        },
        ActionKind::TeachMechanics => EvaluationProfile {
            pros: &["builds lasting player skill"],
            cons: &["slower than direct advice", "can feel patronizing"],
            base_confidence: 0.55,
            expected_outcome: Some("player understands one more mechanic"),
        },
        ActionKind::EvaluateOpening => EvaluationProfile {
            pros: &["sets up the whole game"],
            cons: &["limited information this early"],
            base_confidence: 0.6,
            expected_outcome: Some("mulligan and early-drop guidance"),
        },
        ActionKind::AssessBoard => EvaluationProfile {
            pros: &["captures tempo swings"],
            cons: &["board may shift next turn"],
            base_confidence: 0.6,
            expected_outcome: Some("tempo read on the board"),
        },
        ActionKind::PlanEndgame => EvaluationProfile {
            pros: &["identifies the winning line"],
            cons: &["depends on hidden information"],
            base_confidence: 0.6,
            expected_outcome: Some("path to closing the game"),
        },
        _ => DEFAULT_PROFILE,
    }
}

/// Candidate actions favored during each game phase.
pub fn phase_candidates(phase: GamePhase) -> &'static [ActionKind] {
    match phase {
        GamePhase::Early => &[
            ActionKind::EvaluateOpening,
            ActionKind::AnalyzeGameState,
            ActionKind::OptimizeDeck,
        ],
        GamePhase::Mid => &[
            ActionKind::AssessBoard,
            ActionKind::SuggestStrategy,
            ActionKind::AnalyzeGameState,
        ],
        GamePhase::Late => &[
            ActionKind::PlanEndgame,
            ActionKind::SuggestStrategy,
            ActionKind::ReviewPerformance,
        ],
    }
}

/// The one action that directly addresses a detected player need.
pub fn need_candidate(need: PlayerNeed) -> ActionKind {
    match need {
        PlayerNeed::DeckOptimization => ActionKind::OptimizeDeck,
        PlayerNeed::StrategyAdvice => ActionKind::SuggestStrategy,
        PlayerNeed::Learning => ActionKind::TeachMechanics,
    }
}

/// Candidates present regardless of phase or needs.
pub const ALWAYS_CANDIDATES: &[ActionKind] =
    &[ActionKind::ObserveEnvironment, ActionKind::Communicate];

/// Which action kinds advance which goal kinds.
pub fn aligned_kinds(goal: GoalKind) -> &'static [ActionKind] {
    match goal {
        GoalKind::OptimizeDeck => &[ActionKind::OptimizeDeck, ActionKind::EvaluateOpening],
        GoalKind::AnalyzeGame => &[
            ActionKind::AnalyzeGameState,
            ActionKind::AssessBoard,
            ActionKind::PlanEndgame,
            ActionKind::ObserveEnvironment,
        ],
        GoalKind::AssistPlayer => &[
            ActionKind::SuggestStrategy,
            ActionKind::Communicate,
            ActionKind::EvaluateOpening,
        ],
        GoalKind::LearnStrategy => &[
            ActionKind::TeachMechanics,
            ActionKind::ReviewPerformance,
            ActionKind::ObserveEnvironment,
        ],
    }
}

/// The action the loop reaches for when a goal of this kind leads the
/// registry.
pub fn action_for_goal(goal: GoalKind) -> ActionKind {
    match goal {
        GoalKind::OptimizeDeck => ActionKind::OptimizeDeck,
        GoalKind::AnalyzeGame => ActionKind::AnalyzeGameState,
        GoalKind::AssistPlayer => ActionKind::SuggestStrategy,
        GoalKind::LearnStrategy => ActionKind::TeachMechanics,
    }
}
