//! The reasoning engine — scored multi-criteria action selection.
//!
//! Given a snapshot, the engine analyzes the situation, refreshes goals,
//! generates candidate actions, evaluates each against the data-driven
//! tables in [`crate::heuristics`] blended with historical learnings,
//! scores them, and returns the winner with a human-readable reasoning
//! trace. `next_step` never fails: any internal error collapses to a
//! fixed low-confidence observation action.

use crate::heuristics;
use chrono::Utc;
use deckhand_core::{
    Action, ActionKind, Context, ContextKind, Error, Goal, GoalId, GoalKind, GoalPatch,
    GoalStatus, Learning, SkillLevel, Snapshot,
};
use deckhand_memory::EventLog;
use tracing::{debug, warn};

/// Confidence attached to the fixed fallback action.
const FALLBACK_CONFIDENCE: f64 = 0.3;

/// Rough stage of the match, derived from the turn counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Early,
    Mid,
    Late,
}

impl GamePhase {
    pub fn of_turn(turn: u32) -> Self {
        match turn {
            0..=3 => GamePhase::Early,
            4..=7 => GamePhase::Mid,
            _ => GamePhase::Late,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Early => "early",
            GamePhase::Mid => "mid",
            GamePhase::Late => "late",
        }
    }
}

/// Something the player currently needs from the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerNeed {
    DeckOptimization,
    StrategyAdvice,
    Learning,
}

/// The outcome of situation analysis.
#[derive(Debug, Clone)]
pub struct Situation {
    pub phase: GamePhase,
    pub needs: Vec<PlayerNeed>,
}

/// Derive the phase and the player's needs from the current context.
pub fn analyze_situation(context: &Context) -> Situation {
    let phase = GamePhase::of_turn(context.turn());

    let mut needs = Vec::new();
    if let Some(deck) = &context.deck
        && !deck.optimized
    {
        needs.push(PlayerNeed::DeckOptimization);
    }
    if let Some(player) = &context.player {
        if let Some(input) = &player.last_input
            && is_help_seeking(input)
        {
            needs.push(PlayerNeed::StrategyAdvice);
        }
        if player.skill == SkillLevel::Beginner {
            needs.push(PlayerNeed::Learning);
        }
    }

    Situation { phase, needs }
}

fn is_help_seeking(text: &str) -> bool {
    let lower = text.to_lowercase();
    ["help", "how do", "how can", "what should", "advice", "stuck"]
        .iter()
        .any(|marker| lower.contains(marker))
}

/// A pending mutation of the goal registry proposed by the engine.
#[derive(Debug, Clone)]
pub enum GoalOp {
    Add(Goal),
    Update(GoalId, GoalPatch),
}

/// The engine's full output for one decision: the chosen action plus the
/// goal mutations and the reflection record that should accompany it.
#[derive(Debug, Clone)]
pub struct NextStep {
    pub action: Action,
    pub goal_ops: Vec<GoalOp>,
    pub learning: Learning,
}

/// One candidate after evaluation.
#[derive(Debug)]
struct EvaluatedOption {
    kind: ActionKind,
    pros: &'static [&'static str],
    confidence: f64,
    expected_outcome: Option<&'static str>,
    score: f64,
}

#[derive(Debug, Default)]
pub struct ReasoningEngine;

impl ReasoningEngine {
    pub fn new() -> Self {
        Self
    }

    /// Decide the next action for the given snapshot.
    ///
    /// Never fails: internal errors degrade to the fixed fallback action
    /// (`observe_environment` at confidence 0.3).
    pub fn next_step(&self, snapshot: &Snapshot) -> NextStep {
        match self.plan(snapshot) {
            Ok(step) => step,
            Err(e) => {
                warn!(error = %e, "Reasoning failed, using fallback action");
                Self::fallback_step(snapshot)
            }
        }
    }

    /// Convenience: decide against the log's current state and apply the
    /// step's goal operations and reflection record.
    pub fn advance(&self, log: &mut EventLog) -> Action {
        let snapshot = log.observe();
        let step = self.next_step(&snapshot);
        for op in &step.goal_ops {
            match op {
                GoalOp::Add(goal) => log.add_goal(goal.clone()),
                GoalOp::Update(id, patch) => log.update_goal(id, patch),
            }
        }
        log.record_learning(step.learning.clone());
        step.action
    }

    fn plan(&self, snapshot: &Snapshot) -> Result<NextStep, Error> {
        let situation = analyze_situation(&snapshot.context);
        let goal_ops = Self::manage_goals(snapshot, &situation);

        // Goals the registry will hold once the ops are applied.
        let mut effective_goals: Vec<GoalKind> = snapshot
            .active_goals()
            .map(|g| g.kind)
            .collect();
        for op in &goal_ops {
            if let GoalOp::Add(goal) = op {
                effective_goals.push(goal.kind);
            }
        }

        let options = Self::generate_options(&situation);
        let mut evaluated: Vec<EvaluatedOption> = options
            .iter()
            .map(|&kind| Self::evaluate(kind, snapshot, &effective_goals))
            .collect();
        if evaluated.is_empty() {
            return Err(Error::Internal("no candidate actions generated".into()));
        }

        // Stable sort keeps earlier candidates ahead on ties.
        evaluated.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        let winner = &evaluated[0];
        let runner_ups: Vec<&str> = evaluated[1..]
            .iter()
            .take(2)
            .map(|o| o.kind.as_str())
            .collect();

        let mut reasoning = format!(
            "Selected '{}' at confidence {:.2} because: {}",
            winner.kind.as_str(),
            winner.confidence,
            winner.pros.join("; "),
        );
        if !runner_ups.is_empty() {
            reasoning.push_str(&format!(". Runners-up: {}", runner_ups.join(", ")));
        }

        debug!(
            chosen = winner.kind.as_str(),
            score = winner.score,
            options = evaluated.len(),
            "Reasoning complete"
        );

        let mut action = Action::new(winner.kind, reasoning, winner.confidence).with_payload(
            serde_json::json!({
                "phase": situation.phase.as_str(),
                "score": winner.score,
            }),
        );
        if let Some(expected) = winner.expected_outcome {
            action = action.with_expected_result(expected);
        }

        let learning = Self::reflect(&situation, &action, snapshot);

        Ok(NextStep {
            action,
            goal_ops,
            learning,
        })
    }

    /// Refresh in-progress goals and synthesize defaults when the registry
    /// holds no active goal.
    fn manage_goals(snapshot: &Snapshot, situation: &Situation) -> Vec<GoalOp> {
        let mut ops = Vec::new();

        for goal in &snapshot.goals {
            if goal.status != GoalStatus::InProgress {
                continue;
            }
            match goal.kind {
                GoalKind::OptimizeDeck => {
                    if snapshot.context.deck.as_ref().is_some_and(|d| d.optimized) {
                        ops.push(GoalOp::Update(goal.id.clone(), GoalPatch::progress(100)));
                    }
                }
                GoalKind::AnalyzeGame => {
                    // Awareness deepens as the game advances; never
                    // self-completes.
                    let progress = (snapshot.context.turn() * 10).min(90) as u8;
                    if progress > goal.progress {
                        ops.push(GoalOp::Update(goal.id.clone(), GoalPatch::progress(progress)));
                    }
                }
                GoalKind::AssistPlayer | GoalKind::LearnStrategy => {}
            }
        }

        let has_active = snapshot.active_goals().next().is_some();
        if !has_active {
            ops.push(GoalOp::Add(Goal::new(
                GoalKind::AnalyzeGame,
                "maintain situational awareness",
                3,
            )));
            if snapshot.context.has(ContextKind::Deck) {
                ops.push(GoalOp::Add(Goal::new(
                    GoalKind::OptimizeDeck,
                    "optimize the player's deck",
                    7,
                )));
            }
            if situation.needs.contains(&PlayerNeed::StrategyAdvice) {
                ops.push(GoalOp::Add(Goal::new(
                    GoalKind::AssistPlayer,
                    "answer the player's request for advice",
                    5,
                )));
            }
            if situation.needs.contains(&PlayerNeed::Learning) {
                ops.push(GoalOp::Add(Goal::new(
                    GoalKind::LearnStrategy,
                    "teach mechanics suited to a beginner",
                    4,
                )));
            }
        }

        ops
    }

    /// Union of phase-, need-, and always-present candidates, deduplicated
    /// in first-seen order.
    fn generate_options(situation: &Situation) -> Vec<ActionKind> {
        let mut options: Vec<ActionKind> = Vec::new();
        let mut push = |kind: ActionKind, options: &mut Vec<ActionKind>| {
            if !options.contains(&kind) {
                options.push(kind);
            }
        };

        for &kind in heuristics::phase_candidates(situation.phase) {
            push(kind, &mut options);
        }
        for &need in &situation.needs {
            push(heuristics::need_candidate(need), &mut options);
        }
        for &kind in heuristics::ALWAYS_CANDIDATES {
            push(kind, &mut options);
        }

        options
    }

    /// Evaluate one candidate: table profile, learning-blended confidence,
    /// and the multi-criteria score.
    fn evaluate(kind: ActionKind, snapshot: &Snapshot, goals: &[GoalKind]) -> EvaluatedOption {
        let profile = heuristics::profile(kind);

        let matching: Vec<&Learning> = snapshot
            .memory
            .learnings
            .iter()
            .filter(|l| l.action_kind == kind)
            .collect();
        let confidence = if matching.is_empty() {
            profile.base_confidence
        } else {
            let success_rate =
                matching.iter().filter(|l| l.success).count() as f64 / matching.len() as f64;
            (profile.base_confidence + success_rate) / 2.0
        };

        let aligned = goals
            .iter()
            .filter(|&&goal| heuristics::aligned_kinds(goal).contains(&kind))
            .count();

        let score = confidence * 0.4
            + aligned as f64 * 0.3
            + (5usize.saturating_sub(profile.cons.len()) as f64) / 5.0 * 0.2
            + profile.pros.len() as f64 * 0.1;

        EvaluatedOption {
            kind,
            pros: profile.pros,
            confidence,
            expected_outcome: profile.expected_outcome,
            score,
        }
    }

    /// Self-reflection: record what was decided and what is expected.
    ///
    /// Success is optimistic at write time; an outcome of "pending" marks
    /// decisions with no stated expectation.
    fn reflect(situation: &Situation, action: &Action, snapshot: &Snapshot) -> Learning {
        Learning {
            situation: format!(
                "phase={}, needs={}, active_goals={}",
                situation.phase.as_str(),
                situation.needs.len(),
                snapshot.active_goals().count(),
            ),
            action_kind: action.kind,
            outcome: action
                .expected_result
                .clone()
                .unwrap_or_else(|| "pending".into()),
            success: true,
            timestamp: Utc::now(),
        }
    }

    /// The fixed fallback: observe, at low confidence.
    fn fallback_step(snapshot: &Snapshot) -> NextStep {
        let action = Action::new(
            ActionKind::ObserveEnvironment,
            "fallback after reasoning failure",
            FALLBACK_CONFIDENCE,
        );
        let situation = analyze_situation(&snapshot.context);
        let learning = Self::reflect(&situation, &action, snapshot);
        NextStep {
            action,
            goal_ops: Vec::new(),
            learning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckhand_core::{Card, Deck, DeckContext, GameContext, PlayerProfile};
    use deckhand_memory::EventLog;

    fn snapshot_from(log: &EventLog) -> Snapshot {
        log.observe()
    }

    fn deck_context(optimized: bool) -> DeckContext {
        DeckContext {
            deck: Deck::new("d1", "mono-ember", vec![Card::new("c1", "Sprout", 1)]),
            candidate_pool: vec![],
            optimized,
        }
    }

    #[test]
    fn phase_boundaries() {
        assert_eq!(GamePhase::of_turn(0), GamePhase::Early);
        assert_eq!(GamePhase::of_turn(3), GamePhase::Early);
        assert_eq!(GamePhase::of_turn(4), GamePhase::Mid);
        assert_eq!(GamePhase::of_turn(7), GamePhase::Mid);
        assert_eq!(GamePhase::of_turn(8), GamePhase::Late);
    }

    #[test]
    fn needs_detected_from_context() {
        let mut log = EventLog::new();
        log.update_context(deckhand_core::ContextPatch::deck(deck_context(false)));
        log.update_context(deckhand_core::ContextPatch::player(PlayerProfile {
            skill: SkillLevel::Beginner,
            last_input: Some("help, what should I play?".into()),
            ..PlayerProfile::default()
        }));

        let situation = analyze_situation(log.context());
        assert!(situation.needs.contains(&PlayerNeed::DeckOptimization));
        assert!(situation.needs.contains(&PlayerNeed::StrategyAdvice));
        assert!(situation.needs.contains(&PlayerNeed::Learning));
    }

    #[test]
    fn optimized_deck_is_not_a_need() {
        let mut log = EventLog::new();
        log.update_context(deckhand_core::ContextPatch::deck(deck_context(true)));
        let situation = analyze_situation(log.context());
        assert!(situation.needs.is_empty());
    }

    #[test]
    fn next_step_on_empty_snapshot_is_well_formed() {
        let engine = ReasoningEngine::new();
        let log = EventLog::new();
        let step = engine.next_step(&snapshot_from(&log));

        assert!(!step.action.kind.as_str().is_empty());
        assert!(step.action.confidence >= 0.0 && step.action.confidence <= 1.0);
        assert!(!step.action.reasoning.is_empty());
        // No active goals: a situational-awareness goal is synthesized.
        assert!(step.goal_ops.iter().any(|op| matches!(
            op,
            GoalOp::Add(g) if g.kind == GoalKind::AnalyzeGame
        )));
        assert!(step.learning.success);
    }

    #[test]
    fn deck_in_context_synthesizes_deck_goal_and_wins_selection() {
        let engine = ReasoningEngine::new();
        let mut log = EventLog::new();
        log.update_context(deckhand_core::ContextPatch::deck(deck_context(false)));

        let step = engine.next_step(&snapshot_from(&log));

        assert!(step.goal_ops.iter().any(|op| matches!(
            op,
            GoalOp::Add(g) if g.kind == GoalKind::OptimizeDeck
        )));
        assert_eq!(step.action.kind, ActionKind::OptimizeDeck);
        assert_eq!(step.action.expected_result.as_deref(), Some("higher synergy score"));
    }

    #[test]
    fn reasoning_cites_runner_ups() {
        let engine = ReasoningEngine::new();
        let log = EventLog::new();
        let step = engine.next_step(&snapshot_from(&log));
        assert!(step.action.reasoning.contains("Runners-up:"));
    }

    #[test]
    fn existing_active_goals_suppress_synthesis() {
        let engine = ReasoningEngine::new();
        let mut log = EventLog::new();
        log.add_goal(Goal::new(GoalKind::AssistPlayer, "advise on plays", 5));

        let step = engine.next_step(&snapshot_from(&log));
        assert!(step.goal_ops.iter().all(|op| !matches!(op, GoalOp::Add(_))));
    }

    #[test]
    fn in_progress_deck_goal_completed_once_deck_optimized() {
        let engine = ReasoningEngine::new();
        let mut log = EventLog::new();
        let goal = Goal::new(GoalKind::OptimizeDeck, "tune the deck", 7);
        let id = goal.id.clone();
        log.add_goal(goal);
        log.update_goal(&id, &GoalPatch::status(GoalStatus::InProgress));
        log.update_context(deckhand_core::ContextPatch::deck(deck_context(true)));

        let step = engine.next_step(&snapshot_from(&log));
        assert!(step.goal_ops.iter().any(|op| matches!(
            op,
            GoalOp::Update(gid, patch)
                if gid == &id && patch.status == Some(GoalStatus::Completed)
        )));
    }

    #[test]
    fn learnings_blend_into_confidence() {
        let engine = ReasoningEngine::new();

        let mut log = EventLog::new();
        log.update_context(deckhand_core::ContextPatch::deck(deck_context(false)));
        let base = engine.next_step(&snapshot_from(&log));

        // A perfect historical record for optimize_deck raises confidence.
        for _ in 0..5 {
            log.record_learning(Learning {
                situation: "test".into(),
                action_kind: ActionKind::OptimizeDeck,
                outcome: "higher synergy score".into(),
                success: true,
                timestamp: Utc::now(),
            });
        }
        let boosted = engine.next_step(&snapshot_from(&log));

        assert_eq!(base.action.kind, ActionKind::OptimizeDeck);
        assert_eq!(boosted.action.kind, ActionKind::OptimizeDeck);
        assert!(boosted.action.confidence > base.action.confidence);
    }

    #[test]
    fn advance_applies_ops_and_learning() {
        let engine = ReasoningEngine::new();
        let mut log = EventLog::new();

        let action = engine.advance(&mut log);
        assert!(!action.reasoning.is_empty());
        assert_eq!(log.goals().len(), 1);
        assert_eq!(log.learnings().len(), 1);
        assert_eq!(log.learnings()[0].action_kind, action.kind);
    }

    #[test]
    fn fallback_step_is_fixed_observation() {
        let log = EventLog::new();
        let step = ReasoningEngine::fallback_step(&snapshot_from(&log));
        assert_eq!(step.action.kind, ActionKind::ObserveEnvironment);
        assert!((step.action.confidence - 0.3).abs() < 1e-9);
        assert!(step.goal_ops.is_empty());
        assert_eq!(step.learning.outcome, "pending");
    }

    #[test]
    fn options_deduplicate_across_sources() {
        // Early phase already contains optimize_deck; the deck need must
        // not duplicate it.
        let situation = Situation {
            phase: GamePhase::Early,
            needs: vec![PlayerNeed::DeckOptimization],
        };
        let options = ReasoningEngine::generate_options(&situation);
        let optimize_count = options
            .iter()
            .filter(|&&k| k == ActionKind::OptimizeDeck)
            .count();
        assert_eq!(optimize_count, 1);
        assert!(options.contains(&ActionKind::ObserveEnvironment));
        assert!(options.contains(&ActionKind::Communicate));
    }
}
