//! The decision loop — the agent's autonomous Observe → Decide → Act cycle.
//!
//! A [`DecisionLoop`] owns the event log behind an async lock and drives it
//! with injected capability providers. The loop is cooperative: `stop()`
//! raises a flag and wakes the adaptive delay, and the cycle exits at the
//! next checkpoint. Provider failures never abort the loop; they are
//! published as error observations and the cycle continues.

use crate::heuristics;
use crate::reasoning::analyze_situation;
use deckhand_config::LoopConfig;
use deckhand_core::{
    clamp_confidence, Action, ActionKind, AgentEvent, Context, ContextPatch, DeckOptimization,
    Error, Goal, GoalId, GoalKind, GoalPatch, GoalStatus, Observation, ObservationKind,
    PerformanceMetrics, ProviderError, SentimentReport, Snapshot,
};
use deckhand_memory::EventLog;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Notify, RwLock};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use deckhand_core::{DeckOptimizerProvider, SentimentProvider};

/// Confidence of the emergency action taken when deciding itself fails.
const EMERGENCY_CONFIDENCE: f64 = 0.2;

/// Response-time samples retained for metrics.
const RESPONSE_TIME_WINDOW: usize = 100;

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// All goals terminal or confidence collapsed.
    Paused,
    /// `stop()` was requested.
    Stopped,
    /// The iteration cap was reached.
    MaxIterations,
    /// A run was already in progress; this call did nothing.
    AlreadyRunning,
}

/// What the providers contributed to one decision.
#[derive(Debug, Default, Serialize)]
struct Insights {
    #[serde(skip_serializing_if = "Option::is_none")]
    deck: Option<DeckOptimization>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sentiment: Option<SentimentReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

#[derive(Debug, Default)]
struct MetricsState {
    actions_executed: u64,
    goals_completed: u64,
    average_confidence: f64,
    errors: u64,
    iterations: u64,
    response_times: VecDeque<u64>,
}

pub struct DecisionLoop {
    log: Arc<RwLock<EventLog>>,
    deck_optimizer: Arc<dyn DeckOptimizerProvider>,
    sentiment: Arc<dyn SentimentProvider>,
    config: LoopConfig,
    running: AtomicBool,
    stop_requested: AtomicBool,
    stop_notify: Notify,
    metrics: std::sync::RwLock<MetricsState>,
}

impl DecisionLoop {
    pub fn new(
        deck_optimizer: Arc<dyn DeckOptimizerProvider>,
        sentiment: Arc<dyn SentimentProvider>,
        config: LoopConfig,
    ) -> Self {
        Self {
            log: Arc::new(RwLock::new(EventLog::new())),
            deck_optimizer,
            sentiment,
            config,
            running: AtomicBool::new(false),
            stop_requested: AtomicBool::new(false),
            stop_notify: Notify::new(),
            metrics: std::sync::RwLock::new(MetricsState::default()),
        }
    }

    /// Run the loop until it pauses, is stopped, or hits the iteration cap.
    ///
    /// Calling `run` while a run is in progress is a no-op that returns
    /// [`RunOutcome::AlreadyRunning`].
    pub async fn run(&self) -> RunOutcome {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("Decision loop already running, ignoring start request");
            return RunOutcome::AlreadyRunning;
        }
        self.stop_requested.store(false, Ordering::SeqCst);

        info!(max_iterations = self.config.max_iterations, "Decision loop starting");
        let outcome = self.run_inner().await;
        info!(?outcome, "Decision loop finished");

        self.running.store(false, Ordering::SeqCst);
        outcome
    }

    async fn run_inner(&self) -> RunOutcome {
        for iteration in 0..self.config.max_iterations {
            if self.stop_requested.load(Ordering::SeqCst) {
                return RunOutcome::Stopped;
            }
            self.with_metrics(|m| m.iterations += 1);

            match self.iterate(iteration).await {
                Ok(None) => return RunOutcome::Paused,
                Ok(Some(snapshot)) => {
                    let delay = self.adaptive_delay(&snapshot);
                    tokio::select! {
                        _ = tokio::time::sleep(delay) => {}
                        _ = self.stop_notify.notified() => {}
                    }
                }
                Err(e) => {
                    warn!(iteration, error = %e, "Iteration failed, backing off");
                    self.with_metrics(|m| {
                        m.errors += 1;
                        m.average_confidence = (m.average_confidence - 0.1).max(0.1);
                    });
                    self.log.write().await.publish(Observation::error(
                        format!("iteration failed: {e}"),
                        "decision_loop",
                    ));
                    tokio::time::sleep(Duration::from_millis(self.config.error_backoff_ms)).await;
                }
            }
        }
        RunOutcome::MaxIterations
    }

    /// One Observe → Decide → Act cycle. Returns `None` when the loop
    /// should pause, `Some(snapshot)` to keep going.
    async fn iterate(&self, iteration: u32) -> Result<Option<Snapshot>, Error> {
        let snapshot = self.log.read().await.observe();
        if snapshot.done {
            debug!(iteration, "All goals terminal, pausing");
            return Ok(None);
        }

        let started = Instant::now();
        let action = self.decide(&snapshot).await;
        debug!(
            iteration,
            kind = action.kind.as_str(),
            confidence = action.confidence,
            "Executing action"
        );

        self.execute_action(&action, &snapshot.context).await;
        // The action is recorded after its outcome observation so the
        // history reads outcome-first for each cycle.
        self.log.write().await.publish(action.clone());

        let elapsed_ms = started.elapsed().as_millis() as u64;
        self.with_metrics(|m| {
            m.actions_executed += 1;
            m.average_confidence = (m.average_confidence + action.confidence) / 2.0;
            m.response_times.push_back(elapsed_ms);
            while m.response_times.len() > RESPONSE_TIME_WINDOW {
                m.response_times.pop_front();
            }
        });

        let snapshot = self.log.read().await.observe();
        if snapshot.done || snapshot.confidence < 0.1 {
            return Ok(None);
        }
        Ok(Some(snapshot))
    }

    /// Decide the next action. Never fails: any error collapses to a
    /// low-confidence environment observation.
    async fn decide(&self, snapshot: &Snapshot) -> Action {
        match self.try_decide(snapshot).await {
            Ok(action) => action,
            Err(e) => {
                warn!(error = %e, "Decide failed, falling back to observation");
                Action::new(
                    ActionKind::ObserveEnvironment,
                    format!("emergency fallback after decide failure: {e}"),
                    EMERGENCY_CONFIDENCE,
                )
            }
        }
    }

    async fn try_decide(&self, snapshot: &Snapshot) -> Result<Action, Error> {
        let situation = analyze_situation(&snapshot.context);
        let insights = self.gather_insights(&snapshot.context).await;

        let top_goal = snapshot.active_goals().next();
        let (kind, reasoning, mut confidence) = match top_goal {
            Some(goal) => (
                heuristics::action_for_goal(goal.kind),
                format!(
                    "pursuing top goal '{}' ({}) in {} game",
                    goal.description,
                    goal.kind.as_str(),
                    situation.phase.as_str(),
                ),
                0.6,
            ),
            None => (
                ActionKind::ObserveEnvironment,
                "no active goals, observing".to_string(),
                0.4,
            ),
        };

        if snapshot.context.key_count() > 3 {
            confidence += 0.1;
        }
        if top_goal.is_some() {
            confidence += 0.1;
        }
        if snapshot.confidence < 0.4 || snapshot.any_goal_failed() {
            confidence -= 0.2;
        }
        let confidence = clamp_confidence(confidence);

        Ok(Action::new(kind, reasoning, confidence)
            .with_payload(serde_json::to_value(&insights)?))
    }

    /// Query both providers concurrently, each under the configured
    /// timeout. Failures become entries in `Insights::errors`.
    async fn gather_insights(&self, context: &Context) -> Insights {
        let mut insights = Insights::default();
        let limit = Duration::from_secs(self.config.provider_timeout_secs);

        let deck_call = async {
            let deck_ctx = context.deck.as_ref()?;
            if deck_ctx.optimized {
                return None;
            }
            Some(
                timeout(
                    limit,
                    self.deck_optimizer
                        .optimize(&deck_ctx.deck, &deck_ctx.candidate_pool),
                )
                .await,
            )
        };
        let sentiment_call = async {
            let input = context.player.as_ref()?.last_input.as_deref()?;
            Some(timeout(limit, self.sentiment.analyze(input)).await)
        };
        let (deck_result, sentiment_result) = tokio::join!(deck_call, sentiment_call);

        let timed_out = || ProviderError::Timeout {
            timeout_secs: self.config.provider_timeout_secs,
        };
        match deck_result {
            Some(Ok(Ok(opt))) => insights.deck = Some(opt),
            Some(Ok(Err(e))) => insights
                .errors
                .push(format!("{}: {e}", self.deck_optimizer.name())),
            Some(Err(_)) => insights
                .errors
                .push(format!("{}: {}", self.deck_optimizer.name(), timed_out())),
            None => {}
        }
        match sentiment_result {
            Some(Ok(Ok(report))) => insights.sentiment = Some(report),
            Some(Ok(Err(e))) => insights
                .errors
                .push(format!("{}: {e}", self.sentiment.name())),
            Some(Err(_)) => insights
                .errors
                .push(format!("{}: {}", self.sentiment.name(), timed_out())),
            None => {}
        }

        insights
    }

    /// Execute the action's side effects and publish the resulting
    /// observation. Provider failures are published, never propagated.
    async fn execute_action(&self, action: &Action, context: &Context) {
        match action.kind {
            ActionKind::OptimizeDeck => self.run_deck_optimization(context).await,
            ActionKind::AnalyzeGameState
            | ActionKind::EvaluateOpening
            | ActionKind::AssessBoard
            | ActionKind::PlanEndgame => {
                let phase = analyze_situation(context).phase;
                self.log.write().await.publish(Observation::new(
                    ObservationKind::GameState,
                    format!(
                        "{} at turn {} ({} game)",
                        action.kind.as_str(),
                        context.turn(),
                        phase.as_str(),
                    ),
                    "decision_loop",
                ));
            }
            ActionKind::SuggestStrategy | ActionKind::Communicate => {
                self.run_advice(action, context).await;
            }
            ActionKind::TeachMechanics => {
                self.log.write().await.publish(Observation::new(
                    ObservationKind::Feedback,
                    "walked the player through the relevant mechanics",
                    "decision_loop",
                ));
            }
            ActionKind::ObserveEnvironment => {
                let goals = self.log.read().await.goals().len();
                self.log.write().await.publish(Observation::new(
                    ObservationKind::Environment,
                    format!(
                        "observed environment: {} context sections, {} goals",
                        context.key_count(),
                        goals,
                    ),
                    "decision_loop",
                ));
            }
            other => {
                self.log.write().await.publish(Observation::new(
                    ObservationKind::Environment,
                    format!("no handler for '{other}'; action logged only"),
                    "decision_loop",
                ));
            }
        }
    }

    async fn run_deck_optimization(&self, context: &Context) {
        let Some(deck_ctx) = context.deck.clone() else {
            self.log.write().await.publish(Observation::error(
                "optimize_deck requested with no deck in context",
                self.deck_optimizer.name(),
            ));
            return;
        };

        let limit = Duration::from_secs(self.config.provider_timeout_secs);
        let result = timeout(
            limit,
            self.deck_optimizer
                .optimize(&deck_ctx.deck, &deck_ctx.candidate_pool),
        )
        .await;

        match result {
            Ok(Ok(optimization)) => {
                let mut log = self.log.write().await;
                log.publish(Observation::new(
                    ObservationKind::Feedback,
                    format!(
                        "deck optimized: synergy {:.2}, predicted win rate {:.0}%, {} suggestions",
                        optimization.synergy_score,
                        optimization.predicted_win_rate * 100.0,
                        optimization.suggestions.len(),
                    ),
                    self.deck_optimizer.name(),
                ));
                log.update_context(ContextPatch::deck(deckhand_core::DeckContext {
                    deck: optimization.optimized_deck,
                    candidate_pool: deck_ctx.candidate_pool,
                    optimized: true,
                }));
                let completed: Vec<GoalId> = log
                    .goals()
                    .iter()
                    .filter(|g| g.kind == GoalKind::OptimizeDeck && g.is_active())
                    .map(|g| g.id.clone())
                    .collect();
                for id in completed {
                    log.update_goal(&id, &GoalPatch::progress(100));
                    self.with_metrics(|m| m.goals_completed += 1);
                }
            }
            Ok(Err(e)) => {
                self.log.write().await.publish(Observation::error(
                    format!("deck optimization failed: {e}"),
                    self.deck_optimizer.name(),
                ));
            }
            Err(_) => {
                let e = ProviderError::Timeout {
                    timeout_secs: self.config.provider_timeout_secs,
                };
                self.log.write().await.publish(Observation::error(
                    format!("deck optimization failed: {e}"),
                    self.deck_optimizer.name(),
                ));
            }
        }
    }

    async fn run_advice(&self, action: &Action, context: &Context) {
        let tone = match context.player.as_ref().and_then(|p| p.last_input.as_deref()) {
            Some(input) => {
                let limit = Duration::from_secs(self.config.provider_timeout_secs);
                match timeout(limit, self.sentiment.analyze(input)).await {
                    Ok(Ok(report)) => format!(
                        "player sentiment {} (confidence {:.2})",
                        report.sentiment.as_str(),
                        report.confidence
                    ),
                    Ok(Err(e)) => {
                        self.log.write().await.publish(Observation::error(
                            format!("sentiment analysis failed: {e}"),
                            self.sentiment.name(),
                        ));
                        "player sentiment unknown".to_string()
                    }
                    Err(_) => {
                        let e = ProviderError::Timeout {
                            timeout_secs: self.config.provider_timeout_secs,
                        };
                        self.log.write().await.publish(Observation::error(
                            format!("sentiment analysis failed: {e}"),
                            self.sentiment.name(),
                        ));
                        "player sentiment unknown".to_string()
                    }
                }
            }
            None => "no player input to read".to_string(),
        };

        self.log.write().await.publish(Observation::new(
            ObservationKind::Feedback,
            format!("{}: advice delivered, {tone}", action.kind.as_str()),
            "decision_loop",
        ));
    }

    /// Delay grows with the amount of state to track, capped by config.
    fn adaptive_delay(&self, snapshot: &Snapshot) -> Duration {
        let items = snapshot.active_goals().count() + snapshot.context.key_count();
        let ms = (self.config.base_delay_ms + self.config.delay_per_item_ms * items as u64)
            .min(self.config.max_delay_ms);
        Duration::from_millis(ms)
    }

    /// Request a cooperative stop and wake the delay if sleeping.
    pub fn stop(&self) {
        self.stop_requested.store(true, Ordering::SeqCst);
        self.stop_notify.notify_waiters();
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub async fn publish(&self, event: impl Into<AgentEvent>) {
        self.log.write().await.publish(event);
    }

    pub async fn add_goal(&self, goal: Goal) {
        self.log.write().await.add_goal(goal);
    }

    pub async fn update_goal(&self, id: &GoalId, patch: &GoalPatch) {
        let mut log = self.log.write().await;
        let completes = patch.status == Some(GoalStatus::Completed)
            || patch.progress == Some(100);
        let was_active = log.goals().iter().any(|g| g.id == *id && g.is_active());
        log.update_goal(id, patch);
        if completes && was_active {
            self.with_metrics(|m| m.goals_completed += 1);
        }
    }

    pub async fn update_context(&self, patch: ContextPatch) {
        self.log.write().await.update_context(patch);
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.log.read().await.observe()
    }

    pub fn metrics(&self) -> PerformanceMetrics {
        match self.metrics.read() {
            Ok(m) => PerformanceMetrics {
                actions_executed: m.actions_executed,
                goals_completed: m.goals_completed,
                average_confidence: m.average_confidence,
                error_rate: if m.iterations == 0 {
                    0.0
                } else {
                    m.errors as f64 / m.iterations as f64
                },
                response_time_ms: m.response_times.iter().copied().collect(),
            },
            Err(_) => PerformanceMetrics::default(),
        }
    }

    fn with_metrics(&self, f: impl FnOnce(&mut MetricsState)) {
        if let Ok(mut m) = self.metrics.write() {
            f(&mut m);
        }
    }
}
