//! `deckhand run` — Start the autonomous decision loop.

use deckhand_agent::DecisionLoop;
use deckhand_config::AppConfig;
use deckhand_core::{ContextPatch, Goal, GoalKind, PlayerProfile};
use deckhand_providers::{HeuristicDeckOptimizer, LexiconSentimentAnalyzer};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

pub async fn run(
    config_path: &Path,
    deck: Option<PathBuf>,
    input: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load_or_default(config_path)
        .map_err(|e| format!("Failed to load config: {e}"))?;

    let agent = Arc::new(DecisionLoop::new(
        Arc::new(HeuristicDeckOptimizer::new()),
        Arc::new(LexiconSentimentAnalyzer::new()),
        config.decision_loop.clone(),
    ));

    if let Some(path) = deck {
        let deck_ctx = super::load_deck_file(&path)?;
        println!("  Deck:   {}", super::deck_summary(&deck_ctx.deck));
        agent.update_context(ContextPatch::deck(deck_ctx)).await;
        agent
            .add_goal(Goal::new(
                GoalKind::OptimizeDeck,
                "optimize the loaded deck",
                7,
            ))
            .await;
    }

    if let Some(text) = input {
        agent
            .update_context(ContextPatch::player(PlayerProfile {
                last_input: Some(text),
                ..PlayerProfile::default()
            }))
            .await;
        agent
            .add_goal(Goal::new(
                GoalKind::AssistPlayer,
                "respond to the player's message",
                5,
            ))
            .await;
    }

    // Without a standing goal the loop would pause before its first action.
    if agent.snapshot().await.goals.is_empty() {
        agent
            .add_goal(Goal::new(
                GoalKind::AnalyzeGame,
                "maintain situational awareness",
                3,
            ))
            .await;
    }

    // Ctrl+C requests a cooperative stop; the loop exits at its next
    // checkpoint.
    {
        let agent = Arc::clone(&agent);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupt received, stopping the loop");
                agent.stop();
            }
        });
    }

    let outcome = agent.run().await;

    let metrics = agent.metrics();
    let snapshot = agent.snapshot().await;
    println!();
    println!("  Outcome:          {outcome:?}");
    println!("  Actions executed: {}", metrics.actions_executed);
    println!("  Goals completed:  {}", metrics.goals_completed);
    println!("  Avg confidence:   {:.2}", metrics.average_confidence);
    println!("  Error rate:       {:.2}", metrics.error_rate);
    println!("  Events in log:    {}", snapshot.history.len());
    println!();

    Ok(())
}
