//! `deckhand advise` — One-shot reasoning over the given context.
//!
//! Builds an in-memory event log from the command-line state, runs the
//! reasoning engine for the requested number of steps, and prints each
//! decision's trace. Nothing is executed; this shows what the agent
//! *would* do.

use deckhand_agent::ReasoningEngine;
use deckhand_core::{ContextPatch, GameContext, PlayerProfile};
use deckhand_memory::EventLog;
use std::path::PathBuf;

pub async fn run(
    deck: Option<PathBuf>,
    input: Option<String>,
    turn: u32,
    steps: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut log = EventLog::new();

    if turn > 0 {
        log.update_context(ContextPatch::game(GameContext {
            turn,
            ..GameContext::default()
        }));
    }
    if let Some(path) = deck {
        let deck_ctx = super::load_deck_file(&path)?;
        println!("  Deck: {}", super::deck_summary(&deck_ctx.deck));
        log.update_context(ContextPatch::deck(deck_ctx));
    }
    if let Some(text) = input {
        log.update_context(ContextPatch::player(PlayerProfile {
            last_input: Some(text),
            ..PlayerProfile::default()
        }));
    }

    let engine = ReasoningEngine::new();
    for step in 1..=steps {
        let action = engine.advance(&mut log);
        println!();
        println!("  Step {step}:");
        println!("    Action:     {}", action.kind);
        println!("    Confidence: {:.2}", action.confidence);
        println!("    Reasoning:  {}", action.reasoning);
        if let Some(expected) = &action.expected_result {
            println!("    Expecting:  {expected}");
        }
    }

    println!();
    println!("  Goals after reasoning:");
    for goal in log.goals() {
        println!(
            "    [{}] p{} {} — {:?} ({}%)",
            goal.kind.as_str(),
            goal.priority,
            goal.description,
            goal.status,
            goal.progress,
        );
    }
    println!();

    Ok(())
}
