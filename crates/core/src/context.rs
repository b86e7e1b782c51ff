//! Game context — what the agent currently knows about the table.
//!
//! Context is a tagged set of known sections (game, deck, player) plus a
//! free-form escape-hatch bag for anything callers want to attach.
//! Downstream consumers check [`Context::has`] instead of probing optional
//! fields on an untyped map.

use crate::card::{Card, Deck};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The sections a context can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextKind {
    Game,
    Deck,
    Player,
}

/// State of the match in progress.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameContext {
    /// Current turn number, 1-based. 0 means no game started.
    #[serde(default)]
    pub turn: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opponent: Option<String>,

    /// Free-text summary of the board, if the caller tracks one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_summary: Option<String>,
}

/// The player's deck plus the pool of cards it could draw replacements from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckContext {
    pub deck: Deck,

    #[serde(default)]
    pub candidate_pool: Vec<Card>,

    /// Whether an optimization pass already ran for this deck.
    #[serde(default)]
    pub optimized: bool,
}

/// What the agent knows about the player it assists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub skill: SkillLevel,

    /// The most recent thing the player typed, if anything.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_input: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Beginner,
    #[default]
    Intermediate,
    Expert,
}

/// The full context the agent reasons over.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game: Option<GameContext>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deck: Option<DeckContext>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<PlayerProfile>,

    /// Escape hatch for caller-defined extras; no schema enforced.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Context {
    /// Capability check: does the context carry this section?
    pub fn has(&self, kind: ContextKind) -> bool {
        match kind {
            ContextKind::Game => self.game.is_some(),
            ContextKind::Deck => self.deck.is_some(),
            ContextKind::Player => self.player.is_some(),
        }
    }

    /// Number of populated keys (sections plus extras). Drives the
    /// decision loop's confidence adjustment and adaptive delay.
    pub fn key_count(&self) -> usize {
        [self.game.is_some(), self.deck.is_some(), self.player.is_some()]
            .iter()
            .filter(|present| **present)
            .count()
            + self.extra.len()
    }

    /// Current turn, or 0 when no game section is present.
    pub fn turn(&self) -> u32 {
        self.game.as_ref().map_or(0, |g| g.turn)
    }

    /// Merge a partial update: present sections replace, extras are
    /// merged key-by-key.
    pub fn merge(&mut self, patch: ContextPatch) {
        if let Some(game) = patch.game {
            self.game = Some(game);
        }
        if let Some(deck) = patch.deck {
            self.deck = Some(deck);
        }
        if let Some(player) = patch.player {
            self.player = Some(player);
        }
        for (key, value) in patch.extra {
            self.extra.insert(key, value);
        }
    }
}

/// A partial context update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game: Option<GameContext>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deck: Option<DeckContext>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<PlayerProfile>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ContextPatch {
    pub fn game(game: GameContext) -> Self {
        Self {
            game: Some(game),
            ..Self::default()
        }
    }

    pub fn deck(deck: DeckContext) -> Self {
        Self {
            deck: Some(deck),
            ..Self::default()
        }
    }

    pub fn player(player: PlayerProfile) -> Self {
        Self {
            player: Some(player),
            ..Self::default()
        }
    }

    pub fn extra(key: impl Into<String>, value: serde_json::Value) -> Self {
        let mut extra = BTreeMap::new();
        extra.insert(key.into(), value);
        Self {
            extra,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Deck;

    #[test]
    fn empty_context_has_nothing() {
        let ctx = Context::default();
        assert!(!ctx.has(ContextKind::Game));
        assert!(!ctx.has(ContextKind::Deck));
        assert!(!ctx.has(ContextKind::Player));
        assert_eq!(ctx.key_count(), 0);
        assert_eq!(ctx.turn(), 0);
    }

    #[test]
    fn merge_replaces_sections_and_merges_extras() {
        let mut ctx = Context::default();
        ctx.merge(ContextPatch::game(GameContext {
            turn: 2,
            ..GameContext::default()
        }));
        ctx.merge(ContextPatch::extra("table", serde_json::json!("casual")));
        ctx.merge(ContextPatch::game(GameContext {
            turn: 5,
            ..GameContext::default()
        }));

        assert_eq!(ctx.turn(), 5);
        assert_eq!(ctx.extra["table"], "casual");
        assert_eq!(ctx.key_count(), 2); // game section + one extra
    }

    #[test]
    fn key_count_counts_sections_and_extras() {
        let mut ctx = Context::default();
        ctx.merge(ContextPatch::deck(DeckContext {
            deck: Deck::new("d1", "mono-ember", vec![]),
            candidate_pool: vec![],
            optimized: false,
        }));
        ctx.merge(ContextPatch::player(PlayerProfile::default()));
        ctx.merge(ContextPatch::extra("a", serde_json::json!(1)));
        ctx.merge(ContextPatch::extra("b", serde_json::json!(2)));
        assert_eq!(ctx.key_count(), 4);
    }
}
