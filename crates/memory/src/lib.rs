//! Agent memory for Deckhand.
//!
//! The [`EventLog`] is the single owner of everything the agent remembers:
//! the append-only event history, the bounded short-term buffer, pattern
//! counters, the long-term fact map, accumulated learnings, the goal
//! registry, and the current context. `observe()` derives an immutable
//! [`deckhand_core::Snapshot`] from it.

pub mod event_log;

pub use event_log::{EventLog, SHORT_TERM_CAP, SHORT_TERM_RETAIN};
