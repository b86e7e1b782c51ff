//! Error types for the Deckhand domain.
//!
//! Uses `thiserror` for ergonomic error definitions. The surface is
//! deliberately small: the event log is infallible, so errors only come
//! from capability providers, serialization, and internal invariants.

use thiserror::Error;

/// The top-level error type for all Deckhand operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Capability provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised by capability providers.
///
/// The decision loop catches every one of these at the call site and
/// degrades the corresponding insight instead of propagating.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid provider input: {0}")]
    InvalidInput(String),

    #[error("Provider call timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}
