//! Rolling performance metrics published by the decision loop.

use serde::{Deserialize, Serialize};

/// A point-in-time report of how the loop has been performing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Actions executed since the loop was created.
    pub actions_executed: u64,

    /// Goals that transitioned to completed.
    pub goals_completed: u64,

    /// Exponentially-smoothed confidence of published actions.
    pub average_confidence: f64,

    /// Iteration errors divided by iterations run (0 when idle).
    pub error_rate: f64,

    /// The most recent iteration durations, newest last. Bounded ring
    /// of 100 samples.
    pub response_time_ms: Vec<u64>,
}
