//! ============================================================================
//! Pending Operations - State of a simulated network round-trip
//! ============================================================================
//! Login, registration and checkout are fixed-duration timers standing in
//! for network calls. `OperationState` is what callers observe, and
//! `SimulatedLatency` is the timer; swapping the timer for real I/O leaves
//! the observable contract unchanged.
//! ============================================================================

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default delay of the simulated auth round-trip
pub const DEFAULT_AUTH_LATENCY_MS: u64 = 1500;

/// Default delay of the simulated seller dashboard sign-in
pub const DEFAULT_SELLER_LATENCY_MS: u64 = 1000;

/// Default delay of the simulated payment processing
pub const DEFAULT_CHECKOUT_LATENCY_MS: u64 = 2000;

/// Default upper bound on a single auth call
pub const DEFAULT_AUTH_TIMEOUT_MS: u64 = 10_000;

/// Lifecycle of an asynchronous operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum OperationState<T> {
    Idle,
    Pending,
    Succeeded(T),
    Failed(String),
}

impl<T> Default for OperationState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> OperationState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Succeeded(_) | Self::Failed(_))
    }

    pub fn succeeded(&self) -> Option<&T> {
        match self {
            Self::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for OperationState<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Succeeded(value),
            Err(e) => Self::Failed(e.to_string()),
        }
    }
}

/// Fixed delay standing in for a network call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedLatency(Duration);

impl SimulatedLatency {
    pub fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }

    /// No delay at all (tests, scripted CLI runs)
    pub fn instant() -> Self {
        Self(Duration::ZERO)
    }

    pub fn duration(&self) -> Duration {
        self.0
    }

    pub async fn wait(&self) {
        if !self.0.is_zero() {
            tokio::time::sleep(self.0).await;
        }
    }
}

impl Default for SimulatedLatency {
    fn default() -> Self {
        Self::from_millis(DEFAULT_AUTH_LATENCY_MS)
    }
}
