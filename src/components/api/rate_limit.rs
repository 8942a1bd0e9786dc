//! Request budget tracking for the GraphQL endpoint.
//!
//! The API documents a fixed request quota per rolling window. The governor
//! counts calls inside the current window and, when the count comes within a
//! safety margin of the budget, suspends the calling task until the window
//! elapses before letting the next request through. An alternative would be to
//! optimistically reset the counter without waiting, but that under-protects
//! against real throttling, so the governor really sleeps.

use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

/// Documented request quota per window
pub const DEFAULT_BUDGET: u32 = 500;

/// Window length the quota applies to
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Stop this many calls short of the budget
pub const DEFAULT_SAFETY_MARGIN: u32 = 5;

/// Tracks calls made inside the current rate window
#[derive(Debug)]
pub struct RateGovernor {
    budget: u32,
    window: Duration,
    safety_margin: u32,
    window_start: Instant,
    calls: u32,
}

impl Default for RateGovernor {
    fn default() -> Self {
        Self::with_limits(DEFAULT_BUDGET, DEFAULT_WINDOW, DEFAULT_SAFETY_MARGIN)
    }
}

impl RateGovernor {
    /// Create a governor with explicit limits
    pub fn with_limits(budget: u32, window: Duration, safety_margin: u32) -> Self {
        Self {
            budget,
            window,
            safety_margin,
            window_start: Instant::now(),
            calls: 0,
        }
    }

    /// Gate one outbound call. Resets the window if it has elapsed; suspends
    /// until it elapses when the call count is within the safety margin of
    /// the budget. Never fails.
    pub async fn check(&mut self) {
        let elapsed = self.window_start.elapsed();
        if elapsed >= self.window {
            debug!(calls = self.calls, "Rate window elapsed, resetting counter");
            self.reset();
            return;
        }

        if self.calls + self.safety_margin >= self.budget {
            let remaining = self.window - elapsed;
            info!(
                calls = self.calls,
                budget = self.budget,
                "Approaching rate limit, pausing {:.1}s until the window resets",
                remaining.as_secs_f64()
            );
            tokio::time::sleep(remaining).await;
            self.reset();
        }
    }

    /// Record one completed call against the current window
    pub fn record_call(&mut self) {
        self.calls += 1;
    }

    /// Calls recorded in the current window
    pub fn calls(&self) -> u32 {
        self.calls
    }

    fn reset(&mut self) {
        self.calls = 0;
        self.window_start = Instant::now();
    }
}
