use std::time::{Duration, Instant};

/// Debounce for automatic insight refreshes.
///
/// Every tracked change restarts the quiet period. Once the period has
/// elapsed with no further change, the pending refresh is consumed; it
/// only fires if the session already has insights, so the first load
/// never refreshes on its own.
///
/// Time is passed in explicitly so hosts can drive it from any timer.
#[derive(Debug, Clone)]
pub struct RefreshScheduler {
    quiet_period: Duration,
    last_change: Option<Instant>,
}

impl RefreshScheduler {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            last_change: None,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Note a change to persona, budgets, goals or transactions.
    pub fn record_change(&mut self, at: Instant) {
        self.last_change = Some(at);
    }

    pub fn is_pending(&self) -> bool {
        self.last_change.is_some()
    }

    /// How long until the pending refresh becomes due, if one is pending.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.last_change
            .map(|at| self.quiet_period.saturating_sub(now.saturating_duration_since(at)))
    }

    /// Consume the pending refresh if its quiet period has elapsed.
    ///
    /// Returns `true` when a refresh should be issued now. An elapsed
    /// period with no insights yet is consumed without firing.
    pub fn take_due(&mut self, now: Instant, has_insights: bool) -> bool {
        match self.time_until_due(now) {
            Some(wait) if wait.is_zero() => {
                self.last_change = None;
                has_insights
            }
            _ => false,
        }
    }

    /// Forget any pending change (a manual refresh already covers it).
    pub fn clear(&mut self) {
        self.last_change = None;
    }
}
