//! Cooldown gate for fallback calls.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

/// Default cooldown between fallback calls: six hours.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(6 * 60 * 60);

/// Decides whether the fallback provider may be called, given when it was
/// last called successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackThrottle {
    cooldown: Duration,
}

impl Default for FallbackThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

impl FallbackThrottle {
    pub fn new(cooldown: Duration) -> Self {
        Self { cooldown }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Whether a call at `now` is allowed after a previous call at `last`.
    ///
    /// No previous call always permits. A marker later than `now` (clock
    /// skew between store and resolver) blocks until `now` catches up.
    pub fn permits(&self, last: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        let Some(last) = last else {
            return true;
        };
        // A cooldown too large for chrono never expires.
        let Ok(cooldown) = TimeDelta::from_std(self.cooldown) else {
            return false;
        };

        let elapsed = now.signed_duration_since(last);
        elapsed >= TimeDelta::zero() && elapsed >= cooldown
    }
}
