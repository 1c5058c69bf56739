use std::env;
use std::time::Duration;

use tracing::warn;

/// Tunables for a lesson session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Grace period between a passing submission and the jump to the next
    /// lesson, long enough for the success notice to be read.
    pub navigation_delay: Duration,
}

impl SessionConfig {
    pub const DEFAULT_NAVIGATION_DELAY: Duration = Duration::from_millis(1500);

    /// Reads `LESSON_NAV_DELAY_MS`, falling back to the default delay.
    #[must_use]
    pub fn from_env() -> Self {
        let navigation_delay = match env::var("LESSON_NAV_DELAY_MS") {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) => Duration::from_millis(ms),
                Err(err) => {
                    warn!(%raw, error = %err, "ignoring invalid LESSON_NAV_DELAY_MS");
                    Self::DEFAULT_NAVIGATION_DELAY
                }
            },
            Err(_) => Self::DEFAULT_NAVIGATION_DELAY,
        };
        Self { navigation_delay }
    }

    #[must_use]
    pub fn with_navigation_delay(mut self, delay: Duration) -> Self {
        self.navigation_delay = delay;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            navigation_delay: Self::DEFAULT_NAVIGATION_DELAY,
        }
    }
}
