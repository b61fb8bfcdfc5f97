//! Shared application state for the quirks server

use std::sync::Arc;

use chrono::{DateTime, Utc};
use quirks_core::{CharacterGenerator, Clock, MonotonicClock, NoveltySelector, RateGate};

use crate::ServerConfig;

/// Shared application state accessible by all handlers
#[derive(Clone)]
pub struct AppState {
    /// Per-client admission control
    pub rate_gate: Arc<RateGate>,
    /// Repeat-avoidance and last accepted characters
    pub selector: Arc<NoveltySelector>,
    /// Generation collaborator
    pub generator: Arc<dyn CharacterGenerator>,
    /// Time source for the rate gate
    pub clock: Arc<dyn Clock>,
    /// Use the first `X-Forwarded-For` entry as the client key
    pub trust_forwarded_for: bool,
    /// When the server started
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Create state from server configuration and a generator
    pub fn new(config: &ServerConfig, generator: Arc<dyn CharacterGenerator>) -> Self {
        Self {
            rate_gate: Arc::new(RateGate::new(config.rate_gate.clone())),
            selector: Arc::new(NoveltySelector::new(config.selection.clone())),
            generator,
            clock: Arc::new(MonotonicClock::new()),
            trust_forwarded_for: config.trust_forwarded_for,
            started_at: Utc::now(),
        }
    }

    /// Replace the clock (for testing)
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns how long the server has been running
    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quirks_core::{ManualClock, MockGenerator};

    #[test]
    fn test_app_state_new() {
        let state = AppState::new(&ServerConfig::default(), Arc::new(MockGenerator::new()));
        assert!(state.uptime_seconds() >= 0);
        assert!(!state.trust_forwarded_for);
        assert_eq!(state.rate_gate.cooldown_ms(), 5_000);
        assert_eq!(state.selector.max_attempts(), 5);
    }

    #[test]
    fn test_app_state_with_clock() {
        let clock = Arc::new(ManualClock::new(42));
        let state = AppState::new(&ServerConfig::default(), Arc::new(MockGenerator::new()))
            .with_clock(clock);
        assert_eq!(state.clock.now_ms(), 42);
    }
}
