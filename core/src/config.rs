//! Deploy-time constants and the knobs derived from them.

use std::time::Duration;

/// Scoring backend published as a web-app endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://script.google.com/macros/s/AKfycbyzgYnnj-_AJQcGq_ezvAMM7sQKOGQVA0CDh0mF8nAjx-j9zzO-yuNYXoJEtfPzXtjR/exec";

/// Time for the indicator to sweep from 0% to 100%.
pub const DEFAULT_ANIMATION_DURATION: Duration = Duration::from_millis(1500);

/// Pause between forcing the fill to 100% and hiding the indicator.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(220);

/// Upper bound on a single lookup round-trip.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Timing of the progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimatorConfig {
    pub duration: Duration,
    pub settle_delay: Duration,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            duration: DEFAULT_ANIMATION_DURATION,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}

/// Everything a `LookupController` needs to know about its environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupConfig {
    pub endpoint: String,
    pub animation: AnimatorConfig,
    pub request_timeout: Duration,
}

impl LookupConfig {
    pub fn with_endpoint(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            ..Self::default()
        }
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            animation: AnimatorConfig::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}
