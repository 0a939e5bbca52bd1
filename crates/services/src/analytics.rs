use std::env;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use academy_core::model::Locale;
use academy_core::time::Clock;

#[derive(Clone, Debug)]
pub struct ConversionConfig {
    pub endpoint: String,
}

impl ConversionConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let endpoint = env::var("ACADEMY_ANALYTICS_URL").ok()?;
        if endpoint.trim().is_empty() {
            return None;
        }
        Some(Self { endpoint })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConversionPayload<'a> {
    event: &'a str,
    trigger: &'a str,
    language: &'a str,
    timestamp: DateTime<Utc>,
    context_data: serde_json::Value,
}

/// Fire-and-forget conversion/analytics sink.
///
/// Tracking failures are caught and logged, never surfaced to the user and
/// never allowed to block or alter the learning flow. Unconfigured sinks
/// drop events silently.
#[derive(Clone)]
pub struct ConversionSink {
    client: Client,
    config: Option<ConversionConfig>,
    clock: Clock,
}

impl ConversionSink {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(ConversionConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<ConversionConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
            clock: Clock::default_clock(),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Posts one event. Any failure (network, non-2xx status) is logged at
    /// warn level and swallowed.
    pub async fn track(
        &self,
        event: &str,
        trigger: &str,
        language: Locale,
        context_data: serde_json::Value,
    ) {
        let Some(config) = self.config.as_ref() else {
            debug!(event, "analytics sink disabled; dropping event");
            return;
        };

        let payload = ConversionPayload {
            event,
            trigger,
            language: language.code(),
            timestamp: self.clock.now(),
            context_data,
        };

        match self.client.post(&config.endpoint).json(&payload).send().await {
            Ok(response) if !response.status().is_success() => {
                warn!(event, status = %response.status(), "analytics endpoint rejected event");
            }
            Ok(_) => {}
            Err(err) => {
                warn!(event, %err, "failed to post analytics event");
            }
        }
    }
}
