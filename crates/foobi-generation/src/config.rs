//! Backend selection configuration.

use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::client::GenerationClientConfig;

/// Which implementation backs the generation capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    #[default]
    Mock,
    Remote,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(BackendKind::Mock),
            "remote" => Ok(BackendKind::Remote),
            other => Err(format!("unknown generation backend: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub backend: BackendKind,
    /// Mock delay before concepts are returned
    pub concept_latency: Duration,
    /// Mock delay before a render completes
    pub render_latency: Duration,
    pub remote: GenerationClientConfig,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Mock,
            concept_latency: Duration::from_millis(3000),
            render_latency: Duration::from_millis(8000),
            remote: GenerationClientConfig::default(),
        }
    }
}

impl GenerationConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let backend = match std::env::var("FOOBI_GENERATION_BACKEND") {
            Ok(value) => value.parse().unwrap_or_else(|e| {
                warn!(error = %e, "Falling back to mock generation backend");
                BackendKind::Mock
            }),
            Err(_) => defaults.backend,
        };

        Self {
            backend,
            concept_latency: millis_env("FOOBI_CONCEPT_LATENCY_MS").unwrap_or(defaults.concept_latency),
            render_latency: millis_env("FOOBI_RENDER_LATENCY_MS").unwrap_or(defaults.render_latency),
            remote: GenerationClientConfig::from_env(),
        }
    }

    /// Mock backend with no artificial delay.
    pub fn instant_mock() -> Self {
        Self {
            concept_latency: Duration::ZERO,
            render_latency: Duration::ZERO,
            ..Self::default()
        }
    }
}

fn millis_env(key: &str) -> Option<Duration> {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_parse() {
        assert_eq!("mock".parse::<BackendKind>().unwrap(), BackendKind::Mock);
        assert_eq!(" Remote ".parse::<BackendKind>().unwrap(), BackendKind::Remote);
        assert!("grpc".parse::<BackendKind>().is_err());
    }

    #[test]
    fn test_defaults() {
        let config = GenerationConfig::default();
        assert_eq!(config.backend, BackendKind::Mock);
        assert_eq!(config.concept_latency, Duration::from_secs(3));
        assert_eq!(config.render_latency, Duration::from_secs(8));
    }
}
