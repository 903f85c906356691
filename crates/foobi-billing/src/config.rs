//! Checkout configuration.

use std::time::Duration;

/// Default hosted checkout page; the price id is appended to it.
pub const DEFAULT_CHECKOUT_BASE_URL: &str = "https://checkout.stripe.com/pay/";

#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Checkout page prefix
    pub base_url: String,
    /// Where the provider sends the customer after paying or cancelling
    pub return_url: String,
    /// Delay between status polls
    pub poll_interval: Duration,
    /// Give up after this long without a final status
    pub timeout: Duration,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CHECKOUT_BASE_URL.to_string(),
            return_url: "http://localhost:5173".to_string(),
            poll_interval: Duration::from_secs(1),
            timeout: Duration::from_secs(300),
        }
    }
}

impl CheckoutConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("CHECKOUT_BASE_URL").unwrap_or(defaults.base_url),
            return_url: std::env::var("CHECKOUT_RETURN_URL").unwrap_or(defaults.return_url),
            poll_interval: secs_env("CHECKOUT_POLL_INTERVAL_SECS").unwrap_or(defaults.poll_interval),
            timeout: secs_env("CHECKOUT_TIMEOUT_SECS").unwrap_or(defaults.timeout),
        }
    }
}

fn secs_env(key: &str) -> Option<Duration> {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .map(Duration::from_secs)
}
