//! Billing error types.

use foobi_models::PlanTier;
use thiserror::Error;

pub type BillingResult<T> = Result<T, BillingError>;

#[derive(Debug, Error)]
pub enum BillingError {
    #[error("Plan {0} does not go through checkout")]
    NoCheckout(PlanTier),

    #[error("Invalid checkout URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Checkout session not found: {0}")]
    SessionNotFound(String),

    #[error("Checkout gateway error: {0}")]
    Gateway(String),
}

impl BillingError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, BillingError::Gateway(_))
    }
}
