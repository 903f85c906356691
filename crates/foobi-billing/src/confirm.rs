//! Poll a checkout session until it settles.

use foobi_models::PlanTier;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::CheckoutConfig;
use crate::error::BillingResult;
use crate::gateway::{CheckoutGateway, CheckoutStatus};

/// Final result of a checkout attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Provider reported the session paid
    Confirmed(PlanTier),
    /// Customer left without paying
    Abandoned,
    /// No final status within the configured timeout
    TimedOut,
    /// Caller stopped waiting
    Cancelled,
}

impl CheckoutOutcome {
    pub fn confirmed_tier(&self) -> Option<PlanTier> {
        match self {
            CheckoutOutcome::Confirmed(tier) => Some(*tier),
            _ => None,
        }
    }
}

/// Open a checkout for `tier` and wait for it to settle.
///
/// Retryable status errors are logged and polling continues. Session creation
/// failures and non-retryable status errors are returned.
pub async fn confirm_checkout(
    gateway: &dyn CheckoutGateway,
    tier: PlanTier,
    config: &CheckoutConfig,
    cancel: &CancellationToken,
) -> BillingResult<CheckoutOutcome> {
    let session = gateway.create_session(tier).await?;
    info!(session_id = %session.id, tier = %tier, url = %session.url, "Checkout session opened");

    let deadline = Instant::now() + config.timeout;
    let mut polls = 0u32;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!(session_id = %session.id, "Checkout cancelled");
                return Ok(CheckoutOutcome::Cancelled);
            }
            _ = tokio::time::sleep_until(deadline) => {
                warn!(session_id = %session.id, polls, "Checkout timed out");
                return Ok(CheckoutOutcome::TimedOut);
            }
            _ = tokio::time::sleep(config.poll_interval) => {}
        }

        polls += 1;
        match gateway.session_status(&session.id).await {
            Ok(CheckoutStatus::Paid) => {
                info!(session_id = %session.id, tier = %tier, polls, "Checkout confirmed");
                return Ok(CheckoutOutcome::Confirmed(tier));
            }
            Ok(CheckoutStatus::Abandoned) => {
                info!(session_id = %session.id, polls, "Checkout abandoned");
                return Ok(CheckoutOutcome::Abandoned);
            }
            Ok(CheckoutStatus::Pending) => {}
            Err(e) if e.is_retryable() => {
                warn!(session_id = %session.id, error = %e, "Checkout status poll failed");
            }
            Err(e) => return Err(e),
        }
    }
}
