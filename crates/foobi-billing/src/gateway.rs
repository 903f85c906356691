//! Checkout gateway seam and an in-process simulation of it.

use std::collections::HashMap;

use async_trait::async_trait;
use foobi_models::PlanTier;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::config::CheckoutConfig;
use crate::error::{BillingError, BillingResult};

/// An open checkout for one plan tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub tier: PlanTier,
    /// Page the customer pays on
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStatus {
    Pending,
    Paid,
    Abandoned,
}

/// Payment provider capability.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    async fn create_session(&self, tier: PlanTier) -> BillingResult<CheckoutSession>;

    async fn session_status(&self, session_id: &str) -> BillingResult<CheckoutStatus>;
}

/// Hosted checkout URL for a paid tier.
///
/// `{base}{price_id}?success_url=..&cancel_url=..`, both pointing back at the
/// configured return URL.
pub fn checkout_url(config: &CheckoutConfig, tier: PlanTier) -> BillingResult<Url> {
    let price_id = tier
        .offer()
        .checkout_price_id
        .ok_or(BillingError::NoCheckout(tier))?;

    let mut url = Url::parse(&config.base_url)?.join(price_id)?;
    url.query_pairs_mut()
        .append_pair("success_url", &config.return_url)
        .append_pair("cancel_url", &config.return_url);
    Ok(url)
}

/// How a simulated session resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutScript {
    /// Paid once the status has been polled this many times
    PayAfter(u32),
    /// Abandoned once the status has been polled this many times
    AbandonAfter(u32),
    /// Never leaves pending
    Pending,
}

#[derive(Debug)]
struct SimulatedSession {
    polls: u32,
}

/// Gateway that resolves sessions according to a fixed script.
pub struct SimulatedCheckout {
    config: CheckoutConfig,
    script: CheckoutScript,
    sessions: Mutex<HashMap<String, SimulatedSession>>,
}

impl SimulatedCheckout {
    pub fn new(config: CheckoutConfig, script: CheckoutScript) -> Self {
        Self {
            config,
            script,
            sessions: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl CheckoutGateway for SimulatedCheckout {
    async fn create_session(&self, tier: PlanTier) -> BillingResult<CheckoutSession> {
        let url = checkout_url(&self.config, tier)?;
        let id = format!("cs_sim_{}", Uuid::new_v4().simple());

        self.sessions
            .lock()
            .await
            .insert(id.clone(), SimulatedSession { polls: 0 });
        debug!(session_id = %id, tier = %tier, "Created simulated checkout session");

        Ok(CheckoutSession {
            id,
            tier,
            url: url.into(),
        })
    }

    async fn session_status(&self, session_id: &str) -> BillingResult<CheckoutStatus> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| BillingError::SessionNotFound(session_id.to_string()))?;
        session.polls += 1;

        let status = match self.script {
            CheckoutScript::PayAfter(n) if session.polls >= n => CheckoutStatus::Paid,
            CheckoutScript::AbandonAfter(n) if session.polls >= n => CheckoutStatus::Abandoned,
            _ => CheckoutStatus::Pending,
        };
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_url() {
        let config = CheckoutConfig {
            return_url: "https://foobi.example".to_string(),
            ..Default::default()
        };
        let url = checkout_url(&config, PlanTier::Pro).unwrap();
        assert_eq!(url.path(), "/pay/price_pro_monthly_2980");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("success_url".to_string(), "https://foobi.example".to_string()),
                ("cancel_url".to_string(), "https://foobi.example".to_string()),
            ]
        );
    }

    #[test]
    fn test_free_has_no_checkout() {
        let err = checkout_url(&CheckoutConfig::default(), PlanTier::Free).unwrap_err();
        assert!(matches!(err, BillingError::NoCheckout(PlanTier::Free)));
    }

    #[tokio::test]
    async fn test_simulated_session_pays_after_polls() {
        let gateway = SimulatedCheckout::new(CheckoutConfig::default(), CheckoutScript::PayAfter(2));
        let session = gateway.create_session(PlanTier::Enterprise).await.unwrap();
        assert!(session.url.contains("price_enterprise_monthly_9800"));

        assert_eq!(gateway.session_status(&session.id).await.unwrap(), CheckoutStatus::Pending);
        assert_eq!(gateway.session_status(&session.id).await.unwrap(), CheckoutStatus::Paid);
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let gateway = SimulatedCheckout::new(CheckoutConfig::default(), CheckoutScript::Pending);
        let err = tokio_test::assert_err!(gateway.session_status("cs_missing").await);
        assert!(matches!(err, BillingError::SessionNotFound(_)));

        let session = tokio_test::assert_ok!(gateway.create_session(PlanTier::Pro).await);
        assert!(session.id.starts_with("cs_sim_"));
    }
}
