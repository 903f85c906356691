//! Plan upgrades through an external checkout.
//!
//! A checkout is confirmed by polling the gateway until the session is paid,
//! abandoned, times out, or the caller cancels. Nothing is assumed paid just
//! because the customer went away.

pub mod config;
pub mod confirm;
pub mod error;
pub mod gateway;

pub use config::CheckoutConfig;
pub use confirm::{confirm_checkout, CheckoutOutcome};
pub use error::{BillingError, BillingResult};
pub use gateway::{
    checkout_url, CheckoutGateway, CheckoutScript, CheckoutSession, CheckoutStatus,
    SimulatedCheckout,
};
