//! Wizard error types.

use foobi_billing::BillingError;
use foobi_generation::GenerationError;
use foobi_models::{TimelineError, WizardScreen};
use foobi_storage::StorageError;
use thiserror::Error;
use validator::ValidationErrors;

use crate::state::OpId;

pub type WizardResult<T> = Result<T, WizardError>;

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Billing error: {0}")]
    Billing(#[from] BillingError),

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// An action the current state does not accept. The state is left unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransitionError {
    #[error("{action} is not allowed on the {screen} screen")]
    NotAllowed {
        action: &'static str,
        screen: WizardScreen,
    },

    #[error("Step {0} cannot be navigated to")]
    StepNotNavigable(u8),

    #[error("Operation {0} is no longer current")]
    StaleOperation(OpId),

    #[error("No {0} prompt to answer")]
    NoSuchPrompt(&'static str),

    #[error("A checkout is already in progress")]
    CheckoutInProgress,

    #[error("Unknown concept: {0}")]
    UnknownConcept(u32),

    #[error("Unknown scene: {0}")]
    UnknownScene(u32),

    #[error("Unknown media index: {0}")]
    UnknownMedia(usize),

    #[error("Unknown video: {0}")]
    UnknownVideo(String),

    #[error("Trim end {trim_end}s is past the video length {length}s")]
    TrimOutOfRange { trim_end: u32, length: u32 },

    #[error("Invalid timeline: {0}")]
    InvalidTimeline(#[from] TimelineError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}

impl WizardError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
