//! The Foobi video creation wizard.
//!
//! The wizard is a pure state machine ([`reduce`]) driven by a
//! [`WizardController`] that owns the state, persists progress, and runs
//! concept generation, rendering and checkout in the background.

pub mod action;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod reducer;
pub mod state;

pub use action::{Action, ConceptEdit, DetailsPatch, Effect};
pub use config::{StorageBackend, WizardConfig};
pub use controller::WizardController;
pub use error::{TransitionError, WizardError, WizardResult};
pub use reducer::{reduce, Transition, UNTITLED_VIDEO};
pub use state::{DownloadChoice, OpId, Prompt, Screen, Session, WizardState};
