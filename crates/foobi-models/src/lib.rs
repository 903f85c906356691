//! Shared data models for the Foobi video studio.
//!
//! This crate provides Serde-serializable types for:
//! - Plan tiers, the plan catalog and generation models
//! - Drafts, concepts and scene timelines
//! - Video history entries
//! - The saved-progress record used for session resumption
//! - Editor and account settings

pub mod concept;
pub mod draft;
pub mod edit;
pub mod generation_model;
pub mod history;
pub mod plan;
pub mod progress;
pub mod settings;

// Re-export common types
pub use concept::{Concept, ConceptPatch, MediaFile, MediaKind, Scene, ScenePatch, TimelineError};
pub use draft::{CreativeBrief, Draft, DEFAULT_VIDEO_LENGTH_SECS};
pub use edit::{EditSettings, ExportFormat, ExportQuality, TextOverlay, TextPosition, VideoEffect};
pub use generation_model::{can_use_model, GenerationModel};
pub use history::{HistoryId, VideoHistory, VideoHistoryEntry};
pub use plan::{format_yen, PlanOffer, PlanTier};
pub use progress::{SavedProgress, WizardScreen, WizardStep};
pub use settings::{Credentials, Theme, UserSettings};
