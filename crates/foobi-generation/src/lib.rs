//! Concept generation and video rendering backends.
//!
//! The wizard talks to two capabilities, [`ConceptGenerator`] and
//! [`VideoRenderer`]. This crate provides:
//! - A deterministic mock studio that returns canned output after a fixed delay
//! - An HTTP client for a real generation service
//! - Backend selection from configuration

pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod mock;
pub mod types;

pub use backend::{build_backends, Backends, ConceptGenerator, VideoRenderer};
pub use client::{GenerationClient, GenerationClientConfig};
pub use config::{BackendKind, GenerationConfig};
pub use error::{GenerationError, GenerationResult};
pub use mock::{canned_concepts, MockStudio};
pub use types::{GenerateConceptsResponse, RenderRequest, RenderedVideo};
