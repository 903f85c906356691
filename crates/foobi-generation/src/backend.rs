//! Generation capabilities and backend wiring.

use std::sync::Arc;

use async_trait::async_trait;
use foobi_models::{Concept, CreativeBrief};
use tracing::info;

use crate::client::GenerationClient;
use crate::config::{BackendKind, GenerationConfig};
use crate::error::GenerationResult;
use crate::mock::MockStudio;
use crate::types::RenderedVideo;

/// Turns a creative brief into structured concepts.
#[async_trait]
pub trait ConceptGenerator: Send + Sync {
    async fn generate_concepts(&self, brief: &CreativeBrief) -> GenerationResult<Vec<Concept>>;
}

/// Renders a finalized concept into a playable video.
#[async_trait]
pub trait VideoRenderer: Send + Sync {
    async fn render_video(
        &self,
        brief: &CreativeBrief,
        concept: &Concept,
    ) -> GenerationResult<RenderedVideo>;
}

/// The pair of capabilities handed to the wizard.
#[derive(Clone)]
pub struct Backends {
    pub generator: Arc<dyn ConceptGenerator>,
    pub renderer: Arc<dyn VideoRenderer>,
}

impl Backends {
    /// Use one implementation for both capabilities.
    pub fn from_shared<T>(backend: Arc<T>) -> Self
    where
        T: ConceptGenerator + VideoRenderer + 'static,
    {
        Self {
            generator: backend.clone(),
            renderer: backend,
        }
    }
}

/// Build the backends selected by configuration.
pub fn build_backends(config: &GenerationConfig) -> GenerationResult<Backends> {
    match config.backend {
        BackendKind::Mock => {
            info!(
                concept_latency_ms = config.concept_latency.as_millis() as u64,
                render_latency_ms = config.render_latency.as_millis() as u64,
                "Using mock generation backend"
            );
            Ok(Backends::from_shared(Arc::new(MockStudio::new(
                config.concept_latency,
                config.render_latency,
            ))))
        }
        BackendKind::Remote => {
            info!(base_url = %config.remote.base_url, "Using remote generation backend");
            Ok(Backends::from_shared(Arc::new(GenerationClient::new(
                config.remote.clone(),
            )?)))
        }
    }
}
