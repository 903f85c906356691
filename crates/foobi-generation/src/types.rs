//! Generation service request/response types.

use foobi_models::{Concept, CreativeBrief};
use serde::{Deserialize, Serialize};

/// Response from concept generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateConceptsResponse {
    pub concepts: Vec<Concept>,
}

/// Request to render a finalized concept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderRequest {
    pub brief: CreativeBrief,
    pub concept: Concept,
}

/// A rendered video, addressed by opaque media URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedVideo {
    /// Playback/download URL
    pub video_url: String,
    /// Poster image URL
    pub thumbnail_url: String,
}

impl RenderedVideo {
    /// Download file name, e.g. `新商品.mp4`, defaulting to `foobi-video.mp4`.
    pub fn download_filename(&self, title: Option<&str>) -> String {
        format!("{}.mp4", title.unwrap_or("foobi-video"))
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: Option<String>,
}
