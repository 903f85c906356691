//! Generation model definitions.
//!
//! Each model is gated by a minimum plan tier:
//!
//! - `Basic`: available on every plan
//! - `Pro`: requires the pro plan or higher
//! - `Enterprise`: requires the enterprise plan

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::plan::PlanTier;

/// AI model used to generate concepts and videos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum GenerationModel {
    /// Fast, high-quality output.
    #[default]
    Basic,
    /// More refined expression.
    Pro,
    /// Top-end creative generation.
    Enterprise,
}

impl GenerationModel {
    /// All available models.
    pub const ALL: &'static [GenerationModel] = &[
        GenerationModel::Basic,
        GenerationModel::Pro,
        GenerationModel::Enterprise,
    ];

    /// Model identifier as stored in drafts.
    pub fn id(&self) -> &'static str {
        match self {
            GenerationModel::Basic => "basic",
            GenerationModel::Pro => "pro",
            GenerationModel::Enterprise => "enterprise",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            GenerationModel::Basic => "ベーシックAI",
            GenerationModel::Pro => "プロAI",
            GenerationModel::Enterprise => "エンタープライズAI",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            GenerationModel::Basic => "高品質な動画を素早く生成",
            GenerationModel::Pro => "より洗練された表現力",
            GenerationModel::Enterprise => "最高峰のクリエイティブ生成",
        }
    }

    /// Lowest plan tier that may use this model.
    pub fn required_plan(&self) -> PlanTier {
        match self {
            GenerationModel::Basic => PlanTier::Free,
            GenerationModel::Pro => PlanTier::Pro,
            GenerationModel::Enterprise => PlanTier::Enterprise,
        }
    }

    /// Returns true if `plan` is at or above the required tier.
    pub fn usable_on(&self, plan: PlanTier) -> bool {
        plan.includes(self.required_plan())
    }

    /// Models usable on a given plan.
    pub fn available_for(plan: PlanTier) -> Vec<GenerationModel> {
        Self::ALL.iter().copied().filter(|m| m.usable_on(plan)).collect()
    }
}

impl fmt::Display for GenerationModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for GenerationModel {
    type Err = GenerationModelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(GenerationModel::Basic),
            "pro" => Ok(GenerationModel::Pro),
            "enterprise" => Ok(GenerationModel::Enterprise),
            _ => Err(GenerationModelParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown generation model: {0}")]
pub struct GenerationModelParseError(String);

/// Plan check for a model id taken from a draft.
///
/// Unknown ids are never usable.
pub fn can_use_model(model_id: &str, plan: PlanTier) -> bool {
    model_id
        .parse::<GenerationModel>()
        .map(|m| m.usable_on(plan))
        .unwrap_or(false)
}
