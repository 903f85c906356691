//! Plan tiers and the subscription catalog.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::generation_model::GenerationModel;

/// Plan tier enumeration.
///
/// Tiers are totally ordered: `Free < Pro < Enterprise`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    #[default]
    Free,
    Pro,
    Enterprise,
}

impl PlanTier {
    /// All tiers, lowest first.
    pub const ALL: &'static [PlanTier] = &[PlanTier::Free, PlanTier::Pro, PlanTier::Enterprise];

    /// Position of the tier in the plan hierarchy (free = 0).
    pub fn rank(&self) -> u8 {
        match self {
            PlanTier::Free => 0,
            PlanTier::Pro => 1,
            PlanTier::Enterprise => 2,
        }
    }

    /// Whether this tier grants access to features that require `required`.
    pub fn includes(&self, required: PlanTier) -> bool {
        self.rank() >= required.rank()
    }

    /// Get the plan name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanTier::Free => "free",
            PlanTier::Pro => "pro",
            PlanTier::Enterprise => "enterprise",
        }
    }

    /// Whether switching to this tier goes through an external checkout.
    pub fn requires_checkout(&self) -> bool {
        !matches!(self, PlanTier::Free)
    }

    /// Catalog entry for this tier.
    pub fn offer(&self) -> PlanOffer {
        PlanOffer::for_tier(*self)
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PlanTier {
    type Err = PlanTierParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "free" => Ok(PlanTier::Free),
            "pro" => Ok(PlanTier::Pro),
            "enterprise" => Ok(PlanTier::Enterprise),
            _ => Err(PlanTierParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown plan tier: {0}")]
pub struct PlanTierParseError(String);

/// A plan as presented in the plan-selection dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanOffer {
    pub tier: PlanTier,
    /// Display name
    pub name: &'static str,
    /// Monthly price in yen
    pub monthly_price_yen: u32,
    /// Videos per month, `None` for unlimited
    pub monthly_video_limit: Option<u32>,
    /// Marketing feature bullets
    pub features: &'static [&'static str],
    /// Price identifier passed to the checkout provider
    pub checkout_price_id: Option<&'static str>,
}

impl PlanOffer {
    /// Catalog entry for a specific tier.
    pub fn for_tier(tier: PlanTier) -> Self {
        match tier {
            PlanTier::Free => Self {
                tier,
                name: "フリー",
                monthly_price_yen: 0,
                monthly_video_limit: Some(3),
                features: &["月3本まで生成", "ベーシックモデルのみ", "HD画質", "基本テンプレート"],
                checkout_price_id: None,
            },
            PlanTier::Pro => Self {
                tier,
                name: "プロ",
                monthly_price_yen: 2_980,
                monthly_video_limit: Some(50),
                features: &[
                    "月50本まで生成",
                    "ベーシック + プロモデル",
                    "4K画質",
                    "プレミアムテンプレート",
                    "ファイルアップロード",
                ],
                checkout_price_id: Some("price_pro_monthly_2980"),
            },
            PlanTier::Enterprise => Self {
                tier,
                name: "エンタープライズ",
                monthly_price_yen: 9_800,
                monthly_video_limit: None,
                features: &[
                    "無制限生成",
                    "全モデル利用可能",
                    "8K画質",
                    "カスタムテンプレート",
                    "API連携",
                    "専用サポート",
                ],
                checkout_price_id: Some("price_enterprise_monthly_9800"),
            },
        }
    }

    /// Full catalog, lowest tier first.
    pub fn catalog() -> Vec<PlanOffer> {
        PlanTier::ALL.iter().map(|t| Self::for_tier(*t)).collect()
    }

    /// Generation models usable on this plan.
    pub fn models(&self) -> Vec<GenerationModel> {
        GenerationModel::available_for(self.tier)
    }

    /// Price label such as `¥2,980`.
    pub fn price_label(&self) -> String {
        format_yen(self.monthly_price_yen)
    }
}

/// Format a yen amount with thousands separators (`¥9,800`).
pub fn format_yen(amount: u32) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('¥');
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
