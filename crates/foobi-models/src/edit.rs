//! Post-generation editor settings.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::{Validate, ValidationError};

/// Where the text overlay is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextPosition {
    Top,
    Center,
    #[default]
    Bottom,
}

/// Color grading preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum VideoEffect {
    #[default]
    None,
    Vintage,
    Bw,
    Warm,
    Cool,
    Dramatic,
    Soft,
    Vibrant,
}

impl VideoEffect {
    pub const ALL: &'static [VideoEffect] = &[
        VideoEffect::None,
        VideoEffect::Vintage,
        VideoEffect::Bw,
        VideoEffect::Warm,
        VideoEffect::Cool,
        VideoEffect::Dramatic,
        VideoEffect::Soft,
        VideoEffect::Vibrant,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            VideoEffect::None => "なし",
            VideoEffect::Vintage => "ヴィンテージ",
            VideoEffect::Bw => "モノクロ",
            VideoEffect::Warm => "ウォーム",
            VideoEffect::Cool => "クール",
            VideoEffect::Dramatic => "ドラマチック",
            VideoEffect::Soft => "ソフト",
            VideoEffect::Vibrant => "ビビッド",
        }
    }
}

/// Container format for export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Mp4,
    Mov,
    Avi,
    Webm,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Mp4 => "mp4",
            ExportFormat::Mov => "mov",
            ExportFormat::Avi => "avi",
            ExportFormat::Webm => "webm",
        }
    }
}

/// Output resolution for export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
pub enum ExportQuality {
    #[serde(rename = "4k")]
    Uhd4k,
    #[default]
    #[serde(rename = "1080p")]
    Fhd1080p,
    #[serde(rename = "720p")]
    Hd720p,
    #[serde(rename = "480p")]
    Sd480p,
}

impl ExportQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportQuality::Uhd4k => "4k",
            ExportQuality::Fhd1080p => "1080p",
            ExportQuality::Hd720p => "720p",
            ExportQuality::Sd480p => "480p",
        }
    }

    /// Frame size in pixels (width, height).
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            ExportQuality::Uhd4k => (3840, 2160),
            ExportQuality::Fhd1080p => (1920, 1080),
            ExportQuality::Hd720p => (1280, 720),
            ExportQuality::Sd480p => (854, 480),
        }
    }
}

impl fmt::Display for ExportQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Text drawn over the video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TextOverlay {
    pub content: String,
    pub position: TextPosition,
    /// Font size in px
    #[validate(range(min = 12, max = 48))]
    pub size: u32,
    /// `#rrggbb`
    #[validate(custom(function = "validate_hex_color"))]
    pub color: String,
}

impl Default for TextOverlay {
    fn default() -> Self {
        Self {
            content: String::new(),
            position: TextPosition::Bottom,
            size: 24,
            color: "#ffffff".to_string(),
        }
    }
}

/// Everything the editor screen lets the user tweak.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_trim_range"))]
pub struct EditSettings {
    /// Trim start in seconds
    pub trim_start: u32,
    /// Trim end in seconds
    pub trim_end: u32,
    #[validate(nested)]
    pub text: TextOverlay,
    pub effect: VideoEffect,
    /// Percent
    #[validate(range(max = 200))]
    pub audio_volume: u32,
    /// Percent
    #[validate(range(min = 50, max = 150))]
    pub brightness: u32,
    /// Percent
    #[validate(range(min = 50, max = 150))]
    pub contrast: u32,
    /// Percent
    #[validate(range(max = 200))]
    pub saturation: u32,
    pub export_format: ExportFormat,
    pub export_quality: ExportQuality,
}

impl Default for EditSettings {
    fn default() -> Self {
        Self {
            trim_start: 0,
            trim_end: 30,
            text: TextOverlay::default(),
            effect: VideoEffect::None,
            audio_volume: 100,
            brightness: 100,
            contrast: 100,
            saturation: 100,
            export_format: ExportFormat::Mp4,
            export_quality: ExportQuality::Fhd1080p,
        }
    }
}

impl EditSettings {
    /// Defaults with the trim window spanning the whole video.
    pub fn for_length(length_secs: u32) -> Self {
        Self {
            trim_end: length_secs,
            ..Self::default()
        }
    }

    /// Restore every adjustment except the export options.
    pub fn reset(&mut self, length_secs: u32) {
        let export_format = self.export_format;
        let export_quality = self.export_quality;
        *self = Self {
            export_format,
            export_quality,
            ..Self::for_length(length_secs)
        };
    }

    /// Whether the trim window fits inside a video of the given length.
    pub fn fits_length(&self, length_secs: u32) -> bool {
        self.trim_end <= length_secs
    }

    /// File name for an export, e.g. `foobi-edited-video-1080p.mp4`.
    pub fn export_filename(&self) -> String {
        format!(
            "foobi-edited-video-{}.{}",
            self.export_quality,
            self.export_format.extension()
        )
    }
}

fn validate_trim_range(settings: &EditSettings) -> Result<(), ValidationError> {
    if settings.trim_end <= settings.trim_start {
        return Err(ValidationError::new("trim_range"));
    }
    Ok(())
}

fn validate_hex_color(color: &str) -> Result<(), ValidationError> {
    let hex = color.strip_prefix('#').unwrap_or("");
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(ValidationError::new("hex_color"))
    }
}
