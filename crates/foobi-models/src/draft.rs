//! The in-progress video project.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::concept::{Concept, MediaFile};
use crate::generation_model::GenerationModel;

/// Length used when the draft's length field is not a positive integer.
pub const DEFAULT_VIDEO_LENGTH_SECS: u32 = 30;

/// The project being assembled by the wizard.
///
/// Field names match the saved-progress record (`videoTitle`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub video_title: String,
    pub video_description: String,
    pub target_audience: String,
    /// Requested length in seconds, as typed in the form
    pub video_length: String,
    /// Generation model id
    pub selected_model: String,
    #[serde(default)]
    pub uploaded_files: Vec<MediaFile>,
    /// Id of the concept the user finalized
    pub selected_concept: Option<u32>,
    #[serde(default)]
    pub concepts: Vec<Concept>,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            video_title: String::new(),
            video_description: String::new(),
            target_audience: String::new(),
            video_length: DEFAULT_VIDEO_LENGTH_SECS.to_string(),
            selected_model: GenerationModel::default().id().to_string(),
            uploaded_files: Vec::new(),
            selected_concept: None,
            concepts: Vec::new(),
        }
    }
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty the draft for a new project.
    ///
    /// Length and model preferences are kept.
    pub fn reset_for_new_project(&mut self) {
        self.video_title.clear();
        self.video_description.clear();
        self.target_audience.clear();
        self.uploaded_files.clear();
        self.selected_concept = None;
        self.concepts.clear();
    }

    /// Requested length in whole seconds.
    pub fn length_secs(&self) -> u32 {
        parse_length(&self.video_length)
    }

    pub fn concept(&self, concept_id: u32) -> Option<&Concept> {
        self.concepts.iter().find(|c| c.id == concept_id)
    }

    /// Replace the concept with the same id. Returns false if absent.
    pub fn replace_concept(&mut self, concept: Concept) -> bool {
        match self.concepts.iter_mut().find(|c| c.id == concept.id) {
            Some(slot) => {
                *slot = concept;
                true
            }
            None => false,
        }
    }

    /// The brief sent to the concept generator.
    pub fn brief(&self) -> CreativeBrief {
        CreativeBrief {
            title: self.video_title.clone(),
            description: self.video_description.clone(),
            target_audience: self.target_audience.clone(),
            length_secs: self.length_secs(),
            model: self.selected_model.clone(),
        }
    }

    /// Title used for history entries and downloads.
    pub fn display_title(&self) -> Option<&str> {
        let title = self.video_title.trim();
        if title.is_empty() {
            None
        } else {
            Some(title)
        }
    }
}

/// Creative brief submitted to a generation backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CreativeBrief {
    pub title: String,
    pub description: String,
    pub target_audience: String,
    pub length_secs: u32,
    pub model: String,
}

fn parse_length(raw: &str) -> u32 {
    match raw.trim().parse::<u32>() {
        Ok(secs) if secs > 0 => secs,
        _ => DEFAULT_VIDEO_LENGTH_SECS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let draft = Draft::new();
        assert_eq!(draft.video_length, "30");
        assert_eq!(draft.selected_model, "basic");
        assert!(draft.concepts.is_empty());
    }

    #[test]
    fn test_length_parsing() {
        let mut draft = Draft::new();
        draft.video_length = "60".to_string();
        assert_eq!(draft.length_secs(), 60);
        draft.video_length = " 15 ".to_string();
        assert_eq!(draft.length_secs(), 15);
        draft.video_length = "abc".to_string();
        assert_eq!(draft.length_secs(), DEFAULT_VIDEO_LENGTH_SECS);
        draft.video_length = "0".to_string();
        assert_eq!(draft.length_secs(), DEFAULT_VIDEO_LENGTH_SECS);
    }

    #[test]
    fn test_reset_keeps_preferences() {
        let mut draft = Draft::new();
        draft.video_title = "Launch".to_string();
        draft.video_length = "60".to_string();
        draft.selected_model = "pro".to_string();
        draft.selected_concept = Some(2);
        draft.reset_for_new_project();
        assert!(draft.video_title.is_empty());
        assert_eq!(draft.selected_concept, None);
        assert_eq!(draft.video_length, "60");
        assert_eq!(draft.selected_model, "pro");
    }

    #[test]
    fn test_display_title() {
        let mut draft = Draft::new();
        assert_eq!(draft.display_title(), None);
        draft.video_title = "  新商品  ".to_string();
        assert_eq!(draft.display_title(), Some("新商品"));
    }

    #[test]
    fn test_record_field_names() {
        let json = serde_json::to_value(Draft::new()).unwrap();
        for key in ["videoTitle", "videoDescription", "targetAudience", "videoLength", "selectedModel"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }
}
