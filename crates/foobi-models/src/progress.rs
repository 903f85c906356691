//! Wizard screens and the saved-progress record.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::concept::Concept;
use crate::draft::Draft;

/// Screen tag as written to the saved-progress record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub enum WizardScreen {
    #[default]
    Landing,
    Dashboard,
    VideoDetails,
    ConceptsLoading,
    Concepts,
    ConceptEdit,
    Generating,
    Result,
    Edit,
    Settings,
}

impl WizardScreen {
    pub const ALL: &'static [WizardScreen] = &[
        WizardScreen::Landing,
        WizardScreen::Dashboard,
        WizardScreen::VideoDetails,
        WizardScreen::ConceptsLoading,
        WizardScreen::Concepts,
        WizardScreen::ConceptEdit,
        WizardScreen::Generating,
        WizardScreen::Result,
        WizardScreen::Edit,
        WizardScreen::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WizardScreen::Landing => "landing",
            WizardScreen::Dashboard => "dashboard",
            WizardScreen::VideoDetails => "videoDetails",
            WizardScreen::ConceptsLoading => "conceptsLoading",
            WizardScreen::Concepts => "concepts",
            WizardScreen::ConceptEdit => "conceptEdit",
            WizardScreen::Generating => "generating",
            WizardScreen::Result => "result",
            WizardScreen::Edit => "edit",
            WizardScreen::Settings => "settings",
        }
    }

    /// Whether progress on this screen is worth resuming.
    ///
    /// Only screens before the completion boundary qualify.
    pub fn is_resumable(&self) -> bool {
        matches!(
            self,
            WizardScreen::VideoDetails
                | WizardScreen::ConceptsLoading
                | WizardScreen::Concepts
                | WizardScreen::ConceptEdit
                | WizardScreen::Generating
        )
    }
}

impl fmt::Display for WizardScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WizardScreen {
    type Err = WizardScreenParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WizardScreen::ALL
            .iter()
            .copied()
            .find(|screen| screen.as_str() == s)
            .ok_or_else(|| WizardScreenParseError(s.to_string()))
    }
}

#[derive(Debug, Error)]
#[error("Unknown wizard screen: {0}")]
pub struct WizardScreenParseError(String);

/// Step indicator shown above the wizard (1-4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum WizardStep {
    /// Video details
    #[default]
    Details,
    /// Concept selection and editing
    Concept,
    /// Generation
    Generate,
    /// Finished video
    Complete,
}

impl WizardStep {
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::Details => 1,
            WizardStep::Concept => 2,
            WizardStep::Generate => 3,
            WizardStep::Complete => 4,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(WizardStep::Details),
            2 => Some(WizardStep::Concept),
            3 => Some(WizardStep::Generate),
            4 => Some(WizardStep::Complete),
            _ => None,
        }
    }
}

impl TryFrom<u8> for WizardStep {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        WizardStep::from_number(n).ok_or_else(|| format!("Wizard step out of range: {}", n))
    }
}

impl From<WizardStep> for u8 {
    fn from(step: WizardStep) -> Self {
        step.number()
    }
}

impl JsonSchema for WizardStep {
    fn schema_name() -> String {
        "WizardStep".to_string()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        <u8>::json_schema(gen)
    }
}

/// Snapshot written to local storage so an interrupted session can resume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavedProgress {
    pub state: WizardScreen,
    pub step: WizardStep,
    #[serde(flatten)]
    pub draft: Draft,
    /// Concept open in the editor or being rendered
    pub edited_concept: Option<Concept>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_tags() {
        assert_eq!(
            serde_json::to_string(&WizardScreen::ConceptsLoading).unwrap(),
            "\"conceptsLoading\""
        );
        for screen in WizardScreen::ALL {
            assert_eq!(screen.as_str().parse::<WizardScreen>().unwrap(), *screen);
        }
    }

    #[test]
    fn test_resumable_screens() {
        assert!(!WizardScreen::Landing.is_resumable());
        assert!(!WizardScreen::Dashboard.is_resumable());
        assert!(!WizardScreen::Result.is_resumable());
        assert!(!WizardScreen::Settings.is_resumable());
        assert!(WizardScreen::Generating.is_resumable());
    }

    #[test]
    fn test_step_serializes_as_number() {
        assert_eq!(serde_json::to_string(&WizardStep::Generate).unwrap(), "3");
        assert!(serde_json::from_str::<WizardStep>("5").is_err());
    }

    #[test]
    fn test_record_layout() {
        let progress = SavedProgress {
            state: WizardScreen::Concepts,
            step: WizardStep::Concept,
            draft: Draft::new(),
            edited_concept: None,
        };
        let json = serde_json::to_value(&progress).unwrap();
        assert_eq!(json["state"], "concepts");
        assert_eq!(json["step"], 2);
        assert_eq!(json["videoLength"], "30");
        assert!(json["editedConcept"].is_null());

        let back: SavedProgress = serde_json::from_value(json).unwrap();
        assert_eq!(back, progress);
    }
}
