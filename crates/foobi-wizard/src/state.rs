//! Wizard state.
//!
//! One [`Screen`] is active at a time and carries only the data that screen
//! needs. Everything else lives on [`WizardState`].

use foobi_generation::RenderedVideo;
use foobi_models::{
    Concept, Draft, EditSettings, HistoryId, PlanTier, SavedProgress, UserSettings, VideoHistory,
    WizardScreen, WizardStep,
};
use serde::Serialize;

/// Identifier of an asynchronous generation operation.
pub type OpId = u64;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "camelCase")]
pub enum Screen {
    Landing,
    Dashboard,
    VideoDetails,
    ConceptsLoading {
        op: OpId,
    },
    Concepts,
    ConceptEdit {
        concept: Concept,
    },
    Generating {
        op: OpId,
        concept: Concept,
    },
    Result {
        video: RenderedVideo,
        history_id: HistoryId,
    },
    Edit {
        video: RenderedVideo,
        history_id: HistoryId,
        settings: EditSettings,
    },
    Settings,
}

impl Screen {
    pub fn kind(&self) -> WizardScreen {
        match self {
            Screen::Landing => WizardScreen::Landing,
            Screen::Dashboard => WizardScreen::Dashboard,
            Screen::VideoDetails => WizardScreen::VideoDetails,
            Screen::ConceptsLoading { .. } => WizardScreen::ConceptsLoading,
            Screen::Concepts => WizardScreen::Concepts,
            Screen::ConceptEdit { .. } => WizardScreen::ConceptEdit,
            Screen::Generating { .. } => WizardScreen::Generating,
            Screen::Result { .. } => WizardScreen::Result,
            Screen::Edit { .. } => WizardScreen::Edit,
            Screen::Settings => WizardScreen::Settings,
        }
    }

    /// Step shown in the progress indicator.
    pub fn step(&self) -> WizardStep {
        match self {
            Screen::ConceptsLoading { .. } | Screen::Concepts | Screen::ConceptEdit { .. } => {
                WizardStep::Concept
            }
            Screen::Generating { .. } => WizardStep::Generate,
            Screen::Result { .. } | Screen::Edit { .. } => WizardStep::Complete,
            Screen::Landing | Screen::Dashboard | Screen::VideoDetails | Screen::Settings => {
                WizardStep::Details
            }
        }
    }

    /// Operation the screen is waiting on, if any.
    pub fn pending_op(&self) -> Option<OpId> {
        match self {
            Screen::ConceptsLoading { op } | Screen::Generating { op, .. } => Some(*op),
            _ => None,
        }
    }

    /// Concept open in the editor or being rendered.
    pub fn edited_concept(&self) -> Option<&Concept> {
        match self {
            Screen::ConceptEdit { concept } | Screen::Generating { concept, .. } => Some(concept),
            _ => None,
        }
    }

    /// The rendered video on the result and editor screens.
    pub fn video(&self) -> Option<&RenderedVideo> {
        match self {
            Screen::Result { video, .. } | Screen::Edit { video, .. } => Some(video),
            _ => None,
        }
    }
}

/// Local login state. There is no real authentication behind it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub logged_in: bool,
    pub email: Option<String>,
    pub plan: PlanTier,
}

/// Blocking dialog raised by the wizard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "prompt", rename_all = "camelCase")]
pub enum Prompt {
    Login,
    /// Plan selection, optionally naming the tier a blocked action needs
    PlanUpgrade {
        required: Option<PlanTier>,
    },
    /// A snapshot was found after login
    ResumeOrDiscard {
        saved: Box<SavedProgress>,
    },
    DownloadOptions {
        filename: String,
        url: String,
    },
    CheckoutFailed {
        tier: PlanTier,
    },
    GenerationFailed {
        message: String,
    },
}

impl Prompt {
    pub fn name(&self) -> &'static str {
        match self {
            Prompt::Login => "login",
            Prompt::PlanUpgrade { .. } => "plan_upgrade",
            Prompt::ResumeOrDiscard { .. } => "resume_or_discard",
            Prompt::DownloadOptions { .. } => "download_options",
            Prompt::CheckoutFailed { .. } => "checkout_failed",
            Prompt::GenerationFailed { .. } => "generation_failed",
        }
    }
}

/// What to do after a download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DownloadChoice {
    Dashboard,
    StayOnResult,
    NewProject,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardState {
    pub screen: Screen,
    pub draft: Draft,
    pub session: Session,
    pub history: VideoHistory,
    pub settings: UserSettings,
    pub prompt: Option<Prompt>,
    /// Tier whose checkout is being confirmed
    pub checkout: Option<PlanTier>,
    #[serde(skip)]
    next_op: OpId,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            screen: Screen::Landing,
            draft: Draft::new(),
            session: Session::default(),
            history: VideoHistory::with_samples(),
            settings: UserSettings::default(),
            prompt: None,
            checkout: None,
            next_op: 1,
        }
    }
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        self.screen.step()
    }

    /// Allocate an id for a new generation operation.
    pub(crate) fn issue_op(&mut self) -> OpId {
        let op = self.next_op;
        self.next_op += 1;
        op
    }

    /// The record to persist, if the current state should be persisted.
    ///
    /// Only logged-in sessions on a resumable screen are persisted.
    pub fn snapshot(&self) -> Option<SavedProgress> {
        let kind = self.screen.kind();
        if !self.session.logged_in || !kind.is_resumable() {
            return None;
        }

        Some(SavedProgress {
            state: kind,
            step: self.screen.step(),
            draft: self.draft.clone(),
            edited_concept: self.screen.edited_concept().cloned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = WizardState::new();
        assert_eq!(state.screen, Screen::Landing);
        assert_eq!(state.step(), WizardStep::Details);
        assert_eq!(state.history.len(), 3);
        assert!(state.snapshot().is_none());
    }

    #[test]
    fn test_snapshot_requires_login_and_resumable_screen() {
        let mut state = WizardState::new();
        state.screen = Screen::VideoDetails;
        assert!(state.snapshot().is_none());

        state.session.logged_in = true;
        let snapshot = state.snapshot().unwrap();
        assert_eq!(snapshot.state, WizardScreen::VideoDetails);
        assert_eq!(snapshot.step, WizardStep::Details);

        state.screen = Screen::Settings;
        assert!(state.snapshot().is_none());
    }

    #[test]
    fn test_op_ids_increase() {
        let mut state = WizardState::new();
        let a = state.issue_op();
        let b = state.issue_op();
        assert!(b > a);
    }
}
