//! Actions accepted by the reducer and effects it asks the controller to run.

use chrono::NaiveDate;
use foobi_billing::CheckoutOutcome;
use foobi_generation::RenderedVideo;
use foobi_models::{
    Concept, ConceptPatch, CreativeBrief, Credentials, EditSettings, HistoryId, MediaFile,
    PlanTier, SavedProgress, ScenePatch, UserSettings,
};

use crate::state::{DownloadChoice, OpId};

/// Partial update of the video details form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailsPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub target_audience: Option<String>,
    pub video_length: Option<String>,
    pub model: Option<String>,
}

/// Edits applied to the concept open in the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum ConceptEdit {
    UpdateOverview(ConceptPatch),
    AddScene,
    RemoveScene(u32),
    UpdateScene { scene_id: u32, patch: ScenePatch },
    AttachSceneMedia { scene_id: u32, files: Vec<MediaFile> },
    RemoveSceneMedia { scene_id: u32, index: usize },
    AttachMedia(Vec<MediaFile>),
    RemoveMedia(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Entry and account
    EnterDashboard,
    TryFree,
    OpenLogin,
    Login(Credentials),
    SavedProgressLoaded(Option<SavedProgress>),
    ResumeSavedProgress,
    DiscardSavedProgress,
    Logout,
    OpenSettings,
    SaveSettings(UserSettings),

    // Details step
    StartNewProject,
    UpdateDetails(DetailsPatch),
    AttachFiles(Vec<MediaFile>),
    RemoveFile(usize),
    SubmitDetails,

    // Concept step
    ConceptsGenerated { op: OpId, concepts: Vec<Concept> },
    GenerationFailed { op: OpId, message: String },
    SaveConceptRevision(Concept),
    SelectConcept(u32),
    EditConcept(ConceptEdit),
    CompleteConceptEdit,

    // Result and editor
    VideoRendered {
        op: OpId,
        video: RenderedVideo,
        created_on: NaiveDate,
    },
    Download,
    DownloadFinished(DownloadChoice),
    OpenEditor,
    UpdateEditSettings(EditSettings),
    ResetEditSettings,
    CloseEditor,
    RenameVideo { id: HistoryId, title: String },

    // Plans
    OpenPlanSelection,
    SelectPlan(PlanTier),
    CancelCheckout,
    CheckoutFinished(CheckoutOutcome),
    CheckoutErrored { message: String },

    // Navigation
    NavigateToStep(u8),
    GoBack,
    GoToDashboard,
    DismissPrompt,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::EnterDashboard => "enter_dashboard",
            Action::TryFree => "try_free",
            Action::OpenLogin => "open_login",
            Action::Login(_) => "login",
            Action::SavedProgressLoaded(_) => "saved_progress_loaded",
            Action::ResumeSavedProgress => "resume_saved_progress",
            Action::DiscardSavedProgress => "discard_saved_progress",
            Action::Logout => "logout",
            Action::OpenSettings => "open_settings",
            Action::SaveSettings(_) => "save_settings",
            Action::StartNewProject => "start_new_project",
            Action::UpdateDetails(_) => "update_details",
            Action::AttachFiles(_) => "attach_files",
            Action::RemoveFile(_) => "remove_file",
            Action::SubmitDetails => "submit_details",
            Action::ConceptsGenerated { .. } => "concepts_generated",
            Action::GenerationFailed { .. } => "generation_failed",
            Action::SaveConceptRevision(_) => "save_concept_revision",
            Action::SelectConcept(_) => "select_concept",
            Action::EditConcept(_) => "edit_concept",
            Action::CompleteConceptEdit => "complete_concept_edit",
            Action::VideoRendered { .. } => "video_rendered",
            Action::Download => "download",
            Action::DownloadFinished(_) => "download_finished",
            Action::OpenEditor => "open_editor",
            Action::UpdateEditSettings(_) => "update_edit_settings",
            Action::ResetEditSettings => "reset_edit_settings",
            Action::CloseEditor => "close_editor",
            Action::RenameVideo { .. } => "rename_video",
            Action::OpenPlanSelection => "open_plan_selection",
            Action::SelectPlan(_) => "select_plan",
            Action::CancelCheckout => "cancel_checkout",
            Action::CheckoutFinished(_) => "checkout_finished",
            Action::CheckoutErrored { .. } => "checkout_errored",
            Action::NavigateToStep(_) => "navigate_to_step",
            Action::GoBack => "go_back",
            Action::GoToDashboard => "go_to_dashboard",
            Action::DismissPrompt => "dismiss_prompt",
        }
    }

    /// Operation this action reports the completion of.
    pub fn completed_op(&self) -> Option<OpId> {
        match self {
            Action::ConceptsGenerated { op, .. }
            | Action::GenerationFailed { op, .. }
            | Action::VideoRendered { op, .. } => Some(*op),
            _ => None,
        }
    }
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    GenerateConcepts { op: OpId, brief: CreativeBrief },
    RenderVideo {
        op: OpId,
        brief: CreativeBrief,
        concept: Concept,
    },
    CancelOperation { op: OpId },
    PersistProgress(Box<SavedProgress>),
    ClearProgress,
    LoadProgress,
    StartCheckout { tier: PlanTier },
    CancelCheckout,
}
