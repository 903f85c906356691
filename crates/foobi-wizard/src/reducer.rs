//! Pure wizard transitions.
//!
//! [`reduce`] never mutates its input. It returns the next state plus the
//! effects the controller must run, or a [`TransitionError`] when the action
//! is not legal in the current state.

use foobi_billing::CheckoutOutcome;
use foobi_models::{
    can_use_model, Concept, EditSettings, GenerationModel, SavedProgress, VideoHistoryEntry,
    WizardScreen,
};
use tracing::{info, warn};
use validator::Validate;

use crate::action::{Action, ConceptEdit, DetailsPatch, Effect};
use crate::error::TransitionError;
use crate::state::{DownloadChoice, Prompt, Screen, WizardState};

/// History title used when the draft has no title.
pub const UNTITLED_VIDEO: &str = "新しい動画";

/// Result of an accepted action.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: WizardState,
    pub effects: Vec<Effect>,
}

pub fn reduce(state: &WizardState, action: Action) -> Result<Transition, TransitionError> {
    let mut next = state.clone();
    let mut effects = Vec::new();
    let completed = action.completed_op();

    apply(&mut next, action, &mut effects)?;

    if let Some(op) = state.screen.pending_op() {
        if next.screen.pending_op() != Some(op) && completed != Some(op) {
            effects.insert(0, Effect::CancelOperation { op });
        }
    }

    if let Some(snapshot) = next.snapshot() {
        let cleared = effects.contains(&Effect::ClearProgress);
        if cleared || state.snapshot().as_ref() != Some(&snapshot) {
            effects.push(Effect::PersistProgress(Box::new(snapshot)));
        }
    }

    Ok(Transition {
        state: next,
        effects,
    })
}

fn apply(
    state: &mut WizardState,
    action: Action,
    effects: &mut Vec<Effect>,
) -> Result<(), TransitionError> {
    let name = action.name();
    let current = state.screen.kind();
    let not_allowed = || TransitionError::NotAllowed {
        action: name,
        screen: current,
    };

    match action {
        Action::EnterDashboard => {
            require(current == WizardScreen::Landing, not_allowed)?;
            state.screen = Screen::Dashboard;
        }

        Action::TryFree => {
            require(current == WizardScreen::Landing, not_allowed)?;
            state.draft.reset_for_new_project();
            state.screen = Screen::VideoDetails;
        }

        Action::OpenLogin => {
            require(!state.session.logged_in, not_allowed)?;
            state.prompt = Some(Prompt::Login);
        }

        Action::Login(credentials) => {
            require(!state.session.logged_in, not_allowed)?;
            credentials.validate()?;

            state.session.logged_in = true;
            state.session.email = Some(credentials.email);
            state.prompt = None;

            // Logging in mid-wizard keeps the user's place; the current work
            // supersedes any older snapshot.
            if matches!(state.screen, Screen::Landing | Screen::Dashboard) {
                state.screen = Screen::Dashboard;
                effects.push(Effect::LoadProgress);
            }
        }

        Action::SavedProgressLoaded(saved) => {
            if let Some(saved) = saved {
                if state.session.logged_in && current == WizardScreen::Dashboard {
                    state.prompt = Some(Prompt::ResumeOrDiscard {
                        saved: Box::new(saved),
                    });
                }
            }
        }

        Action::ResumeSavedProgress => match state.prompt.take() {
            Some(Prompt::ResumeOrDiscard { saved }) => restore(state, *saved, effects),
            _ => return Err(TransitionError::NoSuchPrompt("resume_or_discard")),
        },

        Action::DiscardSavedProgress => match state.prompt.take() {
            Some(Prompt::ResumeOrDiscard { .. }) => go_to_dashboard(state, effects),
            _ => return Err(TransitionError::NoSuchPrompt("resume_or_discard")),
        },

        Action::Logout => {
            state.session.logged_in = false;
            state.session.email = None;
            state.screen = Screen::Landing;
            state.prompt = None;
            if state.checkout.is_some() {
                effects.push(Effect::CancelCheckout);
            }
            effects.push(Effect::ClearProgress);
        }

        Action::OpenSettings => {
            require(current == WizardScreen::Dashboard, not_allowed)?;
            state.screen = Screen::Settings;
        }

        Action::SaveSettings(settings) => {
            require(current == WizardScreen::Settings, not_allowed)?;
            settings.validate()?;
            state.settings = settings;
        }

        Action::StartNewProject => {
            require(current != WizardScreen::Landing, not_allowed)?;
            start_new_project(state, effects);
        }

        Action::UpdateDetails(patch) => {
            require(current == WizardScreen::VideoDetails, not_allowed)?;
            apply_details(state, patch);
        }

        Action::AttachFiles(files) => {
            require(current == WizardScreen::VideoDetails, not_allowed)?;
            state.draft.uploaded_files.extend(files);
        }

        Action::RemoveFile(index) => {
            require(current == WizardScreen::VideoDetails, not_allowed)?;
            if index >= state.draft.uploaded_files.len() {
                return Err(TransitionError::UnknownMedia(index));
            }
            state.draft.uploaded_files.remove(index);
        }

        Action::SubmitDetails => {
            require(current == WizardScreen::VideoDetails, not_allowed)?;

            if !state.session.logged_in {
                warn!("Login required before generating concepts");
                state.prompt = Some(Prompt::Login);
                return Ok(());
            }

            let model = &state.draft.selected_model;
            if !can_use_model(model, state.session.plan) {
                let required = model
                    .parse::<GenerationModel>()
                    .ok()
                    .map(|m| m.required_plan());
                warn!(model = %model, plan = %state.session.plan, "Model not available on current plan");
                state.prompt = Some(Prompt::PlanUpgrade { required });
                return Ok(());
            }

            let op = state.issue_op();
            effects.push(Effect::GenerateConcepts {
                op,
                brief: state.draft.brief(),
            });
            state.prompt = None;
            state.screen = Screen::ConceptsLoading { op };
        }

        Action::ConceptsGenerated { op, concepts } => {
            match state.screen {
                Screen::ConceptsLoading { op: waiting } if waiting == op => {}
                _ => return Err(TransitionError::StaleOperation(op)),
            }
            state.draft.concepts = concepts;
            state.draft.selected_concept = None;
            state.screen = Screen::Concepts;
        }

        Action::GenerationFailed { op, message } => {
            let previous = match &state.screen {
                Screen::ConceptsLoading { op: waiting } if *waiting == op => Screen::VideoDetails,
                Screen::Generating { op: waiting, concept } if *waiting == op => {
                    Screen::ConceptEdit {
                        concept: concept.clone(),
                    }
                }
                _ => return Err(TransitionError::StaleOperation(op)),
            };
            warn!(op_id = op, error = %message, "Generation failed");
            state.screen = previous;
            state.prompt = Some(Prompt::GenerationFailed { message });
        }

        Action::SaveConceptRevision(concept) => {
            require(current == WizardScreen::Concepts, not_allowed)?;
            concept.validate_timeline()?;
            let id = concept.id;
            if !state.draft.replace_concept(concept) {
                return Err(TransitionError::UnknownConcept(id));
            }
        }

        Action::SelectConcept(id) => {
            require(current == WizardScreen::Concepts, not_allowed)?;

            if !state.session.logged_in {
                warn!("Login required before editing a concept");
                state.prompt = Some(Prompt::Login);
                return Ok(());
            }

            let concept = state
                .draft
                .concept(id)
                .cloned()
                .ok_or(TransitionError::UnknownConcept(id))?;
            state.screen = Screen::ConceptEdit { concept };
        }

        Action::EditConcept(edit) => {
            let Screen::ConceptEdit { concept } = &mut state.screen else {
                return Err(not_allowed());
            };
            apply_concept_edit(concept, edit)?;
        }

        Action::CompleteConceptEdit => {
            let Screen::ConceptEdit { concept } = &state.screen else {
                return Err(not_allowed());
            };
            concept.validate_timeline()?;
            let concept = concept.clone();

            state.draft.selected_concept = Some(concept.id);
            let op = state.issue_op();
            effects.push(Effect::RenderVideo {
                op,
                brief: state.draft.brief(),
                concept: concept.clone(),
            });
            state.screen = Screen::Generating { op, concept };
        }

        Action::VideoRendered {
            op,
            video,
            created_on,
        } => {
            match &state.screen {
                Screen::Generating { op: waiting, .. } if *waiting == op => {}
                _ => return Err(TransitionError::StaleOperation(op)),
            }

            let title = state.draft.display_title().unwrap_or(UNTITLED_VIDEO).to_string();
            let entry = VideoHistoryEntry::new(
                title,
                created_on,
                video.thumbnail_url.clone(),
                state.draft.length_secs(),
            );
            let history_id = entry.id.clone();
            state.history.prepend(entry);
            state.screen = Screen::Result { video, history_id };
            effects.push(Effect::ClearProgress);
        }

        Action::Download => {
            let Screen::Result { video, .. } = &state.screen else {
                return Err(not_allowed());
            };
            state.prompt = Some(Prompt::DownloadOptions {
                filename: video.download_filename(state.draft.display_title()),
                url: video.video_url.clone(),
            });
        }

        Action::DownloadFinished(choice) => {
            if !matches!(state.prompt, Some(Prompt::DownloadOptions { .. })) {
                return Err(TransitionError::NoSuchPrompt("download_options"));
            }
            state.prompt = None;
            match choice {
                DownloadChoice::Dashboard => go_to_dashboard(state, effects),
                DownloadChoice::StayOnResult => {}
                DownloadChoice::NewProject => start_new_project(state, effects),
            }
        }

        Action::OpenEditor => {
            let Screen::Result { video, history_id } = &state.screen else {
                return Err(not_allowed());
            };
            state.screen = Screen::Edit {
                video: video.clone(),
                history_id: history_id.clone(),
                settings: EditSettings::for_length(state.draft.length_secs()),
            };
        }

        Action::UpdateEditSettings(settings) => {
            let length = state.draft.length_secs();
            let Screen::Edit {
                settings: current_settings,
                ..
            } = &mut state.screen
            else {
                return Err(not_allowed());
            };
            settings.validate()?;
            if !settings.fits_length(length) {
                return Err(TransitionError::TrimOutOfRange {
                    trim_end: settings.trim_end,
                    length,
                });
            }
            *current_settings = settings;
        }

        Action::ResetEditSettings => {
            let length = state.draft.length_secs();
            let Screen::Edit { settings, .. } = &mut state.screen else {
                return Err(not_allowed());
            };
            settings.reset(length);
        }

        Action::CloseEditor => leave_editor(state).ok_or_else(not_allowed)?,

        Action::RenameVideo { id, title } => {
            if !state.history.rename(&id, title) {
                return Err(TransitionError::UnknownVideo(id.to_string()));
            }
        }

        Action::OpenPlanSelection => {
            state.prompt = Some(Prompt::PlanUpgrade { required: None });
        }

        Action::SelectPlan(tier) => {
            if state.checkout.is_some() {
                return Err(TransitionError::CheckoutInProgress);
            }
            if tier.requires_checkout() {
                state.checkout = Some(tier);
                effects.push(Effect::StartCheckout { tier });
            } else {
                info!(plan = %tier, "Plan changed");
                state.session.plan = tier;
                state.prompt = None;
            }
        }

        Action::CancelCheckout => {
            require(state.checkout.is_some(), not_allowed)?;
            effects.push(Effect::CancelCheckout);
        }

        Action::CheckoutFinished(outcome) => {
            let tier = state.checkout.take().ok_or_else(not_allowed)?;
            match outcome {
                CheckoutOutcome::Confirmed(paid) => {
                    info!(plan = %paid, "Plan upgraded");
                    state.session.plan = paid;
                    state.prompt = None;
                }
                CheckoutOutcome::Abandoned | CheckoutOutcome::TimedOut => {
                    warn!(plan = %tier, outcome = ?outcome, "Checkout not completed");
                    state.prompt = Some(Prompt::CheckoutFailed { tier });
                }
                CheckoutOutcome::Cancelled => {}
            }
        }

        Action::CheckoutErrored { message } => {
            let tier = state.checkout.take().ok_or_else(not_allowed)?;
            warn!(plan = %tier, error = %message, "Checkout failed");
            state.prompt = Some(Prompt::CheckoutFailed { tier });
        }

        Action::NavigateToStep(target) => {
            if !(1..=2).contains(&target) {
                return Err(TransitionError::StepNotNavigable(target));
            }
            require(
                matches!(state.screen, Screen::VideoDetails | Screen::Concepts),
                not_allowed,
            )?;
            if target >= state.step().number() {
                return Err(TransitionError::StepNotNavigable(target));
            }
            state.screen = match target {
                1 => Screen::VideoDetails,
                _ => Screen::Concepts,
            };
        }

        Action::GoBack => match current {
            WizardScreen::VideoDetails => go_to_dashboard(state, effects),
            WizardScreen::Concepts => state.screen = Screen::VideoDetails,
            WizardScreen::ConceptEdit => state.screen = Screen::Concepts,
            WizardScreen::Edit => leave_editor(state).ok_or_else(not_allowed)?,
            WizardScreen::Settings => state.screen = Screen::Dashboard,
            _ => return Err(not_allowed()),
        },

        Action::GoToDashboard => go_to_dashboard(state, effects),

        Action::DismissPrompt => {
            if state.prompt.is_none() {
                return Err(TransitionError::NoSuchPrompt("open"));
            }
            // The resume question must be answered explicitly.
            require(
                !matches!(state.prompt, Some(Prompt::ResumeOrDiscard { .. })),
                not_allowed,
            )?;
            state.prompt = None;
        }
    }

    Ok(())
}

fn require(ok: bool, err: impl FnOnce() -> TransitionError) -> Result<(), TransitionError> {
    if ok {
        Ok(())
    } else {
        Err(err())
    }
}

fn go_to_dashboard(state: &mut WizardState, effects: &mut Vec<Effect>) {
    state.draft.reset_for_new_project();
    state.screen = Screen::Dashboard;
    state.prompt = None;
    effects.push(Effect::ClearProgress);
}

fn start_new_project(state: &mut WizardState, effects: &mut Vec<Effect>) {
    state.draft.reset_for_new_project();
    state.screen = Screen::VideoDetails;
    state.prompt = None;
    effects.push(Effect::ClearProgress);
}

/// Edit -> Result. `None` when not on the editor.
fn leave_editor(state: &mut WizardState) -> Option<()> {
    let Screen::Edit {
        video, history_id, ..
    } = &state.screen
    else {
        return None;
    };
    state.screen = Screen::Result {
        video: video.clone(),
        history_id: history_id.clone(),
    };
    Some(())
}

fn apply_details(state: &mut WizardState, patch: DetailsPatch) {
    let draft = &mut state.draft;
    if let Some(title) = patch.title {
        draft.video_title = title;
    }
    if let Some(description) = patch.description {
        draft.video_description = description;
    }
    if let Some(audience) = patch.target_audience {
        draft.target_audience = audience;
    }
    if let Some(length) = patch.video_length {
        draft.video_length = length;
    }
    if let Some(model) = patch.model {
        draft.selected_model = model;
    }
}

fn apply_concept_edit(concept: &mut Concept, edit: ConceptEdit) -> Result<(), TransitionError> {
    match edit {
        ConceptEdit::UpdateOverview(patch) => concept.apply_patch(patch),
        ConceptEdit::AddScene => {
            concept.add_scene();
        }
        ConceptEdit::RemoveScene(scene_id) => {
            if !concept.remove_scene(scene_id) {
                return Err(TransitionError::UnknownScene(scene_id));
            }
        }
        ConceptEdit::UpdateScene { scene_id, patch } => {
            if !concept.update_scene(scene_id, patch) {
                return Err(TransitionError::UnknownScene(scene_id));
            }
        }
        ConceptEdit::AttachSceneMedia { scene_id, files } => {
            if !concept.attach_scene_media(scene_id, files) {
                return Err(TransitionError::UnknownScene(scene_id));
            }
        }
        ConceptEdit::RemoveSceneMedia { scene_id, index } => {
            if concept.scene(scene_id).is_none() {
                return Err(TransitionError::UnknownScene(scene_id));
            }
            if !concept.remove_scene_media(scene_id, index) {
                return Err(TransitionError::UnknownMedia(index));
            }
        }
        ConceptEdit::AttachMedia(files) => concept.attach_media(files),
        ConceptEdit::RemoveMedia(index) => {
            if !concept.remove_media(index) {
                return Err(TransitionError::UnknownMedia(index));
            }
        }
    }
    Ok(())
}

/// Rebuild the wizard from a snapshot.
///
/// Loading screens re-issue their operation; an editor or render snapshot
/// without a concept falls back to the concept list.
fn restore(state: &mut WizardState, saved: SavedProgress, effects: &mut Vec<Effect>) {
    state.draft = saved.draft;
    let concept = saved.edited_concept.or_else(|| {
        state
            .draft
            .selected_concept
            .and_then(|id| state.draft.concept(id).cloned())
    });

    state.screen = match (saved.state, concept) {
        (WizardScreen::VideoDetails, _) => Screen::VideoDetails,
        (WizardScreen::ConceptsLoading, _) => {
            let op = state.issue_op();
            effects.push(Effect::GenerateConcepts {
                op,
                brief: state.draft.brief(),
            });
            Screen::ConceptsLoading { op }
        }
        (WizardScreen::Concepts, _) => Screen::Concepts,
        (WizardScreen::ConceptEdit, Some(concept)) => Screen::ConceptEdit { concept },
        (WizardScreen::Generating, Some(concept)) => {
            let op = state.issue_op();
            effects.push(Effect::RenderVideo {
                op,
                brief: state.draft.brief(),
                concept: concept.clone(),
            });
            Screen::Generating { op, concept }
        }
        (WizardScreen::ConceptEdit | WizardScreen::Generating, None) => Screen::Concepts,
        _ => Screen::Dashboard,
    };
    info!(screen = %state.screen.kind(), "Resumed saved progress");
}

#[cfg(test)]
mod tests {
    use super::*;
    use foobi_models::{Credentials, PlanTier, Scene};

    fn logged_in(screen: Screen) -> WizardState {
        let mut state = WizardState::new();
        state.session.logged_in = true;
        state.screen = screen;
        state
    }

    fn concept() -> Concept {
        Concept {
            id: 1,
            title: "c".to_string(),
            description: String::new(),
            script: String::new(),
            bgm: String::new(),
            scenes: vec![
                Scene::new(1, "a", "", 0, 10, ""),
                Scene::new(2, "b", "", 10, 30, ""),
            ],
            media_files: Vec::new(),
        }
    }

    #[test]
    fn test_login_from_landing_loads_progress() {
        let state = WizardState::new();
        let t = reduce(&state, Action::Login(Credentials::new("a@b.jp", "pw"))).unwrap();
        assert_eq!(t.state.screen, Screen::Dashboard);
        assert_eq!(t.effects, vec![Effect::LoadProgress]);
    }

    #[test]
    fn test_login_rejects_bad_email() {
        let state = WizardState::new();
        let err = reduce(&state, Action::Login(Credentials::new("nope", "pw"))).unwrap_err();
        assert!(matches!(err, TransitionError::Validation(_)));
    }

    #[test]
    fn test_login_mid_wizard_keeps_screen_and_persists() {
        let mut state = WizardState::new();
        state.screen = Screen::VideoDetails;
        let t = reduce(&state, Action::Login(Credentials::new("a@b.jp", "pw"))).unwrap();
        assert_eq!(t.state.screen, Screen::VideoDetails);
        assert!(matches!(t.effects.as_slice(), [Effect::PersistProgress(_)]));
    }

    #[test]
    fn test_submit_issues_generation() {
        let state = logged_in(Screen::VideoDetails);
        let t = reduce(&state, Action::SubmitDetails).unwrap();
        let Screen::ConceptsLoading { op } = t.state.screen else {
            panic!("expected loading screen");
        };
        assert!(matches!(t.effects[0], Effect::GenerateConcepts { op: o, .. } if o == op));
        assert!(matches!(t.effects[1], Effect::PersistProgress(_)));
    }

    #[test]
    fn test_plan_upgrade_names_required_tier() {
        let mut state = logged_in(Screen::VideoDetails);
        state.draft.selected_model = "enterprise".to_string();
        let t = reduce(&state, Action::SubmitDetails).unwrap();
        assert_eq!(
            t.state.prompt,
            Some(Prompt::PlanUpgrade {
                required: Some(PlanTier::Enterprise)
            })
        );
    }

    #[test]
    fn test_leaving_loading_cancels_operation() {
        let state = logged_in(Screen::ConceptsLoading { op: 7 });
        let t = reduce(&state, Action::GoToDashboard).unwrap();
        assert_eq!(t.effects[0], Effect::CancelOperation { op: 7 });
        assert!(t.effects.contains(&Effect::ClearProgress));
    }

    #[test]
    fn test_stale_completion_rejected() {
        let state = logged_in(Screen::ConceptsLoading { op: 2 });
        let err = reduce(
            &state,
            Action::ConceptsGenerated {
                op: 1,
                concepts: Vec::new(),
            },
        )
        .unwrap_err();
        assert_eq!(err, TransitionError::StaleOperation(1));
    }

    #[test]
    fn test_render_failure_returns_to_editor() {
        let state = logged_in(Screen::Generating {
            op: 3,
            concept: concept(),
        });
        let t = reduce(
            &state,
            Action::GenerationFailed {
                op: 3,
                message: "boom".to_string(),
            },
        )
        .unwrap();
        assert_eq!(t.state.screen, Screen::ConceptEdit { concept: concept() });
        assert!(matches!(t.state.prompt, Some(Prompt::GenerationFailed { .. })));
        assert!(!t.effects.contains(&Effect::CancelOperation { op: 3 }));
    }

    #[test]
    fn test_complete_edit_validates_timeline() {
        let mut broken = concept();
        broken.scenes[1].start_time = 12;
        let state = logged_in(Screen::ConceptEdit { concept: broken });
        let err = reduce(&state, Action::CompleteConceptEdit).unwrap_err();
        assert!(matches!(err, TransitionError::InvalidTimeline(_)));
    }

    #[test]
    fn test_edit_concept_add_scene() {
        let state = logged_in(Screen::ConceptEdit { concept: concept() });
        let t = reduce(&state, Action::EditConcept(ConceptEdit::AddScene)).unwrap();
        let edited = t.state.screen.edited_concept().unwrap();
        assert_eq!(edited.scenes.len(), 3);
        assert_eq!(edited.total_duration(), 35);
        assert!(edited.validate_timeline().is_ok());
    }

    #[test]
    fn test_free_plan_applies_without_checkout() {
        let mut state = logged_in(Screen::Dashboard);
        state.session.plan = PlanTier::Pro;
        let t = reduce(&state, Action::SelectPlan(PlanTier::Free)).unwrap();
        assert_eq!(t.state.session.plan, PlanTier::Free);
        assert!(t.effects.is_empty());
    }

    #[test]
    fn test_checkout_outcomes() {
        let state = logged_in(Screen::Dashboard);
        let t = reduce(&state, Action::SelectPlan(PlanTier::Pro)).unwrap();
        assert_eq!(t.effects, vec![Effect::StartCheckout { tier: PlanTier::Pro }]);
        assert_eq!(t.state.session.plan, PlanTier::Free);

        let paid = reduce(
            &t.state,
            Action::CheckoutFinished(CheckoutOutcome::Confirmed(PlanTier::Pro)),
        )
        .unwrap();
        assert_eq!(paid.state.session.plan, PlanTier::Pro);
        assert!(paid.state.checkout.is_none());

        let abandoned = reduce(&t.state, Action::CheckoutFinished(CheckoutOutcome::Abandoned)).unwrap();
        assert_eq!(abandoned.state.session.plan, PlanTier::Free);
        assert_eq!(
            abandoned.state.prompt,
            Some(Prompt::CheckoutFailed { tier: PlanTier::Pro })
        );

        let cancelled = reduce(&t.state, Action::CheckoutFinished(CheckoutOutcome::Cancelled)).unwrap();
        assert_eq!(cancelled.state.prompt, None);
    }

    #[test]
    fn test_settings_round_trip() {
        let state = logged_in(Screen::Dashboard);
        let t = reduce(&state, Action::OpenSettings).unwrap();
        assert_eq!(t.state.screen, Screen::Settings);
        assert!(t.effects.is_empty());

        let back = reduce(&t.state, Action::GoBack).unwrap();
        assert_eq!(back.state.screen, Screen::Dashboard);
    }
}
