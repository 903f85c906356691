//! Wizard demo binary.
//!
//! Replays a complete project: login, details, concept generation, concept
//! editing and rendering. Prints the final state as JSON.

use foobi_models::Credentials;
use foobi_wizard::logging::init_tracing;
use foobi_wizard::{Action, DetailsPatch, Prompt, WizardConfig, WizardController};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing()?;

    info!("Starting foobi-wizard");

    let config = WizardConfig::from_env()?;
    info!("Wizard config: {:?}", config);

    let mut wizard = WizardController::from_config(&config).await?;

    wizard.dispatch(Action::OpenLogin).await?;
    wizard
        .dispatch(Action::Login(Credentials::new("demo@foobi.jp", "demo-password")))
        .await?;

    if matches!(wizard.state().prompt, Some(Prompt::ResumeOrDiscard { .. })) {
        info!("Discarding progress from an earlier run");
        wizard.dispatch(Action::DiscardSavedProgress).await?;
    }

    wizard.dispatch(Action::StartNewProject).await?;
    wizard
        .dispatch(Action::UpdateDetails(DetailsPatch {
            title: Some("新商品の魅力を伝える動画".to_string()),
            description: Some("新商品ローンチ".to_string()),
            target_audience: Some("20-30代の働く女性".to_string()),
            video_length: Some("30".to_string()),
            model: Some("basic".to_string()),
        }))
        .await?;
    wizard.dispatch(Action::SubmitDetails).await?;
    wizard.settle().await;

    for concept in &wizard.state().draft.concepts {
        info!(
            concept_id = concept.id,
            title = %concept.title,
            scenes = concept.scenes.len(),
            ends_at = concept.total_duration(),
            "Concept ready"
        );
    }

    wizard.dispatch(Action::SelectConcept(1)).await?;
    wizard.dispatch(Action::CompleteConceptEdit).await?;
    wizard.settle().await;

    let state = wizard.state();
    info!(
        screen = %state.screen.kind(),
        step = state.step().number(),
        history = state.history.len(),
        "Wizard finished"
    );
    println!("{}", serde_json::to_string_pretty(state)?);

    Ok(())
}
