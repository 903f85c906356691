//! Owns the wizard state and runs the effects the reducer asks for.
//!
//! Generation and checkout run as spawned tasks. Each reports back over a
//! channel as an [`Action`], so completions go through the same reducer as
//! user input. Operations carry a [`CancellationToken`]; leaving a loading
//! screen cancels the token and any completion that still arrives is
//! rejected as stale.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use foobi_billing::{
    confirm_checkout, CheckoutConfig, CheckoutGateway, CheckoutScript, SimulatedCheckout,
};
use foobi_generation::{build_backends, Backends, GenerationError, GenerationResult};
use foobi_storage::{FileStore, KeyValueStore, MemoryStore, ProgressRepository};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::action::{Action, Effect};
use crate::config::{StorageBackend, WizardConfig};
use crate::error::{TransitionError, WizardResult};
use crate::metrics;
use crate::reducer::reduce;
use crate::state::{OpId, Prompt, WizardState};

/// Status polls before the built-in simulated checkout reports payment.
const SIMULATED_CHECKOUT_POLLS: u32 = 3;

struct InFlight {
    token: CancellationToken,
    kind: &'static str,
    started: Instant,
}

pub struct WizardController {
    state: WizardState,
    backends: Backends,
    progress: ProgressRepository,
    gateway: Arc<dyn CheckoutGateway>,
    checkout_config: CheckoutConfig,
    generation_timeout: Duration,
    in_flight: HashMap<OpId, InFlight>,
    checkout_cancel: Option<CancellationToken>,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Action>,
}

impl WizardController {
    pub fn new(
        backends: Backends,
        progress: ProgressRepository,
        gateway: Arc<dyn CheckoutGateway>,
        config: &WizardConfig,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state: WizardState::new(),
            backends,
            progress,
            gateway,
            checkout_config: config.checkout.clone(),
            generation_timeout: config.generation_timeout,
            in_flight: HashMap::new(),
            checkout_cancel: None,
            tx,
            rx,
        }
    }

    /// Build storage, generation backends and a simulated checkout from config.
    pub async fn from_config(config: &WizardConfig) -> WizardResult<Self> {
        let store: Arc<dyn KeyValueStore> = match config.storage {
            StorageBackend::Memory => Arc::new(MemoryStore::new()),
            StorageBackend::File => Arc::new(FileStore::open(&config.storage_dir).await?),
        };
        let progress = ProgressRepository::new(store, config.progress_key.clone());
        let backends = build_backends(&config.generation)?;
        let gateway = Arc::new(SimulatedCheckout::new(
            config.checkout.clone(),
            CheckoutScript::PayAfter(SIMULATED_CHECKOUT_POLLS),
        ));

        info!(
            storage = ?config.storage,
            backend = ?config.generation.backend,
            generation_timeout_secs = config.generation_timeout.as_secs(),
            "Wizard controller ready"
        );
        Ok(Self::new(backends, progress, gateway, config))
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn progress(&self) -> &ProgressRepository {
        &self.progress
    }

    /// Whether a generation or checkout is still running.
    pub fn is_busy(&self) -> bool {
        !self.in_flight.is_empty() || self.checkout_cancel.is_some()
    }

    /// Apply a user action and run its effects.
    ///
    /// Storage follow-ups (such as the resume prompt after login) are applied
    /// before this returns. Asynchronous operations are only started; use
    /// [`settle`](Self::settle) or [`process_next`](Self::process_next) to
    /// receive their completions.
    pub async fn dispatch(&mut self, action: Action) -> Result<(), TransitionError> {
        let follow_ups = self.apply(action).await?;

        let mut queue: VecDeque<Action> = follow_ups.into();
        while let Some(next) = queue.pop_front() {
            let name = next.name();
            match self.apply(next).await {
                Ok(more) => queue.extend(more),
                Err(e) => warn!(action = name, error = %e, "Follow-up action rejected"),
            }
        }
        Ok(())
    }

    /// Wait for the next completion and apply it. Returns false if the
    /// channel is closed.
    pub async fn process_next(&mut self) -> bool {
        match self.rx.recv().await {
            Some(action) => {
                self.complete(action).await;
                true
            }
            None => false,
        }
    }

    /// Process completions until nothing is running.
    pub async fn settle(&mut self) {
        while self.is_busy() {
            if !self.process_next().await {
                break;
            }
        }
    }

    async fn apply(&mut self, action: Action) -> Result<Vec<Action>, TransitionError> {
        let name = action.name();
        let from = self.state.screen.kind();

        let transition = match reduce(&self.state, action) {
            Ok(transition) => transition,
            Err(e) => {
                metrics::record_transition_rejected(name);
                debug!(action = name, screen = %from, error = %e, "Action rejected");
                return Err(e);
            }
        };

        let prompt_before = self.state.prompt.as_ref().map(Prompt::name);
        self.state = transition.state;
        metrics::record_transition(name);
        debug!(
            action = name,
            from = %from,
            to = %self.state.screen.kind(),
            effects = transition.effects.len(),
            "Transition"
        );
        if let Some(prompt) = &self.state.prompt {
            if prompt_before != Some(prompt.name()) {
                metrics::record_prompt(prompt.name());
            }
        }

        let mut follow_ups = Vec::new();
        for effect in transition.effects {
            if let Some(action) = self.run_effect(effect).await {
                follow_ups.push(action);
            }
        }
        Ok(follow_ups)
    }

    async fn run_effect(&mut self, effect: Effect) -> Option<Action> {
        match effect {
            Effect::GenerateConcepts { op, brief } => {
                let generator = self.backends.generator.clone();
                self.spawn_operation(op, "concepts", async move {
                    generator
                        .generate_concepts(&brief)
                        .await
                        .map(|concepts| Action::ConceptsGenerated { op, concepts })
                });
                None
            }
            Effect::RenderVideo { op, brief, concept } => {
                let renderer = self.backends.renderer.clone();
                self.spawn_operation(op, "render", async move {
                    renderer
                        .render_video(&brief, &concept)
                        .await
                        .map(|video| Action::VideoRendered {
                            op,
                            video,
                            created_on: chrono::Local::now().date_naive(),
                        })
                });
                None
            }
            Effect::CancelOperation { op } => {
                if let Some(flight) = self.in_flight.remove(&op) {
                    flight.token.cancel();
                    metrics::record_operation_cancelled();
                    info!(op_id = op, kind = flight.kind, "Operation cancelled");
                }
                None
            }
            Effect::PersistProgress(progress) => {
                if let Err(e) = self.progress.save(&progress).await {
                    metrics::record_storage_failure("save");
                    warn!(error = %e, "Failed to save wizard progress");
                }
                None
            }
            Effect::ClearProgress => {
                if let Err(e) = self.progress.clear().await {
                    metrics::record_storage_failure("clear");
                    warn!(error = %e, "Failed to clear wizard progress");
                }
                None
            }
            Effect::LoadProgress => Some(Action::SavedProgressLoaded(self.progress.load().await)),
            Effect::StartCheckout { tier } => {
                let token = CancellationToken::new();
                self.checkout_cancel = Some(token.clone());

                let gateway = self.gateway.clone();
                let config = self.checkout_config.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let action = match confirm_checkout(gateway.as_ref(), tier, &config, &token).await {
                        Ok(outcome) => Action::CheckoutFinished(outcome),
                        Err(e) => Action::CheckoutErrored {
                            message: e.to_string(),
                        },
                    };
                    if tx.send(action).is_err() {
                        debug!("Wizard controller dropped before checkout finished");
                    }
                });
                None
            }
            Effect::CancelCheckout => {
                if let Some(token) = &self.checkout_cancel {
                    token.cancel();
                }
                None
            }
        }
    }

    fn spawn_operation<F>(&mut self, op: OpId, kind: &'static str, work: F)
    where
        F: Future<Output = GenerationResult<Action>> + Send + 'static,
    {
        let token = CancellationToken::new();
        self.in_flight.insert(
            op,
            InFlight {
                token: token.clone(),
                kind,
                started: Instant::now(),
            },
        );
        metrics::record_operation_started(kind);
        info!(op_id = op, kind, "Operation started");

        let tx = self.tx.clone();
        let timeout = self.generation_timeout;
        tokio::spawn(async move {
            // The work runs in its own task so a panicking backend still
            // produces a completion.
            let mut task = tokio::spawn(tokio::time::timeout(timeout, work));
            let joined = tokio::select! {
                biased;
                _ = token.cancelled() => {
                    task.abort();
                    return;
                }
                joined = &mut task => joined,
            };

            let action = match joined {
                Ok(Ok(Ok(action))) => action,
                Ok(Ok(Err(e))) => Action::GenerationFailed {
                    op,
                    message: e.to_string(),
                },
                Ok(Err(_)) => Action::GenerationFailed {
                    op,
                    message: GenerationError::Timeout(timeout.as_secs()).to_string(),
                },
                Err(e) => {
                    error!(op_id = op, kind, error = %e, "Operation task failed");
                    Action::GenerationFailed {
                        op,
                        message: format!("{kind} task failed: {e}"),
                    }
                }
            };
            if tx.send(action).is_err() {
                debug!(op_id = op, "Wizard controller dropped before operation finished");
            }
        });
    }

    async fn complete(&mut self, action: Action) {
        if let Some(op) = action.completed_op() {
            if let Some(flight) = self.in_flight.remove(&op) {
                if matches!(action, Action::GenerationFailed { .. }) {
                    metrics::record_operation_failed(flight.kind);
                } else {
                    metrics::record_operation_completed(
                        flight.kind,
                        flight.started.elapsed().as_secs_f64(),
                    );
                }
            }
        }
        if matches!(
            action,
            Action::CheckoutFinished(_) | Action::CheckoutErrored { .. }
        ) {
            self.checkout_cancel = None;
        }

        match self.dispatch(action).await {
            Ok(()) => {}
            Err(TransitionError::StaleOperation(op)) => {
                debug!(op_id = op, "Discarded stale completion");
            }
            Err(e) => warn!(error = %e, "Completion rejected"),
        }
    }
}
