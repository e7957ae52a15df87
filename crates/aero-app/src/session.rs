//! The session store: one `SessionState`, one mutation surface, many observers.
//!
//! Every mutation is a single closure run under the watch channel's lock, so
//! observers never see a run token advance without its status change.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use aero_client::MeshUpload;
use aero_core::{HandleId, ParameterDelta, RunToken, SimulationParameters};
use aero_results::{MappedStreamlines, SimulationResult};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::asset::{DisplayHandle, InputAsset};
use crate::error::{AppError, AppResult, ErrorKind};

#[derive(Debug, Clone, PartialEq)]
pub enum RunStatus {
    Idle,
    Uploading,
    Simulating,
    Completed,
    Failed { kind: ErrorKind, message: String },
}

impl RunStatus {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, RunStatus::Uploading | RunStatus::Simulating)
    }

    pub fn label(&self) -> &'static str {
        match self {
            RunStatus::Idle => "Idle",
            RunStatus::Uploading => "Uploading",
            RunStatus::Simulating => "Simulating",
            RunStatus::Completed => "Completed",
            RunStatus::Failed { .. } => "Failed",
        }
    }
}

/// A published result together with its scene-space mapping.
#[derive(Debug)]
pub struct CompletedRun {
    pub token: RunToken,
    pub input_name: String,
    /// Parameters the run was started with.
    pub parameters: SimulationParameters,
    pub result: SimulationResult,
    pub mapped: MappedStreamlines,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub input: Option<InputAsset>,
    pub parameters: SimulationParameters,
    pub status: RunStatus,
    pub last_result: Option<Arc<CompletedRun>>,
    /// Most recently issued run token.
    pub latest_token: Option<RunToken>,
    /// Bumped on every input selection.
    pub input_generation: u64,
}

impl SessionState {
    fn new(parameters: SimulationParameters) -> Self {
        Self {
            input: None,
            parameters,
            status: RunStatus::Idle,
            last_result: None,
            latest_token: None,
            input_generation: 0,
        }
    }

    pub fn can_start_run(&self) -> bool {
        self.input.is_some() && !self.status.is_in_flight()
    }

    pub fn display_handle(&self) -> Option<&DisplayHandle> {
        self.input.as_ref().map(|input| &input.handle)
    }

    pub fn freshness(&self, ticket: &RunTicket) -> Freshness {
        if self.latest_token != Some(ticket.token) {
            Freshness::Superseded
        } else if self.input_generation != ticket.input_generation {
            Freshness::InputReplaced
        } else {
            Freshness::Current
        }
    }
}

/// Snapshot a run captured when it began.
#[derive(Debug, Clone)]
pub struct RunTicket {
    pub token: RunToken,
    pub input_generation: u64,
    pub upload: MeshUpload,
    pub parameters: SimulationParameters,
}

/// Whether a run may still affect visible state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Current,
    /// Still the latest run, but its input was replaced mid-flight.
    InputReplaced,
    /// A newer run was started.
    Superseded,
}

#[derive(Clone)]
pub struct SessionStore {
    state: Arc<watch::Sender<SessionState>>,
    handle_ids: Arc<AtomicU64>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(SimulationParameters::default())
    }
}

impl SessionStore {
    pub fn new(parameters: SimulationParameters) -> Self {
        let (tx, _rx) = watch::channel(SessionState::new(parameters));
        Self {
            state: Arc::new(tx),
            handle_ids: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver that sees every committed transition.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Replace the input. The previous display handle is released in the
    /// same update; the run status is left alone.
    pub fn select_input(&self, name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> DisplayHandle {
        let name = name.into();
        let bytes = bytes.into();
        let id = HandleId::nth(self.handle_ids.fetch_add(1, Ordering::Relaxed));
        let handle = DisplayHandle::create(id, Arc::clone(&bytes));

        self.state.send_modify(|state| {
            let next = InputAsset {
                name,
                bytes,
                handle: handle.clone(),
            };
            if let Some(previous) = state.input.replace(next) {
                previous.handle.invalidate();
                debug!(released = %previous.handle.id(), "display handle released");
            }
            state.input_generation += 1;
        });

        info!(handle = %id, "input selected");
        handle
    }

    pub fn set_parameters(&self, delta: ParameterDelta) -> AppResult<SimulationParameters> {
        let mut outcome = Ok(SimulationParameters::default());
        self.state.send_if_modified(|state| match state.parameters.apply(delta) {
            Ok(next) => {
                let changed = next != state.parameters;
                state.parameters = next;
                outcome = Ok(next);
                changed
            }
            Err(e) => {
                outcome = Err(AppError::from(e));
                false
            }
        });
        outcome
    }

    /// Issue a token and move to `Uploading`.
    ///
    /// `Ok(None)` when a run is already in flight and `supersede` is false.
    pub fn begin_run(&self, supersede: bool) -> AppResult<Option<RunTicket>> {
        let mut outcome = Ok(None);
        self.state.send_if_modified(|state| {
            let Some(input) = &state.input else {
                outcome = Err(AppError::NoInputSelected);
                return false;
            };
            if state.status.is_in_flight() && !supersede {
                return false;
            }

            let token = RunToken::after(state.latest_token);
            outcome = Ok(Some(RunTicket {
                token,
                input_generation: state.input_generation,
                upload: input.upload(),
                parameters: state.parameters,
            }));
            state.latest_token = Some(token);
            state.status = RunStatus::Uploading;
            true
        });
        outcome
    }

    pub fn mark_simulating(&self, ticket: &RunTicket) -> Freshness {
        self.settle(ticket, |state| state.status = RunStatus::Simulating)
    }

    pub fn complete_run(&self, ticket: &RunTicket, completed: CompletedRun) -> Freshness {
        self.settle(ticket, |state| {
            state.status = RunStatus::Completed;
            state.last_result = Some(Arc::new(completed));
        })
    }

    /// Record a failure; `last_result` is kept.
    pub fn fail_run(&self, ticket: &RunTicket, error: &AppError) -> Freshness {
        self.settle(ticket, |state| {
            state.status = RunStatus::Failed {
                kind: error.kind(),
                message: error.to_string(),
            };
        })
    }

    /// Apply `transition` only if `ticket` is current. A run whose input was
    /// replaced gives the control back by returning to `Idle`.
    fn settle(&self, ticket: &RunTicket, transition: impl FnOnce(&mut SessionState)) -> Freshness {
        let mut freshness = Freshness::Superseded;
        self.state.send_if_modified(|state| {
            freshness = state.freshness(ticket);
            match freshness {
                Freshness::Current => {
                    transition(state);
                    true
                }
                Freshness::InputReplaced => {
                    state.status = RunStatus::Idle;
                    true
                }
                Freshness::Superseded => false,
            }
        });
        freshness
    }
}
