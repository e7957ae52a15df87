//! Drives one upload → simulate → publish cycle against the remote service.

use std::sync::Arc;

use aero_client::SimulationService;
use aero_core::RunToken;
use aero_results::map_streamlines;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult, ErrorKind};
use crate::session::{CompletedRun, Freshness, RunStatus, RunTicket, SessionState, SessionStore};

/// What to do when a run is requested while another is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartPolicy {
    /// Ignore the request.
    IfIdle,
    /// Start anyway; the older run can no longer publish anything.
    Supersede,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Result published as `last_result`.
    Completed { token: RunToken },
    /// Failure recorded on the session.
    Failed { token: RunToken, kind: ErrorKind },
    /// The run went stale before it finished; nothing was published.
    Discarded { token: RunToken },
    /// Another run was in flight.
    Ignored,
}

impl RunOutcome {
    /// For callers that drive a single run and need its result published.
    ///
    /// `state` is read after the run returned; a failure takes its message
    /// from the session status.
    pub fn require_completed(self, state: &SessionState) -> AppResult<RunToken> {
        match self {
            RunOutcome::Completed { token } => Ok(token),
            RunOutcome::Failed { kind, .. } => {
                let message = match &state.status {
                    RunStatus::Failed { message, .. } => message.clone(),
                    _ => kind.label().to_string(),
                };
                Err(AppError::RunFailed { kind, message })
            }
            RunOutcome::Discarded { token } => Err(AppError::RunDiscarded(token)),
            RunOutcome::Ignored => Err(AppError::RunInFlight),
        }
    }
}

pub struct Orchestrator<S> {
    store: SessionStore,
    service: S,
}

impl<S: SimulationService> Orchestrator<S> {
    pub fn new(store: SessionStore, service: S) -> Self {
        Self { store, service }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Start a run unless one is already in flight.
    ///
    /// Fails only with [`AppError::NoInputSelected`]; remote failures are
    /// recorded on the session and reported as [`RunOutcome::Failed`].
    pub async fn run(&self) -> AppResult<RunOutcome> {
        self.start(StartPolicy::IfIdle).await
    }

    /// [`run`](Self::run), reporting session statuses as they change.
    ///
    /// Statuses published in quick succession may be coalesced, but the one
    /// the run ends in is always reported.
    pub async fn run_observed(
        &self,
        mut on_status: impl FnMut(&RunStatus),
    ) -> AppResult<RunOutcome> {
        let mut rx = self.store.subscribe();
        let run = self.run();
        tokio::pin!(run);

        let outcome = loop {
            tokio::select! {
                outcome = &mut run => break outcome,
                changed = rx.changed() => {
                    if changed.is_ok() {
                        on_status(&rx.borrow_and_update().status);
                    }
                }
            }
        };
        // the final transition lands in the same poll that finishes the run
        if rx.has_changed().unwrap_or(false) {
            on_status(&rx.borrow_and_update().status);
        }
        outcome
    }

    /// Start a run even if one is in flight. The older request is not
    /// aborted; its outcome is dropped when it arrives.
    pub async fn restart(&self) -> AppResult<RunOutcome> {
        self.start(StartPolicy::Supersede).await
    }

    pub async fn start(&self, policy: StartPolicy) -> AppResult<RunOutcome> {
        let supersede = policy == StartPolicy::Supersede;
        let Some(ticket) = self.store.begin_run(supersede)? else {
            debug!("run already in flight, request ignored");
            return Ok(RunOutcome::Ignored);
        };

        info!(
            token = %ticket.token,
            file = %ticket.upload.file_name,
            resolution = ticket.parameters.resolution,
            wind_speed = ticket.parameters.wind_speed,
            "run started"
        );
        Ok(self.drive(&ticket).await)
    }

    async fn drive(&self, ticket: &RunTicket) -> RunOutcome {
        if let Err(e) = self.service.upload(&ticket.upload).await {
            return self.fail(ticket, AppError::UploadFailed(e));
        }

        if self.store.mark_simulating(ticket) != Freshness::Current {
            // stale runs do not issue their simulate request
            return self.discard(ticket);
        }

        let result = match self.service.simulate(&ticket.parameters).await {
            Ok(result) => result,
            Err(e) => return self.fail(ticket, AppError::from_simulate(e)),
        };

        let mapped = match map_streamlines(&result) {
            Ok(mapped) => mapped,
            Err(e) => return self.fail(ticket, AppError::InvalidResult(e)),
        };

        let streamlines = mapped.len();
        let completed = CompletedRun {
            token: ticket.token,
            input_name: ticket.upload.file_name.clone(),
            parameters: ticket.parameters,
            result,
            mapped,
        };

        match self.store.complete_run(ticket, completed) {
            Freshness::Current => {
                info!(token = %ticket.token, streamlines, "run completed");
                RunOutcome::Completed {
                    token: ticket.token,
                }
            }
            _ => self.discard(ticket),
        }
    }

    fn fail(&self, ticket: &RunTicket, error: AppError) -> RunOutcome {
        match self.store.fail_run(ticket, &error) {
            Freshness::Current => {
                warn!(token = %ticket.token, error = %error, "run failed");
                RunOutcome::Failed {
                    token: ticket.token,
                    kind: error.kind(),
                }
            }
            _ => {
                debug!(token = %ticket.token, error = %error, "stale run failure dropped");
                self.discard(ticket)
            }
        }
    }

    fn discard(&self, ticket: &RunTicket) -> RunOutcome {
        debug!(token = %ticket.token, "stale run discarded");
        RunOutcome::Discarded {
            token: ticket.token,
        }
    }
}

impl<S: SimulationService + 'static> Orchestrator<S> {
    /// Run on `runtime` without blocking the caller (the UI thread).
    pub fn spawn(
        self: &Arc<Self>,
        runtime: &Handle,
        policy: StartPolicy,
    ) -> JoinHandle<AppResult<RunOutcome>> {
        let orchestrator = Arc::clone(self);
        runtime.spawn(async move { orchestrator.start(policy).await })
    }
}
