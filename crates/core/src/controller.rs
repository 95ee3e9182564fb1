//! The session controller: a single task that owns the [`Session`], runs the
//! debounce timer and dispatches backend calls.
//!
//! Front ends talk to it through a cloneable [`ControllerHandle`]. Every state
//! change is published on a `watch` channel, so a view only needs to render the
//! latest [`Session`] it receives.

use crate::catalog::{load_catalogs, LoadedCatalogs};
use crate::config::ClientConfig;
use crate::session::{Session, SessionError, SwapOutcome};
use crate::translate::{ApiError, TranslationApi, TranslationRequest, TranslationResult};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

const LOG_TARGET: &str = "controller";
const COMMAND_CAPACITY: usize = 64;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("controller task has stopped")]
    Closed,
}

enum Command {
    SetInput(String),
    SetSource(String, oneshot::Sender<Result<(), SessionError>>),
    SetTarget(String, oneshot::Sender<Result<(), SessionError>>),
    Swap(oneshot::Sender<SwapOutcome>),
    Snapshot(oneshot::Sender<Session>),
    Shutdown,
}

/// Results posted back to the controller by tasks it spawned.
enum Completion {
    Catalogs(LoadedCatalogs),
    Translated {
        id: u64,
        request: TranslationRequest,
        result: Result<TranslationResult, ApiError>,
    },
}

#[derive(Clone)]
pub struct ControllerHandle {
    commands: mpsc::Sender<Command>,
    view: watch::Receiver<Session>,
}

impl ControllerHandle {
    pub async fn set_input(&self, text: impl Into<String>) -> Result<(), ControllerError> {
        self.send(Command::SetInput(text.into())).await
    }

    pub async fn clear_input(&self) -> Result<(), ControllerError> {
        self.set_input(String::new()).await
    }

    pub async fn set_source(&self, code: impl Into<String>) -> Result<(), ControllerError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::SetSource(code.into(), tx)).await?;
        Ok(rx.await.map_err(|_| ControllerError::Closed)??)
    }

    pub async fn set_target(&self, code: impl Into<String>) -> Result<(), ControllerError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::SetTarget(code.into(), tx)).await?;
        Ok(rx.await.map_err(|_| ControllerError::Closed)??)
    }

    pub async fn swap(&self) -> Result<SwapOutcome, ControllerError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Swap(tx)).await?;
        rx.await.map_err(|_| ControllerError::Closed)
    }

    /// State after every command sent before this call has been applied.
    pub async fn snapshot(&self) -> Result<Session, ControllerError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Snapshot(tx)).await?;
        rx.await.map_err(|_| ControllerError::Closed)
    }

    /// Last published state, without waiting for queued commands.
    pub fn current(&self) -> Session {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.view.clone()
    }

    pub async fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown).await;
    }

    async fn send(&self, command: Command) -> Result<(), ControllerError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| ControllerError::Closed)
    }
}

pub struct TranslationController<A> {
    api: Arc<A>,
    config: ClientConfig,
    session: Session,
    view: watch::Sender<Session>,
    completions: mpsc::UnboundedSender<Completion>,
    deadline: Option<Instant>,
    latest_request: u64,
}

impl<A> TranslationController<A>
where
    A: TranslationApi + 'static,
{
    /// Starts the controller task and kicks off the catalog load.
    pub fn spawn(api: Arc<A>, config: ClientConfig) -> (ControllerHandle, JoinHandle<()>) {
        let session = Session::new(&config);
        let (view_tx, view_rx) = watch::channel(session.clone());
        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_CAPACITY);
        let (done_tx, done_rx) = mpsc::unbounded_channel();

        let controller = Self {
            api,
            config,
            session,
            view: view_tx,
            completions: done_tx,
            deadline: None,
            latest_request: 0,
        };
        let task = tokio::spawn(controller.run(cmd_rx, done_rx));

        let handle = ControllerHandle {
            commands: cmd_tx,
            view: view_rx,
        };
        (handle, task)
    }

    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut completions: mpsc::UnboundedReceiver<Completion>,
    ) {
        self.start_catalog_load();
        self.dependencies_changed();
        self.publish();

        loop {
            let deadline = self.deadline;
            let timer = async move {
                match deadline {
                    Some(at) => tokio::time::sleep_until(at).await,
                    None => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.handle_command(command),
                },
                Some(done) = completions.recv() => self.handle_completion(done),
                _ = timer => {
                    self.deadline = None;
                    self.fire();
                }
            }

            self.publish();
        }

        tracing::debug!(target: LOG_TARGET, "controller stopped");
    }

    fn start_catalog_load(&self) {
        let api = self.api.clone();
        let config = self.config.clone();
        let done = self.completions.clone();
        tokio::spawn(async move {
            let loaded = load_catalogs(api.as_ref(), &config).await;
            let _ = done.send(Completion::Catalogs(loaded));
        });
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::SetInput(text) => {
                if self.session.set_input(text) {
                    self.dependencies_changed();
                }
            }
            Command::SetSource(code, reply) => {
                let res = self.session.set_source(code).map(|changed| {
                    if changed {
                        self.dependencies_changed();
                    }
                });
                let _ = reply.send(res);
            }
            Command::SetTarget(code, reply) => {
                let res = self.session.set_target(code).map(|changed| {
                    if changed {
                        self.dependencies_changed();
                    }
                });
                let _ = reply.send(res);
            }
            Command::Swap(reply) => {
                let before = self.dependency_key();
                let outcome = self.session.swap();
                if outcome == SwapOutcome::Swapped && self.dependency_key() != before {
                    self.dependencies_changed();
                }
                let _ = reply.send(outcome);
            }
            Command::Snapshot(reply) => {
                let _ = reply.send(self.session.clone());
            }
            Command::Shutdown => {}
        }
    }

    fn handle_completion(&mut self, done: Completion) {
        match done {
            Completion::Catalogs(loaded) => {
                if self.session.apply_catalogs(loaded) {
                    self.dependencies_changed();
                }
            }
            Completion::Translated {
                id,
                request,
                result,
            } => {
                if id != self.latest_request {
                    tracing::debug!(target: LOG_TARGET, id, latest = self.latest_request, "dropping stale response");
                    return;
                }
                match result {
                    Ok(result) => self.session.apply_success(&request, result),
                    Err(e) => {
                        tracing::warn!(target: LOG_TARGET, id, error = %e, "translation failed");
                        self.session.apply_failure(e.user_message());
                    }
                }
            }
        }
    }

    /// Input, source or target moved: restart the quiet period, or clear at once
    /// when there is nothing to translate.
    fn dependencies_changed(&mut self) {
        if self.session.input_text.is_empty() {
            self.deadline = None;
            // Outstanding responses belong to text that no longer exists.
            self.latest_request += 1;
            self.session.clear_output();
            return;
        }
        let at = Instant::now() + self.config.debounce.duration();
        tracing::trace!(target: LOG_TARGET, quiet_ms = self.config.debounce.quiet_ms, "translation scheduled");
        self.deadline = Some(at);
    }

    fn fire(&mut self) {
        if self.session.input_text.is_empty() {
            self.session.clear_output();
            return;
        }

        let request = self.session.begin_request();
        self.latest_request += 1;
        let id = self.latest_request;
        tracing::debug!(
            target: LOG_TARGET,
            id,
            source = %request.source_code,
            target = %request.target_code,
            chars = request.text.chars().count(),
            "dispatching translation"
        );

        let api = self.api.clone();
        let done = self.completions.clone();
        tokio::spawn(async move {
            let result = api.translate(request.clone()).await;
            let _ = done.send(Completion::Translated {
                id,
                request,
                result,
            });
        });
    }

    fn dependency_key(&self) -> (String, String, String) {
        (
            self.session.input_text.clone(),
            self.session.source_code.clone(),
            self.session.target_code.clone(),
        )
    }

    fn publish(&self) {
        self.view.send_if_modified(|view| {
            if *view == self.session {
                return false;
            }
            *view = self.session.clone();
            true
        });
    }
}
