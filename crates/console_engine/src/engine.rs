use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use console_core::{Action, Effect, PollId, SessionUpdate};
use console_logging::{console_debug, console_info, console_warn};

use crate::poller::{ChannelEventSink, EventSink, PollerPool};
use crate::{ClientSettings, ConsoleClient, EngineError, EngineEvent, ReqwestClient};

enum EngineCommand {
    FetchInventory { path: String },
    StartPolling {
        poll_id: PollId,
        name: String,
        path: String,
    },
    CancelPolling { poll_id: PollId },
    PushSession(SessionUpdate),
    RunAction(Action),
    FetchDocument { title: String, path: String },
    FetchChart { path: String },
}

impl From<Effect> for EngineCommand {
    fn from(effect: Effect) -> Self {
        match effect {
            Effect::StartPolling {
                poll_id,
                name,
                path,
            } => Self::StartPolling {
                poll_id,
                name,
                path,
            },
            Effect::CancelPolling { poll_id, .. } => Self::CancelPolling { poll_id },
            Effect::PushSession(update) => Self::PushSession(update),
            Effect::RunAction(action) => Self::RunAction(action),
            Effect::FetchDocument { title, path } => Self::FetchDocument { title, path },
            Effect::FetchChart { path } => Self::FetchChart { path },
        }
    }
}

/// Command side of the engine. Dropping it stops every poll.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

/// Event side of the engine.
pub struct EngineEvents {
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineEvents {
    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Blocks for the next event. `None` once the engine has stopped.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

impl EngineHandle {
    pub fn new(
        settings: ClientSettings,
        poll_interval: Duration,
    ) -> Result<(Self, EngineEvents), EngineError> {
        let client: Arc<dyn ConsoleClient> = Arc::new(ReqwestClient::new(settings)?);
        Self::with_client(client, poll_interval)
    }

    pub fn with_client(
        client: Arc<dyn ConsoleClient>,
        poll_interval: Duration,
    ) -> Result<(Self, EngineEvents), EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let sink: Arc<dyn EventSink> = Arc::new(ChannelEventSink::new(event_tx));
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        thread::spawn(move || {
            let mut pool = PollerPool::new(poll_interval);
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::StartPolling {
                        poll_id,
                        name,
                        path,
                    } => {
                        pool.start(
                            runtime.handle(),
                            poll_id,
                            name,
                            path,
                            client.clone(),
                            sink.clone(),
                        );
                    }
                    EngineCommand::CancelPolling { poll_id } => {
                        pool.cancel(poll_id);
                    }
                    other => {
                        let client = client.clone();
                        let sink = sink.clone();
                        runtime.spawn(async move {
                            handle_command(client.as_ref(), other, sink.as_ref()).await;
                        });
                    }
                }
            }
            console_info!("engine command channel closed; stopping {} polls", pool.len());
            pool.cancel_all();
        });

        Ok((Self { cmd_tx }, EngineEvents { event_rx }))
    }

    /// Asks for the initial status of every harvester.
    pub fn fetch_inventory(&self, path: impl Into<String>) {
        let _ = self
            .cmd_tx
            .send(EngineCommand::FetchInventory { path: path.into() });
    }

    pub fn execute(&self, effect: Effect) {
        let _ = self.cmd_tx.send(effect.into());
    }
}

async fn handle_command(client: &dyn ConsoleClient, command: EngineCommand, sink: &dyn EventSink) {
    match command {
        EngineCommand::FetchInventory { path } => {
            let result = client.fetch_status(&path).await;
            sink.emit(EngineEvent::InventoryFetched(result));
        }
        EngineCommand::PushSession(update) => {
            // Best effort: the page already shows the new value.
            match client.push_session(&update).await {
                Ok(()) => console_debug!("session {} = {}", update.key.as_str(), update.value),
                Err(err) => console_debug!(
                    "session push {} ignored: {}",
                    update.key.as_str(),
                    err
                ),
            }
        }
        EngineCommand::RunAction(action) => {
            let result = client.run_action(&action.request()).await;
            match &result {
                Ok(messages) => console_info!("{} -> {} message(s)", action, messages.len()),
                Err(err) => console_warn!("{} failed: {}", action, err),
            }
            sink.emit(EngineEvent::ActionCompleted { action, result });
        }
        EngineCommand::FetchDocument { title, path } => {
            let result = client.fetch_document(&path).await;
            sink.emit(EngineEvent::DocumentFetched { title, result });
        }
        EngineCommand::FetchChart { path } => {
            let result = client.fetch_status(&path).await;
            sink.emit(EngineEvent::ChartFetched(result));
        }
        EngineCommand::StartPolling { .. } | EngineCommand::CancelPolling { .. } => {}
    }
}
