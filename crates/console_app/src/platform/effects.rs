use std::sync::mpsc;
use std::thread;

use chrono::Utc;
use console_core::routes::all_status_path;
use console_core::{Effect, Msg, UiState};
use console_engine::{EngineError, EngineEvent, EngineEvents, EngineHandle, FetchError};
use console_logging::{console_debug, console_info, console_warn};

use super::app::Input;
use super::config::ConsoleConfig;

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    /// Starts the engine, asks for the initial inventory and forwards engine
    /// events as messages.
    pub fn new(config: &ConsoleConfig, input_tx: mpsc::Sender<Input>) -> Result<Self, EngineError> {
        let (engine, events) = EngineHandle::new(config.client_settings(), config.poll_interval())?;
        spawn_event_loop(events, config.ui, input_tx);
        engine.fetch_inventory(all_status_path());
        console_info!("engine started against {}", config.base_url);
        Ok(Self { engine })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            console_debug!("effect {:?}", effect);
            self.engine.execute(effect);
        }
    }
}

fn spawn_event_loop(events: EngineEvents, session: UiState, input_tx: mpsc::Sender<Input>) {
    thread::spawn(move || {
        while let Some(event) = events.recv() {
            if input_tx.send(Input::Msg(to_msg(event, session))).is_err() {
                break;
            }
        }
        console_debug!("engine event channel closed");
    });
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Maps an engine event to a core message. HTTP failures keep their raw body
/// for the operator; poll failures only need a short reason.
pub(crate) fn to_msg(event: EngineEvent, session: UiState) -> Msg {
    match event {
        EngineEvent::InventoryFetched(result) => {
            if let Err(err) = &result {
                console_warn!("inventory fetch failed: {}", err);
            }
            Msg::PageLoaded {
                session,
                inventory: result.map_err(|err| err.to_string()),
            }
        }
        EngineEvent::StatusFetched {
            poll_id,
            name,
            result,
        } => Msg::StatusReceived {
            poll_id,
            name,
            now_ms: now_ms(),
            result: result.map_err(|err| err.to_string()),
        },
        EngineEvent::ActionCompleted { action, result } => Msg::ActionCompleted {
            action,
            result: result.map_err(raw_text),
        },
        EngineEvent::DocumentFetched { title, result } => Msg::DocumentReceived {
            title,
            result: result.map_err(raw_text),
        },
        EngineEvent::ChartFetched(result) => Msg::ChartReceived(result.map_err(raw_text)),
    }
}

fn raw_text(err: FetchError) -> String {
    err.message
}
