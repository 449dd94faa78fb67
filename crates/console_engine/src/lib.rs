//! Harvester console engine: HTTP I/O, status polling and effect execution.
mod client;
mod decode;
mod engine;
mod poller;
mod types;

pub use client::{ClientSettings, ConsoleClient, ReqwestClient};
pub use decode::{decode_action_messages, decode_status_payload, pretty_document};
pub use engine::{EngineEvents, EngineHandle};
pub use poller::{ChannelEventSink, EventSink, PollerPool, DEFAULT_POLL_INTERVAL};
pub use types::{EngineError, EngineEvent, FailureKind, FetchError};
