use crate::{Action, PollId, SessionUpdate};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Begin fixed-interval polling of `path`.
    StartPolling {
        poll_id: PollId,
        name: String,
        path: String,
    },
    /// Stop the timer of `poll_id`. Emitted once per handle.
    CancelPolling { poll_id: PollId, name: String },
    /// Fire-and-forget session write.
    PushSession(SessionUpdate),
    RunAction(Action),
    /// Fetch an opaque JSON document for the modal.
    FetchDocument { title: String, path: String },
    FetchChart { path: String },
}
