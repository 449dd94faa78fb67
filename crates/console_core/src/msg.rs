use crate::{Action, Panel, PollId, StatusPayload, UiState, ViewMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Page loaded with the session state and the initial status payload.
    PageLoaded {
        session: UiState,
        inventory: Result<StatusPayload, String>,
    },
    /// User clicked one of the view-mode switches.
    ViewModeSelected(ViewMode),
    /// User edited the filter box.
    FilterChanged(String),
    ThemeToggled,
    PanelToggled(Panel),
    /// A table-row checkbox changed.
    RowCheckChanged { name: String, checked: bool },
    /// The master checkbox changed.
    MasterCheckChanged(bool),
    BatchStartClicked,
    BatchToggleClicked,
    StartClicked { name: String },
    StopClicked { name: String },
    StartAllClicked,
    StopAllClicked,
    ScheduleSubmitted { name: String, crontab: String },
    ScheduleDeleted { name: String, crontab: String },
    LogRequested,
    HistoryRequested { name: String },
    ChartRequested,
    /// Result of one poll tick.
    StatusReceived {
        poll_id: PollId,
        name: String,
        now_ms: i64,
        result: Result<StatusPayload, String>,
    },
    /// Per-key messages from an action endpoint, or the failure text.
    ActionCompleted {
        action: Action,
        result: Result<Vec<(String, String)>, String>,
    },
    /// Log or history body (pretty JSON), or the raw failure text.
    DocumentReceived {
        title: String,
        result: Result<String, String>,
    },
    ChartReceived(Result<StatusPayload, String>),
    ModalClosed,
    AlertsDismissed,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for unrecognised input.
    NoOp,
}
