//! Harvester console core: pure state machine and view-model helpers.
mod chart;
mod effect;
mod filter;
mod harvester;
mod msg;
mod poll;
pub mod routes;
mod selection;
mod state;
mod style;
mod time;
mod ui_state;
mod update;
mod view_mode;
mod view_model;
mod widget;

pub use chart::{ChartData, Totals};
pub use effect::Effect;
pub use filter::{harvester_name_of, Element, FilterEngine, ViewCollections};
pub use harvester::{HarvesterState, Metric, StatusEntry, StatusPayload, StatusSnapshot};
pub use msg::Msg;
pub use poll::{
    tick, PollHandle, PollId, PollRecord, PollRegistry, ProgressUpdate, TickOutcome, TimeReading,
    START_GRACE_TICKS, WAITING_MESSAGE,
};
pub use routes::{Action, ActionRequest, HttpMethod};
pub use selection::{BatchControl, BatchControls, BatchSelection, RowCheckbox};
pub use state::AppState;
pub use style::{style_for, BarStyle, StateStyle};
pub use time::format_duration;
pub use ui_state::{
    Panel, PanelStates, PanelVisibility, SessionKey, SessionUpdate, Theme, UiState, ViewMode,
};
pub use update::update;
pub use view_mode::{ContainerVisibility, ModeSwitch, ViewModeRegistry};
pub use view_model::{HarvesterView, Modal, PageView, ViewVisibility};
pub use widget::{Badge, HarvesterWidget, ProgressBar};
