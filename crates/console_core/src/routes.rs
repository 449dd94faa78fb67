//! Server paths, relative to the configured base URL.

use std::fmt;

const SCHEDULE_FIELD: &str = "cronTab";

pub fn progress_path(name: &str) -> String {
    format!("hcc/{name}/progress")
}

pub fn all_status_path() -> &'static str {
    "v1/harvesters/status"
}

pub fn logs_path() -> &'static str {
    "hcc/logs"
}

pub fn history_path(name: &str) -> String {
    format!("hcc/{name}/etls")
}

pub fn session_path() -> &'static str {
    "hcc/updatesession"
}

/// Batch start target for the given names, in the given order.
pub fn batch_start_target(names: &[&str]) -> String {
    format!("start/{}", names.join("-"))
}

/// Batch enable/disable target for the given names, in the given order.
pub fn batch_toggle_target(names: &[&str]) -> String {
    format!("toggle/{}", names.join("-"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

/// An operator action that changes server-side harvester state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Start { name: String },
    Stop { name: String },
    StartAll,
    StopAll,
    ScheduleAdd { name: String, crontab: String },
    ScheduleDelete { name: String, crontab: String },
    /// Target as produced by [`batch_start_target`].
    BatchStart { target: String },
    /// Target as produced by [`batch_toggle_target`].
    BatchToggle { target: String },
}

/// Wire shape of an [`Action`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub method: HttpMethod,
    pub path: String,
    pub form: Vec<(String, String)>,
}

impl Action {
    pub fn request(&self) -> ActionRequest {
        let (method, path, form) = match self {
            Action::Start { name } => (
                HttpMethod::Post,
                format!("v1/harvesters/{name}/start/"),
                Vec::new(),
            ),
            Action::Stop { name } => (
                HttpMethod::Post,
                format!("v1/harvesters/{name}/stop/"),
                Vec::new(),
            ),
            Action::StartAll => (
                HttpMethod::Post,
                "v1/harvesters/start".to_string(),
                Vec::new(),
            ),
            Action::StopAll => (
                HttpMethod::Post,
                "v1/harvesters/stop".to_string(),
                Vec::new(),
            ),
            Action::ScheduleAdd { name, crontab } => (
                HttpMethod::Post,
                format!("v1/harvesters/{name}/schedule/"),
                vec![(format!("{name}-{SCHEDULE_FIELD}"), crontab.clone())],
            ),
            Action::ScheduleDelete { name, crontab } => (
                HttpMethod::Delete,
                format!("v1/harvesters/{name}/schedule/"),
                vec![(SCHEDULE_FIELD.to_string(), crontab.clone())],
            ),
            Action::BatchStart { target } | Action::BatchToggle { target } => {
                (HttpMethod::Get, format!("hcc/{target}"), Vec::new())
            }
        };
        ActionRequest { method, path, form }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Start { name } => write!(f, "start {name}"),
            Action::Stop { name } => write!(f, "stop {name}"),
            Action::StartAll => f.write_str("start all"),
            Action::StopAll => f.write_str("stop all"),
            Action::ScheduleAdd { name, crontab } => write!(f, "schedule {name} '{crontab}'"),
            Action::ScheduleDelete { name, crontab } => {
                write!(f, "unschedule {name} '{crontab}'")
            }
            Action::BatchStart { target } | Action::BatchToggle { target } => f.write_str(target),
        }
    }
}
