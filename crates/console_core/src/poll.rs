use crate::time::format_duration;
use crate::{HarvesterState, Metric, StatusEntry, StatusSnapshot};

pub type PollId = u64;

/// Shown in the time label while a status fetch fails.
pub const WAITING_MESSAGE: &str = "status unavailable, retrying...";

/// Inactive ticks tolerated after an operator start before the poll gives up.
pub const START_GRACE_TICKS: u64 = 5;

/// Memory a poller carries from one tick to the next.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PollRecord {
    pub ticks: u64,
    pub failures: u64,
    /// Last numeric progress width, used to freeze the bar.
    pub last_width: u8,
    /// Progress text that went with `last_width`.
    pub last_text: String,
    pub max_docs: Metric,
    pub cached_docs: Option<u64>,
    /// Opened by an operator start and no active state seen yet.
    pub awaiting_start: bool,
    /// Inactive ticks observed while awaiting the start.
    pub pending_ticks: u64,
}

/// A live status poll for one harvester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollHandle {
    pub id: PollId,
    pub name: String,
    pub url: String,
    record: PollRecord,
}

impl PollHandle {
    pub fn record(&self) -> &PollRecord {
        &self.record
    }
}

/// Which time field a snapshot offered, by precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeReading {
    Remaining(u64),
    Runtime(u64),
    Waiting(u64),
}

impl TimeReading {
    /// Remaining time wins over elapsed-since-harvest, which wins over
    /// elapsed-since-activation.
    pub fn from_snapshot(snapshot: &StatusSnapshot, now_ms: i64) -> Option<Self> {
        if let Some(remaining) = snapshot.remaining_harvest_time {
            return Some(Self::Remaining(remaining));
        }
        if let Some(started) = snapshot.last_harvest_date {
            return Some(Self::Runtime(elapsed_since(started, now_ms)));
        }
        snapshot
            .last_activated
            .map(|activated| Self::Waiting(elapsed_since(activated, now_ms)))
    }

    pub fn label(self) -> String {
        match self {
            Self::Remaining(ms) => format!("remaining time: {}", format_duration(ms)),
            Self::Runtime(ms) => format!("current runtime: {}", format_duration(ms)),
            Self::Waiting(ms) => format!("waiting for harvest: {}", format_duration(ms)),
        }
    }
}

fn elapsed_since(timestamp_ms: i64, now_ms: i64) -> u64 {
    u64::try_from(now_ms.saturating_sub(timestamp_ms)).unwrap_or(0)
}

/// Page changes derived from one status snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub width: u8,
    pub text: String,
    pub time_label: String,
    pub state: HarvesterState,
    pub max_docs: Metric,
    pub cached_docs: Option<u64>,
    pub health: Option<String>,
    pub gui_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Harvester still active; keep polling.
    Active(ProgressUpdate),
    /// Terminal state observed; the handle is gone.
    Terminal {
        poll_id: PollId,
        update: ProgressUpdate,
    },
    /// Harvester reported as disabled; the handle is gone and the page is
    /// left untouched.
    Disabled { poll_id: PollId },
    /// The start request has not taken effect yet; keep polling and leave
    /// the page alone.
    Pending,
    /// No live handle with this id; the response is dropped.
    Stale,
}

/// Folds one snapshot into the poller's record.
pub fn tick(record: &mut PollRecord, snapshot: &StatusSnapshot, now_ms: i64) -> ProgressUpdate {
    record.ticks += 1;
    record.max_docs = snapshot.max_docs;
    if snapshot.cached_docs.is_some() {
        record.cached_docs = snapshot.cached_docs;
    }

    let text = match snapshot.progress_cur {
        Metric::Count(value) => {
            record.last_width = u8::try_from(value.min(100)).unwrap_or(100);
            let text = match snapshot.max_docs {
                Metric::NotAvailable => value.to_string(),
                Metric::Count(_) | Metric::Unknown => format!("{value}%"),
            };
            record.last_text = text.clone();
            text
        }
        other => other.to_string(),
    };

    ProgressUpdate {
        width: record.last_width,
        text,
        time_label: TimeReading::from_snapshot(snapshot, now_ms)
            .map(TimeReading::label)
            .unwrap_or_default(),
        state: snapshot.state.clone(),
        max_docs: record.max_docs,
        cached_docs: record.cached_docs,
        health: snapshot.health.clone(),
        gui_status: snapshot.gui_status.clone(),
    }
}

/// All live poll handles, at most one per harvester name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PollRegistry {
    next_id: PollId,
    handles: Vec<PollHandle>,
}

impl PollRegistry {
    /// Opens a handle for a harvester already known to be active. Returns
    /// `None` if one is already live.
    pub fn start(&mut self, name: &str, url: String) -> Option<PollId> {
        self.open(name, url, PollRecord::default())
    }

    /// Opens a handle right after an operator start. Until an active state
    /// is seen, up to [`START_GRACE_TICKS`] inactive ticks are tolerated.
    pub fn start_awaiting(&mut self, name: &str, url: String) -> Option<PollId> {
        let record = PollRecord {
            awaiting_start: true,
            ..PollRecord::default()
        };
        self.open(name, url, record)
    }

    fn open(&mut self, name: &str, url: String, record: PollRecord) -> Option<PollId> {
        if self.is_polling(name) {
            return None;
        }
        self.next_id += 1;
        self.handles.push(PollHandle {
            id: self.next_id,
            name: name.to_string(),
            url,
            record,
        });
        Some(self.next_id)
    }

    pub fn is_polling(&self, name: &str) -> bool {
        self.handles.iter().any(|handle| handle.name == name)
    }

    pub fn get(&self, poll_id: PollId) -> Option<&PollHandle> {
        self.handles.iter().find(|handle| handle.id == poll_id)
    }

    pub fn live(&self) -> impl Iterator<Item = &PollHandle> {
        self.handles.iter()
    }

    /// Removes the handle with `poll_id`. Only the first call returns it.
    pub fn cancel(&mut self, poll_id: PollId) -> Option<PollHandle> {
        let index = self.handles.iter().position(|handle| handle.id == poll_id)?;
        Some(self.handles.remove(index))
    }

    /// Cancels handles still waiting for a start to take effect, all of them
    /// or only the one for `name`.
    pub fn cancel_awaiting(&mut self, name: Option<&str>) -> Vec<PollHandle> {
        let (cancelled, kept) = std::mem::take(&mut self.handles)
            .into_iter()
            .partition(|handle| {
                handle.record.awaiting_start && name.map_or(true, |name| handle.name == name)
            });
        self.handles = kept;
        cancelled
    }

    /// Cancels whatever handle `name` has, if any.
    pub fn cancel_by_name(&mut self, name: &str) -> Option<PollHandle> {
        let poll_id = self.handles.iter().find(|handle| handle.name == name)?.id;
        self.cancel(poll_id)
    }

    /// Applies a fetched entry to the handle's record. A terminal state
    /// cancels the handle in the same step.
    pub fn on_status(&mut self, poll_id: PollId, entry: &StatusEntry, now_ms: i64) -> TickOutcome {
        let Some(handle) = self.handles.iter_mut().find(|handle| handle.id == poll_id) else {
            return TickOutcome::Stale;
        };
        let snapshot = match entry {
            StatusEntry::Disabled => {
                self.cancel(poll_id);
                return TickOutcome::Disabled { poll_id };
            }
            StatusEntry::Status(snapshot) => snapshot,
        };

        if snapshot.state.is_active() {
            handle.record.awaiting_start = false;
            return TickOutcome::Active(tick(&mut handle.record, snapshot, now_ms));
        }
        if handle.record.awaiting_start && handle.record.pending_ticks < START_GRACE_TICKS {
            handle.record.pending_ticks += 1;
            return TickOutcome::Pending;
        }

        let mut update = tick(&mut handle.record, snapshot, now_ms);
        if snapshot.progress_cur.count().is_none() && !handle.record.last_text.is_empty() {
            update.text = handle.record.last_text.clone();
        }
        self.cancel(poll_id);
        update.time_label.clear();
        TickOutcome::Terminal { poll_id, update }
    }

    /// Records a failed fetch. Returns `false` for stale handles.
    pub fn on_failure(&mut self, poll_id: PollId) -> bool {
        match self.handles.iter_mut().find(|handle| handle.id == poll_id) {
            Some(handle) => {
                handle.record.failures += 1;
                true
            }
            None => false,
        }
    }
}
