use std::fmt;

/// Lifecycle state reported by the server for one harvester.
///
/// Unknown strings (older harvester libraries report "initialization",
/// "idling" or "no status") are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum HarvesterState {
    #[default]
    Idle,
    Queued,
    Harvesting,
    Finished,
    Disabled,
    Error,
    Other(String),
}

impl HarvesterState {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "idle" => Self::Idle,
            "queued" => Self::Queued,
            "harvesting" => Self::Harvesting,
            "finished" => Self::Finished,
            "disabled" => Self::Disabled,
            "error" => Self::Error,
            _ => Self::Other(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Idle => "idle",
            Self::Queued => "queued",
            Self::Harvesting => "harvesting",
            Self::Finished => "finished",
            Self::Disabled => "disabled",
            Self::Error => "error",
            Self::Other(raw) => raw,
        }
    }

    /// Active states are the ones that warrant status polling.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Harvesting | Self::Queued)
    }
}

impl fmt::Display for HarvesterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document count that the server may report as `"N/A"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Metric {
    Count(u64),
    /// The literal `"N/A"`.
    NotAvailable,
    /// Absent or unreadable.
    #[default]
    Unknown,
}

impl Metric {
    pub fn count(self) -> Option<u64> {
        match self {
            Self::Count(value) => Some(value),
            Self::NotAvailable | Self::Unknown => None,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(value) => write!(f, "{value}"),
            Self::NotAvailable => f.write_str("N/A"),
            Self::Unknown => f.write_str("-"),
        }
    }
}

/// Transient copy of the server-side status of one harvester.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusSnapshot {
    pub state: HarvesterState,
    /// Percentage 0-100 when known.
    pub progress_cur: Metric,
    pub max_docs: Metric,
    pub cached_docs: Option<u64>,
    pub health: Option<String>,
    /// Epoch milliseconds.
    pub last_harvest_date: Option<i64>,
    /// Epoch milliseconds.
    pub last_activated: Option<i64>,
    pub remaining_harvest_time: Option<u64>,
    pub gui_status: Option<String>,
    pub data_provider: Option<String>,
}

impl StatusSnapshot {
    pub fn new(state: HarvesterState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.health.as_deref().map_or(true, |health| health == "OK")
    }
}

/// One value of the status mapping: either a status object or the bare
/// `"disabled"` marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusEntry {
    Disabled,
    Status(StatusSnapshot),
}

/// Status mapping from harvester name to entry, in payload order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusPayload {
    entries: Vec<(String, StatusEntry)>,
}

impl StatusPayload {
    pub fn new(entries: Vec<(String, StatusEntry)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&StatusEntry> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, entry)| entry)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &StatusEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Entries that carry a status object; disabled markers are skipped.
    pub fn statuses(&self) -> impl Iterator<Item = (&str, &StatusSnapshot)> {
        self.entries().filter_map(|(name, entry)| match entry {
            StatusEntry::Status(snapshot) => Some((name, snapshot)),
            StatusEntry::Disabled => None,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
