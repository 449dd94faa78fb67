use crate::style::style_for;
use crate::{StatusEntry, StatusPayload};

/// Input for the pie chart widget.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub data: Vec<u64>,
    pub colors: Vec<&'static str>,
}

impl ChartData {
    /// One slice per non-disabled harvester: its cached document count.
    pub fn from_payload(payload: &StatusPayload) -> Self {
        let mut chart = Self::default();
        for (name, snapshot) in payload.statuses() {
            chart.labels.push(name.to_string());
            chart.data.push(snapshot.cached_docs.unwrap_or(0));
            chart.colors.push(style_for(&snapshot.state).color);
        }
        chart
    }

    pub fn total(&self) -> u64 {
        self.data.iter().sum()
    }
}

/// Summary line shown above the harvester collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub cached_docs: u64,
    pub max_docs: u64,
    pub enabled: usize,
    pub disabled: usize,
}

impl Totals {
    pub fn from_payload(payload: &StatusPayload) -> Self {
        let mut totals = Self::default();
        for (_, entry) in payload.entries() {
            match entry {
                StatusEntry::Disabled => totals.disabled += 1,
                StatusEntry::Status(snapshot) => {
                    totals.enabled += 1;
                    totals.cached_docs += snapshot.cached_docs.unwrap_or(0);
                    totals.max_docs += snapshot.max_docs.count().unwrap_or(0);
                }
            }
        }
        totals
    }
}
