use crate::filter::{FilterEngine, ViewCollections};
use crate::view_model::{HarvesterView, Modal, PageView, ViewVisibility};
use crate::{
    BatchSelection, ChartData, HarvesterState, HarvesterWidget, PollRegistry, StatusEntry,
    StatusPayload, Totals, ViewMode, ViewModeRegistry,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    pub(crate) registry: ViewModeRegistry,
    pub(crate) filter: FilterEngine,
    pub(crate) collections: ViewCollections,
    pub(crate) selection: BatchSelection,
    pub(crate) polls: PollRegistry,
    pub(crate) widgets: Vec<HarvesterWidget>,
    pub(crate) totals: Totals,
    pub(crate) chart: Option<ChartData>,
    pub(crate) modal: Option<Modal>,
    pub(crate) alerts: Vec<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> PageView {
        let mode_visibility = |name: &str| ViewVisibility {
            list: self.collections.is_visible(ViewMode::List, name),
            card: self.collections.is_visible(ViewMode::Card, name),
            table: self.collections.is_visible(ViewMode::Table, name),
        };
        let harvesters = self
            .widgets
            .iter()
            .map(|widget| HarvesterView {
                widget: widget.clone(),
                visible: mode_visibility(&widget.name),
                checked: self
                    .selection
                    .rows()
                    .iter()
                    .any(|row| row.name == widget.name && row.checked),
                polling: self.polls.is_polling(&widget.name),
            })
            .collect();

        PageView {
            ui: self.registry.ui(),
            containers: self.registry.containers(),
            mode_switches: self.registry.switches(),
            filter_query: self.filter.query().to_string(),
            harvesters,
            master_checked: self.selection.master(),
            batch: self.selection.controls(),
            totals: self.totals,
            chart: self.chart.clone(),
            modal: self.modal.clone(),
            alerts: self.alerts.clone(),
            dirty: self.dirty,
        }
    }

    pub fn polls(&self) -> &PollRegistry {
        &self.polls
    }

    pub fn widget(&self, name: &str) -> Option<&HarvesterWidget> {
        self.widgets.iter().find(|widget| widget.name == name)
    }

    pub(crate) fn widget_mut(&mut self, name: &str) -> Option<&mut HarvesterWidget> {
        self.widgets.iter_mut().find(|widget| widget.name == name)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Adds (or refreshes) every harvester of an initial status payload.
    pub(crate) fn register_inventory(&mut self, payload: &StatusPayload) {
        for (name, entry) in payload.entries() {
            let widget = match entry {
                StatusEntry::Disabled => HarvesterWidget::new(name, HarvesterState::Disabled),
                StatusEntry::Status(snapshot) => HarvesterWidget::from_snapshot(name, snapshot),
            };
            self.collections.register(name);
            self.selection.register(name);
            match self.widget_mut(name) {
                Some(existing) => *existing = widget,
                None => self.widgets.push(widget),
            }
        }
        self.totals = Totals::from_payload(payload);
    }
}
