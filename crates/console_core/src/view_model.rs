use crate::{
    BatchControls, ChartData, ContainerVisibility, HarvesterWidget, ModeSwitch, Totals, UiState,
    ViewMode,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewVisibility {
    pub list: bool,
    pub card: bool,
    pub table: bool,
}

impl ViewVisibility {
    pub fn in_mode(&self, mode: ViewMode) -> bool {
        match mode {
            ViewMode::List => self.list,
            ViewMode::Card => self.card,
            ViewMode::Table => self.table,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvesterView {
    pub widget: HarvesterWidget,
    pub visible: ViewVisibility,
    pub checked: bool,
    pub polling: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modal {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub ui: UiState,
    pub containers: ContainerVisibility,
    pub mode_switches: [ModeSwitch; 3],
    pub filter_query: String,
    pub harvesters: Vec<HarvesterView>,
    pub master_checked: bool,
    pub batch: BatchControls,
    pub totals: Totals,
    pub chart: Option<ChartData>,
    pub modal: Option<Modal>,
    pub alerts: Vec<String>,
    pub dirty: bool,
}

impl PageView {
    /// Harvesters shown in the active view.
    pub fn visible_harvesters(&self) -> impl Iterator<Item = &HarvesterView> {
        let mode = self.ui.get_mode();
        self.harvesters
            .iter()
            .filter(move |harvester| harvester.visible.in_mode(mode))
    }

    pub fn harvester(&self, name: &str) -> Option<&HarvesterView> {
        self.harvesters
            .iter()
            .find(|harvester| harvester.widget.name == name)
    }
}
