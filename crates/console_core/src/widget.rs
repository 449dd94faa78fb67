use crate::poll::{ProgressUpdate, WAITING_MESSAGE};
use crate::style::{style_for, BarStyle};
use crate::{HarvesterState, Metric, StatusSnapshot};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressBar {
    /// Percent, 0-100.
    pub width: u8,
    pub text: String,
    pub style: BarStyle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub text: String,
    pub style: &'static str,
}

/// Everything the page shows for one harvester, across all views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvesterWidget {
    pub name: String,
    pub state: HarvesterState,
    pub progress: ProgressBar,
    pub time_label: String,
    pub badge: Badge,
    pub max_docs: Metric,
    pub cached_docs: Option<u64>,
    pub health: Option<String>,
    pub gui_status: Option<String>,
    pub data_provider: Option<String>,
}

impl HarvesterWidget {
    pub fn new(name: &str, state: HarvesterState) -> Self {
        let style = style_for(&state);
        let mut widget = Self {
            name: name.to_string(),
            state: state.clone(),
            progress: ProgressBar::default(),
            time_label: String::new(),
            badge: Badge {
                text: state.to_string(),
                style: style.badge,
            },
            max_docs: Metric::Unknown,
            cached_docs: None,
            health: None,
            gui_status: None,
            data_provider: None,
        };
        widget.apply_style(&state);
        widget
    }

    /// Widget as rendered from the initial status payload.
    pub fn from_snapshot(name: &str, snapshot: &StatusSnapshot) -> Self {
        let mut widget = Self::new(name, snapshot.state.clone());
        if let Metric::Count(value) = snapshot.progress_cur {
            widget.progress.width = u8::try_from(value.min(100)).unwrap_or(100);
        }
        widget.progress.text = snapshot.progress_cur.to_string();
        widget.max_docs = snapshot.max_docs;
        widget.cached_docs = snapshot.cached_docs;
        widget.health = snapshot.health.clone();
        widget.gui_status = snapshot.gui_status.clone();
        widget.data_provider = snapshot.data_provider.clone();
        widget
    }

    /// Sets badge and bar appearance from the style table.
    pub fn apply_style(&mut self, state: &HarvesterState) {
        let style = style_for(state);
        self.state = state.clone();
        self.badge = Badge {
            text: state.to_string(),
            style: style.badge,
        };
        self.progress.style = style.bar;
    }

    pub fn apply_progress(&mut self, update: &ProgressUpdate) {
        self.progress.width = update.width;
        self.progress.text = update.text.clone();
        self.time_label = update.time_label.clone();
        self.max_docs = update.max_docs;
        self.cached_docs = update.cached_docs;
        if update.health.is_some() {
            self.health = update.health.clone();
        }
        if update.gui_status.is_some() {
            self.gui_status = update.gui_status.clone();
        }
        self.apply_style(&update.state);
    }

    /// Final update: frozen bar, cleared time label, static style.
    pub fn apply_terminal(&mut self, update: &ProgressUpdate) {
        self.apply_progress(update);
        self.time_label.clear();
        self.progress.style = BarStyle::Static;
    }

    pub fn show_waiting(&mut self) {
        self.time_label = WAITING_MESSAGE.to_string();
    }
}
