use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The three alternate renderings of the harvester collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    List,
    #[default]
    Card,
    Table,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::List, ViewMode::Card, ViewMode::Table];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Card => "card",
            Self::Table => "table",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "list" => Ok(Self::List),
            "card" => Ok(Self::Card),
            "table" => Ok(Self::Table),
            other => Err(format!("unknown view mode '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// Collapsible page sections whose state is mirrored to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    Toolbox,
    Chart,
    EnabledHarvesters,
    DisabledHarvesters,
}

impl FromStr for Panel {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "toolbox" => Ok(Self::Toolbox),
            "chart" => Ok(Self::Chart),
            "enabled" => Ok(Self::EnabledHarvesters),
            "disabled" => Ok(Self::DisabledHarvesters),
            other => Err(format!("unknown panel '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelVisibility {
    Visible,
    #[default]
    Collapsed,
}

impl PanelVisibility {
    pub fn toggled(self) -> Self {
        match self {
            Self::Visible => Self::Collapsed,
            Self::Collapsed => Self::Visible,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Visible => "visible",
            Self::Collapsed => "collapsed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelStates {
    pub toolbox: PanelVisibility,
    pub chart: PanelVisibility,
    pub enabled_harvesters: PanelVisibility,
    pub disabled_harvesters: PanelVisibility,
}

impl Default for PanelStates {
    fn default() -> Self {
        Self {
            toolbox: PanelVisibility::Collapsed,
            chart: PanelVisibility::Collapsed,
            enabled_harvesters: PanelVisibility::Visible,
            disabled_harvesters: PanelVisibility::Collapsed,
        }
    }
}

impl PanelStates {
    pub fn get(&self, panel: Panel) -> PanelVisibility {
        match panel {
            Panel::Toolbox => self.toolbox,
            Panel::Chart => self.chart,
            Panel::EnabledHarvesters => self.enabled_harvesters,
            Panel::DisabledHarvesters => self.disabled_harvesters,
        }
    }

    fn slot(&mut self, panel: Panel) -> &mut PanelVisibility {
        match panel {
            Panel::Toolbox => &mut self.toolbox,
            Panel::Chart => &mut self.chart,
            Panel::EnabledHarvesters => &mut self.enabled_harvesters,
            Panel::DisabledHarvesters => &mut self.disabled_harvesters,
        }
    }

    pub fn set(&mut self, panel: Panel, visibility: PanelVisibility) {
        *self.slot(panel) = visibility;
    }
}

/// Page-wide presentation state, as held in the server session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UiState {
    mode: ViewMode,
    pub theme: Theme,
    pub panels: PanelStates,
}

impl UiState {
    pub fn new(mode: ViewMode, theme: Theme, panels: PanelStates) -> Self {
        Self {
            mode,
            theme,
            panels,
        }
    }

    pub fn get_mode(&self) -> ViewMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
    }
}

/// Session variables understood by the server's session endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKey {
    ViewType,
    Theme,
    Panel(Panel),
}

impl SessionKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ViewType => "viewtype",
            Self::Theme => "mode",
            Self::Panel(Panel::Toolbox) => "toolbox",
            Self::Panel(Panel::Chart) => "chart",
            Self::Panel(Panel::EnabledHarvesters) => "enabledHarvs",
            Self::Panel(Panel::DisabledHarvesters) => "disabledHarvs",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUpdate {
    pub key: SessionKey,
    pub value: String,
}

impl SessionUpdate {
    pub fn new(key: SessionKey, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}
