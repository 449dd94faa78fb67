use crate::{Panel, SessionKey, SessionUpdate, UiState, ViewMode};

/// Visibility of the three presentation containers.
///
/// Derived from the single active mode, so exactly one flag is ever set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerVisibility {
    pub list: bool,
    pub card: bool,
    pub table: bool,
}

impl ContainerVisibility {
    pub fn of(mode: ViewMode) -> Self {
        Self {
            list: mode == ViewMode::List,
            card: mode == ViewMode::Card,
            table: mode == ViewMode::Table,
        }
    }

    pub fn visible_count(&self) -> usize {
        [self.list, self.card, self.table]
            .into_iter()
            .filter(|visible| *visible)
            .count()
    }
}

/// A mode-switch control; the one for the active mode is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeSwitch {
    pub mode: ViewMode,
    pub enabled: bool,
}

/// Owns the page-wide [`UiState`] and turns changes into session updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewModeRegistry {
    ui: UiState,
}

impl ViewModeRegistry {
    pub fn new(ui: UiState) -> Self {
        Self { ui }
    }

    /// Adopts a server-provided starting state without pushing it back.
    pub fn init_from_session(&mut self, ui: UiState) {
        self.ui = ui;
    }

    pub fn ui(&self) -> UiState {
        self.ui
    }

    pub fn get_mode(&self) -> ViewMode {
        self.ui.get_mode()
    }

    /// Activates `mode`. Returns the session update to push, or `None` when
    /// the mode was already active (its switch control is disabled).
    pub fn set_mode(&mut self, mode: ViewMode) -> Option<SessionUpdate> {
        if self.ui.get_mode() == mode {
            return None;
        }
        self.ui.set_mode(mode);
        Some(SessionUpdate::new(SessionKey::ViewType, mode.as_str()))
    }

    pub fn containers(&self) -> ContainerVisibility {
        ContainerVisibility::of(self.ui.get_mode())
    }

    pub fn switches(&self) -> [ModeSwitch; 3] {
        let active = self.ui.get_mode();
        ViewMode::ALL.map(|mode| ModeSwitch {
            mode,
            enabled: mode != active,
        })
    }

    pub fn toggle_theme(&mut self) -> SessionUpdate {
        self.ui.theme = self.ui.theme.toggled();
        SessionUpdate::new(SessionKey::Theme, self.ui.theme.as_str())
    }

    pub fn toggle_panel(&mut self, panel: Panel) -> SessionUpdate {
        let next = self.ui.panels.get(panel).toggled();
        self.ui.panels.set(panel, next);
        SessionUpdate::new(SessionKey::Panel(panel), next.as_str())
    }
}
