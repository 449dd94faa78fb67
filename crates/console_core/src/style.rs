use crate::HarvesterState;

/// Whether a progress bar is drawn as running (striped, animated) or frozen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarStyle {
    Animated,
    #[default]
    Static,
}

/// Presentation attributes for one harvester state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateStyle {
    pub badge: &'static str,
    pub bar: BarStyle,
    /// Chart slice color.
    pub color: &'static str,
}

const ACTIVE: StateStyle = StateStyle {
    badge: "info",
    bar: BarStyle::Animated,
    color: "#17a2b8",
};
const QUEUED: StateStyle = StateStyle {
    badge: "primary",
    bar: BarStyle::Animated,
    color: "#007bff",
};
const IDLE: StateStyle = StateStyle {
    badge: "success",
    bar: BarStyle::Static,
    color: "#28a745",
};
const FINISHED: StateStyle = StateStyle {
    badge: "secondary",
    bar: BarStyle::Static,
    color: "#6c757d",
};
const DISABLED: StateStyle = StateStyle {
    badge: "dark",
    bar: BarStyle::Static,
    color: "#343a40",
};
const FAILED: StateStyle = StateStyle {
    badge: "danger",
    bar: BarStyle::Static,
    color: "#dc3545",
};
const UNKNOWN: StateStyle = StateStyle {
    badge: "warning",
    bar: BarStyle::Static,
    color: "#ffc107",
};

/// State to style lookup; the single place styles are decided.
pub fn style_for(state: &HarvesterState) -> StateStyle {
    match state {
        HarvesterState::Harvesting => ACTIVE,
        HarvesterState::Queued => QUEUED,
        HarvesterState::Idle => IDLE,
        HarvesterState::Finished => FINISHED,
        HarvesterState::Disabled => DISABLED,
        HarvesterState::Error => FAILED,
        HarvesterState::Other(_) => UNKNOWN,
    }
}
