use std::sync::Once;

use console_core::{
    update, AppState, ContainerVisibility, Effect, HarvesterState, Msg, Panel, PanelStates,
    SessionKey, SessionUpdate, StatusEntry, StatusPayload, StatusSnapshot, Theme, UiState,
    ViewMode, ViewModeRegistry,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(console_logging::initialize_for_tests);
}

fn loaded(mode: ViewMode, names: &[&str]) -> AppState {
    let payload = StatusPayload::new(
        names
            .iter()
            .map(|name| {
                (
                    name.to_string(),
                    StatusEntry::Status(StatusSnapshot::new(HarvesterState::Idle)),
                )
            })
            .collect(),
    );
    let session = UiState::new(mode, Theme::Light, PanelStates::default());
    let (state, effects) = update(
        AppState::new(),
        Msg::PageLoaded {
            session,
            inventory: Ok(payload),
        },
    );
    assert!(effects.is_empty());
    state
}

#[test]
fn session_mode_is_applied_without_push() {
    init_logging();
    let state = loaded(ViewMode::Table, &["alpha"]);
    let view = state.view();

    assert_eq!(view.ui.get_mode(), ViewMode::Table);
    assert_eq!(view.containers, ContainerVisibility::of(ViewMode::Table));
}

#[test]
fn exactly_one_container_visible_after_every_switch() {
    init_logging();
    let mut state = loaded(ViewMode::Card, &["alpha"]);
    for mode in [
        ViewMode::List,
        ViewMode::Table,
        ViewMode::Table,
        ViewMode::Card,
        ViewMode::List,
    ] {
        let (next, _) = update(state, Msg::ViewModeSelected(mode));
        state = next;
        let view = state.view();
        assert_eq!(view.containers.visible_count(), 1);
        assert_eq!(view.ui.get_mode(), mode);
    }
}

#[test]
fn switching_mode_pushes_viewtype() {
    init_logging();
    let state = loaded(ViewMode::Card, &["alpha"]);
    let (_state, effects) = update(state, Msg::ViewModeSelected(ViewMode::List));

    assert_eq!(
        effects,
        vec![Effect::PushSession(SessionUpdate::new(
            SessionKey::ViewType,
            "list"
        ))]
    );
}

#[test]
fn selecting_active_mode_is_a_noop() {
    init_logging();
    let mut state = loaded(ViewMode::Card, &["alpha"]);
    assert!(state.consume_dirty());

    let (mut state, effects) = update(state, Msg::ViewModeSelected(ViewMode::Card));
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
}

#[test]
fn active_switch_is_disabled() {
    let registry = ViewModeRegistry::new(UiState::new(
        ViewMode::List,
        Theme::Dark,
        PanelStates::default(),
    ));
    let switches = registry.switches();

    for switch in switches {
        assert_eq!(switch.enabled, switch.mode != ViewMode::List);
    }
}

#[test]
fn filter_follows_view_switch() {
    init_logging();
    let state = loaded(ViewMode::Card, &["alpha", "beta"]);
    let (state, _) = update(state, Msg::FilterChanged("alp".to_string()));
    let view = state.view();
    assert!(view.harvester("alpha").unwrap().visible.card);
    assert!(!view.harvester("beta").unwrap().visible.card);
    // Other views are untouched until they become active.
    assert!(view.harvester("beta").unwrap().visible.table);

    let (state, _) = update(state, Msg::ViewModeSelected(ViewMode::Table));
    let view = state.view();
    assert!(!view.harvester("beta").unwrap().visible.table);
    let shown: Vec<_> = view
        .visible_harvesters()
        .map(|harvester| harvester.widget.name.as_str())
        .collect();
    assert_eq!(shown, vec!["alpha"]);
}

#[test]
fn theme_and_panels_push_their_session_keys() {
    init_logging();
    let state = loaded(ViewMode::Card, &[]);

    let (state, effects) = update(state, Msg::ThemeToggled);
    assert_eq!(
        effects,
        vec![Effect::PushSession(SessionUpdate::new(SessionKey::Theme, "dark"))]
    );
    assert_eq!(state.view().ui.theme, Theme::Dark);

    let (state, effects) = update(state, Msg::PanelToggled(Panel::Chart));
    assert_eq!(
        effects,
        vec![Effect::PushSession(SessionUpdate::new(
            SessionKey::Panel(Panel::Chart),
            "visible"
        ))]
    );

    let (_state, effects) = update(state, Msg::PanelToggled(Panel::EnabledHarvesters));
    match &effects[..] {
        [Effect::PushSession(session_update)] => {
            assert_eq!(session_update.key.as_str(), "enabledHarvs");
            assert_eq!(session_update.value, "collapsed");
        }
        other => panic!("unexpected effects {other:?}"),
    }
}
