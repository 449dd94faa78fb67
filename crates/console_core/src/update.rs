use crate::poll::TickOutcome;
use crate::routes::{all_status_path, history_path, logs_path, progress_path};
use crate::view_model::Modal;
use crate::{Action, AppState, ChartData, Effect, Msg, PollId, StatusPayload, Totals};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::PageLoaded { session, inventory } => {
            state.registry.init_from_session(session);
            let effects = match inventory {
                Ok(payload) => {
                    state.register_inventory(&payload);
                    let active: Vec<String> = payload
                        .statuses()
                        .filter(|(_, snapshot)| snapshot.state.is_active())
                        .map(|(name, _)| name.to_string())
                        .collect();
                    active
                        .iter()
                        .filter_map(|name| start_polling(&mut state, name))
                        .collect()
                }
                Err(err) => {
                    state
                        .alerts
                        .push(format!("could not load harvesters: {err}"));
                    Vec::new()
                }
            };
            let mode = state.registry.get_mode();
            state.filter.reapply(mode, &mut state.collections);
            state.mark_dirty();
            effects
        }
        Msg::ViewModeSelected(mode) => match state.registry.set_mode(mode) {
            Some(session_update) => {
                state.filter.reapply(mode, &mut state.collections);
                state.mark_dirty();
                vec![Effect::PushSession(session_update)]
            }
            None => Vec::new(),
        },
        Msg::FilterChanged(query) => {
            let mode = state.registry.get_mode();
            state.filter.apply(&query, mode, &mut state.collections);
            state.mark_dirty();
            Vec::new()
        }
        Msg::ThemeToggled => {
            let session_update = state.registry.toggle_theme();
            state.mark_dirty();
            vec![Effect::PushSession(session_update)]
        }
        Msg::PanelToggled(panel) => {
            let session_update = state.registry.toggle_panel(panel);
            state.mark_dirty();
            vec![Effect::PushSession(session_update)]
        }
        Msg::RowCheckChanged { name, checked } => {
            if state.selection.set_checked(&name, checked) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::MasterCheckChanged(checked) => {
            state.selection.set_all(checked);
            state.mark_dirty();
            Vec::new()
        }
        Msg::BatchStartClicked => state
            .selection
            .controls()
            .start
            .target
            .map(|target| vec![Effect::RunAction(Action::BatchStart { target })])
            .unwrap_or_default(),
        Msg::BatchToggleClicked => state
            .selection
            .controls()
            .toggle
            .target
            .map(|target| vec![Effect::RunAction(Action::BatchToggle { target })])
            .unwrap_or_default(),
        Msg::StartClicked { name } => {
            let mut effects = Vec::with_capacity(2);
            effects.push(Effect::RunAction(Action::Start { name: name.clone() }));
            effects.extend(start_polling_after_start(&mut state, &name));
            effects
        }
        Msg::StopClicked { name } => vec![Effect::RunAction(Action::Stop { name })],
        Msg::StartAllClicked => {
            let names: Vec<String> = state
                .widgets
                .iter()
                .filter(|widget| widget.state != crate::HarvesterState::Disabled)
                .map(|widget| widget.name.clone())
                .collect();
            let mut effects = Vec::with_capacity(names.len() + 1);
            effects.push(Effect::RunAction(Action::StartAll));
            effects.extend(
                names
                    .iter()
                    .filter_map(|name| start_polling_after_start(&mut state, name)),
            );
            effects
        }
        Msg::StopAllClicked => vec![Effect::RunAction(Action::StopAll)],
        Msg::ScheduleSubmitted { name, crontab } => {
            vec![Effect::RunAction(Action::ScheduleAdd { name, crontab })]
        }
        Msg::ScheduleDeleted { name, crontab } => {
            vec![Effect::RunAction(Action::ScheduleDelete { name, crontab })]
        }
        Msg::LogRequested => vec![Effect::FetchDocument {
            title: "harvester logs".to_string(),
            path: logs_path().to_string(),
        }],
        Msg::HistoryRequested { name } => vec![Effect::FetchDocument {
            title: format!("{name} state history"),
            path: history_path(&name),
        }],
        Msg::ChartRequested => vec![Effect::FetchChart {
            path: all_status_path().to_string(),
        }],
        Msg::StatusReceived {
            poll_id,
            name,
            now_ms,
            result,
        } => apply_status(&mut state, poll_id, &name, now_ms, result),
        Msg::ActionCompleted { action, result } => {
            let effects = if result.is_err() {
                cancel_awaiting_polls(&mut state, &action)
            } else {
                Vec::new()
            };
            match result {
                Ok(messages) if messages.is_empty() => {
                    state.alerts.push(format!("{action}: done"));
                }
                Ok(messages) => {
                    state.alerts.extend(
                        messages
                            .into_iter()
                            .map(|(key, message)| format!("{key}: {message}")),
                    );
                }
                Err(err) => state.alerts.push(format!("{action} failed: {err}")),
            }
            state.mark_dirty();
            effects
        }
        Msg::DocumentReceived { title, result } => {
            state.modal = Some(match result {
                Ok(body) => Modal { title, body },
                Err(raw) => Modal {
                    title: format!("{title} (error)"),
                    body: raw,
                },
            });
            state.mark_dirty();
            Vec::new()
        }
        Msg::ChartReceived(result) => {
            match result {
                Ok(payload) => {
                    state.chart = Some(ChartData::from_payload(&payload));
                    state.totals = Totals::from_payload(&payload);
                }
                Err(raw) => {
                    state.modal = Some(Modal {
                        title: "chart (error)".to_string(),
                        body: raw,
                    });
                }
            }
            state.mark_dirty();
            Vec::new()
        }
        Msg::ModalClosed => {
            if state.modal.take().is_some() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::AlertsDismissed => {
            if !state.alerts.is_empty() {
                state.alerts.clear();
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Opens a poll handle unless one is already live for `name`.
fn start_polling(state: &mut AppState, name: &str) -> Option<Effect> {
    let path = progress_path(name);
    let poll_id = state.polls.start(name, path.clone())?;
    state.mark_dirty();
    Some(Effect::StartPolling {
        poll_id,
        name: name.to_string(),
        path,
    })
}

/// Like [`start_polling`], for a harvester the operator just started and
/// whose status may still show the pre-start state.
fn start_polling_after_start(state: &mut AppState, name: &str) -> Option<Effect> {
    let path = progress_path(name);
    let poll_id = state.polls.start_awaiting(name, path.clone())?;
    state.mark_dirty();
    Some(Effect::StartPolling {
        poll_id,
        name: name.to_string(),
        path,
    })
}

/// A rejected start leaves nothing to watch.
fn cancel_awaiting_polls(state: &mut AppState, action: &Action) -> Vec<Effect> {
    let name = match action {
        Action::Start { name } => Some(name.as_str()),
        Action::StartAll => None,
        _ => return Vec::new(),
    };
    state
        .polls
        .cancel_awaiting(name)
        .into_iter()
        .map(|handle| Effect::CancelPolling {
            poll_id: handle.id,
            name: handle.name,
        })
        .collect()
}

fn apply_status(
    state: &mut AppState,
    poll_id: PollId,
    name: &str,
    now_ms: i64,
    result: Result<StatusPayload, String>,
) -> Vec<Effect> {
    let entry = result
        .ok()
        .and_then(|payload| payload.get(name).cloned());
    let Some(entry) = entry else {
        // Failed or empty fetch: keep polling, explain the stale display.
        if state.polls.on_failure(poll_id) {
            if let Some(widget) = state.widget_mut(name) {
                widget.show_waiting();
            }
            state.mark_dirty();
        }
        return Vec::new();
    };

    match state.polls.on_status(poll_id, &entry, now_ms) {
        TickOutcome::Active(update) => {
            if let Some(widget) = state.widget_mut(name) {
                widget.apply_progress(&update);
            }
            state.mark_dirty();
            Vec::new()
        }
        TickOutcome::Terminal { poll_id, update } => {
            if let Some(widget) = state.widget_mut(name) {
                widget.apply_terminal(&update);
            }
            state.mark_dirty();
            vec![Effect::CancelPolling {
                poll_id,
                name: name.to_string(),
            }]
        }
        TickOutcome::Disabled { poll_id } => {
            state.mark_dirty();
            vec![Effect::CancelPolling {
                poll_id,
                name: name.to_string(),
            }]
        }
        TickOutcome::Pending | TickOutcome::Stale => Vec::new(),
    }
}
