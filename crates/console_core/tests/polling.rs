use std::sync::Once;

use console_core::{
    update, AppState, BarStyle, ChartData, Effect, HarvesterState, Metric, Msg, PollId,
    PollRegistry, StatusEntry, StatusPayload, StatusSnapshot, TickOutcome, TimeReading, UiState,
    Action, START_GRACE_TICKS, WAITING_MESSAGE,
};
use pretty_assertions::assert_eq;

const NOW: i64 = 1_700_000_000_000;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(console_logging::initialize_for_tests);
}

fn snapshot(state: HarvesterState, progress: u64) -> StatusSnapshot {
    StatusSnapshot {
        progress_cur: Metric::Count(progress),
        max_docs: Metric::Count(1000),
        ..StatusSnapshot::new(state)
    }
}

fn payload(entries: Vec<(&str, StatusEntry)>) -> StatusPayload {
    StatusPayload::new(
        entries
            .into_iter()
            .map(|(name, entry)| (name.to_string(), entry))
            .collect(),
    )
}

fn single(name: &str, snapshot: StatusSnapshot) -> StatusPayload {
    payload(vec![(name, StatusEntry::Status(snapshot))])
}

fn load(inventory: StatusPayload) -> (AppState, Vec<Effect>) {
    update(
        AppState::new(),
        Msg::PageLoaded {
            session: UiState::default(),
            inventory: Ok(inventory),
        },
    )
}

fn started_poll(effects: &[Effect], wanted: &str) -> PollId {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::StartPolling { poll_id, name, .. } if name == wanted => Some(*poll_id),
            _ => None,
        })
        .expect("start polling effect")
}

fn status(poll_id: PollId, name: &str, result: Result<StatusPayload, String>) -> Msg {
    Msg::StatusReceived {
        poll_id,
        name: name.to_string(),
        now_ms: NOW,
        result,
    }
}

#[test]
fn active_harvesters_are_polled_on_load() {
    init_logging();
    let (state, effects) = load(payload(vec![
        ("h1", StatusEntry::Status(snapshot(HarvesterState::Harvesting, 10))),
        ("h2", StatusEntry::Status(snapshot(HarvesterState::Queued, 0))),
        ("h3", StatusEntry::Status(snapshot(HarvesterState::Idle, 0))),
        ("h4", StatusEntry::Disabled),
    ]));

    assert_eq!(
        effects,
        vec![
            Effect::StartPolling {
                poll_id: 1,
                name: "h1".to_string(),
                path: "hcc/h1/progress".to_string(),
            },
            Effect::StartPolling {
                poll_id: 2,
                name: "h2".to_string(),
                path: "hcc/h2/progress".to_string(),
            },
        ]
    );
    assert_eq!(state.polls().live().count(), 2);
    assert_eq!(state.view().totals.disabled, 1);
}

#[test]
fn at_most_one_handle_per_harvester() {
    init_logging();
    let (state, effects) = load(single("h1", snapshot(HarvesterState::Harvesting, 10)));
    assert_eq!(effects.len(), 1);

    let (state, effects) = update(
        state,
        Msg::StartClicked {
            name: "h1".to_string(),
        },
    );
    assert_eq!(effects.len(), 1, "only the start action, no second poll");
    assert!(matches!(effects[0], Effect::RunAction(_)));
    assert_eq!(state.polls().live().count(), 1);
}

#[test]
fn start_click_opens_poll_for_idle_harvester() {
    init_logging();
    let (state, effects) = load(single("h1", snapshot(HarvesterState::Idle, 0)));
    assert!(effects.is_empty());

    let (state, effects) = update(
        state,
        Msg::StartClicked {
            name: "h1".to_string(),
        },
    );
    assert_eq!(effects.len(), 2);
    assert!(state.polls().is_polling("h1"));
}

#[test]
fn started_poll_survives_pre_start_status() {
    init_logging();
    let (state, _) = load(single("h1", snapshot(HarvesterState::Idle, 0)));
    let (state, effects) = update(
        state,
        Msg::StartClicked {
            name: "h1".to_string(),
        },
    );
    let poll_id = started_poll(&effects, "h1");

    // The first tick can beat the start request to the server.
    let (state, effects) = update(
        state,
        status(poll_id, "h1", Ok(single("h1", snapshot(HarvesterState::Idle, 0)))),
    );
    assert!(effects.is_empty());
    assert!(state.polls().is_polling("h1"));
    assert_eq!(state.widget("h1").unwrap().badge.text, "idle");

    let (state, effects) = update(
        state,
        status(
            poll_id,
            "h1",
            Ok(single("h1", snapshot(HarvesterState::Harvesting, 3))),
        ),
    );
    assert!(effects.is_empty());
    assert_eq!(state.widget("h1").unwrap().progress.text, "3%");

    // Once active was seen, the next inactive state ends the poll.
    let (state, effects) = update(
        state,
        status(
            poll_id,
            "h1",
            Ok(single("h1", snapshot(HarvesterState::Finished, 100))),
        ),
    );
    assert_eq!(
        effects,
        vec![Effect::CancelPolling {
            poll_id,
            name: "h1".to_string()
        }]
    );
    assert!(!state.polls().is_polling("h1"));
}

#[test]
fn start_that_never_takes_effect_stops_after_grace() {
    init_logging();
    let (state, _) = load(single("h1", snapshot(HarvesterState::Idle, 0)));
    let (mut state, effects) = update(
        state,
        Msg::StartClicked {
            name: "h1".to_string(),
        },
    );
    let poll_id = started_poll(&effects, "h1");

    for _ in 0..START_GRACE_TICKS {
        let (next, effects) = update(
            state,
            status(poll_id, "h1", Ok(single("h1", snapshot(HarvesterState::Idle, 0)))),
        );
        assert!(effects.is_empty());
        state = next;
    }
    assert!(state.polls().is_polling("h1"));

    let (state, effects) = update(
        state,
        status(poll_id, "h1", Ok(single("h1", snapshot(HarvesterState::Idle, 0)))),
    );
    assert_eq!(
        effects,
        vec![Effect::CancelPolling {
            poll_id,
            name: "h1".to_string()
        }]
    );
    assert!(!state.polls().is_polling("h1"));
}

#[test]
fn failed_start_cancels_its_poll() {
    init_logging();
    let (state, _) = load(single("h1", snapshot(HarvesterState::Idle, 0)));
    let (state, effects) = update(
        state,
        Msg::StartClicked {
            name: "h1".to_string(),
        },
    );
    let poll_id = started_poll(&effects, "h1");

    let (state, effects) = update(
        state,
        Msg::ActionCompleted {
            action: Action::Start {
                name: "h1".to_string(),
            },
            result: Err("http status 500".to_string()),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::CancelPolling {
            poll_id,
            name: "h1".to_string()
        }]
    );
    assert!(!state.polls().is_polling("h1"));
}

#[test]
fn failed_start_keeps_polls_opened_on_load() {
    init_logging();
    let (state, _) = load(single("h1", snapshot(HarvesterState::Harvesting, 10)));
    let (state, effects) = update(
        state,
        Msg::ActionCompleted {
            action: Action::StartAll,
            result: Err("http status 500".to_string()),
        },
    );
    assert!(effects.is_empty());
    assert!(state.polls().is_polling("h1"));
}

#[test]
fn terminal_state_cancels_exactly_once() {
    init_logging();
    let (state, effects) = load(single("h1", snapshot(HarvesterState::Harvesting, 10)));
    let poll_id = started_poll(&effects, "h1");

    let (state, effects) = update(
        state,
        status(
            poll_id,
            "h1",
            Ok(single("h1", snapshot(HarvesterState::Harvesting, 40))),
        ),
    );
    assert!(effects.is_empty());

    let (state, effects) = update(
        state,
        status(
            poll_id,
            "h1",
            Ok(single("h1", snapshot(HarvesterState::Harvesting, 60))),
        ),
    );
    assert!(effects.is_empty());

    let (state, effects) = update(
        state,
        status(
            poll_id,
            "h1",
            Ok(single("h1", snapshot(HarvesterState::Finished, 100))),
        ),
    );
    assert_eq!(
        effects,
        vec![Effect::CancelPolling {
            poll_id,
            name: "h1".to_string()
        }]
    );
    assert!(!state.polls().is_polling("h1"));

    // A late in-flight response neither cancels again nor resurrects the poll.
    let (state, effects) = update(
        state,
        status(
            poll_id,
            "h1",
            Ok(single("h1", snapshot(HarvesterState::Harvesting, 70))),
        ),
    );
    assert!(effects.is_empty());
    assert!(!state.polls().is_polling("h1"));
    let widget = state.widget("h1").unwrap();
    assert_eq!(widget.badge.text, "finished");
    assert_eq!(widget.progress.text, "100%");
}

#[test]
fn terminal_visual_freezes_bar_and_clears_time() {
    init_logging();
    let (state, effects) = load(single("h1", snapshot(HarvesterState::Harvesting, 10)));
    let poll_id = started_poll(&effects, "h1");

    let running = StatusSnapshot {
        remaining_harvest_time: Some(65_000),
        ..snapshot(HarvesterState::Harvesting, 55)
    };
    let (state, _) = update(state, status(poll_id, "h1", Ok(single("h1", running))));
    let widget = state.widget("h1").unwrap();
    assert_eq!(widget.time_label, "remaining time: 1min 5sec");
    assert_eq!(widget.progress.style, BarStyle::Animated);

    let finished = StatusSnapshot {
        progress_cur: Metric::NotAvailable,
        ..snapshot(HarvesterState::Finished, 0)
    };
    let (state, _) = update(state, status(poll_id, "h1", Ok(single("h1", finished))));
    let widget = state.widget("h1").unwrap();
    assert_eq!(widget.progress.width, 55);
    assert_eq!(widget.progress.text, "55%");
    assert_eq!(widget.time_label, "");
    assert_eq!(widget.progress.style, BarStyle::Static);
    assert_eq!(widget.badge.text, "finished");
    assert_eq!(widget.badge.style, "secondary");
}

#[test]
fn failed_fetch_keeps_polling_with_waiting_message() {
    init_logging();
    let (state, effects) = load(single("h1", snapshot(HarvesterState::Queued, 0)));
    let poll_id = started_poll(&effects, "h1");

    let (state, effects) = update(state, status(poll_id, "h1", Err("timeout".to_string())));
    assert!(effects.is_empty());
    assert!(state.polls().is_polling("h1"));
    assert_eq!(state.widget("h1").unwrap().time_label, WAITING_MESSAGE);
    assert_eq!(state.polls().get(poll_id).unwrap().record().failures, 1);

    // The next successful tick recovers.
    let (state, _) = update(
        state,
        status(
            poll_id,
            "h1",
            Ok(single("h1", snapshot(HarvesterState::Harvesting, 5))),
        ),
    );
    assert_eq!(state.widget("h1").unwrap().progress.text, "5%");
}

#[test]
fn disabled_payload_entry_is_skipped() {
    init_logging();
    let (state, effects) = load(payload(vec![
        ("h1", StatusEntry::Status(snapshot(HarvesterState::Harvesting, 1))),
        ("h2", StatusEntry::Status(snapshot(HarvesterState::Harvesting, 1))),
    ]));
    let h1 = started_poll(&effects, "h1");
    let h2 = started_poll(&effects, "h2");
    let before_h2 = state.widget("h2").unwrap().clone();

    let tick_payload = payload(vec![
        (
            "h1",
            StatusEntry::Status(StatusSnapshot {
                progress_cur: Metric::Count(42),
                max_docs: Metric::Count(100),
                ..StatusSnapshot::new(HarvesterState::Harvesting)
            }),
        ),
        ("h2", StatusEntry::Disabled),
    ]);

    let (state, effects) = update(state, status(h1, "h1", Ok(tick_payload.clone())));
    assert!(effects.is_empty());
    assert_eq!(state.widget("h1").unwrap().progress.text, "42%");

    let (state, effects) = update(state, status(h2, "h2", Ok(tick_payload.clone())));
    assert_eq!(
        effects,
        vec![Effect::CancelPolling {
            poll_id: h2,
            name: "h2".to_string()
        }]
    );
    assert_eq!(state.widget("h2").unwrap(), &before_h2);

    let chart = ChartData::from_payload(&tick_payload);
    assert_eq!(chart.labels, vec!["h1".to_string()]);
    assert_eq!(chart.data, vec![0]);
}

#[test]
fn progress_without_max_docs_has_no_percent_sign() {
    let mut registry = PollRegistry::default();
    let poll_id = registry.start("h1", "hcc/h1/progress".to_string()).unwrap();
    let entry = StatusEntry::Status(StatusSnapshot {
        progress_cur: Metric::Count(17),
        max_docs: Metric::NotAvailable,
        ..StatusSnapshot::new(HarvesterState::Harvesting)
    });

    match registry.on_status(poll_id, &entry, NOW) {
        TickOutcome::Active(update) => {
            assert_eq!(update.text, "17");
            assert_eq!(update.width, 17);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test]
fn cancel_is_idempotent() {
    let mut registry = PollRegistry::default();
    let poll_id = registry.start("h1", "hcc/h1/progress".to_string()).unwrap();

    assert!(registry.cancel(poll_id).is_some());
    assert!(registry.cancel(poll_id).is_none());
    assert!(registry.cancel_by_name("h1").is_none());
    assert!(!registry.on_failure(poll_id));

    // A restart mints a fresh id, so old responses stay stale.
    let restarted = registry.start("h1", "hcc/h1/progress".to_string()).unwrap();
    assert_ne!(restarted, poll_id);
    let entry = StatusEntry::Status(StatusSnapshot::new(HarvesterState::Finished));
    assert_eq!(registry.on_status(poll_id, &entry, NOW), TickOutcome::Stale);
    assert!(registry.is_polling("h1"));
}

#[test]
fn time_source_precedence() {
    let all = StatusSnapshot {
        remaining_harvest_time: Some(5_000),
        last_harvest_date: Some(NOW - 65_000),
        last_activated: Some(NOW - 3_661_000),
        ..StatusSnapshot::new(HarvesterState::Harvesting)
    };
    assert_eq!(
        TimeReading::from_snapshot(&all, NOW),
        Some(TimeReading::Remaining(5_000))
    );

    let elapsed = StatusSnapshot {
        remaining_harvest_time: None,
        ..all.clone()
    };
    let reading = TimeReading::from_snapshot(&elapsed, NOW).unwrap();
    assert_eq!(reading.label(), "current runtime: 1min 5sec");

    let waiting = StatusSnapshot {
        remaining_harvest_time: None,
        last_harvest_date: None,
        ..all
    };
    let reading = TimeReading::from_snapshot(&waiting, NOW).unwrap();
    assert_eq!(reading.label(), "waiting for harvest: 1h 1min 1sec");

    let future = StatusSnapshot {
        last_activated: Some(NOW + 10_000),
        ..StatusSnapshot::new(HarvesterState::Queued)
    };
    assert_eq!(
        TimeReading::from_snapshot(&future, NOW),
        Some(TimeReading::Waiting(0))
    );
}
