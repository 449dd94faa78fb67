use console_core::{HarvesterState, Metric, PollRegistry, StatusEntry, TickOutcome};
use console_engine::{decode_action_messages, decode_status_payload, pretty_document, FailureKind};
use pretty_assertions::assert_eq;

#[test]
fn status_payload_keeps_order_and_disabled_marker() {
    let body = br#"{
        "zenodo": {"state": "harvesting", "progress_cur": 42, "max_docs": 100},
        "dryad": "disabled",
        "fao": {"state": "idle", "progress_cur": "N/A", "max_docs": "N/A", "cached_docs": "17"}
    }"#;

    let payload = decode_status_payload(body).expect("decodes");
    let names: Vec<_> = payload.entries().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["zenodo", "dryad", "fao"]);
    assert_eq!(payload.get("dryad"), Some(&StatusEntry::Disabled));

    let Some(StatusEntry::Status(zenodo)) = payload.get("zenodo") else {
        panic!("zenodo should carry a status");
    };
    assert_eq!(zenodo.state, HarvesterState::Harvesting);
    assert_eq!(zenodo.progress_cur, Metric::Count(42));
    assert_eq!(zenodo.max_docs, Metric::Count(100));

    let Some(StatusEntry::Status(fao)) = payload.get("fao") else {
        panic!("fao should carry a status");
    };
    assert_eq!(fao.progress_cur, Metric::NotAvailable);
    assert_eq!(fao.max_docs, Metric::NotAvailable);
    assert_eq!(fao.cached_docs, Some(17));
}

#[test]
fn timestamps_accept_millis_and_rfc3339() {
    let body = br#"{
        "a": {"state": "queued", "lastActivated": 1700000000000},
        "b": {"state": "harvesting", "lastHarvestDate": "2023-11-14T22:13:20Z", "remainingHarvestTime": 65000}
    }"#;

    let payload = decode_status_payload(body).unwrap();
    let statuses: Vec<_> = payload.statuses().map(|(_, s)| s.clone()).collect();
    assert_eq!(statuses[0].last_activated, Some(1_700_000_000_000));
    assert_eq!(statuses[1].last_harvest_date, Some(1_700_000_000_000));
    assert_eq!(statuses[1].remaining_harvest_time, Some(65_000));
}

#[test]
fn legacy_status_field_and_unknown_states() {
    let body = br#"{
        "old": {"status": "idling", "health": "OK", "gui_status": "success"},
        "broken": "Error : no response object"
    }"#;

    let payload = decode_status_payload(body).unwrap();
    let Some(StatusEntry::Status(old)) = payload.get("old") else {
        panic!("old should carry a status");
    };
    assert_eq!(old.state, HarvesterState::Other("idling".to_string()));
    assert!(old.is_healthy());
    assert_eq!(old.gui_status.as_deref(), Some("success"));

    let Some(StatusEntry::Status(broken)) = payload.get("broken") else {
        panic!("broken should carry a status");
    };
    assert!(!broken.state.is_active());
    assert_eq!(broken.health.as_deref(), Some("Error : no response object"));
}

#[test]
fn non_object_payload_is_a_decode_error() {
    let err = decode_status_payload(b"[1, 2]").unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);

    let err = decode_status_payload(b"<html>").unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[test]
fn action_messages_flatten_health_objects() {
    let body = br#"{"zenodo": "harvest started", "fao": {"health": "already running"}}"#;
    assert_eq!(
        decode_action_messages(body),
        vec![
            ("zenodo".to_string(), "harvest started".to_string()),
            ("fao".to_string(), "already running".to_string()),
        ]
    );
    assert!(decode_action_messages(b"<html>redirected</html>").is_empty());
}

#[test]
fn documents_are_pretty_printed_when_json() {
    assert_eq!(pretty_document(br#"{"a":{"log":"x"}}"#), "{\n  \"a\": {\n    \"log\": \"x\"\n  }\n}");
    assert_eq!(pretty_document(b"plain text"), "plain text");
}

#[test]
fn missing_max_docs_keeps_percent_sign() {
    let payload =
        decode_status_payload(br#"{"h1": {"state": "harvesting", "progress_cur": 42}}"#).unwrap();
    let entry = payload.get("h1").unwrap();
    let StatusEntry::Status(snapshot) = entry else {
        panic!("h1 should carry a status");
    };
    assert_eq!(snapshot.max_docs, Metric::Unknown);

    let mut registry = PollRegistry::default();
    let poll_id = registry.start("h1", "hcc/h1/progress".to_string()).unwrap();
    let TickOutcome::Active(update) = registry.on_status(poll_id, entry, 0) else {
        panic!("harvesting should stay active");
    };
    assert_eq!(update.text, "42%");
}

#[test]
fn literal_na_max_docs_drops_percent_sign() {
    let payload = decode_status_payload(
        br#"{"h1": {"state": "harvesting", "progress_cur": 42, "max_docs": "n/a"}}"#,
    )
    .unwrap();
    let entry = payload.get("h1").unwrap();

    let mut registry = PollRegistry::default();
    let poll_id = registry.start("h1", "hcc/h1/progress".to_string()).unwrap();
    let TickOutcome::Active(update) = registry.on_status(poll_id, entry, 0) else {
        panic!("harvesting should stay active");
    };
    assert_eq!(update.text, "42");
}

#[test]
fn non_string_gui_status_does_not_fail_the_payload() {
    let body = br#"{
        "a": {"state": "harvesting", "gui_status": 3},
        "b": {"state": "idle", "gui_status": null}
    }"#;

    let payload = decode_status_payload(body).expect("decodes");
    let Some(StatusEntry::Status(a)) = payload.get("a") else {
        panic!("a should carry a status");
    };
    assert_eq!(a.gui_status.as_deref(), Some("3"));
    let Some(StatusEntry::Status(b)) = payload.get("b") else {
        panic!("b should carry a status");
    };
    assert_eq!(b.gui_status, None);
}
